//! Hashing machinery: the H3 universal hash family, the salted AP hash,
//! and the polymorphic [`Hasher`] that turns one object into *k* digests.

pub mod ap;
pub mod h3;
pub mod hasher;

/// The hash output unit.
pub type Digest = u64;

pub use ap::{SALT_COUNT, ap_hash};
pub use h3::H3;
pub use hasher::{
    ApHasher, DefaultHasher, DoubleHasher, HashFunction, Hasher,
    MAX_OBJECT_LEN, make_hasher,
};

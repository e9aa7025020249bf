//! Bloom and counting Bloom filter primitives with pluggable hashing.
//!
//! The crate splits into a hashing stack and two bit-backed structures:
//!
//! * [`hash`] — the H3 universal hash family (table-based, seeded), the
//!   salted AP hash, and the polymorphic [`Hasher`] that turns one
//!   object into an ordered sequence of `k` digests. Hashers are
//!   immutable once built and may back several filters through an
//!   `Arc`.
//! * [`bloom`] — the [`BloomFilter`] itself: sized from a capacity and
//!   target false-positive rate (or built around an explicit hasher and
//!   bit count), with flat or partitioned addressing of its bit array.
//! * [`counter`] — the [`CounterVector`], a packed array of fixed-width
//!   saturating counters with ripple carry/borrow arithmetic and
//!   cell-wise merge, the cell store of a counting filter.
//!
//! Every stateful component serializes to a flat byte buffer and
//! reconstructs bit-for-bit; integers travel in host-native width and
//! byte order, and a reconstruction that does not consume its buffer
//! exactly fails with a [`FormatError`].
//!
//! ```
//! use bloombits::{BloomFilter, FilterConfigBuilder};
//!
//! let config = FilterConfigBuilder::default()
//!     .capacity(10_000)
//!     .false_positive_rate(0.01)
//!     .build()
//!     .unwrap();
//! let mut filter = BloomFilter::new(&config).unwrap();
//! filter.add(b"some key").unwrap();
//! assert!(filter.lookup(b"some key").unwrap());
//!
//! let restored = BloomFilter::from_bytes(&filter.to_bytes()).unwrap();
//! assert!(restored.lookup(b"some key").unwrap());
//! ```

pub mod bits;
pub mod bloom;
mod codec;
pub mod counter;
mod error;
pub mod hash;

pub use bits::BitSeq;
pub use bloom::{
    BloomFilter, FilterConfig, FilterConfigBuilder, FilterConfigBuilderError,
    optimal_bit_count, optimal_hash_count,
};
pub use counter::CounterVector;
pub use error::{FilterError, FormatError, Result};
pub use hash::{
    ApHasher, DefaultHasher, Digest, DoubleHasher, H3, HashFunction, Hasher,
    MAX_OBJECT_LEN, SALT_COUNT, ap_hash, make_hasher,
};

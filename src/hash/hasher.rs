//! Hash functions and the polymorphic hasher.
//!
//! A [`HashFunction`] produces one digest per object; a [`Hasher`]
//! produces the ordered sequence of `k` digests a filter consumes. The
//! three hasher variants trade table memory against per-object work:
//! `Default` evaluates `k` independent H3 tables, `Double` derives `k`
//! digests from two evaluations, and `Ap` re-runs the salted hash at
//! `k` salt indices with no table memory at all.
//!
//! Every variant serializes to `[1-byte discriminant][variant fields]`,
//! with nested length-prefixed payloads for owned hash functions.

use crate::codec::{ByteReader, ByteWriter};
use crate::error::{FilterError, FormatError, Result};
use crate::hash::Digest;
use crate::hash::ap::{SALT_COUNT, ap_hash};
use crate::hash::h3::{H3, MinstdRand};
use std::sync::Arc;
use tracing::debug;

/// Largest object a table-backed [`HashFunction`] accepts, in bytes.
pub const MAX_OBJECT_LEN: usize = 36;

const TAG_DEFAULT: u8 = 0;
const TAG_DOUBLE: u8 = 1;
const TAG_AP: u8 = 2;

/// A single seeded hash function over objects of at most
/// [`MAX_OBJECT_LEN`] bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashFunction {
    h3: H3,
}

impl HashFunction {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            h3: H3::new(seed, MAX_OBJECT_LEN),
        }
    }

    /// Hashes `obj`, returning digest 0 for the empty object without
    /// touching the table.
    pub fn digest(&self, obj: &[u8]) -> Result<Digest> {
        if obj.len() > MAX_OBJECT_LEN {
            return Err(FilterError::ObjectTooLarge {
                size: obj.len(),
                max: MAX_OBJECT_LEN,
            });
        }
        if obj.is_empty() {
            return Ok(0);
        }
        Ok(self.h3.hash(obj))
    }

    pub(crate) fn write_into(&self, writer: &mut ByteWriter) {
        self.h3.write_into(writer);
    }

    pub fn serialized_size(&self) -> usize {
        self.h3.serialized_size()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.h3.to_bytes()
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        Ok(Self {
            h3: H3::from_bytes(buf, MAX_OBJECT_LEN)?,
        })
    }
}

/// `k` independent hash functions, digest *i* coming from function *i*.
#[derive(Clone, Debug)]
pub struct DefaultHasher {
    fns: Vec<Arc<HashFunction>>,
}

impl DefaultHasher {
    pub fn new(fns: Vec<Arc<HashFunction>>) -> Result<Self> {
        if fns.is_empty() {
            return Err(FilterError::InvalidConfig(
                "default hasher needs at least one hash function".into(),
            ));
        }
        Ok(Self { fns })
    }

    /// Builds `k` hash functions seeded from successive draws of the
    /// deterministic generator.
    pub fn seeded(k: usize, seed: u64) -> Result<Self> {
        let mut prng = MinstdRand::new(seed);
        let fns = (0..k)
            .map(|_| Arc::new(HashFunction::with_seed(prng.next())))
            .collect();
        Self::new(fns)
    }

    pub fn digest_count(&self) -> usize {
        self.fns.len()
    }

    pub fn digests(&self, obj: &[u8]) -> Result<Vec<Digest>> {
        self.fns.iter().map(|hash_fn| hash_fn.digest(obj)).collect()
    }

    fn write_into(&self, writer: &mut ByteWriter) {
        writer.put_u8(TAG_DEFAULT);
        writer.put_u32(self.fns.len() as u32);
        for hash_fn in &self.fns {
            writer.put_u32(hash_fn.serialized_size() as u32);
            hash_fn.write_into(writer);
        }
    }

    pub fn serialized_size(&self) -> usize {
        let mut size = 1 + 4;
        for hash_fn in &self.fns {
            size += 4 + hash_fn.serialized_size();
        }
        size
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(buf);
        let tag = reader.read_u8()?;
        if tag != TAG_DEFAULT {
            return Err(FilterError::Format(FormatError::TagMismatch {
                expected: TAG_DEFAULT,
                found: tag,
            }));
        }
        let count = reader.read_u32()? as usize;
        let mut fns = Vec::with_capacity(count);
        for _ in 0..count {
            let fn_size = reader.read_u32()? as usize;
            let fn_buf = reader.read_bytes(fn_size)?;
            fns.push(Arc::new(HashFunction::from_bytes(fn_buf)?));
        }
        reader.finish()?;
        Self::new(fns)
    }
}

/// Two hash functions whose digests combine linearly into `k` outputs:
/// digest *i* = `d1 + i * d2` with wrapping arithmetic.
#[derive(Clone, Debug)]
pub struct DoubleHasher {
    k: u64,
    h1: Arc<HashFunction>,
    h2: Arc<HashFunction>,
}

impl DoubleHasher {
    pub fn new(
        k: usize,
        h1: Arc<HashFunction>,
        h2: Arc<HashFunction>,
    ) -> Result<Self> {
        if k == 0 {
            return Err(FilterError::InvalidConfig(
                "digest count must be > 0".into(),
            ));
        }
        Ok(Self {
            k: k as u64,
            h1,
            h2,
        })
    }

    pub fn seeded(k: usize, seed: u64) -> Result<Self> {
        let mut prng = MinstdRand::new(seed);
        let h1 = Arc::new(HashFunction::with_seed(prng.next()));
        let h2 = Arc::new(HashFunction::with_seed(prng.next()));
        Self::new(k, h1, h2)
    }

    pub fn digest_count(&self) -> usize {
        self.k as usize
    }

    pub fn digests(&self, obj: &[u8]) -> Result<Vec<Digest>> {
        let d1 = self.h1.digest(obj)?;
        let d2 = self.h2.digest(obj)?;
        Ok((0..self.k)
            .map(|i| d1.wrapping_add(i.wrapping_mul(d2)))
            .collect())
    }

    fn write_into(&self, writer: &mut ByteWriter) {
        writer.put_u8(TAG_DOUBLE);
        writer.put_u64(self.k);
        writer.put_u32(self.h1.serialized_size() as u32);
        self.h1.write_into(writer);
        writer.put_u32(self.h2.serialized_size() as u32);
        self.h2.write_into(writer);
    }

    pub fn serialized_size(&self) -> usize {
        1 + 8
            + 4
            + self.h1.serialized_size()
            + 4
            + self.h2.serialized_size()
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(buf);
        let tag = reader.read_u8()?;
        if tag != TAG_DOUBLE {
            return Err(FilterError::Format(FormatError::TagMismatch {
                expected: TAG_DOUBLE,
                found: tag,
            }));
        }
        let k = reader.read_u64()? as usize;
        let h1_size = reader.read_u32()? as usize;
        let h1 = HashFunction::from_bytes(reader.read_bytes(h1_size)?)?;
        let h2_size = reader.read_u32()? as usize;
        let h2 = HashFunction::from_bytes(reader.read_bytes(h2_size)?)?;
        reader.finish()?;
        Self::new(k, Arc::new(h1), Arc::new(h2))
    }
}

/// Salted hasher: digest *i* is the AP hash of the object at salt index
/// *i*. Carries no table state, so it serializes to three bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApHasher {
    less_than_idx: u16,
}

impl ApHasher {
    /// `k` must lie in `1..=SALT_COUNT`.
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(FilterError::InvalidConfig(
                "digest count must be > 0".into(),
            ));
        }
        if k > SALT_COUNT {
            return Err(FilterError::InvalidConfig(format!(
                "digest count {k} exceeds the salt table size {SALT_COUNT}"
            )));
        }
        Ok(Self {
            less_than_idx: k as u16,
        })
    }

    pub fn digest_count(&self) -> usize {
        self.less_than_idx as usize
    }

    pub fn digests(&self, obj: &[u8]) -> Vec<Digest> {
        (0..self.less_than_idx as usize)
            .map(|salt_idx| ap_hash(obj, salt_idx))
            .collect()
    }

    fn write_into(&self, writer: &mut ByteWriter) {
        writer.put_u8(TAG_AP);
        writer.put_u16(self.less_than_idx);
    }

    pub fn serialized_size(&self) -> usize {
        1 + 2
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(buf);
        let tag = reader.read_u8()?;
        if tag != TAG_AP {
            return Err(FilterError::Format(FormatError::TagMismatch {
                expected: TAG_AP,
                found: tag,
            }));
        }
        let k = reader.read_u16()? as usize;
        reader.finish()?;
        Self::new(k)
    }
}

/// A hasher turns one object into an ordered sequence of `k` digests.
///
/// The variants form a closed set dispatched on a one-byte wire
/// discriminant (0 = default, 1 = double, 2 = ap). Instances are
/// immutable after construction and are shared between filters behind an
/// [`Arc`].
#[derive(Clone, Debug)]
pub enum Hasher {
    Default(DefaultHasher),
    Double(DoubleHasher),
    Ap(ApHasher),
}

impl Hasher {
    /// Number of digests every call to [`Hasher::digests`] yields.
    pub fn digest_count(&self) -> usize {
        match self {
            Hasher::Default(hasher) => hasher.digest_count(),
            Hasher::Double(hasher) => hasher.digest_count(),
            Hasher::Ap(hasher) => hasher.digest_count(),
        }
    }

    pub fn digests(&self, obj: &[u8]) -> Result<Vec<Digest>> {
        match self {
            Hasher::Default(hasher) => hasher.digests(obj),
            Hasher::Double(hasher) => hasher.digests(obj),
            Hasher::Ap(hasher) => Ok(hasher.digests(obj)),
        }
    }

    pub fn serialized_size(&self) -> usize {
        match self {
            Hasher::Default(hasher) => hasher.serialized_size(),
            Hasher::Double(hasher) => hasher.serialized_size(),
            Hasher::Ap(hasher) => hasher.serialized_size(),
        }
    }

    pub(crate) fn write_into(&self, writer: &mut ByteWriter) {
        match self {
            Hasher::Default(hasher) => hasher.write_into(writer),
            Hasher::Double(hasher) => hasher.write_into(writer),
            Hasher::Ap(hasher) => hasher.write_into(writer),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(self.serialized_size());
        self.write_into(&mut writer);
        debug_assert_eq!(writer.len(), self.serialized_size());
        writer.into_bytes()
    }

    /// Factory dispatch on the leading discriminant byte. The buffer
    /// must hold exactly one hasher payload.
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        let tag = *buf.first().ok_or(FormatError::UnexpectedEof {
            need: 1,
            have: 0,
        })?;
        match tag {
            TAG_DEFAULT => DefaultHasher::from_bytes(buf).map(Hasher::Default),
            TAG_DOUBLE => DoubleHasher::from_bytes(buf).map(Hasher::Double),
            TAG_AP => ApHasher::from_bytes(buf).map(Hasher::Ap),
            other => {
                Err(FilterError::Format(FormatError::UnknownHasherTag(other)))
            }
        }
    }
}

/// Builds the hasher behind a filter constructed from capacity and
/// false-positive targets.
///
/// Table-backed hash functions cap object length at [`MAX_OBJECT_LEN`]
/// bytes, so this helper always selects the salted hasher, which accepts
/// objects of any length; `seed` and `double_hashing` are recorded in
/// the debug log only. Callers who want table-based hashing construct
/// [`DefaultHasher::seeded`] or [`DoubleHasher::seeded`] directly.
pub fn make_hasher(
    k: usize,
    seed: u64,
    double_hashing: bool,
) -> Result<Hasher> {
    debug!(k, seed, double_hashing, "building salted hasher");
    Ok(Hasher::Ap(ApHasher::new(k)?))
}

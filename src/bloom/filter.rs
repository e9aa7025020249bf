//! The Bloom filter: partition-aware bit addressing over a shared
//! hasher, plus the flat-buffer codec.

use super::config::{FilterConfig, optimal_bit_count, optimal_hash_count};
use crate::bits::BitSeq;
use crate::codec::{ByteReader, ByteWriter};
use crate::error::{FilterError, Result};
use crate::hash::{Digest, Hasher, make_hasher};
use std::sync::Arc;
use tracing::debug;

/// A Bloom filter over opaque byte-slice objects.
///
/// The hasher is immutable and sits behind an [`Arc`], so several
/// filters may share one. With `partitioned` addressing the bit array
/// splits into `k` disjoint equal ranges, digest *i* selecting a bit
/// only within range *i*; flat addressing lets every digest reach the
/// whole array.
#[derive(Clone, Debug)]
pub struct BloomFilter {
    hasher: Arc<Hasher>,
    bits: BitSeq,
    partitioned: bool,
}

impl BloomFilter {
    /// Sizes and builds a filter from capacity and false-positive
    /// targets. With `partitioned` set, the bit count is rounded up to
    /// the next multiple of the digest count.
    pub fn new(config: &FilterConfig) -> Result<Self> {
        config.validate()?;
        let mut bits =
            optimal_bit_count(config.capacity, config.false_positive_rate);
        let hashes = optimal_hash_count(bits, config.capacity);
        if config.partitioned {
            bits += hashes - bits % hashes;
        }
        debug!(
            bits,
            hashes,
            capacity = config.capacity,
            partitioned = config.partitioned,
            "sized filter"
        );
        let hasher =
            make_hasher(hashes, config.seed, config.double_hashing)?;
        Self::with_hasher(Arc::new(hasher), bits, config.partitioned)
    }

    /// Builds a filter around an existing hasher and an explicit bit
    /// count. A partitioned filter requires `bits` to be a multiple of
    /// the hasher's digest count.
    pub fn with_hasher(
        hasher: Arc<Hasher>,
        bits: usize,
        partitioned: bool,
    ) -> Result<Self> {
        if bits == 0 {
            return Err(FilterError::InvalidConfig(
                "bit count must be > 0".into(),
            ));
        }
        if partitioned && bits % hasher.digest_count() != 0 {
            return Err(FilterError::InvalidConfig(format!(
                "bit count {bits} is not a multiple of the digest count {}",
                hasher.digest_count()
            )));
        }
        Ok(Self {
            hasher,
            bits: BitSeq::new(bits),
            partitioned,
        })
    }

    fn bit_index(&self, digest_idx: usize, digest: Digest) -> usize {
        if self.partitioned {
            let parts = self.bits.len() / self.hasher.digest_count();
            digest_idx * parts + digest as usize % parts
        } else {
            digest as usize % self.bits.len()
        }
    }

    /// Marks `obj` as present by setting all bits its digests address.
    pub fn add(&mut self, obj: &[u8]) -> Result<()> {
        let digests = self.hasher.digests(obj)?;
        for (i, &digest) in digests.iter().enumerate() {
            let idx = self.bit_index(i, digest);
            self.bits.set(idx);
        }
        Ok(())
    }

    /// Returns `false` if `obj` is definitely absent, `true` if it is
    /// possibly present. Objects that were added and not removed are
    /// never reported absent.
    pub fn lookup(&self, obj: &[u8]) -> Result<bool> {
        let digests = self.hasher.digests(obj)?;
        for (i, &digest) in digests.iter().enumerate() {
            if !self.bits.get(self.bit_index(i, digest)) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Unsets every bit `obj` addresses. Only sound when no other
    /// still-present object shares all of those bits; the filter keeps
    /// no occupancy counts to detect the overlap.
    pub fn remove(&mut self, obj: &[u8]) -> Result<()> {
        let digests = self.hasher.digests(obj)?;
        for (i, &digest) in digests.iter().enumerate() {
            let idx = self.bit_index(i, digest);
            self.bits.reset(idx);
        }
        Ok(())
    }

    /// Resets all bits to zero.
    pub fn clear(&mut self) {
        self.bits.clear_all();
    }

    /// Exchanges hasher and bit storage with `other`. The partition
    /// flags stay where they are.
    pub fn swap(&mut self, other: &mut BloomFilter) {
        std::mem::swap(&mut self.hasher, &mut other.hasher);
        std::mem::swap(&mut self.bits, &mut other.bits);
    }

    pub fn bit_count(&self) -> usize {
        self.bits.len()
    }

    pub fn is_partitioned(&self) -> bool {
        self.partitioned
    }

    pub fn storage(&self) -> &BitSeq {
        &self.bits
    }

    pub fn hasher(&self) -> &Arc<Hasher> {
        &self.hasher
    }

    pub fn serialized_size(&self) -> usize {
        4 + self.hasher.serialized_size() + 4 + self.bits.serialized_size() + 1
    }

    /// Payload: `[u32 hasher size][hasher][u32 bit payload size]
    /// [bit payload][u8 partition flag]`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(self.serialized_size());
        writer.put_u32(self.hasher.serialized_size() as u32);
        self.hasher.write_into(&mut writer);
        writer.put_u32(self.bits.serialized_size() as u32);
        self.bits.write_into(&mut writer);
        writer.put_u8(self.partitioned as u8);
        writer.into_bytes()
    }

    /// Reconstructs a filter from [`BloomFilter::to_bytes`] output,
    /// dispatching the hasher factory on the embedded discriminant. The
    /// buffer must be consumed exactly.
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(buf);
        let hasher_size = reader.read_u32()? as usize;
        let hasher = Hasher::from_bytes(reader.read_bytes(hasher_size)?)?;
        let bits_size = reader.read_u32()? as usize;
        let bits = BitSeq::from_bytes(reader.read_bytes(bits_size)?)?;
        let partitioned = reader.read_u8()? != 0;
        reader.finish()?;
        if bits.is_empty() {
            return Err(FilterError::InvalidConfig(
                "bit count must be > 0".into(),
            ));
        }
        if partitioned && bits.len() % hasher.digest_count() != 0 {
            return Err(FilterError::InvalidConfig(format!(
                "bit count {} is not a multiple of the digest count {}",
                bits.len(),
                hasher.digest_count()
            )));
        }
        Ok(Self {
            hasher: Arc::new(hasher),
            bits,
            partitioned,
        })
    }
}

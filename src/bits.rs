//! Fixed-length bit storage shared by the filter and the counter vector.
//!
//! `BitSeq` wraps a byte-backed [`BitVec`] and exposes the small contract
//! the rest of the crate relies on: indexed boolean read/write, an OR
//! combinator over equal-length sequences, and a byte-buffer codec whose
//! payload is `[u64 bit length][raw bytes]`.

use crate::codec::{ByteReader, ByteWriter};
use crate::error::Result;
use bitvec::{bitvec, order::Lsb0, vec::BitVec};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitSeq {
    bits: BitVec<u8, Lsb0>,
}

impl BitSeq {
    /// Creates a sequence of `len` zero bits.
    pub fn new(len: usize) -> Self {
        Self {
            bits: bitvec![u8, Lsb0; 0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Reads the bit at `idx`. Panics if `idx` is out of range.
    pub fn get(&self, idx: usize) -> bool {
        self.bits[idx]
    }

    pub fn set(&mut self, idx: usize) {
        self.bits.set(idx, true);
    }

    pub fn reset(&mut self, idx: usize) {
        self.bits.set(idx, false);
    }

    pub fn assign(&mut self, idx: usize, value: bool) {
        self.bits.set(idx, value);
    }

    pub fn clear_all(&mut self) {
        self.bits.fill(false);
    }

    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    /// Combines `other` into `self` at bit granularity.
    /// Panics if the lengths differ.
    pub fn or_assign(&mut self, other: &BitSeq) {
        assert_eq!(self.len(), other.len(), "bit sequence length mismatch");
        for idx in other.bits.iter_ones() {
            self.bits.set(idx, true);
        }
    }

    pub(crate) fn write_into(&self, writer: &mut ByteWriter) {
        writer.put_u64(self.bits.len() as u64);
        writer.put_bytes(self.bits.as_raw_slice());
    }

    pub fn serialized_size(&self) -> usize {
        8 + self.bits.as_raw_slice().len()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(self.serialized_size());
        self.write_into(&mut writer);
        writer.into_bytes()
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(buf);
        let bit_len = reader.read_u64()? as usize;
        let byte_len = bit_len.div_ceil(8);
        let raw = reader.read_bytes(byte_len)?;
        reader.finish()?;
        let mut bits = BitVec::<u8, Lsb0>::from_slice(raw);
        bits.truncate(bit_len);
        // Normalize dead bits in the last byte so re-serialization is
        // byte-identical no matter what the input carried there.
        bits.set_uninitialized(false);
        Ok(Self { bits })
    }
}

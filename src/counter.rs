//! Packed saturating counters, the cell array behind counting Bloom
//! filters.
//!
//! A [`CounterVector`] stores `cells` counters of `width` bits each in a
//! single [`BitSeq`]. Arithmetic is bit-serial: increment and decrement
//! ripple a carry/borrow across the cell's bits, and merging two vectors
//! adds counters cell-wise, clamping to the maximum on overflow. That
//! per-cell binary sum is what gives counting-filter union semantics.

use crate::bits::BitSeq;
use crate::codec::{ByteReader, ByteWriter};
use crate::error::{FilterError, Result};
use std::ops::{BitOr, BitOrAssign};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterVector {
    bits: BitSeq,
    width: usize,
}

impl CounterVector {
    /// Allocates `cells` zeroed counters of `width` bits each.
    pub fn new(cells: usize, width: usize) -> Result<Self> {
        if cells == 0 {
            return Err(FilterError::InvalidConfig(
                "cell count must be > 0".into(),
            ));
        }
        validate_width(width)?;
        Ok(Self {
            bits: BitSeq::new(cells * width),
            width,
        })
    }

    pub fn cells(&self) -> usize {
        self.bits.len() / self.width
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Largest value a single counter can hold.
    pub fn max(&self) -> u64 {
        u64::MAX >> (64 - self.width)
    }

    /// Ripple-adds the low `width` bits of `value` into `cell`,
    /// returning the carry out of the most significant bit.
    fn ripple_add(&mut self, cell: usize, value: u64) -> bool {
        let lsb = cell * self.width;
        let mut carry = false;
        for i in 0..self.width {
            let b1 = self.bits.get(lsb + i);
            let b2 = value >> i & 1 == 1;
            self.bits.assign(lsb + i, b1 ^ b2 ^ carry);
            carry = (b1 && b2) || (carry && (b1 != b2));
        }
        carry
    }

    fn saturate(&mut self, cell: usize) {
        let lsb = cell * self.width;
        for i in 0..self.width {
            self.bits.set(lsb + i);
        }
    }

    /// Adds `value` to the counter at `cell`.
    ///
    /// On overflow the counter saturates to [`CounterVector::max`] and
    /// the call returns `false`. Panics if `cell` is out of range.
    pub fn increment(&mut self, cell: usize, value: u64) -> bool {
        let carry = self.ripple_add(cell, value);
        if carry {
            self.saturate(cell);
        }
        !carry
    }

    /// Subtracts `value` from the counter at `cell` by ripple-adding its
    /// two's complement.
    ///
    /// Returns `false` when the subtraction borrowed past the top bit;
    /// the counter then holds the wrapped value. Unlike
    /// [`CounterVector::increment`] there is no clamping on the way
    /// down. Panics if `cell` is out of range.
    pub fn decrement(&mut self, cell: usize, value: u64) -> bool {
        self.ripple_add(cell, value.wrapping_neg())
    }

    /// Current value of the counter at `cell`. Panics if `cell` is out
    /// of range.
    pub fn count(&self, cell: usize) -> u64 {
        let lsb = cell * self.width;
        let mut value = 0;
        for i in 0..self.width {
            if self.bits.get(lsb + i) {
                value |= 1 << i;
            }
        }
        value
    }

    /// Overwrites the counter at `cell` with `value`, which must not
    /// exceed [`CounterVector::max`]. Panics if `cell` is out of range.
    pub fn set(&mut self, cell: usize, value: u64) -> Result<()> {
        if value > self.max() {
            return Err(FilterError::InvalidConfig(format!(
                "value {value} does not fit in a {}-bit counter",
                self.width
            )));
        }
        let lsb = cell * self.width;
        for i in 0..self.width {
            self.bits.assign(lsb + i, value >> i & 1 == 1);
        }
        Ok(())
    }

    /// Resets every counter to zero.
    pub fn clear(&mut self) {
        self.bits.clear_all();
    }

    pub fn serialized_size(&self) -> usize {
        4 + self.bits.serialized_size() + 8
    }

    /// Payload: `[u32 bit payload size][bit payload][u64 width]`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(self.serialized_size());
        writer.put_u32(self.bits.serialized_size() as u32);
        self.bits.write_into(&mut writer);
        writer.put_u64(self.width as u64);
        writer.into_bytes()
    }

    /// Reconstructs a vector from [`CounterVector::to_bytes`] output.
    /// The buffer must be consumed exactly and the embedded width must
    /// divide the bit length.
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(buf);
        let bits_size = reader.read_u32()? as usize;
        let bits = BitSeq::from_bytes(reader.read_bytes(bits_size)?)?;
        let width = reader.read_u64()? as usize;
        reader.finish()?;
        validate_width(width)?;
        if bits.is_empty() || bits.len() % width != 0 {
            return Err(FilterError::InvalidConfig(format!(
                "bit length {} is not a multiple of counter width {width}",
                bits.len()
            )));
        }
        Ok(Self { bits, width })
    }
}

fn validate_width(width: usize) -> Result<()> {
    if width == 0 || width > 64 {
        return Err(FilterError::InvalidConfig(format!(
            "counter width {width} outside 1..=64"
        )));
    }
    Ok(())
}

impl BitOrAssign<&CounterVector> for CounterVector {
    /// Cell-wise binary sum, saturating per cell. Panics if the two
    /// vectors disagree on cell count or width.
    fn bitor_assign(&mut self, other: &CounterVector) {
        assert_eq!(self.cells(), other.cells(), "cell count mismatch");
        assert_eq!(self.width, other.width, "counter width mismatch");
        for cell in 0..self.cells() {
            self.increment(cell, other.count(cell));
        }
    }
}

impl BitOr<&CounterVector> for &CounterVector {
    type Output = CounterVector;

    fn bitor(self, other: &CounterVector) -> CounterVector {
        let mut merged = self.clone();
        merged |= other;
        merged
    }
}

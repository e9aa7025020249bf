//! Bounds-checked cursor over the flat binary framing used by every
//! serializable component. Integers travel in host-native byte order and
//! width; the format carries no version field.

use crate::error::FormatError;

/// Positioned reader over a borrowed byte buffer.
///
/// Every read is bounds-checked; parsing routines call [`ByteReader::finish`]
/// at the end so that a buffer longer than its declared content is rejected
/// rather than silently ignored.
pub(crate) struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        if self.remaining() < n {
            return Err(FormatError::UnexpectedEof {
                need: n,
                have: self.remaining(),
            });
        }
        let span = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(span)
    }

    pub fn read_u8(&mut self) -> Result<u8, FormatError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, FormatError> {
        let span = self.read_bytes(2)?;
        Ok(u16::from_ne_bytes([span[0], span[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, FormatError> {
        let span = self.read_bytes(4)?;
        Ok(u32::from_ne_bytes([span[0], span[1], span[2], span[3]]))
    }

    pub fn read_u64(&mut self) -> Result<u64, FormatError> {
        let span = self.read_bytes(8)?;
        Ok(u64::from_ne_bytes([
            span[0], span[1], span[2], span[3], span[4], span[5], span[6],
            span[7],
        ]))
    }

    pub fn finish(self) -> Result<(), FormatError> {
        if self.pos != self.buf.len() {
            return Err(FormatError::TrailingBytes {
                declared: self.buf.len(),
                consumed: self.pos,
            });
        }
        Ok(())
    }
}

/// Growable write-side counterpart of [`ByteReader`].
pub(crate) struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn put_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_ne_bytes());
    }

    pub fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_ne_bytes());
    }

    pub fn put_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_ne_bytes());
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

//! Binary reader for UBVFF command and point streams
//!
//! Both file formats are big-endian on disk. `from_be_bytes` normalizes to
//! host order on every platform, so no runtime endianness probe is needed.
//! Type 2 point words use a mixed order handled by
//! [`ByteReader::read_u32_word_swapped`].

use thiserror::Error;

/// Read failure: fewer bytes remained than the record required
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReadError {
    #[error("truncated read at offset {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },
}

/// Bounds-checked cursor over an in-memory byte slice
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a new reader over `data`, positioned at the start
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current byte offset
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left before end of stream
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Move the cursor to an absolute offset
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.data.len());
    }

    /// Total length of the underlying slice
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ReadError> {
        if self.remaining() < n {
            return Err(ReadError::Truncated {
                offset: self.pos,
                needed: n,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Skip `n` bytes
    pub fn skip(&mut self, n: usize) -> Result<(), ReadError> {
        self.take(n).map(|_| ())
    }

    /// Read one byte
    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        Ok(self.take(1)?[0])
    }

    /// Read a big-endian u16
    pub fn read_u16(&mut self) -> Result<u16, ReadError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    /// Read `count` big-endian u16 words as one fixed-width record
    pub fn read_u16s(&mut self, count: usize) -> Result<Vec<u16>, ReadError> {
        let b = self.take(count * 2)?;
        Ok(b.chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect())
    }

    /// Read a big-endian u32
    pub fn read_u32(&mut self) -> Result<u32, ReadError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a big-endian i32
    pub fn read_i32(&mut self) -> Result<i32, ReadError> {
        Ok(self.read_u32()? as i32)
    }

    /// Read a Type 2 point word: two big-endian 16-bit halves stored
    /// low half first (`b0 b1 b2 b3` is `(be16(b2,b3) << 16) | be16(b0,b1)`)
    pub fn read_u32_word_swapped(&mut self) -> Result<u32, ReadError> {
        let b = self.take(4)?;
        let lo = u32::from(u16::from_be_bytes([b[0], b[1]]));
        let hi = u32::from(u16::from_be_bytes([b[2], b[3]]));
        Ok((hi << 16) | lo)
    }

    /// Read `n` raw bytes
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], ReadError> {
        self.take(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_u16_big_endian() {
        let data = [0x12, 0x34, 0x56, 0x78];
        let mut r = ByteReader::new(&data);
        assert_eq!(r.read_u16().unwrap(), 0x1234);
        assert_eq!(r.read_u16().unwrap(), 0x5678);
    }

    #[test]
    fn test_read_u32_big_endian() {
        let data = [0x00, 0x00, 0x00, 0x15];
        let mut r = ByteReader::new(&data);
        assert_eq!(r.read_u32().unwrap(), 0x15);
    }

    #[test]
    fn test_read_u32_word_swapped() {
        // on-disk low word 0x8000, high word 0x0001 => 0x00018000
        let data = [0x80, 0x00, 0x00, 0x01];
        let mut r = ByteReader::new(&data);
        assert_eq!(r.read_u32_word_swapped().unwrap(), 0x0001_8000);
    }

    #[test]
    fn test_truncated_read_reports_counts() {
        let data = [0x00, 0x01];
        let mut r = ByteReader::new(&data);
        let err = r.read_u32().unwrap_err();
        assert_eq!(
            err,
            ReadError::Truncated {
                offset: 0,
                needed: 4,
                available: 2
            }
        );
        // a failed read must not consume anything
        assert_eq!(r.position(), 0);
        assert_eq!(r.read_u16().unwrap(), 0x0001);
    }

    #[test]
    fn test_read_u16s_record() {
        let data = [0x00, 0x01, 0x00, 0x02, 0x00, 0x03];
        let mut r = ByteReader::new(&data);
        assert_eq!(r.read_u16s(3).unwrap(), vec![1, 2, 3]);
        assert!(r.read_u16s(1).is_err());
    }

    #[test]
    fn test_skip_and_raw_reads() {
        let data = [0xAA, 0xBB, 0xCC, 0xDD];
        let mut r = ByteReader::new(&data);
        r.skip(1).unwrap();
        assert_eq!(r.read_u8().unwrap(), 0xBB);
        assert_eq!(r.read_bytes(2).unwrap(), &[0xCC, 0xDD]);
        assert!(r.skip(1).is_err());
    }

    #[test]
    fn test_seek_clamps_to_len() {
        let data = [0u8; 4];
        let mut r = ByteReader::new(&data);
        r.seek(100);
        assert_eq!(r.position(), 4);
        assert_eq!(r.remaining(), 0);
    }
}

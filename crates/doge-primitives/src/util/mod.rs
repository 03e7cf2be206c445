//! Wire-format helpers for transaction serialization.
//!
//! Provides the compact-size integer used for counts and lengths, plus the
//! little-endian `WireReader` / `WireWriter` pair the transaction codec is
//! built on.

use crate::PrimitivesError;

// ---------------------------------------------------------------------------
// CompactSize
// ---------------------------------------------------------------------------

/// A compact-size (varint) integer.
///
/// Values below `0xfd` take a single byte; larger values are prefixed with
/// `0xfd`, `0xfe` or `0xff` followed by 2, 4 or 8 little-endian bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CompactSize(pub u64);

impl CompactSize {
    /// Return the number of bytes this value occupies on the wire.
    ///
    /// # Returns
    /// 1, 3, 5, or 9.
    pub fn encoded_len(&self) -> usize {
        match self.0 {
            0..=0xfc => 1,
            0xfd..=0xffff => 3,
            0x1_0000..=0xffff_ffff => 5,
            _ => 9,
        }
    }

    /// Encode into a freshly allocated byte vector.
    ///
    /// # Returns
    /// The wire encoding of the value.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.append_to(&mut out);
        out
    }

    /// Append the wire encoding to an existing buffer.
    ///
    /// # Arguments
    /// * `out` - Buffer to extend.
    pub fn append_to(&self, out: &mut Vec<u8>) {
        let v = self.0;
        match self.encoded_len() {
            1 => out.push(v as u8),
            3 => {
                out.push(0xfd);
                out.extend_from_slice(&(v as u16).to_le_bytes());
            }
            5 => {
                out.push(0xfe);
                out.extend_from_slice(&(v as u32).to_le_bytes());
            }
            _ => {
                out.push(0xff);
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
    }

    /// Convert to `usize`, failing if the value does not fit.
    pub fn to_usize(&self) -> Result<usize, PrimitivesError> {
        usize::try_from(self.0).map_err(|_| PrimitivesError::VarIntTooLarge)
    }
}

impl From<u64> for CompactSize {
    fn from(v: u64) -> Self {
        CompactSize(v)
    }
}

impl From<usize> for CompactSize {
    fn from(v: usize) -> Self {
        CompactSize(v as u64)
    }
}

// ---------------------------------------------------------------------------
// WireReader
// ---------------------------------------------------------------------------

/// A cursor over a byte slice reading little-endian protocol fields.
///
/// Every read is bounds-checked and fails with `UnexpectedEof` instead of
/// panicking on truncated input.
pub struct WireReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    /// Create a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        WireReader { data, pos: 0 }
    }

    /// Read `n` bytes and advance.
    ///
    /// # Arguments
    /// * `n` - Number of bytes to take.
    ///
    /// # Returns
    /// A slice borrowed from the underlying buffer, or `UnexpectedEof`.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], PrimitivesError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.data.len())
            .ok_or(PrimitivesError::UnexpectedEof)?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Read a fixed-size array and advance.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], PrimitivesError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8, PrimitivesError> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Read a little-endian u16.
    pub fn read_u16_le(&mut self) -> Result<u16, PrimitivesError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian u32.
    pub fn read_u32_le(&mut self) -> Result<u32, PrimitivesError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian u64.
    pub fn read_u64_le(&mut self) -> Result<u64, PrimitivesError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Read a compact-size integer in its minimal form.
    ///
    /// # Returns
    /// The decoded value, `UnexpectedEof` if the prefix promises more
    /// bytes than remain, or `NonCanonicalCompactSize` if the value fits a
    /// shorter encoding.
    pub fn read_compact_size(&mut self) -> Result<CompactSize, PrimitivesError> {
        let (value, min) = match self.read_u8()? {
            0xff => (self.read_u64_le()?, 0x1_0000_0000),
            0xfe => (self.read_u32_le()? as u64, 0x1_0000),
            0xfd => (self.read_u16_le()? as u64, 0xfd),
            b => (b as u64, 0),
        };
        if value < min {
            return Err(PrimitivesError::NonCanonicalCompactSize(value));
        }
        Ok(CompactSize(value))
    }

    /// Read a compact-size length followed by that many bytes.
    ///
    /// A length larger than the remaining input is rejected before any
    /// allocation happens.
    ///
    /// # Returns
    /// The owned payload bytes.
    pub fn read_var_bytes(&mut self) -> Result<Vec<u8>, PrimitivesError> {
        let len = self.read_compact_size()?;
        if len.0 > self.remaining() as u64 {
            return Err(PrimitivesError::UnexpectedEof);
        }
        Ok(self.read_bytes(len.to_usize()?)?.to_vec())
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Current offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }
}

// ---------------------------------------------------------------------------
// WireWriter
// ---------------------------------------------------------------------------

/// A growable buffer writing little-endian protocol fields.
#[derive(Debug, Default)]
pub struct WireWriter {
    buf: Vec<u8>,
}

impl WireWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        WireWriter { buf: Vec::new() }
    }

    /// Create a writer with pre-allocated capacity.
    ///
    /// # Arguments
    /// * `capacity` - Initial byte capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        WireWriter { buf: Vec::with_capacity(capacity) }
    }

    /// Append raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a single byte.
    pub fn write_u8(&mut self, val: u8) {
        self.buf.push(val);
    }

    /// Append a little-endian u32.
    pub fn write_u32_le(&mut self, val: u32) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a little-endian i32.
    pub fn write_i32_le(&mut self, val: i32) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a little-endian u64.
    pub fn write_u64_le(&mut self, val: u64) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a compact-size integer.
    pub fn write_compact_size(&mut self, value: CompactSize) {
        value.append_to(&mut self.buf);
    }

    /// Append a compact-size length prefix followed by `bytes`.
    pub fn write_var_bytes(&mut self, bytes: &[u8]) {
        self.write_compact_size(CompactSize::from(bytes.len()));
        self.write_bytes(bytes);
    }

    /// Consume the writer and return the accumulated bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Borrow the bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_size_boundaries() {
        let cases: Vec<(u64, Vec<u8>)> = vec![
            (0, vec![0x00]),
            (0xfc, vec![0xfc]),
            (0xfd, vec![0xfd, 0xfd, 0x00]),
            (0xffff, vec![0xfd, 0xff, 0xff]),
            (0x1_0000, vec![0xfe, 0x00, 0x00, 0x01, 0x00]),
            (0xffff_ffff, vec![0xfe, 0xff, 0xff, 0xff, 0xff]),
            (0x1_0000_0000, vec![0xff, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]),
        ];
        for (value, expected) in cases {
            let cs = CompactSize(value);
            assert_eq!(cs.to_bytes(), expected, "encoding of {}", value);
            assert_eq!(cs.encoded_len(), expected.len(), "length of {}", value);

            let mut reader = WireReader::new(&expected);
            assert_eq!(reader.read_compact_size().unwrap(), cs);
            assert_eq!(reader.remaining(), 0);
        }
    }

    #[test]
    fn test_compact_size_rejects_non_minimal() {
        let cases: [&[u8]; 4] = [
            &[0xfd, 0x00, 0x00],
            &[0xfd, 0xfc, 0x00],
            &[0xfe, 0xff, 0xff, 0x00, 0x00],
            &[0xff, 0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00],
        ];
        for bytes in cases {
            let mut reader = WireReader::new(bytes);
            assert!(
                matches!(reader.read_compact_size(), Err(PrimitivesError::NonCanonicalCompactSize(_))),
                "accepted {:02x?}",
                bytes
            );
        }
    }

    #[test]
    fn test_reader_writer_fields() {
        let mut writer = WireWriter::with_capacity(32);
        writer.write_u8(0x42);
        writer.write_u32_le(0xDEADBEEF);
        writer.write_i32_le(-1);
        writer.write_u64_le(0x0102030405060708);
        writer.write_var_bytes(b"doge");

        let data = writer.into_bytes();
        let mut reader = WireReader::new(&data);
        assert_eq!(reader.read_u8().unwrap(), 0x42);
        assert_eq!(reader.read_u32_le().unwrap(), 0xDEADBEEF);
        assert_eq!(reader.read_u32_le().unwrap(), 0xFFFF_FFFF);
        assert_eq!(reader.read_u64_le().unwrap(), 0x0102030405060708);
        assert_eq!(reader.read_var_bytes().unwrap(), b"doge".to_vec());
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.position(), data.len());
    }

    #[test]
    fn test_reader_truncated() {
        let mut reader = WireReader::new(&[0x01, 0x02]);
        assert!(matches!(reader.read_u32_le(), Err(PrimitivesError::UnexpectedEof)));

        // 0xfd prefix with only one payload byte.
        let mut reader = WireReader::new(&[0xfd, 0x01]);
        assert!(reader.read_compact_size().is_err());
    }

    #[test]
    fn test_var_bytes_length_exceeds_input() {
        // Claims 5 bytes but only 2 follow.
        let mut reader = WireReader::new(&[0x05, 0xaa, 0xbb]);
        assert!(matches!(reader.read_var_bytes(), Err(PrimitivesError::UnexpectedEof)));

        // Claims u64::MAX bytes.
        let mut reader = WireReader::new(&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
        assert!(reader.read_var_bytes().is_err());
    }
}

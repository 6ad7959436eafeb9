//! Deserializer for reading archives.

use crate::error::{Error, Result};
use crate::ser::MAGIC;
use crate::size;
use crate::stream::InputStream;
use crate::traits::Decode;

// Decoded byte strings arrive through a bounded scratch buffer so a hostile
// length prefix cannot force a huge allocation up front.
const READ_CHUNK_LEN: usize = 4096;
const PREALLOC_LIMIT: usize = 64 * 1024;

/// Reads values out of an input stream holding a single archive.
///
/// Construction consumes and validates the archive header: the magic bytes
/// must be `"gf"` or [`Error::BadMagic`] is returned, and the big-endian
/// format version that follows is kept for [`version`](Self::version).
/// Reads after that must mirror the write sequence exactly; the format
/// carries no type tags.
#[derive(Debug)]
pub struct Deserializer<'a, S: InputStream> {
    stream: &'a mut S,
    version: u16,
}

impl<'a, S: InputStream> Deserializer<'a, S> {
    /// Opens an archive, validating the magic bytes and reading the version.
    pub fn new(stream: &'a mut S) -> Result<Self> {
        let mut magic = [0u8; 2];
        stream.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(Error::BadMagic { found: magic });
        }
        let mut version = [0u8; 2];
        stream.read_exact(&mut version)?;
        Ok(Self {
            stream,
            version: u16::from_be_bytes(version),
        })
    }

    /// The format version declared in the archive header.
    pub fn version(&self) -> u16 {
        self.version
    }

    /// Reads any value implementing [`Decode`].
    pub fn decode<T: Decode>(&mut self) -> Result<T> {
        T::decode(self)
    }

    /// Reads a `bool`, accepting only `0x00` and `0x01`.
    pub fn read_bool(&mut self) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::invalid_data(format!(
                "invalid bool byte {other:#04x}"
            ))),
        }
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let mut bytes = [0u8; 1];
        self.stream.read_exact(&mut bytes)?;
        Ok(bytes[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        let mut bytes = [0u8; 1];
        self.stream.read_exact(&mut bytes)?;
        Ok(i8::from_be_bytes(bytes))
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let mut bytes = [0u8; 2];
        self.stream.read_exact(&mut bytes)?;
        Ok(u16::from_be_bytes(bytes))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        let mut bytes = [0u8; 2];
        self.stream.read_exact(&mut bytes)?;
        Ok(i16::from_be_bytes(bytes))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let mut bytes = [0u8; 4];
        self.stream.read_exact(&mut bytes)?;
        Ok(u32::from_be_bytes(bytes))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let mut bytes = [0u8; 4];
        self.stream.read_exact(&mut bytes)?;
        Ok(i32::from_be_bytes(bytes))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let mut bytes = [0u8; 8];
        self.stream.read_exact(&mut bytes)?;
        Ok(u64::from_be_bytes(bytes))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        let mut bytes = [0u8; 8];
        self.stream.read_exact(&mut bytes)?;
        Ok(i64::from_be_bytes(bytes))
    }

    /// Reads an `f32` from its IEEE-754 bit pattern.
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    /// Reads an `f64` from its IEEE-754 bit pattern.
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Reads a length-prefixed byte string.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        let declared = size::read(self.stream)?;
        let mut remaining = usize::try_from(declared)
            .map_err(|_| Error::invalid_data("byte string length exceeds address space"))?;
        let mut bytes = Vec::with_capacity(remaining.min(PREALLOC_LIMIT));
        let mut chunk = [0u8; READ_CHUNK_LEN];
        while remaining > 0 {
            let take = remaining.min(READ_CHUNK_LEN);
            self.stream.read_exact(&mut chunk[..take])?;
            bytes.extend_from_slice(&chunk[..take]);
            remaining -= take;
        }
        Ok(bytes)
    }

    /// Reads a length-prefixed byte string and validates it as UTF-8.
    pub fn read_string(&mut self) -> Result<String> {
        String::from_utf8(self.read_bytes()?)
            .map_err(|_| Error::invalid_data("byte string is not valid UTF-8"))
    }

    /// Reads a container size or union index in the variable-length
    /// encoding.
    pub fn read_size(&mut self) -> Result<u64> {
        size::read(self.stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::SliceInputStream;

    #[test]
    fn test_header_validation() {
        let bytes = [b'g', b'f', 0x01, 0x02, 0xAA];
        let mut stream = SliceInputStream::new(&bytes);
        let deserializer = Deserializer::new(&mut stream).unwrap();
        assert_eq!(deserializer.version(), 0x0102);
    }

    #[test]
    fn test_bad_magic() {
        let bytes = [b'g', b'F', 0x00, 0x00];
        let mut stream = SliceInputStream::new(&bytes);
        let result = Deserializer::new(&mut stream);
        match result {
            Err(Error::BadMagic { found }) => assert_eq!(found, [b'g', b'F']),
            other => panic!("expected BadMagic, got {other:?}"),
        }
    }

    #[test]
    fn test_truncated_header() {
        let bytes = [b'g', b'f', 0x00];
        let mut stream = SliceInputStream::new(&bytes);
        let result = Deserializer::new(&mut stream);
        assert!(matches!(result, Err(Error::UnexpectedEof)));
    }

    #[test]
    fn test_strict_bool() {
        let bytes = [b'g', b'f', 0x00, 0x00, 0x02];
        let mut stream = SliceInputStream::new(&bytes);
        let mut deserializer = Deserializer::new(&mut stream).unwrap();
        let result = deserializer.read_bool();
        assert!(matches!(result, Err(Error::InvalidData { .. })));
    }

    #[test]
    fn test_scalars_big_endian() {
        let bytes = [b'g', b'f', 0x00, 0x00, 0xAB, 0xCD, 0xFF, 0xFF, 0xFF, 0xFE];
        let mut stream = SliceInputStream::new(&bytes);
        let mut deserializer = Deserializer::new(&mut stream).unwrap();
        assert_eq!(deserializer.read_u16().unwrap(), 0xABCD);
        assert_eq!(deserializer.read_i32().unwrap(), -2);
    }

    #[test]
    fn test_byte_string_eof() {
        // Length prefix promises four bytes but only two follow.
        let bytes = [b'g', b'f', 0x00, 0x00, 0x04, 0x01, 0x02];
        let mut stream = SliceInputStream::new(&bytes);
        let mut deserializer = Deserializer::new(&mut stream).unwrap();
        let result = deserializer.read_bytes();
        assert!(matches!(result, Err(Error::UnexpectedEof)));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let bytes = [b'g', b'f', 0x00, 0x00, 0x02, 0xC3, 0x28];
        let mut stream = SliceInputStream::new(&bytes);
        let mut deserializer = Deserializer::new(&mut stream).unwrap();
        let result = deserializer.read_string();
        assert!(matches!(result, Err(Error::InvalidData { .. })));
    }
}

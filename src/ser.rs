//! Serializer for writing archives.

use crate::error::Result;
use crate::size;
use crate::stream::OutputStream;
use crate::traits::Encode;

/// The two magic bytes opening every archive.
pub const MAGIC: [u8; 2] = *b"gf";

/// Writes values into an output stream as a single archive.
///
/// Construction emits the archive header (magic bytes plus a big-endian
/// format version), so it can fail if the stream rejects the first four
/// bytes. All multi-byte scalars are written big-endian; floats travel as
/// their IEEE-754 bit patterns.
///
/// The serializer borrows its stream, so decorators and terminal streams
/// stay accessible (for [`finish`](crate::compressed::CompressedOutputStream::finish),
/// hash extraction and the like) once serialization is done.
#[derive(Debug)]
pub struct Serializer<'a, S: OutputStream> {
    stream: &'a mut S,
    version: u16,
}

impl<'a, S: OutputStream> Serializer<'a, S> {
    /// Starts an archive with format version 0.
    pub fn new(stream: &'a mut S) -> Result<Self> {
        Self::with_version(stream, 0)
    }

    /// Starts an archive with an application-chosen format version.
    pub fn with_version(stream: &'a mut S, version: u16) -> Result<Self> {
        stream.write_all(&MAGIC)?;
        stream.write_all(&version.to_be_bytes())?;
        Ok(Self { stream, version })
    }

    /// The format version written into the header.
    pub fn version(&self) -> u16 {
        self.version
    }

    /// Writes any value implementing [`Encode`].
    pub fn encode<T: Encode + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.encode(self)
    }

    /// Writes a `bool` as a single byte, `0x00` or `0x01`.
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_u8(u8::from(value))
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.stream.write_all(&[value])
    }

    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.stream.write_all(&value.to_be_bytes())
    }

    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.stream.write_all(&value.to_be_bytes())
    }

    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        self.stream.write_all(&value.to_be_bytes())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.stream.write_all(&value.to_be_bytes())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.stream.write_all(&value.to_be_bytes())
    }

    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.stream.write_all(&value.to_be_bytes())
    }

    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        self.stream.write_all(&value.to_be_bytes())
    }

    /// Writes an `f32` as its IEEE-754 bit pattern, big-endian. NaN and the
    /// infinities round-trip exactly.
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.write_u32(value.to_bits())
    }

    /// Writes an `f64` as its IEEE-754 bit pattern, big-endian.
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.write_u64(value.to_bits())
    }

    /// Writes a length-prefixed byte string: the variable-length size, then
    /// the bytes verbatim.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        size::write(self.stream, bytes.len() as u64)?;
        self.stream.write_all(bytes)
    }

    /// Writes UTF-8 text as a length-prefixed byte string.
    pub fn write_str(&mut self, value: &str) -> Result<()> {
        self.write_bytes(value.as_bytes())
    }

    /// Writes a container size or union index in the variable-length
    /// encoding.
    pub fn write_size(&mut self, size: u64) -> Result<()> {
        size::write(self.stream, size)
    }
}

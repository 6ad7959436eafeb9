//! Stream abstractions for reading and writing archive bytes.
//!
//! The two traits here are the seams the rest of the library plugs into:
//! [`Serializer`](crate::ser::Serializer) drives an [`OutputStream`] and
//! [`Deserializer`](crate::de::Deserializer) drives an [`InputStream`].
//! Terminal implementations own or borrow a backing store (a file, a byte
//! span, a growable buffer); decorator implementations wrap another stream
//! by mutable reference and transform the bytes passing through.

use crate::error::{Error, Result};

/// A sink for archive bytes.
pub trait OutputStream {
    /// Writes `bytes`, returning how many were accepted. A fixed-capacity
    /// stream may accept fewer than `bytes.len()`, including zero once full.
    fn write(&mut self, bytes: &[u8]) -> Result<usize>;

    /// Total number of bytes this stream instance has accepted.
    fn written_bytes(&self) -> u64;

    /// Writes all of `bytes`, failing with [`Error::StreamFull`] if the
    /// stream stops accepting data.
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        let mut remaining = bytes;
        while !remaining.is_empty() {
            let written = self.write(remaining)?;
            if written == 0 {
                return Err(Error::StreamFull);
            }
            remaining = &remaining[written..];
        }
        Ok(())
    }
}

/// A source of archive bytes.
pub trait InputStream {
    /// Reads into `buffer`, returning how many bytes were produced. A return
    /// of zero with a non-empty `buffer` means the stream is exhausted.
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize>;

    /// Moves the read cursor to an absolute byte position.
    fn seek(&mut self, position: u64) -> Result<()>;

    /// Moves the read cursor relative to its current position.
    fn skip(&mut self, delta: i64) -> Result<()>;

    /// True once no further bytes can be read.
    fn finished(&self) -> bool;

    /// Fills `buffer` completely, failing with [`Error::UnexpectedEof`] if
    /// the stream ends first.
    fn read_exact(&mut self, buffer: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buffer.len() {
            let read = self.read(&mut buffer[filled..])?;
            if read == 0 {
                return Err(Error::UnexpectedEof);
            }
            filled += read;
        }
        Ok(())
    }
}

/// Reads from a borrowed byte span.
///
/// Seeks and skips are clamped to the span, so a cursor moved past the end
/// simply reports the stream as finished.
#[derive(Debug)]
pub struct SliceInputStream<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> SliceInputStream<'a> {
    /// Creates a stream reading `data` from the beginning.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Current cursor position in bytes.
    pub fn position(&self) -> u64 {
        self.position as u64
    }
}

impl InputStream for SliceInputStream<'_> {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let available = &self.data[self.position..];
        let count = buffer.len().min(available.len());
        buffer[..count].copy_from_slice(&available[..count]);
        self.position += count;
        Ok(count)
    }

    fn seek(&mut self, position: u64) -> Result<()> {
        let limit = self.data.len() as u64;
        self.position = position.min(limit) as usize;
        Ok(())
    }

    fn skip(&mut self, delta: i64) -> Result<()> {
        let target = self.position as i128 + i128::from(delta);
        self.position = target.clamp(0, self.data.len() as i128) as usize;
        Ok(())
    }

    fn finished(&self) -> bool {
        self.position >= self.data.len()
    }
}

/// Writes into a borrowed fixed-capacity byte span.
///
/// Writes past the end of the span are truncated; [`OutputStream::write`]
/// reports how much actually fit.
#[derive(Debug)]
pub struct SliceOutputStream<'a> {
    data: &'a mut [u8],
    position: usize,
}

impl<'a> SliceOutputStream<'a> {
    /// Creates a stream writing into `data` from the beginning.
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// The prefix of the span filled so far.
    pub fn filled(&self) -> &[u8] {
        &self.data[..self.position]
    }
}

impl OutputStream for SliceOutputStream<'_> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        let remaining = self.data.len() - self.position;
        let count = bytes.len().min(remaining);
        self.data[self.position..self.position + count].copy_from_slice(&bytes[..count]);
        self.position += count;
        Ok(count)
    }

    fn written_bytes(&self) -> u64 {
        self.position as u64
    }
}

/// Appends to a borrowed growable byte buffer.
pub struct BufferOutputStream<'a> {
    buffer: &'a mut Vec<u8>,
    written: u64,
}

impl<'a> BufferOutputStream<'a> {
    /// Creates a stream appending to `buffer`. Existing content is kept and
    /// not counted by [`OutputStream::written_bytes`].
    pub fn new(buffer: &'a mut Vec<u8>) -> Self {
        Self { buffer, written: 0 }
    }
}

impl OutputStream for BufferOutputStream<'_> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        self.buffer.extend_from_slice(bytes);
        self.written += bytes.len() as u64;
        Ok(bytes.len())
    }

    fn written_bytes(&self) -> u64 {
        self.written
    }
}

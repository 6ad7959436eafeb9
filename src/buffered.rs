//! Buffering decorators that batch small reads and writes.
//!
//! Scalar-heavy archives touch the stream a few bytes at a time; wrapping a
//! file stream in one of these turns that into chunked transfers. Wrapping
//! an in-memory stream works too, it just buys nothing.

use crate::error::Result;
use crate::stream::{InputStream, OutputStream};

const BUFFER_LEN: usize = 4096;

/// Batches writes into fixed-size chunks before they reach the wrapped
/// stream.
///
/// Buffered bytes reach the wrapped stream when the buffer fills, when
/// [`finish`](Self::finish) is called, or on drop. The drop path discards
/// any flush error; call [`finish`](Self::finish) first when the result
/// matters.
pub struct BufferedOutputStream<'a, S: OutputStream> {
    inner: &'a mut S,
    buffer: [u8; BUFFER_LEN],
    filled: usize,
    written: u64,
}

impl<'a, S: OutputStream> BufferedOutputStream<'a, S> {
    /// Wraps `inner` with an empty buffer.
    pub fn new(inner: &'a mut S) -> Self {
        Self {
            inner,
            buffer: [0; BUFFER_LEN],
            filled: 0,
            written: 0,
        }
    }

    /// Flushes buffered bytes into the wrapped stream.
    pub fn finish(&mut self) -> Result<()> {
        if self.filled > 0 {
            let filled = self.filled;
            self.filled = 0;
            self.inner.write_all(&self.buffer[..filled])?;
        }
        Ok(())
    }
}

impl<S: OutputStream> OutputStream for BufferedOutputStream<'_, S> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        if bytes.len() >= BUFFER_LEN {
            // Oversized writes skip the buffer once pending bytes are out.
            self.finish()?;
            self.inner.write_all(bytes)?;
            self.written += bytes.len() as u64;
            return Ok(bytes.len());
        }
        if self.filled + bytes.len() > BUFFER_LEN {
            self.finish()?;
        }
        self.buffer[self.filled..self.filled + bytes.len()].copy_from_slice(bytes);
        self.filled += bytes.len();
        self.written += bytes.len() as u64;
        Ok(bytes.len())
    }

    fn written_bytes(&self) -> u64 {
        self.written
    }
}

impl<S: OutputStream> Drop for BufferedOutputStream<'_, S> {
    fn drop(&mut self) {
        let _ = self.finish();
    }
}

/// Reads ahead from the wrapped stream in fixed-size chunks.
pub struct BufferedInputStream<'a, S: InputStream> {
    inner: &'a mut S,
    buffer: [u8; BUFFER_LEN],
    start: usize,
    end: usize,
}

impl<'a, S: InputStream> BufferedInputStream<'a, S> {
    /// Wraps `inner` with an empty read-ahead window.
    pub fn new(inner: &'a mut S) -> Self {
        Self {
            inner,
            buffer: [0; BUFFER_LEN],
            start: 0,
            end: 0,
        }
    }
}

impl<S: InputStream> InputStream for BufferedInputStream<'_, S> {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        if self.start == self.end {
            if buffer.len() >= BUFFER_LEN {
                // Oversized reads skip the window entirely.
                return self.inner.read(buffer);
            }
            self.start = 0;
            self.end = self.inner.read(&mut self.buffer)?;
            if self.end == 0 {
                return Ok(0);
            }
        }
        let count = buffer.len().min(self.end - self.start);
        buffer[..count].copy_from_slice(&self.buffer[self.start..self.start + count]);
        self.start += count;
        Ok(count)
    }

    fn seek(&mut self, position: u64) -> Result<()> {
        self.start = 0;
        self.end = 0;
        self.inner.seek(position)
    }

    fn skip(&mut self, delta: i64) -> Result<()> {
        // The window covers positions the wrapped stream has already
        // passed; moves landing inside it only adjust the cursor.
        let target = self.start as i128 + i128::from(delta);
        if target >= 0 && target <= self.end as i128 {
            self.start = target as usize;
            return Ok(());
        }
        let ahead = (self.end - self.start) as i128;
        self.start = 0;
        self.end = 0;
        let remaining = i128::from(delta) - ahead;
        self.inner
            .skip(remaining.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
    }

    fn finished(&self) -> bool {
        self.start == self.end && self.inner.finished()
    }
}

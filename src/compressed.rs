//! DEFLATE compression decorators.
//!
//! Both directions run the zlib stream codec incrementally through a small
//! fixed working buffer, so archives far larger than memory pass through
//! untouched. Neither direction can map a decompressed position back to a
//! compressed one, so `seek` and `skip` are refused.

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

use crate::error::{Error, Result};
use crate::stream::{InputStream, OutputStream};

const WORK_BUFFER_LEN: usize = 1024;

/// Compresses every byte written through it before forwarding to the
/// wrapped stream.
///
/// The codec holds back data, so the wrapped stream only sees the final
/// bytes once [`finish`](Self::finish) runs. Dropping the stream finishes
/// it too, discarding any error; call [`finish`](Self::finish) explicitly
/// when the result matters. Writing after the stream is finished accepts
/// nothing.
pub struct CompressedOutputStream<'a, S: OutputStream> {
    inner: &'a mut S,
    codec: Compress,
    work: [u8; WORK_BUFFER_LEN],
    written: u64,
    finished: bool,
}

impl<'a, S: OutputStream> CompressedOutputStream<'a, S> {
    /// Wraps `inner` with the default compression level.
    pub fn new(inner: &'a mut S) -> Self {
        Self::with_level(inner, Compression::default())
    }

    /// Wraps `inner` compressing at `level`.
    pub fn with_level(inner: &'a mut S, level: Compression) -> Self {
        Self {
            inner,
            codec: Compress::new(level, true),
            work: [0; WORK_BUFFER_LEN],
            written: 0,
            finished: false,
        }
    }

    /// Flushes all pending output into the wrapped stream and terminates
    /// the zlib stream. Must happen (explicitly or via drop) before the
    /// data can be read back.
    pub fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        loop {
            let before_out = self.codec.total_out();
            let status = self
                .codec
                .compress(&[], &mut self.work, FlushCompress::Finish)
                .map_err(Error::compression)?;
            let produced = (self.codec.total_out() - before_out) as usize;
            self.inner.write_all(&self.work[..produced])?;
            match status {
                Status::StreamEnd => return Ok(()),
                Status::Ok | Status::BufError => {
                    if produced == 0 {
                        return Err(Error::compression("deflate stalled while finishing"));
                    }
                }
            }
        }
    }
}

impl<S: OutputStream> OutputStream for CompressedOutputStream<'_, S> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        if self.finished {
            return Ok(0);
        }
        let mut consumed = 0;
        while consumed < bytes.len() {
            let before_in = self.codec.total_in();
            let before_out = self.codec.total_out();
            self.codec
                .compress(&bytes[consumed..], &mut self.work, FlushCompress::None)
                .map_err(Error::compression)?;
            let taken = (self.codec.total_in() - before_in) as usize;
            let produced = (self.codec.total_out() - before_out) as usize;
            self.inner.write_all(&self.work[..produced])?;
            if taken == 0 && produced == 0 {
                return Err(Error::compression("deflate made no progress"));
            }
            consumed += taken;
        }
        self.written += bytes.len() as u64;
        Ok(bytes.len())
    }

    fn written_bytes(&self) -> u64 {
        self.written
    }
}

impl<S: OutputStream> Drop for CompressedOutputStream<'_, S> {
    fn drop(&mut self) {
        let _ = self.finish();
    }
}

/// Decompresses bytes read through it from the wrapped stream.
pub struct CompressedInputStream<'a, S: InputStream> {
    inner: &'a mut S,
    codec: Decompress,
    work: [u8; WORK_BUFFER_LEN],
    start: usize,
    end: usize,
    done: bool,
}

impl<'a, S: InputStream> CompressedInputStream<'a, S> {
    /// Wraps `inner`, expecting a zlib stream.
    pub fn new(inner: &'a mut S) -> Self {
        Self {
            inner,
            codec: Decompress::new(true),
            work: [0; WORK_BUFFER_LEN],
            start: 0,
            end: 0,
            done: false,
        }
    }
}

impl<S: InputStream> InputStream for CompressedInputStream<'_, S> {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buffer.len() && !self.done {
            if self.start == self.end {
                self.start = 0;
                self.end = self.inner.read(&mut self.work)?;
                if self.end == 0 {
                    // Wrapped stream ended before the zlib stream did; the
                    // caller sees a short read.
                    break;
                }
            }
            let before_in = self.codec.total_in();
            let before_out = self.codec.total_out();
            let status = self
                .codec
                .decompress(
                    &self.work[self.start..self.end],
                    &mut buffer[filled..],
                    FlushDecompress::None,
                )
                .map_err(Error::compression)?;
            let taken = (self.codec.total_in() - before_in) as usize;
            let produced = (self.codec.total_out() - before_out) as usize;
            self.start += taken;
            filled += produced;
            match status {
                Status::StreamEnd => self.done = true,
                Status::Ok | Status::BufError => {
                    if taken == 0 && produced == 0 {
                        return Err(Error::compression("inflate made no progress"));
                    }
                }
            }
        }
        Ok(filled)
    }

    fn seek(&mut self, _position: u64) -> Result<()> {
        Err(Error::unsupported("seek", "compressed stream"))
    }

    fn skip(&mut self, _delta: i64) -> Result<()> {
        Err(Error::unsupported("skip", "compressed stream"))
    }

    fn finished(&self) -> bool {
        self.done || (self.start == self.end && self.inner.finished())
    }
}

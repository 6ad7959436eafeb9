//! Integrity-hashing decorators.
//!
//! A hashed stream feeds every byte that passes through it into a running
//! accumulator chosen by the caller. Hashing the write side and the read
//! side of a decorator stack and comparing digests proves the payload
//! survived byte-identical, whatever the layers in between did to it.

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::stream::{InputStream, OutputStream};

/// An incrementally-fed hash accumulator.
///
/// Implement this to plug a different algorithm into the hashed streams;
/// [`Sha256Hasher`] and [`Crc32Hasher`] cover the common cases.
pub trait StreamHasher {
    /// The digest value this hasher produces.
    type Digest: PartialEq + std::fmt::Debug;

    /// Absorbs `bytes` into the running state.
    fn update(&mut self, bytes: &[u8]);

    /// The digest of everything absorbed so far. Must not disturb the
    /// running state; the stream keeps absorbing afterwards.
    fn digest(&self) -> Self::Digest;
}

/// SHA-256 accumulator for cryptographic integrity checks.
#[derive(Debug, Default, Clone)]
pub struct Sha256Hasher {
    state: Sha256,
}

impl Sha256Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StreamHasher for Sha256Hasher {
    type Digest = [u8; 32];

    fn update(&mut self, bytes: &[u8]) {
        self.state.update(bytes);
    }

    fn digest(&self) -> [u8; 32] {
        self.state.clone().finalize().into()
    }
}

/// CRC32 (IEEE) accumulator for fast corruption checks.
#[derive(Debug, Default, Clone)]
pub struct Crc32Hasher {
    state: crc32fast::Hasher,
}

impl Crc32Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StreamHasher for Crc32Hasher {
    type Digest = u32;

    fn update(&mut self, bytes: &[u8]) {
        self.state.update(bytes);
    }

    fn digest(&self) -> u32 {
        self.state.clone().finalize()
    }
}

/// Hashes every byte written through it before forwarding to the wrapped
/// stream.
///
/// Only bytes the wrapped stream actually accepts are hashed, so the
/// digest always describes what landed downstream.
pub struct HashedOutputStream<'a, S: OutputStream, H: StreamHasher> {
    inner: &'a mut S,
    hasher: H,
    written: u64,
}

impl<'a, S: OutputStream, H: StreamHasher> HashedOutputStream<'a, S, H> {
    /// Wraps `inner`, absorbing into `hasher`.
    pub fn new(inner: &'a mut S, hasher: H) -> Self {
        Self {
            inner,
            hasher,
            written: 0,
        }
    }

    /// The digest of all bytes accepted so far.
    pub fn hash(&self) -> H::Digest {
        self.hasher.digest()
    }
}

impl<S: OutputStream, H: StreamHasher> OutputStream for HashedOutputStream<'_, S, H> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        let written = self.inner.write(bytes)?;
        self.hasher.update(&bytes[..written]);
        self.written += written as u64;
        Ok(written)
    }

    fn written_bytes(&self) -> u64 {
        self.written
    }
}

/// Hashes every byte read through it from the wrapped stream.
///
/// `seek` and `skip` are refused: a moved cursor would leave bytes out of
/// the digest and make it meaningless.
pub struct HashedInputStream<'a, S: InputStream, H: StreamHasher> {
    inner: &'a mut S,
    hasher: H,
}

impl<'a, S: InputStream, H: StreamHasher> HashedInputStream<'a, S, H> {
    /// Wraps `inner`, absorbing into `hasher`.
    pub fn new(inner: &'a mut S, hasher: H) -> Self {
        Self { inner, hasher }
    }

    /// The digest of all bytes produced so far.
    pub fn hash(&self) -> H::Digest {
        self.hasher.digest()
    }
}

impl<S: InputStream, H: StreamHasher> InputStream for HashedInputStream<'_, S, H> {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let read = self.inner.read(buffer)?;
        self.hasher.update(&buffer[..read]);
        Ok(read)
    }

    fn seek(&mut self, _position: u64) -> Result<()> {
        Err(Error::unsupported("seek", "hashed stream"))
    }

    fn skip(&mut self, _delta: i64) -> Result<()> {
        Err(Error::unsupported("skip", "hashed stream"))
    }

    fn finished(&self) -> bool {
        self.inner.finished()
    }
}

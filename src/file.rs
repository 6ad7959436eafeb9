//! File-backed terminal streams.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::Result;
use crate::stream::{InputStream, OutputStream};

/// How a [`FileOutputStream`] treats existing file content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace any existing content.
    Truncate,
    /// Keep existing content and write after it.
    Append,
}

/// Writes an archive to a file opened in binary mode.
///
/// A failed open is reported through the log rather than an error value:
/// the stream is still constructed, accepts nothing, and
/// [`is_open`](Self::is_open) answers false. This mirrors how asset
/// pipelines treat a missing output location as a degraded-but-running
/// condition.
pub struct FileOutputStream {
    file: Option<File>,
    written: u64,
}

impl FileOutputStream {
    /// Opens `path` for writing, replacing any existing content.
    pub fn create(path: impl AsRef<Path>) -> Self {
        Self::with_mode(path, WriteMode::Truncate)
    }

    /// Opens `path` for writing in the given mode.
    pub fn with_mode(path: impl AsRef<Path>, mode: WriteMode) -> Self {
        let path = path.as_ref();
        let mut options = OpenOptions::new();
        options.write(true).create(true);
        match mode {
            WriteMode::Truncate => options.truncate(true),
            WriteMode::Append => options.append(true),
        };
        let file = match options.open(path) {
            Ok(file) => Some(file),
            Err(err) => {
                log::warn!("failed to open {} for writing: {err}", path.display());
                None
            }
        };
        Self { file, written: 0 }
    }

    /// False if the file could not be opened. A closed stream accepts no
    /// bytes, so writes through it surface as [`Error::StreamFull`](crate::error::Error::StreamFull).
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Flushes OS buffers for the written data.
    pub fn sync(&mut self) -> Result<()> {
        if let Some(file) = self.file.as_mut() {
            file.sync_all()?;
        }
        Ok(())
    }
}

impl OutputStream for FileOutputStream {
    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        let Some(file) = self.file.as_mut() else {
            return Ok(0);
        };
        let written = file.write(bytes)?;
        self.written += written as u64;
        Ok(written)
    }

    fn written_bytes(&self) -> u64 {
        self.written
    }
}

/// Reads an archive from a file opened in binary mode.
///
/// Follows the same open-failure contract as [`FileOutputStream`]: a
/// missing or unreadable file yields a stream that is immediately
/// finished and produces no bytes.
pub struct FileInputStream {
    file: Option<File>,
    position: u64,
    length: u64,
}

impl FileInputStream {
    /// Opens `path` for reading.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let opened = File::open(path).and_then(|file| {
            let length = file.metadata()?.len();
            Ok((file, length))
        });
        match opened {
            Ok((file, length)) => Self {
                file: Some(file),
                position: 0,
                length,
            },
            Err(err) => {
                log::warn!("failed to open {} for reading: {err}", path.display());
                Self {
                    file: None,
                    position: 0,
                    length: 0,
                }
            }
        }
    }

    /// False if the file could not be opened.
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Size of the backing file in bytes.
    pub fn length(&self) -> u64 {
        self.length
    }
}

impl InputStream for FileInputStream {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let Some(file) = self.file.as_mut() else {
            return Ok(0);
        };
        let read = file.read(buffer)?;
        self.position += read as u64;
        Ok(read)
    }

    fn seek(&mut self, position: u64) -> Result<()> {
        let Some(file) = self.file.as_mut() else {
            return Ok(());
        };
        self.position = file.seek(SeekFrom::Start(position))?;
        Ok(())
    }

    fn skip(&mut self, delta: i64) -> Result<()> {
        let Some(file) = self.file.as_mut() else {
            return Ok(());
        };
        self.position = file.seek(SeekFrom::Current(delta))?;
        Ok(())
    }

    fn finished(&self) -> bool {
        self.file.is_none() || self.position >= self.length
    }
}

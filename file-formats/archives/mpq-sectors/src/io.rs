//! Byte source abstractions for MPQ archives

use crate::Result;
use parking_lot::{Mutex, MutexGuard};
use std::io::{Read, Seek, SeekFrom};
use std::sync::Arc;

/// Random access to an archive's backing bytes
///
/// `read_at` is a seek followed by an exact read. A short read or a failed
/// seek is reported as [`Error::Io`](crate::Error::Io).
pub trait ByteSource {
    /// Read exactly `buf.len()` bytes starting at the absolute `offset`
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()>;
}

impl<R: Read + Seek> ByteSource for R {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        self.seek(SeekFrom::Start(offset))?;
        self.read_exact(buf)?;
        Ok(())
    }
}

/// Archive handle shared between readers
///
/// The cursor of the underlying source is guarded by a mutex, so a seek and
/// the read that follows it are never interleaved with another reader's.
#[derive(Debug)]
pub struct SharedSource<R> {
    inner: Arc<Mutex<R>>,
}

impl<R> Clone for SharedSource<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Read + Seek> SharedSource<R> {
    /// Wrap a source for shared use
    pub fn new(inner: R) -> Self {
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Take exclusive access for a sequence of operations
    pub fn lock(&self) -> MutexGuard<'_, R> {
        self.inner.lock()
    }

    /// Seek and read under a single lock
    pub fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        self.lock().read_at(offset, buf)
    }
}

//! Per-file reader state
//!
//! A [`Reader`] is built once per stored file. Construction decides whether
//! the file needs a sector offset table and loads it; afterwards the reader
//! can locate and fetch the raw (still compressed) bytes of each sector.

use crate::crypto::decrypt_bytes;
use crate::io::{ByteSource, SharedSource};
use crate::sector::{BlockOffsetTable, needs_offset_table, sector_uses_offsets};
use crate::tables::FileTableEntry;
use crate::{Error, Result, calculate_sector_size};
use std::io::{Read, Seek};

/// Options for building a [`Reader`]
///
/// ```
/// use mpq_sectors::ReaderOptions;
///
/// let options = ReaderOptions::new().block_size_shift(3).verify_offsets(false);
/// assert_eq!(options.sector_size().unwrap(), 4096);
/// ```
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// Archive block size as a power-of-two shift of 512 bytes
    pub block_size_shift: u16,

    /// Whether plain (unencrypted) offset tables are validated too.
    ///
    /// Encrypted tables are always validated, since that is how a wrong key
    /// is detected.
    pub verify_offsets: bool,
}

impl ReaderOptions {
    /// Create new default options
    ///
    /// - `block_size_shift = 3` (4096-byte sectors)
    /// - `verify_offsets = true`
    pub fn new() -> Self {
        Self {
            block_size_shift: 3,
            verify_offsets: true,
        }
    }

    /// Set the archive's block size shift
    pub fn block_size_shift(mut self, shift: u16) -> Self {
        self.block_size_shift = shift;
        self
    }

    /// Set whether plain offset tables are validated
    pub fn verify_offsets(mut self, verify: bool) -> Self {
        self.verify_offsets = verify;
        self
    }

    /// Sector size these options produce
    pub fn sector_size(&self) -> Result<u32> {
        calculate_sector_size(self.block_size_shift)
    }
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Location of one sector's stored bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorSpan {
    /// Sector index within the file
    pub index: u32,
    /// Absolute position in the byte source
    pub offset: u64,
    /// Number of bytes stored
    pub stored_len: u32,
    /// Number of bytes the sector holds once decompressed
    pub expected_len: u32,
    /// Whether the stored bytes still need decompressing
    pub compressed: bool,
}

/// Reader session for one stored file
#[derive(Debug)]
pub struct Reader {
    entry: FileTableEntry,
    block_size: u32,
    offsets: Option<BlockOffsetTable>,
}

impl Reader {
    /// Build a reader with default options and the given block size shift
    pub fn new<S>(entry: FileTableEntry, block_size_shift: u16, source: &mut S) -> Result<Self>
    where
        S: ByteSource + ?Sized,
    {
        let options = ReaderOptions::new().block_size_shift(block_size_shift);
        Self::with_options(entry, &options, source)
    }

    /// Build a reader, loading the offset table when the file needs one
    pub fn with_options<S>(
        entry: FileTableEntry,
        options: &ReaderOptions,
        source: &mut S,
    ) -> Result<Self>
    where
        S: ByteSource + ?Sized,
    {
        if entry.flags.is_patch_file() {
            return Err(Error::unsupported("patch files are not supported"));
        }

        let block_size = options.sector_size()?;

        let offsets = if needs_offset_table(entry.flags) {
            Some(BlockOffsetTable::load_checked(
                &entry,
                block_size,
                source,
                options.verify_offsets,
            )?)
        } else {
            log::trace!(
                "No offset table for file at 0x{:X} (flags 0x{:08X})",
                entry.file_pos,
                entry.flags.bits()
            );
            None
        };

        Ok(Self {
            entry,
            block_size,
            offsets,
        })
    }

    /// Build a reader on a shared archive handle
    ///
    /// The handle stays locked for the whole table load.
    pub fn open_shared<R: Read + Seek>(
        entry: FileTableEntry,
        options: &ReaderOptions,
        source: &SharedSource<R>,
    ) -> Result<Self> {
        let mut guard = source.lock();
        Self::with_options(entry, options, &mut *guard)
    }

    /// The file table entry this reader was built from
    pub fn entry(&self) -> &FileTableEntry {
        &self.entry
    }

    /// Sector size in bytes
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// The loaded offset table, if the file needed one
    pub fn offsets(&self) -> Option<&BlockOffsetTable> {
        self.offsets.as_ref()
    }

    /// Number of sectors the file is split into
    pub fn sector_count(&self) -> u32 {
        self.entry.file_size.div_ceil(self.block_size)
    }

    /// Locate the stored bytes of sector `index`
    pub fn sector_span(&self, index: u32) -> Result<SectorSpan> {
        let count = self.sector_count();
        if index >= count {
            return Err(Error::SectorOutOfRange { index, count });
        }

        let expected_len = (self.entry.file_size - index * self.block_size).min(self.block_size);

        let (start, stored_len) = if sector_uses_offsets(self.entry.flags) {
            let table = self.offsets.as_ref().ok_or(Error::OffsetTableMissing)?;
            let (start, end) = table
                .sector_range(index as usize)
                .ok_or(Error::SectorOutOfRange { index, count })?;
            if end < start {
                return Err(Error::integrity(format!(
                    "sector {index} ends at {end} before it starts at {start}"
                )));
            }
            // A stored sector is never larger than the block it decompresses to
            if end - start > self.block_size {
                return Err(Error::integrity(format!(
                    "sector {index} stores {} bytes, more than the {}-byte block size",
                    end - start,
                    self.block_size
                )));
            }
            let stored_size = self.entry.compressed_size;
            if stored_size != 0 && end > stored_size {
                return Err(Error::integrity(format!(
                    "sector {index} ends at {end}, past the stored size {stored_size}"
                )));
            }
            (start, end - start)
        } else {
            (index * self.block_size, expected_len)
        };

        Ok(SectorSpan {
            index,
            offset: self.entry.file_pos + u64::from(start),
            stored_len,
            expected_len,
            compressed: sector_uses_offsets(self.entry.flags) && stored_len != expected_len,
        })
    }

    /// Read the stored bytes of sector `index`, decrypted but not decompressed
    pub fn read_raw_sector<S>(&self, index: u32, source: &mut S) -> Result<Vec<u8>>
    where
        S: ByteSource + ?Sized,
    {
        let span = self.sector_span(index)?;
        let mut data = vec![0u8; span.stored_len as usize];
        source.read_at(span.offset, &mut data)?;

        // Files of three bytes or less are never encrypted in practice
        if self.entry.flags.is_encrypted() && self.entry.file_size > 3 {
            if self.entry.encryption_seed == 0 {
                return Err(Error::MissingEncryptionKey);
            }
            decrypt_bytes(&mut data, self.entry.encryption_seed.wrapping_add(index));
        }

        log::trace!(
            "Read sector {index}: {} bytes at 0x{:X}",
            span.stored_len,
            span.offset
        );
        Ok(data)
    }
}

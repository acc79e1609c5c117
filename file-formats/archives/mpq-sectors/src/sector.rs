//! Sector offset tables
//!
//! A file stored in more than one compressed sector starts with a table of
//! `u32` offsets, one per sector boundary plus a trailing end marker. The
//! offsets are relative to the file's position in the archive, and for
//! encrypted files the table is encrypted with the file seed minus one.
//!
//! The table describes its own size: the first offset is always the byte
//! length of the table, since the first sector starts right after it. That
//! property is what detects a wrong key.

use crate::crypto::decrypt_block;
use crate::io::ByteSource;
use crate::tables::{FileFlags, FileTableEntry};
use crate::{Error, Result};
use byteorder::{ByteOrder, LittleEndian};

/// Smallest sector size an archive can declare (block size shift 0)
pub const MIN_BLOCK_SIZE: u32 = 0x200;

/// Whether a file gets a sector offset table when its reader is built
///
/// Single-unit files never get one, even when compressed.
pub fn needs_offset_table(flags: FileFlags) -> bool {
    flags.is_compressed() && !flags.is_single_unit()
}

/// Whether sector lookups go through the offset table
///
/// Deliberately narrower than [`needs_offset_table`]: it ignores
/// `SINGLE_UNIT`, so a compressed single-unit file asks for offsets it never
/// loaded.
pub fn sector_uses_offsets(flags: FileFlags) -> bool {
    flags.is_compressed()
}

/// Validated sector offsets of one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOffsetTable {
    positions: Vec<u32>,
}

impl BlockOffsetTable {
    /// Number of entries needed for a file: one per sector plus the end marker
    ///
    /// `None` for a zero block size, or when the count does not fit a `u32`.
    pub fn entry_count(file_size: u32, block_size: u32) -> Option<u32> {
        if block_size == 0 {
            return None;
        }
        file_size.div_ceil(block_size).checked_add(1)
    }

    /// Read, decrypt and validate the offset table of `entry`
    ///
    /// Patch files are rejected before the source is touched. The table is
    /// validated whether or not it was encrypted.
    pub fn load<S>(entry: &FileTableEntry, block_size: u32, source: &mut S) -> Result<Self>
    where
        S: ByteSource + ?Sized,
    {
        Self::load_checked(entry, block_size, source, true)
    }

    pub(crate) fn load_checked<S>(
        entry: &FileTableEntry,
        block_size: u32,
        source: &mut S,
        always_verify: bool,
    ) -> Result<Self>
    where
        S: ByteSource + ?Sized,
    {
        if entry.flags.is_patch_file() {
            return Err(Error::unsupported("patch files are not supported"));
        }
        if block_size < MIN_BLOCK_SIZE {
            return Err(Error::invalid_format(format!(
                "block size {block_size} is below the {MIN_BLOCK_SIZE}-byte minimum"
            )));
        }

        let count = Self::entry_count(entry.file_size, block_size)
            .ok_or_else(|| Error::invalid_format("sector count does not fit in 32 bits"))?
            as usize;
        log::debug!(
            "Loading {count} sector offsets at 0x{:X} (file size {}, block size {block_size})",
            entry.file_pos,
            entry.file_size
        );

        let mut raw = vec![0u8; count * 4];
        source.read_at(entry.file_pos, &mut raw)?;

        let mut positions = vec![0u32; count];
        LittleEndian::read_u32_into(&raw, &mut positions);

        let encrypted = entry.flags.is_encrypted();
        if encrypted {
            decrypt_block(&mut positions, entry.encryption_seed.wrapping_sub(1));
        }

        let table = Self { positions };
        if encrypted || always_verify {
            table.validate(block_size)?;
        }

        log::trace!("Sector offsets: {:?}", table.positions);
        Ok(table)
    }

    /// Check the table against its own size and the block size
    pub fn validate(&self, block_size: u32) -> Result<()> {
        let table_size = self.byte_len();

        match self.positions.first() {
            Some(&first) if u64::from(first) == table_size => {}
            first => {
                log::debug!("First sector offset {first:?} does not match table size {table_size}");
                return Err(Error::integrity(format!(
                    "decryption of MPQ failed: first offset {} != table size {table_size}",
                    first.copied().unwrap_or_default()
                )));
            }
        }

        if let Some(&second) = self.positions.get(1) {
            let limit = u64::from(block_size) + table_size;
            if u64::from(second) > limit {
                log::debug!("Second sector offset {second} exceeds limit {limit}");
                return Err(Error::integrity(format!(
                    "decryption of MPQ failed: second offset {second} > {limit}"
                )));
            }
        }

        Ok(())
    }

    /// Offsets relative to the file position
    pub fn positions(&self) -> &[u32] {
        &self.positions
    }

    /// Number of entries, including the end marker
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// A loaded table always holds at least the end marker
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Size of the table as stored
    pub fn byte_len(&self) -> u64 {
        self.positions.len() as u64 * 4
    }

    /// Stored byte range of sector `index`, relative to the file position
    pub fn sector_range(&self, index: usize) -> Option<(u32, u32)> {
        let start = *self.positions.get(index)?;
        let end = *self.positions.get(index + 1)?;
        Some((start, end))
    }
}

//! Block table entries and per-file flags

use bitflags::bitflags;
use byteorder::{LittleEndian, ReadBytesExt};

use crate::crypto::file_key;
use crate::{Error, Result};

bitflags! {
    /// Flags stored in the block table for each file
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FileFlags: u32 {
        /// File is compressed using PKWARE Data compression library
        const IMPLODE = 0x0000_0100;
        /// File is compressed using one or more compression methods
        const COMPRESS = 0x0000_0200;
        /// File is encrypted
        const ENCRYPTED = 0x0001_0000;
        /// The decryption key for the file is adjusted by the block position
        const FIX_KEY = 0x0002_0000;
        /// The file is a patch file
        const PATCH_FILE = 0x0010_0000;
        /// File is stored as a single unit, not split into sectors
        const SINGLE_UNIT = 0x0100_0000;
        /// File is a deletion marker
        const DELETE_MARKER = 0x0200_0000;
        /// File has checksums for each sector
        const SECTOR_CRC = 0x0400_0000;
        /// File exists in the archive
        const EXISTS = 0x8000_0000;

        // Compression method bits and anything newer formats add
        const _ = !0;
    }
}

impl FileFlags {
    /// Check if the file is compressed by either method
    pub fn is_compressed(self) -> bool {
        self.intersects(Self::COMPRESS | Self::IMPLODE)
    }

    /// Check if the file is encrypted
    pub fn is_encrypted(self) -> bool {
        self.contains(Self::ENCRYPTED)
    }

    /// Check if the file is stored as a single unit
    pub fn is_single_unit(self) -> bool {
        self.contains(Self::SINGLE_UNIT)
    }

    /// Check if the file is a patch file
    pub fn is_patch_file(self) -> bool {
        self.contains(Self::PATCH_FILE)
    }

    /// Check if the file uses fixed key encryption
    pub fn has_fix_key(self) -> bool {
        self.contains(Self::FIX_KEY)
    }
}

/// Block table entry (16 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockEntry {
    /// Offset of the beginning of the file data, relative to the beginning of the archive
    pub file_pos: u32,
    /// Compressed file size
    pub compressed_size: u32,
    /// Size of uncompressed file
    pub file_size: u32,
    /// Flags for the file
    pub flags: u32,
}

impl BlockEntry {
    /// Size of one entry on disk
    pub const SIZE: usize = 16;

    /// Read a block entry from raw (already decrypted) bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE {
            return Err(Error::invalid_format("Block entry too small"));
        }

        let mut cursor = std::io::Cursor::new(data);
        Ok(Self {
            file_pos: cursor.read_u32::<LittleEndian>()?,
            compressed_size: cursor.read_u32::<LittleEndian>()?,
            file_size: cursor.read_u32::<LittleEndian>()?,
            flags: cursor.read_u32::<LittleEndian>()?,
        })
    }

    /// Typed view of the flag word
    pub fn file_flags(&self) -> FileFlags {
        FileFlags::from_bits_retain(self.flags)
    }
}

/// Everything the sector loader needs to know about one stored file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileTableEntry {
    /// Per-file flags
    pub flags: FileFlags,
    /// Absolute position of the file data (and its offset table) in the source
    pub file_pos: u64,
    /// Stored size in the archive
    pub compressed_size: u32,
    /// Uncompressed size
    pub file_size: u32,
    /// Key material for the file's encrypted streams, zero when unencrypted
    pub encryption_seed: u32,
}

impl FileTableEntry {
    /// Create an entry from already known values
    pub fn new(flags: FileFlags, file_pos: u64, file_size: u32, encryption_seed: u32) -> Self {
        Self {
            flags,
            file_pos,
            compressed_size: 0,
            file_size,
            encryption_seed,
        }
    }

    /// Set the stored size
    pub fn with_compressed_size(mut self, compressed_size: u32) -> Self {
        self.compressed_size = compressed_size;
        self
    }

    /// Build an entry from a block table record
    ///
    /// `archive_offset` is where the archive header sits in the source; block
    /// positions are relative to it. The encryption seed is derived from
    /// `name` only when the file is encrypted.
    pub fn from_block(block: &BlockEntry, name: &str, archive_offset: u64) -> Self {
        let flags = block.file_flags();
        let encryption_seed = if flags.is_encrypted() {
            file_key(name, block.file_pos, block.file_size, flags.has_fix_key())
        } else {
            0
        };

        log::trace!(
            "Block entry for {name}: pos=0x{:08X}, size={}, flags=0x{:08X}, seed=0x{encryption_seed:08X}",
            block.file_pos,
            block.file_size,
            block.flags
        );

        Self {
            flags,
            file_pos: archive_offset + u64::from(block.file_pos),
            compressed_size: block.compressed_size,
            file_size: block.file_size,
            encryption_seed,
        }
    }
}

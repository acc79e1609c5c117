//! # mpq_sectors - MPQ sector offset tables
//!
//! Files stored in an MPQ archive are split into fixed-size sectors that are
//! compressed independently. A multi-sector compressed file begins with a
//! table of sector offsets, which has to be read, possibly decrypted, and
//! checked before any sector can be fetched. This crate does exactly that.
//!
//! ## Features
//!
//! - Offset table loading with decryption keyed by the file seed
//! - Self-consistency checks that catch a wrong key or a corrupted archive
//! - Raw sector location and retrieval (decryption only, no decompression)
//! - The MPQ stream cipher and file key derivation
//! - A mutex-guarded archive handle for sharing one source between readers
//!
//! ## Examples
//!
//! ```
//! use mpq_sectors::{FileFlags, FileTableEntry, Reader};
//! use std::io::Cursor;
//!
//! # fn main() -> Result<(), mpq_sectors::Error> {
//! // Two sectors of 512 bytes: the table holds three offsets
//! let table: Vec<u8> = [12u32, 312, 612]
//!     .iter()
//!     .flat_map(|w| w.to_le_bytes())
//!     .collect();
//!
//! let entry = FileTableEntry::new(FileFlags::COMPRESS, 0, 1024, 0);
//! let reader = Reader::new(entry, 0, &mut Cursor::new(table))?;
//!
//! assert_eq!(reader.sector_count(), 2);
//! assert_eq!(reader.sector_span(1)?.stored_len, 300);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod crypto;
pub mod error;
pub mod io;
pub mod reader;
pub mod sector;
pub mod tables;

pub use error::{Error, Result};
pub use io::{ByteSource, SharedSource};
pub use reader::{Reader, ReaderOptions, SectorSpan};
pub use sector::{BlockOffsetTable, needs_offset_table, sector_uses_offsets};
pub use tables::{BlockEntry, FileFlags, FileTableEntry};

/// Largest block size shift whose sector size still fits in a `u32`
pub const MAX_BLOCK_SIZE_SHIFT: u16 = 22;

/// Sector size for an archive's block size shift
#[inline]
pub fn calculate_sector_size(block_size_shift: u16) -> Result<u32> {
    if block_size_shift > MAX_BLOCK_SIZE_SHIFT {
        return Err(Error::InvalidBlockSize(block_size_shift));
    }
    Ok(0x200 << block_size_shift)
}

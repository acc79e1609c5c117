//! Readers over archives stored on disk

use crate::common::{build_stored_file, generate_test_data};
use mpq_sectors::crypto::file_key;
use mpq_sectors::{BlockEntry, Error, FileFlags, FileTableEntry, Reader, ReaderOptions};
use pretty_assertions::assert_eq;
use std::fs::File;
use std::io::Write;
use tempfile::NamedTempFile;

const ARCHIVE_OFFSET: u64 = 0x200;
const FILE_POS: u32 = 0x20;
const NAME: &str = "data\\global\\excel\\armor.txt";

/// Write an archive image holding one sectored file and return its block entry
fn write_archive(flags: FileFlags, sectors: &[Vec<u8>], block_size: u32) -> (NamedTempFile, BlockEntry) {
    let file_size = block_size * sectors.len() as u32;
    let seed = if flags.is_encrypted() {
        file_key(NAME, FILE_POS, file_size, flags.has_fix_key())
    } else {
        0
    };
    let (_, stored) = build_stored_file(sectors, seed);

    let mut temp = NamedTempFile::new().expect("Failed to create temp file");
    temp.write_all(&vec![0u8; ARCHIVE_OFFSET as usize + FILE_POS as usize])
        .expect("Failed to write padding");
    temp.write_all(&stored).expect("Failed to write stored file");
    temp.flush().expect("Failed to flush");

    let block = BlockEntry {
        file_pos: FILE_POS,
        compressed_size: stored.len() as u32,
        file_size,
        flags: (flags | FileFlags::EXISTS).bits(),
    };
    (temp, block)
}

fn sectors() -> Vec<Vec<u8>> {
    (0..3).map(|i| generate_test_data(200 + i * 50)).collect()
}

#[test]
fn test_encrypted_file_on_disk() {
    let sectors = sectors();
    let (temp, block) = write_archive(FileFlags::COMPRESS | FileFlags::ENCRYPTED, &sectors, 0x1000);

    let entry = FileTableEntry::from_block(&block, NAME, ARCHIVE_OFFSET);
    let mut file = File::open(temp.path()).unwrap();
    let reader = Reader::new(entry, 3, &mut file).unwrap();

    assert_eq!(reader.sector_count(), 3);
    for (index, expected) in sectors.iter().enumerate() {
        let raw = reader.read_raw_sector(index as u32, &mut file).unwrap();
        assert_eq!(&raw, expected);
        assert!(reader.sector_span(index as u32).unwrap().compressed);
    }
}

#[test]
fn test_fix_key_file_on_disk() {
    let sectors = sectors();
    let flags = FileFlags::IMPLODE | FileFlags::ENCRYPTED | FileFlags::FIX_KEY;
    let (temp, block) = write_archive(flags, &sectors, 0x1000);

    let entry = FileTableEntry::from_block(&block, NAME, ARCHIVE_OFFSET);
    let mut file = File::open(temp.path()).unwrap();
    let reader = Reader::new(entry, 3, &mut file).unwrap();

    let raw = reader.read_raw_sector(2, &mut file).unwrap();
    assert_eq!(raw, sectors[2]);
}

#[test]
fn test_wrong_name_fails_integrity() {
    let (temp, block) = write_archive(
        FileFlags::COMPRESS | FileFlags::ENCRYPTED,
        &sectors(),
        0x1000,
    );

    let entry = FileTableEntry::from_block(&block, "data\\global\\excel\\weapons.txt", ARCHIVE_OFFSET);
    let mut file = File::open(temp.path()).unwrap();
    let err = Reader::new(entry, 3, &mut file).unwrap_err();
    assert!(matches!(err, Error::IntegrityFailure(_)));
}

#[test]
fn test_wrong_block_size_shift() {
    let (temp, block) = write_archive(FileFlags::COMPRESS, &sectors(), 0x1000);
    let entry = FileTableEntry::from_block(&block, NAME, ARCHIVE_OFFSET);
    let mut file = File::open(temp.path()).unwrap();

    // With 512-byte sectors the file would need a 100-byte table, not 16
    let options = ReaderOptions::new().block_size_shift(0);
    assert!(Reader::with_options(entry, &options, &mut file).is_err());
}

#[test]
fn test_single_unit_compressed_file() {
    let (temp, block) = write_archive(
        FileFlags::COMPRESS | FileFlags::SINGLE_UNIT,
        &sectors(),
        0x1000,
    );
    let entry = FileTableEntry::from_block(&block, NAME, ARCHIVE_OFFSET);
    let mut file = File::open(temp.path()).unwrap();

    let reader = Reader::new(entry, 3, &mut file).unwrap();
    assert!(reader.offsets().is_none());
    assert!(matches!(
        reader.read_raw_sector(0, &mut file),
        Err(Error::OffsetTableMissing)
    ));
}

#[test]
fn test_truncated_archive() {
    let (temp, block) = write_archive(FileFlags::COMPRESS, &sectors(), 0x1000);
    let file = File::options().write(true).open(temp.path()).unwrap();
    file.set_len(ARCHIVE_OFFSET + u64::from(FILE_POS) + 8).unwrap();
    drop(file);

    let entry = FileTableEntry::from_block(&block, NAME, ARCHIVE_OFFSET);
    let mut file = File::open(temp.path()).unwrap();
    let err = Reader::new(entry, 3, &mut file).unwrap_err();
    assert!(err.is_io());
}

#[test]
fn test_sector_beyond_stored_size() {
    let (temp, mut block) = write_archive(FileFlags::COMPRESS, &sectors(), 0x1000);
    // The block table claims less data than the offsets reach
    block.compressed_size -= 10;

    let entry = FileTableEntry::from_block(&block, NAME, ARCHIVE_OFFSET);
    let mut file = File::open(temp.path()).unwrap();
    let reader = Reader::new(entry, 3, &mut file).unwrap();

    assert!(reader.read_raw_sector(1, &mut file).is_ok());
    let err = reader.read_raw_sector(2, &mut file).unwrap_err();
    assert!(matches!(err, Error::IntegrityFailure(_)));
}

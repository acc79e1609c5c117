//! Print the sector layout of a stored file
//!
//! Builds a small encrypted file image in memory, then loads it the way an
//! archive reader would.
//!
//! Run with `RUST_LOG=debug cargo run --example dump_offsets`.

use mpq_sectors::crypto::{encrypt_block, encrypt_bytes, file_key};
use mpq_sectors::{BlockEntry, FileFlags, FileTableEntry, Reader, ReaderOptions};
use std::io::Cursor;

const NAME: &str = "data\\global\\excel\\armor.txt";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let sectors: Vec<Vec<u8>> = vec![vec![0x11; 300], vec![0x22; 280], vec![0x33; 120]];
    let file_size = 0x1000 * 2 + 0x400;
    let flags = FileFlags::COMPRESS | FileFlags::ENCRYPTED | FileFlags::EXISTS;
    let seed = file_key(NAME, 0, file_size, false);

    let mut offsets = vec![16u32];
    for sector in &sectors {
        offsets.push(offsets[offsets.len() - 1] + sector.len() as u32);
    }
    let mut table = offsets.clone();
    encrypt_block(&mut table, seed.wrapping_sub(1));

    let mut image: Vec<u8> = table.iter().flat_map(|w| w.to_le_bytes()).collect();
    for (index, sector) in sectors.iter().enumerate() {
        let mut stored = sector.clone();
        encrypt_bytes(&mut stored, seed.wrapping_add(index as u32));
        image.extend(stored);
    }

    let block = BlockEntry {
        file_pos: 0,
        compressed_size: image.len() as u32,
        file_size,
        flags: flags.bits(),
    };
    let entry = FileTableEntry::from_block(&block, NAME, 0);

    let mut source = Cursor::new(image);
    let options = ReaderOptions::new().block_size_shift(3);
    let reader = Reader::with_options(entry, &options, &mut source)?;

    println!("{NAME}");
    println!("  seed:        0x{:08X}", reader.entry().encryption_seed);
    println!("  block size:  {}", reader.block_size());
    println!("  sectors:     {}", reader.sector_count());
    for index in 0..reader.sector_count() {
        let span = reader.sector_span(index)?;
        let raw = reader.read_raw_sector(index, &mut source)?;
        println!(
            "  [{index}] offset 0x{:04X}, stored {:>4} bytes, expands to {:>4}, first byte 0x{:02X}",
            span.offset,
            span.stored_len,
            span.expected_len,
            raw.first().copied().unwrap_or_default()
        );
    }

    Ok(())
}

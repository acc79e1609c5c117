//! Several readers sharing one archive handle

use crate::common::{build_stored_file, generate_test_data};
use mpq_sectors::{FileFlags, FileTableEntry, Reader, ReaderOptions, SharedSource};
use std::io::Cursor;
use std::thread;

/// Archive with `count` sectored files laid out back to back
fn archive_with_files(count: u32) -> (Vec<u8>, Vec<(FileTableEntry, Vec<Vec<u8>>)>) {
    let mut image = Vec::new();
    let mut files = Vec::new();

    for i in 0..count {
        let seed = 0x1000_0000 + i * 0x0101;
        let sectors: Vec<Vec<u8>> = (0..=i as usize % 4)
            .map(|s| generate_test_data(64 + s * 16 + i as usize))
            .collect();
        let (_, stored) = build_stored_file(&sectors, seed);

        let entry = FileTableEntry::new(
            FileFlags::COMPRESS | FileFlags::ENCRYPTED | FileFlags::EXISTS,
            image.len() as u64,
            0x200 * sectors.len() as u32,
            seed,
        )
        .with_compressed_size(stored.len() as u32);

        image.extend(stored);
        files.push((entry, sectors));
    }

    (image, files)
}

#[test]
fn test_concurrent_readers_on_shared_source() {
    let (image, files) = archive_with_files(16);
    let shared = SharedSource::new(Cursor::new(image));
    let options = ReaderOptions::new().block_size_shift(0);

    let handles: Vec<_> = files
        .into_iter()
        .map(|(entry, sectors)| {
            let shared = shared.clone();
            let options = options.clone();
            thread::spawn(move || {
                for _ in 0..8 {
                    let reader = Reader::open_shared(entry, &options, &shared).unwrap();
                    let table = reader.offsets().expect("compressed file has offsets");
                    assert_eq!(table.len(), sectors.len() + 1);

                    for (index, expected) in sectors.iter().enumerate() {
                        let raw = reader
                            .read_raw_sector(index as u32, &mut *shared.lock())
                            .unwrap();
                        assert_eq!(&raw, expected);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_reader_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Reader>();
    assert_send_sync::<SharedSource<Cursor<Vec<u8>>>>();
}

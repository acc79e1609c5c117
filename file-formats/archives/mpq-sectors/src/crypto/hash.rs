//! Hash algorithms for MPQ file name hashing and key derivation

use super::keys::ENCRYPTION_TABLE;
use super::types::{HashType, hash_type};

/// Hash a string using the MPQ hash algorithm
///
/// Forward slashes hash as backslashes and ASCII letters are case-folded, so
/// `"war3map.j"` and `"WAR3MAP.J"` produce the same value.
pub fn hash_string(filename: &str, hash_type: HashType) -> u32 {
    let group = hash_type.table_offset();
    let mut seed1: u32 = 0x7FED7FED;
    let mut seed2: u32 = 0xEEEEEEEE;

    for &byte in filename.as_bytes() {
        let ch = if byte == b'/' {
            b'\\'
        } else {
            byte.to_ascii_uppercase()
        };

        seed1 = ENCRYPTION_TABLE[group + ch as usize] ^ (seed1.wrapping_add(seed2));
        seed2 = (ch as u32)
            .wrapping_add(seed1)
            .wrapping_add(seed2)
            .wrapping_add(seed2 << 5)
            .wrapping_add(3);
    }

    seed1
}

/// Strip any directory components from an archive path
pub fn plain_name(filename: &str) -> &str {
    filename
        .rfind(['\\', '/'])
        .map_or(filename, |idx| &filename[idx + 1..])
}

/// Derive the encryption seed for a stored file
///
/// The seed hashes only the plain file name. Files flagged with `FIX_KEY`
/// additionally mix in their archive-relative position and uncompressed
/// size.
pub fn file_key(filename: &str, file_pos: u32, file_size: u32, fix_key: bool) -> u32 {
    let key = hash_string(plain_name(filename), hash_type::FILE_KEY);
    if fix_key {
        key.wrapping_add(file_pos) ^ file_size
    } else {
        key
    }
}

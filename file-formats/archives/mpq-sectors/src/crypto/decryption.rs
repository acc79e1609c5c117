//! Decryption operations for MPQ files

use super::keys::ENCRYPTION_TABLE;

/// Decrypt a block of data in place
pub fn decrypt_block(data: &mut [u32], mut key: u32) {
    let mut seed: u32 = 0xEEEEEEEE;

    for value in data.iter_mut() {
        seed = seed.wrapping_add(ENCRYPTION_TABLE[0x400 + (key & 0xFF) as usize]);

        let ch = *value ^ (key.wrapping_add(seed));
        *value = ch;

        key = (!key << 0x15).wrapping_add(0x11111111) | (key >> 0x0B);

        // The next seed depends on the plaintext word
        seed = ch
            .wrapping_add(seed)
            .wrapping_add(seed << 5)
            .wrapping_add(3);
    }
}

/// Decrypt a single DWORD value
pub fn decrypt_dword(value: u32, key: u32) -> u32 {
    let seed = 0xEEEEEEEEu32.wrapping_add(ENCRYPTION_TABLE[0x400 + (key & 0xFF) as usize]);

    value ^ (key.wrapping_add(seed))
}

/// Decrypt a byte buffer in place
///
/// Only whole little-endian DWORDs are decrypted; a trailing remainder of
/// one to three bytes is left as stored.
pub fn decrypt_bytes(data: &mut [u8], key: u32) {
    if data.len() < 4 {
        return;
    }

    let mut words = words_from_bytes(data);
    decrypt_block(&mut words, key);
    words_into_bytes(&words, data);
}

pub(super) fn words_from_bytes(data: &[u8]) -> Vec<u32> {
    data.chunks_exact(4)
        .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

pub(super) fn words_into_bytes(words: &[u32], data: &mut [u8]) {
    for (chunk, word) in data.chunks_exact_mut(4).zip(words) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
}

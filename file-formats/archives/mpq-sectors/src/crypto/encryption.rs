//! Encryption operations for MPQ files

use super::decryption::{words_from_bytes, words_into_bytes};
use super::keys::ENCRYPTION_TABLE;

/// Encrypt a block of data in place
pub fn encrypt_block(data: &mut [u32], mut key: u32) {
    let mut seed: u32 = 0xEEEEEEEE;

    for value in data.iter_mut() {
        seed = seed.wrapping_add(ENCRYPTION_TABLE[0x400 + (key & 0xFF) as usize]);

        let ch = *value;
        *value = ch ^ (key.wrapping_add(seed));

        key = (!key << 0x15).wrapping_add(0x11111111) | (key >> 0x0B);

        seed = ch
            .wrapping_add(seed)
            .wrapping_add(seed << 5)
            .wrapping_add(3);
    }
}

/// Encrypt a byte buffer in place, whole DWORDs only
pub fn encrypt_bytes(data: &mut [u8], key: u32) {
    if data.len() < 4 {
        return;
    }

    let mut words = words_from_bytes(data);
    encrypt_block(&mut words, key);
    words_into_bytes(&words, data);
}

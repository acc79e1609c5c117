//! Key tables for the MPQ cipher and string hash

/// Number of entries in the encryption table (five 256-entry groups)
pub const ENCRYPTION_TABLE_SIZE: usize = 0x500;

const fn generate_encryption_table() -> [u32; ENCRYPTION_TABLE_SIZE] {
    let mut table = [0u32; ENCRYPTION_TABLE_SIZE];
    let mut seed: u32 = 0x0010_0001;

    let mut index1 = 0;
    while index1 < 0x100 {
        let mut index2 = index1;
        let mut i = 0;
        while i < 5 {
            seed = (seed * 125 + 3) % 0x002A_AAAB;
            let high = (seed & 0xFFFF) << 16;
            seed = (seed * 125 + 3) % 0x002A_AAAB;
            let low = seed & 0xFFFF;

            table[index2] = high | low;

            i += 1;
            index2 += 0x100;
        }
        index1 += 1;
    }

    table
}

/// Shared table used by the stream cipher (`0x400..0x500`) and the
/// string hash (`0x000..0x400`, one group per hash type)
pub static ENCRYPTION_TABLE: [u32; ENCRYPTION_TABLE_SIZE] = generate_encryption_table();

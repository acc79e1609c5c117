//! Cryptographic types and constants

/// Which group of the encryption table a name hash draws from
///
/// Only the four groups below exist; the fifth block of the table belongs to
/// the stream cipher and cannot be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashType(u32);

impl HashType {
    /// First table entry of this hash's group
    pub(crate) fn table_offset(self) -> usize {
        self.0 as usize * 0x100
    }

    /// Numeric value as used by the MPQ format
    pub fn value(self) -> u32 {
        self.0
    }
}

/// Hash types for MPQ operations
pub mod hash_type {
    use super::HashType;

    /// Hash for table offset calculation
    pub const TABLE_OFFSET: HashType = HashType(0);
    /// First part of filename hash
    pub const NAME_A: HashType = HashType(1);
    /// Second part of filename hash
    pub const NAME_B: HashType = HashType(2);
    /// File encryption key generation
    pub const FILE_KEY: HashType = HashType(3);
}

//! Cryptographic primitives shared by the MPQ format
//!
//! - **Stream cipher**: DWORD-oriented encryption keyed by a 32-bit seed,
//!   used for the hash and block tables, sector offset tables and sector data
//! - **String hash**: the classic MPQ hash, used here to derive a file's
//!   encryption seed from its name
//!
//! ```
//! use mpq_sectors::crypto::{decrypt_block, encrypt_block};
//!
//! let mut words = [36u32, 548, 1060];
//! encrypt_block(&mut words, 0xC1EB1CEF);
//! decrypt_block(&mut words, 0xC1EB1CEF);
//! assert_eq!(words, [36, 548, 1060]);
//! ```

mod decryption;
mod encryption;
mod hash;
mod keys;
mod types;

pub use decryption::{decrypt_block, decrypt_bytes, decrypt_dword};
pub use encryption::{encrypt_block, encrypt_bytes};
pub use hash::{file_key, hash_string, plain_name};
pub use keys::{ENCRYPTION_TABLE, ENCRYPTION_TABLE_SIZE};
pub use types::{HashType, hash_type};

//! MPQ file table structures

mod block;

pub use block::{BlockEntry, FileFlags, FileTableEntry};

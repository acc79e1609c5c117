//! Error types for sector table loading

use std::io;
use thiserror::Error;

/// Result type alias for sector table operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for sector table operations
#[derive(Error, Debug)]
pub enum Error {
    /// Seek or read on the byte source did not complete
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file uses a feature this crate does not handle
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// A loaded table failed its self-consistency checks
    #[error("Integrity check failed: {0}")]
    IntegrityFailure(String),

    /// Malformed on-disk structure
    #[error("Invalid MPQ format: {0}")]
    InvalidFormat(String),

    /// Block size shift would overflow the sector size
    #[error("Invalid block size shift: {0}")]
    InvalidBlockSize(u16),

    /// Sector index past the end of the file
    #[error("Sector {index} out of range (file has {count} sectors)")]
    SectorOutOfRange {
        /// Requested sector
        index: u32,
        /// Number of sectors in the file
        count: u32,
    },

    /// Sector lookup needs an offset table that was never loaded
    #[error("File is compressed but no sector offset table was loaded")]
    OffsetTableMissing,

    /// Encrypted sector data without a usable key
    #[error("File is encrypted but has no encryption seed")]
    MissingEncryptionKey,
}

impl Error {
    /// Create a new IntegrityFailure error
    pub fn integrity<S: Into<String>>(msg: S) -> Self {
        Error::IntegrityFailure(msg.into())
    }

    /// Create a new UnsupportedFeature error
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        Error::UnsupportedFeature(msg.into())
    }

    /// Create a new InvalidFormat error
    pub fn invalid_format<S: Into<String>>(msg: S) -> Self {
        Error::InvalidFormat(msg.into())
    }

    /// Check if this error indicates a wrong key or corrupted archive
    pub fn is_corruption(&self) -> bool {
        matches!(self, Error::IntegrityFailure(_) | Error::InvalidFormat(_))
    }

    /// Check if this error came from the byte source
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}

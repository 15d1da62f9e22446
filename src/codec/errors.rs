//! Codec error types
//!
//! Every variant here is a malformed-document condition: the blob cannot be
//! trusted as a versioned document and the read fails immediately. None of
//! these are retried.

use thiserror::Error;

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors produced while encoding or decoding a document blob
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Blob shorter than its own length field claims, or too short for a header
    #[error("blob truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// Stored checksum does not match the blob contents
    #[error("checksum mismatch: computed {computed:08x}, stored {stored:08x}")]
    ChecksumMismatch { computed: u32, stored: u32 },

    /// Unknown blob format tag
    #[error("unsupported blob format tag {0}")]
    UnsupportedFormat(u8),

    /// Unknown value tag in the document payload
    #[error("invalid value tag {0} in document payload")]
    InvalidTag(u8),

    /// A text value is not valid UTF-8
    #[error("invalid UTF-8 in text value")]
    InvalidUtf8,

    /// Trailing bytes after the document payload
    #[error("document payload has {0} trailing bytes")]
    TrailingBytes(usize),

    /// The document root is not a map
    #[error("document root must be a map, got {type_name}")]
    NotAMap { type_name: &'static str },

    /// The root map has no `entityVersion` field
    #[error("document is missing the entityVersion field")]
    MissingEntityVersion,

    /// The root `entityVersion` field is not an integer
    #[error("entityVersion must be an integer, got {type_name}")]
    NonIntegerVersion { type_name: &'static str },

    /// Header version and root field disagree
    #[error("header version {header} does not match root entityVersion {root}")]
    VersionMismatch { header: i64, root: i64 },
}

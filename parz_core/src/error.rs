//! Typed errors for the engine crate.

use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the compression and decompression engines.
///
/// Worker-origin failures are collected while the remaining workers run to
/// completion, then surfaced as a single [`Error::Compression`] whose
/// message joins every collected message with newlines under the codec's
/// name. Orchestrator-level failures (validation, capacity) are returned
/// directly.
#[derive(Debug, Error)]
pub enum Error {
    /// A subblock with an empty payload or zero uncompressed size.
    #[error("Invalid compressed subblock data.")]
    InvalidSubblock,

    /// Decompression destination smaller than the list's total size.
    #[error("Insufficient uncompression buffer length (required {required}, available {available})")]
    InsufficientBuffer { required: u64, available: u64 },

    /// A subblock payload whose recomputed hash differs from the stored one.
    #[error("Sub-block checksum mismatch (offset={offset}, expected {expected:x}, got {got:x})")]
    ChecksumMismatch { offset: u64, expected: u64, got: u64 },

    /// The codec's `uncompress_block` returned the failure sentinel.
    #[error("Failed to uncompress subblock data (offset={offset}, usize={uncompressed_size}, csize={compressed_size})")]
    CodecFailure {
        offset: u64,
        uncompressed_size: u64,
        compressed_size: u64,
    },

    /// A decode produced a different byte count than the subblock recorded.
    #[error("Uncompressed subblock size mismatch (offset={offset}, expected {expected}, got {got})")]
    SizeMismatch { offset: u64, expected: u64, got: u64 },

    /// A worker failed to allocate its working buffer.
    #[error("Out of memory")]
    OutOfMemory,

    /// A fault that escaped a worker without a typed cause.
    #[error("{0}")]
    Unknown(String),

    /// Aggregate of every worker failure from one engine call.
    #[error("{algorithm} compression: {}", join_messages(.errors))]
    Compression {
        algorithm: &'static str,
        errors: Vec<Error>,
    },

    /// Malformed PARZ1 container bytes.
    #[error("Invalid container data: {0}")]
    InvalidContainer(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn join_messages(errors: &[Error]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

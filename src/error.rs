//! Error types for trace scanning

use std::io;
use thiserror::Error;

/// Result type for scan operations
pub type Result<T> = std::result::Result<T, ScanError>;

/// Errors that can occur while scanning a trace
#[derive(Debug, Error)]
pub enum ScanError {
    /// A return event arrived while the call stack was empty
    #[error("Return without matching enter at line {line}: corrupt stack or trace output not enabled")]
    CorruptTrace { line: usize },

    /// An address was allocated twice without a free in between
    #[error("Address 0x{address:x} allocated again at line {line} (still outstanding from line {first_line})")]
    DuplicateAllocation {
        address: u64,
        line: usize,
        first_line: usize,
    },

    /// An address was freed that was never seen as allocated
    #[error("Free of untracked address 0x{address:x} at line {line}")]
    UnknownFree { address: u64, line: usize },

    /// Failed to read the trace
    #[error("Failed to read trace: {0}")]
    Io(#[from] io::Error),

    /// A configured marker or keyword could not be compiled
    #[error("Invalid trace pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl ScanError {
    /// Input line the error refers to, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            ScanError::CorruptTrace { line }
            | ScanError::DuplicateAllocation { line, .. }
            | ScanError::UnknownFree { line, .. } => Some(*line),
            ScanError::Io(_) | ScanError::Pattern(_) => None,
        }
    }
}

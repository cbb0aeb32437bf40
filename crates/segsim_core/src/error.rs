//! Error types for the segsim core engine.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur in engine operations.
///
/// All failures are local and recoverable: a failed write or failed
/// reclamation leaves every store invariant intact.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No segment can satisfy a write, even after one reclamation
    /// attempt. The request is dropped; store counters are unchanged.
    #[error("no space for write at offset {offset} (size {size} bytes)")]
    NoSpace {
        /// Requested intra-segment offset.
        offset: usize,
        /// Requested write size in bytes.
        size: usize,
    },

    /// Configuration failed validation.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the invalid setting.
        message: String,
    },
}

impl EngineError {
    /// Creates an invalid-configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

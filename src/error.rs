//! Unified error handling for the beacon crate
//!
//! Domain errors live next to their modules ([`ProbeError`], [`SinkError`],
//! [`StoreError`]). This module wraps the ones that can cross module
//! boundaries into a single [`Error`] and classifies them.
//!
//! # Usage
//!
//! ```rust,ignore
//! use beacon::error::{BeaconErrorTrait, Error};
//!
//! fn report(err: &Error) {
//!     if err.is_recoverable() {
//!         tracing::warn!(category = ?err.category(), "Tick failed, next tick retries: {err}");
//!     } else {
//!         tracing::error!(category = ?err.category(), "Tick failed: {err}");
//!     }
//! }
//! ```

use thiserror::Error;

pub use crate::probe::ProbeError;
pub use crate::sink::SinkError;
pub use crate::storage::StoreError;

/// Common trait for beacon error types
pub trait BeaconErrorTrait: std::error::Error {
    /// Check if this error is recoverable (a later tick may succeed)
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (HTTP, UDP, timeout)
    Network,
    /// Chat platform errors
    Platform,
    /// Storage and I/O errors
    Storage,
}

impl ErrorCategory {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Platform => "platform",
            Self::Storage => "storage",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unified error type for the beacon crate
#[derive(Error, Debug)]
pub enum Error {
    /// Destination channel could not be resolved; the tick is void
    #[error("Destination channel unavailable: {0}")]
    ChannelUnavailable(#[source] SinkError),

    /// Chat platform errors other than channel resolution
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// Probe client construction errors
    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    /// Artifact record persistence errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl BeaconErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::ChannelUnavailable(_) => true, // next tick resolves again
            Self::Sink(e) => !matches!(e, SinkError::PermissionDenied(_)),
            Self::Probe(e) => e.is_transient(),
            Self::Store(_) => true,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::ChannelUnavailable(_) | Self::Sink(_) => ErrorCategory::Platform,
            Self::Probe(_) => ErrorCategory::Network,
            Self::Store(_) => ErrorCategory::Storage,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

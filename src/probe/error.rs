//! Error types for the probe module
//!
//! None of these escape [`Prober::probe`](super::Prober::probe); they exist so
//! the failure that produced an "unreachable" snapshot can be logged precisely.

use thiserror::Error;

/// Result type for probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that can occur while querying a game server
#[derive(Error, Debug)]
pub enum ProbeError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Status API answered with a non-success status code
    #[error("Status API returned HTTP {0}")]
    Status(u16),

    /// No answer within the configured timeout
    #[error("Query timed out after {0} ms")]
    Timeout(u64),

    /// Socket or name resolution error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Response could not be decoded
    #[error("Malformed response: {0}")]
    Decode(String),

    /// Address did not resolve to anything
    #[error("Address did not resolve: {0}")]
    Unresolved(String),

    /// Protocol kind has no query transport
    #[error("Unsupported protocol kind")]
    UnsupportedKind,
}

impl ProbeError {
    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Check if this error is transient (a later query may succeed)
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout(_) | Self::Io(_) | Self::Unresolved(_) => true,
            Self::Status(code) => *code >= 500 || *code == 429,
            Self::Decode(_) | Self::UnsupportedKind => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ProbeError::Timeout(500).is_transient());
        assert!(ProbeError::Status(503).is_transient());
        assert!(ProbeError::Status(429).is_transient());
        assert!(!ProbeError::Status(404).is_transient());
        assert!(!ProbeError::decode("bad magic").is_transient());
        assert!(!ProbeError::UnsupportedKind.is_transient());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ProbeError::Timeout(1500).to_string(),
            "Query timed out after 1500 ms"
        );
        assert_eq!(
            ProbeError::Status(502).to_string(),
            "Status API returned HTTP 502"
        );
    }
}

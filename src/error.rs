//! Error types for h1-surge

use thiserror::Error as ThisError;

/// Core error type
///
/// A worker's connection cycle ends on `Connect`, `TlsHandshake`, or
/// `Write`; all three are local to one worker and non-fatal to the
/// overall run.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// TCP connect failure (DNS failure, refused, timeout)
    #[error("connection error: {0}")]
    Connect(std::io::Error),

    /// TLS handshake failure
    #[error("TLS handshake error: {0}")]
    TlsHandshake(std::io::Error),

    /// Write failure on an open connection (peer reset, broken pipe)
    #[error("write error: {0}")]
    Write(std::io::Error),

    /// Target host is not a valid server name for TLS verification
    #[error("invalid server name {0:?} for TLS hostname verification")]
    InvalidServerName(String),
}

impl Error {
    /// Configuration error from any displayable message
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Error for a missing required builder field
    pub fn missing_config(field: &str) -> Self {
        Error::Config(format!("missing required field: {field}"))
    }

    /// Whether this error terminated a connection attempt (as opposed to
    /// rejecting a configuration).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Connect(_) | Error::TlsHandshake(_) | Error::Write(_)
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_message() {
        let err = Error::missing_config("target");
        assert!(err.to_string().contains("target"));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_transport_classification() {
        let io = || std::io::Error::from(std::io::ErrorKind::ConnectionRefused);
        assert!(Error::Connect(io()).is_transport());
        assert!(Error::TlsHandshake(io()).is_transport());
        assert!(Error::Write(io()).is_transport());
        assert!(!Error::InvalidServerName("..".into()).is_transport());
    }
}

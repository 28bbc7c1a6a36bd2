//! Error types for the Nextcloud client.
//!
//! Application-level failures (a well-formed response whose status does not
//! match the operation's success rule) are *not* errors: they come back as a
//! classified response with `is_ok == false`. Only the conditions below are
//! raised.

use thiserror::Error;

/// Convenience alias.
pub type NextcloudResult<T> = Result<T, NextcloudError>;

/// Unified error type for all client operations.
#[derive(Debug, Error)]
pub enum NextcloudError {
    /// DNS / TCP / TLS failure while talking to the server.
    #[error("Failed to establish connection to NextCloud ({url}): {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Local input rejected before any request was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The response body could not be decoded for the requested output mode.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A WebDAV verb outside the success-code table.
    #[error("WebDAV verb '{0}' has no success-code mapping")]
    UnmappedVerb(String),

    /// Client configuration is missing or inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local filesystem error during upload / download.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NextcloudError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Wrap a transport error, keeping the URL it was aimed at.
    pub fn connection(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Connection {
            url: url.into(),
            source,
        }
    }

    /// The target URL of a connection failure.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Connection { url, .. } => Some(url),
            _ => None,
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

impl From<serde_json::Error> for NextcloudError {
    fn from(e: serde_json::Error) -> Self {
        NextcloudError::Decode(e.to_string())
    }
}

impl From<quick_xml::Error> for NextcloudError {
    fn from(e: quick_xml::Error) -> Self {
        NextcloudError::Decode(format!("XML parse error: {}", e))
    }
}

/// Convert NextcloudError to a String for callers that surface plain messages.
impl From<NextcloudError> for String {
    fn from(e: NextcloudError) -> Self {
        e.to_string()
    }
}

//! Error type shared by the transport and every resource service

use thiserror::Error;

/// Errors returned by Concerto API calls
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (connection, TLS, timeout...)
    #[error("{0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server answered with a status outside the 2xx range
    #[error("HTTP request failed: ({code}) {message}")]
    Status { code: u16, message: String },

    /// The response body was not the JSON we expected
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The transport could not be built from the current configuration
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A mutating request was attempted while running read-only
    #[error("read-only mode: refusing {method} {path}")]
    ReadOnly { method: &'static str, path: String },
}

impl ApiError {
    /// Wrap any error raised below the HTTP layer
    pub fn transport<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Transport(error.into())
    }

    /// Numeric status code, when the server answered
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_mentions_code() {
        let err = ApiError::Status {
            code: 422,
            message: "name: can't be blank".to_string(),
        };
        assert_eq!(err.status_code(), Some(422));
        assert!(err.to_string().contains("422"));
        assert!(err.to_string().contains("can't be blank"));
    }

    #[test]
    fn test_transport_error_displays_verbatim() {
        let err = ApiError::transport("connection refused");
        assert_eq!(err.to_string(), "connection refused");
        assert_eq!(err.status_code(), None);
    }
}

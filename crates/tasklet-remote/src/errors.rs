//! Error types for the task API client.

use thiserror::Error;

/// Failures talking to the task API.
///
/// Non-2xx statuses are not errors at this layer; they come back as an
/// [`ApiResponse`](crate::ApiResponse) without a body.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Transport failure: connect, timeout, or reading the body.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A successful response whose body is not the expected JSON.
    #[error("failed to decode response (status {status}): {source}")]
    Decode {
        /// HTTP status of the response.
        status: u16,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL cannot be parsed or joined.
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
}

/// Convenience type alias for client results.
pub type Result<T> = std::result::Result<T, RemoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_mentions_status() {
        let source = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = RemoteError::Decode { status: 200, source };
        assert!(err.to_string().contains("status 200"));
    }

    #[test]
    fn invalid_base_url_display() {
        let err = RemoteError::InvalidBaseUrl("::".into());
        assert_eq!(err.to_string(), "invalid base url: ::");
    }
}

//! Error types for remote store access

use thiserror::Error;

/// Errors that can occur when talking to the remote store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The request could not be sent or the response could not be read
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote store answered with a non-success status
    #[error("Remote store rejected request ({status}): {body}")]
    Rejected {
        /// HTTP status code of the response
        status: u16,
        /// Response body, kept as diagnostic text
        body: String,
    },

    /// The configured base URL cannot be used to build requests
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl StoreError {
    /// Returns true if the error came from the server rather than the transport
    pub fn is_rejection(&self) -> bool {
        matches!(self, StoreError::Rejected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_message_contains_status_and_body() {
        let err = StoreError::Rejected {
            status: 404,
            body: "key not found".to_string(),
        };

        let message = err.to_string();
        assert!(message.contains("404"));
        assert!(message.contains("key not found"));
        assert!(err.is_rejection());
    }

    #[test]
    fn test_invalid_base_url_is_not_a_rejection() {
        let err = StoreError::InvalidBaseUrl {
            url: "nope".to_string(),
            reason: "relative URL without a base".to_string(),
        };

        assert!(!err.is_rejection());
        assert!(err.to_string().contains("nope"));
    }
}

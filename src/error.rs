//! Classified failures of a single backend exchange.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of one request. `Display` is the user-facing message shown in
/// the search error state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// HTTP 503
    #[error("Search service is temporarily unavailable. Please try again later.")]
    ServiceUnavailable,

    /// HTTP 500
    #[error("Internal server error. Please check your search query and try again.")]
    InternalError,

    /// Any other non-2xx status
    #[error("Search failed with status {0}.")]
    HttpError(u16),

    /// DNS, refused connection, timeout, body read failure
    #[error("{0}")]
    TransportError(String),
}

impl FetchError {
    /// Map a non-success status to its class. Returns `None` for 2xx.
    pub fn from_status(status: StatusCode) -> Option<Self> {
        if status.is_success() {
            return None;
        }
        Some(match status {
            StatusCode::SERVICE_UNAVAILABLE => Self::ServiceUnavailable,
            StatusCode::INTERNAL_SERVER_ERROR => Self::InternalError,
            other => Self::HttpError(other.as_u16()),
        })
    }

    pub fn transport(err: &reqwest::Error) -> Self {
        Self::TransportError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_is_not_classified() {
        assert_eq!(FetchError::from_status(StatusCode::OK), None);
        assert_eq!(FetchError::from_status(StatusCode::NO_CONTENT), None);
    }

    #[test]
    fn test_service_unavailable_message() {
        let err = FetchError::from_status(StatusCode::SERVICE_UNAVAILABLE).unwrap();
        assert_eq!(err, FetchError::ServiceUnavailable);
        assert_eq!(
            err.to_string(),
            "Search service is temporarily unavailable. Please try again later."
        );
    }

    #[test]
    fn test_internal_error_message() {
        let err = FetchError::from_status(StatusCode::INTERNAL_SERVER_ERROR).unwrap();
        assert_eq!(
            err.to_string(),
            "Internal server error. Please check your search query and try again."
        );
    }

    #[test]
    fn test_other_status_carries_code() {
        let err = FetchError::from_status(StatusCode::NOT_FOUND).unwrap();
        assert_eq!(err, FetchError::HttpError(404));
        assert_eq!(err.to_string(), "Search failed with status 404.");
    }

    #[test]
    fn test_transport_error_passes_message_through() {
        let err = FetchError::TransportError("connection refused".to_string());
        assert_eq!(err.to_string(), "connection refused");
    }
}

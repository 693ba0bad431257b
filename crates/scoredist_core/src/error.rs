//! Errors surfaced to the user.
//!
//! Only a failed load is an error. Malformed-but-usable snapshots are
//! recorded as [`crate::model::DataAnomaly`] values on the series, and
//! zero-denominator ratios resolve to [`crate::ratio::SENTINEL_RATIO`].

/// A failed series load. Any variant invalidates the whole series.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("backend returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("invalid snapshot date {value:?}")]
    InvalidDate { value: String },
}

impl FetchError {
    /// Short text for the blocking error panel.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Transport(_) => "Failed to load: backend unreachable".to_string(),
            FetchError::Status { status, .. } => format!("Failed to load: backend error {status}"),
            FetchError::Decode(_) | FetchError::InvalidDate { .. } => {
                "Failed to load: unexpected response".to_string()
            }
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_from_serde() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let fetch: FetchError = err.into();
        assert!(matches!(fetch, FetchError::Decode(_)));
        assert_eq!(fetch.user_message(), "Failed to load: unexpected response");
    }

    #[test]
    fn test_status_message() {
        let err = FetchError::Status {
            status: 502,
            message: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "backend returned status 502: bad gateway");
        assert_eq!(err.user_message(), "Failed to load: backend error 502");
    }
}

use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by the API client and query cache.
///
/// There is no retryable/fatal split: callers decide whether to ask again.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error ({status}): {message}")]
    Api { status: StatusCode, message: String },
    #[error("request rejected by server: {message}")]
    Rejected { message: String },
    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        source: serde_json::Error,
    },
    #[error("response carried no {what}")]
    MissingData { what: &'static str },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    pub fn api(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    pub fn decode(what: &'static str, source: serde_json::Error) -> Self {
        Self::Decode { what, source }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Message suitable for a one-line notification.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } | ClientError::Rejected { message } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

/// Subscriber-visible copy of a refetch failure.
///
/// `ClientError` wraps non-cloneable sources, so watch channels carry this
/// rendered form instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub message: String,
}

impl From<&ClientError> for FetchFailure {
    fn from(err: &ClientError) -> Self {
        Self {
            message: err.user_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_strips_status_for_api_errors() {
        let err = ClientError::api(StatusCode::CONFLICT, "milestone already exists");
        assert_eq!(err.user_message(), "milestone already exists");
        assert_eq!(
            err.to_string(),
            "api error (409 Conflict): milestone already exists"
        );
    }

    #[test]
    fn fetch_failure_renders_other_errors_in_full() {
        let err = ClientError::invalid_input("title is required");
        let failure = FetchFailure::from(&err);
        assert_eq!(failure.message, "invalid input: title is required");
    }
}

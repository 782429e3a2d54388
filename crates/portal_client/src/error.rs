use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("request failed ({status}): {message}")]
    Status { status: StatusCode, message: String },

    /// The server answered 2xx with `success: false`.
    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("request cancelled")]
    Cancelled,

    #[error("not signed in: no bearer token stored (run `examiner token set <TOKEN>`)")]
    MissingToken,

    #[error("bearer token contains characters not allowed in a header")]
    InvalidToken,

    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),

    #[error("api base url cannot carry a path: {0}")]
    NotABaseUrl(String),

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error("token store: {0}")]
    TokenStore(#[from] std::io::Error),

    #[error("form definition: {0}")]
    Form(#[from] forms::FormError),
}

impl ClientError {
    /// Cancelled requests are not failures and are dropped without a notice.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_cancellation_is_cancelled() {
        assert!(ClientError::Cancelled.is_cancelled());
        assert!(!ClientError::Rejected("nope".into()).is_cancelled());
        let status = ClientError::Status {
            status: StatusCode::BAD_GATEWAY,
            message: "upstream".into(),
        };
        assert!(!status.is_cancelled());
        assert_eq!(status.status(), Some(StatusCode::BAD_GATEWAY));
    }
}

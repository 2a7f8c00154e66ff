use thiserror::Error;

/// Failure of a single backend call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (unreachable host, aborted fetch...).
    #[error("{0}")]
    Network(String),

    /// A response arrived with a non-2xx status and no usable error body.
    #[error("HTTP {0}")]
    Status(u16),

    /// A response arrived but its body was not what the contract promises.
    #[error("invalid response: {0}")]
    Decode(String),

    /// A well-formed reply carrying an `error` field.
    #[error("{0}")]
    Application(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Application,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Application(_) => ErrorKind::Application,
            ApiError::Network(_) | ApiError::Status(_) | ApiError::Decode(_) => {
                ErrorKind::Transport
            }
        }
    }

    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ApiError::Status(status.as_u16()),
            None if err.is_decode() => ApiError::Decode(err.to_string()),
            None => ApiError::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_failures() {
        assert_eq!(ApiError::Status(500).kind(), ErrorKind::Transport);
        assert_eq!(ApiError::Network("offline".into()).kind(), ErrorKind::Transport);
        assert_eq!(ApiError::Decode("eof".into()).kind(), ErrorKind::Transport);
        assert_eq!(
            ApiError::Application("Task not found".into()).kind(),
            ErrorKind::Application
        );
        assert!(ApiError::Decode("eof".into()).is_transport());
        assert!(!ApiError::Application("Task not found".into()).is_transport());
    }

    #[test]
    fn status_message_matches_inline_error_text() {
        assert_eq!(ApiError::Status(404).to_string(), "HTTP 404");
        assert_eq!(ApiError::Application("Database error".into()).to_string(), "Database error");
    }
}

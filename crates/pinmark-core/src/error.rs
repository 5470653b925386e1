use thiserror::Error;

/// Everything that can go wrong talking to the bookmark service.
///
/// The engine never lets one of these escape: it stores the `Display` text
/// as the session's last error and carries on with an empty result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("API token is not configured")]
    MissingToken,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("server returned HTTP {status}")]
    Http { status: u16 },

    #[error("malformed response: {0}")]
    Parse(String),

    #[error("bookmark was not saved (result code: {0})")]
    WriteRejected(String),
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => FetchError::Http {
                status: status.as_u16(),
            },
            None => FetchError::Transport(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Parse(e.to_string())
    }
}

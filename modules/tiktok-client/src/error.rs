use thiserror::Error;

pub type Result<T> = std::result::Result<T, TikTokError>;

#[derive(Debug, Error)]
pub enum TikTokError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    /// TikTok answers with an empty 200 body when the msToken is stale or the
    /// request looks automated. Distinct from Parse so callers can tell a bad
    /// credential from a schema change.
    #[error("Empty response body from {0} (msToken rejected?)")]
    EmptyBody(String),

    #[error("Invalid proxy URL: {0}")]
    Proxy(String),

    #[error("Hashtag not found: {0}")]
    HashtagNotFound(String),
}

impl From<reqwest::Error> for TikTokError {
    fn from(err: reqwest::Error) -> Self {
        TikTokError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for TikTokError {
    fn from(err: serde_json::Error) -> Self {
        TikTokError::Parse(err.to_string())
    }
}

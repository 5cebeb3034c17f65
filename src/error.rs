//! Error types for the library sync engine.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the sync engine.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Emby server not configured. Set EMBY_SERVER_URL and EMBY_API_KEY")]
    EmbyNotConfigured,

    #[error("TMDB API key not configured. Set TMDB_API_KEY environment variable")]
    TmdbApiKeyMissing,

    #[error("Telegram not configured. Set TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID")]
    TelegramNotConfigured,

    // Catalog errors
    #[error("Catalog fetch aborted: {0}")]
    FetchAborted(String),

    #[error("Detail fetch failed for {0}")]
    DetailFetchFailed(String),

    #[error("Invalid library key: {0}")]
    InvalidLibraryKey(String),

    // Request errors
    #[error("Request not found: {0}")]
    RequestNotFound(String),

    #[error("Request already open for {0}")]
    DuplicateRequest(String),

    // Notification errors
    #[error("Notification failed: {0}")]
    NotificationFailed(String),

    // State store errors
    #[error("State store error: {0}")]
    Store(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}

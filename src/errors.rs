use thiserror::Error;

/// All errors that can occur while talking to Synthesia or running a command.
#[derive(Error, Debug)]
pub enum SynthesiaError {
    /// The API key is missing or rejected (HTTP 401).
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// The requested video does not exist (HTTP 404).
    #[error("not found: {message}")]
    NotFound { message: String },

    /// Any other non-success response, with the HTTP status and body.
    #[error("API error {status_code}: {message}")]
    Api {
        status_code: u16,
        message: String,
        body: Option<serde_json::Value>,
    },

    /// A transport-level HTTP error from reqwest.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Local file system failure (scripts, downloads, credentials).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The credentials file still holds the placeholder key.
    #[error("valid API key not found in {0}; store one with `-a <key>`")]
    MissingApiKey(String),

    #[error("configuration error: {0}")]
    Config(String),

    /// Bad command-line arguments.
    #[error("{0}")]
    Usage(String),

    /// A 1-based index outside the freshly fetched list, or one rejected
    /// before any list was fetched (`len` is then `None`).
    #[error("video index {index} is out of range ({})", range_hint(.len))]
    InvalidIndex { index: i64, len: Option<usize> },

    #[error("no .docx scripts found in {0}")]
    NoScripts(String),

    /// Download requested for a video that has not finished rendering.
    #[error("video {id} is still {status}, can't download right now")]
    NotComplete { id: String, status: String },

    /// A complete video without the expected asset URL.
    #[error("missing field in response: {0}")]
    MissingField(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The operator declined a confirmation prompt.
    #[error("aborted: {0}")]
    Aborted(String),

    #[error("prompt failed: {0}")]
    Prompt(String),

    /// Polling exceeded the configured maximum wait.
    #[error("video {id} not complete after {waited:?}")]
    Timeout {
        id: String,
        waited: std::time::Duration,
    },
}

fn range_hint(len: &Option<usize>) -> String {
    match len {
        Some(len) => format!("list has {len} entries"),
        None => "indices start at 1".to_string(),
    }
}

/// A convenience alias for `Result<T, SynthesiaError>`.
pub type Result<T> = std::result::Result<T, SynthesiaError>;

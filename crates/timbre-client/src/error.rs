/// Client-specific result type
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors from the timbre client
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("server returned {status}: {detail}")]
    Api {
        /// HTTP status code
        status: u16,
        /// The `detail` message from the error body
        detail: String,
    },

    /// Failed to parse a response
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Local file error
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
}

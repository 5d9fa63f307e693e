use thiserror::Error;

/// Unified error type for release-notes operations
#[derive(Error, Debug)]
pub enum ReleaseNotesError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Release data error: {0}")]
    Data(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-notes
pub type Result<T> = std::result::Result<T, ReleaseNotesError>;

impl ReleaseNotesError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseNotesError::Config(msg.into())
    }

    /// Create a release data error with context
    pub fn data(msg: impl Into<String>) -> Self {
        ReleaseNotesError::Data(msg.into())
    }

    /// Create a render error with context
    pub fn render(msg: impl Into<String>) -> Self {
        ReleaseNotesError::Render(msg.into())
    }

    /// Create a server error with context
    pub fn server(msg: impl Into<String>) -> Self {
        ReleaseNotesError::Server(msg.into())
    }
}

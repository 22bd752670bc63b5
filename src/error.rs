use thiserror::Error;

/// Unified error type for gitver operations
#[derive(Error, Debug)]
pub enum GitVerError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Project file error: {0}")]
    Descriptor(String),

    #[error("Invalid commit timestamp: {0}")]
    Timestamp(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in gitver
pub type Result<T> = std::result::Result<T, GitVerError>;

impl GitVerError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitVerError::Config(msg.into())
    }

    /// Create a project file error with context
    pub fn descriptor(msg: impl Into<String>) -> Self {
        GitVerError::Descriptor(msg.into())
    }

    /// Create a timestamp error with context
    pub fn timestamp(msg: impl Into<String>) -> Self {
        GitVerError::Timestamp(msg.into())
    }
}

use thiserror::Error;

/// Main error type for simulator operations
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to bind port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("Object directory error: {0}")]
    Directory(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Invalid lifecycle state: {0}")]
    InvalidState(String),
}

/// Result type alias for simulator operations
pub type SimResult<T> = Result<T, SimError>;

use thiserror::Error;

/// All errors produced by the incli crates.
#[derive(Error, Debug)]
pub enum IncliError {
    /// Conflicting or insufficient selector flags. Raised before any request.
    #[error("Invalid arguments: {0}")]
    InvalidArgument(String),

    /// Transport failure or a non-success response from the API.
    #[error("Remote request failed: {message}")]
    Remote {
        /// HTTP status code, when the server answered at all.
        status: Option<u16>,
        message: String,
    },

    /// A listing endpoint handed back a cursor it had already returned.
    #[error("Pagination loop detected: cursor {cursor:?} was returned twice")]
    PaginationLoop { cursor: String },

    /// A point or name lookup matched nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A lookup that must resolve to exactly one record matched several.
    #[error("Ambiguous {what}: {count} matches")]
    Ambiguous { what: String, count: usize },

    /// Output could not be encoded.
    #[error("Failed to serialize output: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for raw I/O errors (stdout, terminal, config file).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl IncliError {
    /// Shorthand for a [`IncliError::Remote`] without a status code.
    pub fn remote(message: impl Into<String>) -> Self {
        IncliError::Remote {
            status: None,
            message: message.into(),
        }
    }

    /// Shorthand for an [`IncliError::InvalidArgument`].
    pub fn invalid(message: impl Into<String>) -> Self {
        IncliError::InvalidArgument(message.into())
    }
}

/// Convenience alias used throughout the incli crates.
pub type Result<T> = std::result::Result<T, IncliError>;

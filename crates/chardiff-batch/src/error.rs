use std::fmt;
use std::path::PathBuf;

/// Errors that can occur while loading or comparing a table.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// Reading or writing a file failed.
    #[error("i/o error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The table is not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// The JSON parsed but does not describe a table.
    #[error("invalid table: {0}")]
    InvalidTable(String),

    /// A requested column is not in the table header.
    #[error("column not found: '{column}' (available: {})", .available.join(", "))]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    /// A required setting was not provided by config or flags.
    #[error("missing setting: {0}")]
    MissingSetting(&'static str),

    /// The worker pool could not be created.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl BatchError {
    /// Create an I/O error tagged with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid-table error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidTable(message.into())
    }
}

impl PartialEq for BatchError {
    fn eq(&self, other: &Self) -> bool {
        // Compare by display representation for test convenience.
        fmt::format(format_args!("{self}")) == fmt::format(format_args!("{other}"))
    }
}

/// Convenience alias for batch results.
pub type BatchResult<T> = Result<T, BatchError>;

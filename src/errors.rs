use thiserror::Error;

/// Errors raised by the in-memory dictionary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DictError {
    #[error("Word not found in the dictionary")]
    NotFound,
}

/// Errors raised while reading or writing the word database snapshot.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot root is not a JSON object")]
    NotAnObject,
}

/// Errors raised while loading `config.json`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

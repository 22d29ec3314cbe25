use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed catalog document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Topic id `{id}` appears more than once")]
    DuplicateTopic { id: String },
    #[error("Topic `{topic}` has no lessons")]
    EmptyTopic { topic: String },
    #[error("Quiz `{quiz}` in topic `{topic}` needs at least two options, found {found}")]
    TooFewOptions {
        topic: String,
        quiz: String,
        found: usize,
    },
    #[error("Quiz `{quiz}` in topic `{topic}` marks option {index} as correct but has {options} options")]
    AnswerOutOfRange {
        topic: String,
        quiz: String,
        index: usize,
        options: usize,
    },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O failed on `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Storage document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable `{name}` is not valid unicode")]
    NotUnicode { name: &'static str },
}

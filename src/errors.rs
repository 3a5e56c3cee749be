use std::path::PathBuf;
use thiserror::Error;

/// A line of graph input that could not be turned into a record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("NODE declaration without a name")]
    MissingNodeName,
    #[error("EDGE declaration needs source|relation|destination, got {line:?}")]
    MissingPipe { line: String },
    #[error("line is not valid UTF-8 (invalid byte at offset {offset})")]
    InvalidUtf8 { offset: usize },
}

/// Recoverable query failure. Empty results are not errors; see the outcome enums in `crate::query`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Node not found: {0}")]
    UnknownNode(String),
}

#[derive(Debug, Error)]
pub enum NexusError {
    #[error("Could not open graph file {path}: {source}")]
    SourceUnavailable { path: PathBuf, source: std::io::Error },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("JSON encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

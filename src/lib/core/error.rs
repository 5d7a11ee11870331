//! Error types for the radalign library

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RadalignError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("{name} executable not found in user PATH")]
    ExecutableNotFound { name: String },

    #[error("Cannot write to output directory {}: {reason}", path.display())]
    NotWritable { path: PathBuf, reason: String },

    #[error("No input {mate} fastQ files found in {}", dir.display())]
    NoInputFiles { mate: String, dir: PathBuf },

    #[error("Found {forward} R1 files but {reverse} R2 files; mates cannot be paired")]
    PairCountMismatch { forward: usize, reverse: usize },

    #[error(
        "Thread validation error: {requested} threads requested, only {available} threads available on host"
    )]
    Oversubscribed { requested: usize, available: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RadalignError>;

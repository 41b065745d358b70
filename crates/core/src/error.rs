// crates/core/src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading persisted data files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Data file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Permission denied reading file: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {message}")]
    MalformedJson { path: PathBuf, message: String },

    #[error("Malformed table in {path} at line {line}: {message}")]
    MalformedTable {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Empty data file: {path}")]
    EmptyFile { path: PathBuf },
}

impl LoadError {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }

    pub fn malformed_json(path: impl Into<PathBuf>, err: &serde_json::Error) -> Self {
        Self::MalformedJson {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

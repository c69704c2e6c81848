//! Error types for the ingestion pipeline.
//!
//! Per-file errors ([`DecodeError`], [`FileError`]) are logged and the file
//! is skipped. Per-run errors ([`MineError`]) end the run.

use std::path::PathBuf;
use thiserror::Error;

/// Tags could not be read from one file.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file could not be opened.
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file was opened but its tag data is unreadable or malformed.
    #[error("cannot read tags from {path}: {message}")]
    Malformed { path: PathBuf, message: String },
}

/// Failure while ingesting one file.
#[derive(Debug, Error)]
pub enum FileError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// An upsert by name succeeded but the follow-up lookup found no row.
    #[error("{entity} {name:?} missing right after upsert")]
    LookupInconsistency { entity: &'static str, name: String },

    /// The store failed while handling this file. Not isolated per file.
    #[error(transparent)]
    Store(#[from] rolas_core::Error),
}

/// Errors that end an ingestion run.
///
/// Tracks inserted before the error stay in the store.
#[derive(Debug, Error)]
pub enum MineError {
    /// Opening the store, creating the schema or running a statement failed.
    #[error("store error: {0}")]
    Store(#[from] rolas_core::Error),

    /// Directory traversal failed (permissions, I/O).
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// The ingestion worker stopped abnormally.
    #[error("ingestion aborted: {0}")]
    Aborted(String),
}

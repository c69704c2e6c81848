use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::model::ids::AlbumId;

/// An album as first seen during ingestion.
///
/// Albums are keyed by name only: `year` and `path` belong to the first
/// track ingested under that name and are never revised afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub name: String,
    pub year: i32,
    /// Directory the first track of the album was found in.
    pub path: PathBuf,
}

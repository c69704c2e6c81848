use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::model::ids::{AlbumId, PerformerId, TrackId};

/// A track row ready to be inserted. Both referenced rows must already exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrack {
    pub performer_id: PerformerId,
    pub album_id: AlbumId,
    /// Absolute path of the audio file; the ingestion dedup key.
    pub path: PathBuf,
    pub title: String,
    pub track_number: u32,
    pub year: i32,
    pub genre: String,
}

/// A track joined with its performer and album names.
///
/// This is the row shape returned by both the full listing and the
/// filter-query search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackView {
    pub id: TrackId,
    pub title: String,
    pub performer: String,
    pub album: String,
    pub year: i32,
    pub genre: String,
    pub track_number: u32,
}

//! Canonical defaults for absent tag fields.
//!
//! Every field falls back to `"Unknown"` except the album, which falls back
//! to the name of the directory holding the file. Year falls back to the
//! year of ingestion and the track number to 1.

use std::path::Path;

use crate::tags::RawTags;

pub const UNKNOWN: &str = "Unknown";

/// Tag values with every absent field replaced by its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTrack {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: i32,
    pub genre: String,
    pub track_number: u32,
    pub total_tracks: u32,
}

/// Apply the per-field defaults to raw tags.
///
/// A text field that is empty or only whitespace counts as absent.
pub fn normalize(raw: RawTags, fallback_album: &str, current_year: i32) -> NormalizedTrack {
    NormalizedTrack {
        title: or_default(raw.title, UNKNOWN),
        artist: or_default(raw.artist, UNKNOWN),
        album: or_default(raw.album, fallback_album),
        year: if raw.year == 0 { current_year } else { raw.year },
        genre: or_default(raw.genre, UNKNOWN),
        track_number: if raw.track_number == 0 {
            1
        } else {
            raw.track_number
        },
        total_tracks: raw.total_tracks,
    }
}

/// Name of the directory that directly contains `path`, used as the album
/// fallback. `"Unknown"` when the path has no named parent.
pub fn album_fallback(path: &Path) -> String {
    path.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn or_default(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value
    }
}

use lofty::file::TaggedFileExt;
use lofty::tag::Accessor;
use std::fs::File;
use std::path::Path;

use crate::error::DecodeError;

/// Tag values as stored in a file. Empty strings and zeros mean "absent".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTags {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: i32,
    pub genre: String,
    pub track_number: u32,
    pub total_tracks: u32,
}

/// Reads embedded tags from an audio file.
///
/// Implementations acquire and release any file handle within one call.
pub trait TagReader {
    fn read_tags(&self, path: &Path) -> Result<RawTags, DecodeError>;
}

/// Tag reader backed by `lofty`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTagReader;

impl TagReader for LoftyTagReader {
    fn read_tags(&self, path: &Path) -> Result<RawTags, DecodeError> {
        let mut file = File::open(path).map_err(|source| DecodeError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let tagged_file = lofty::read_from(&mut file).map_err(|e| DecodeError::Malformed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let Some(tag) = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag())
        else {
            log::debug!("No tags in {}", path.display());
            return Ok(RawTags::default());
        };

        Ok(RawTags {
            title: tag.title().map(|s| s.to_string()).unwrap_or_default(),
            artist: tag.artist().map(|s| s.to_string()).unwrap_or_default(),
            album: tag.album().map(|s| s.to_string()).unwrap_or_default(),
            year: tag
                .year()
                .and_then(|y| i32::try_from(y).ok())
                .unwrap_or_default(),
            genre: tag.genre().map(|s| s.to_string()).unwrap_or_default(),
            track_number: tag.track().unwrap_or_default(),
            total_tracks: tag.track_total().unwrap_or_default(),
        })
    }
}

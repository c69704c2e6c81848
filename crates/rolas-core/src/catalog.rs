use rusqlite::{OptionalExtension, Row, Transaction, TransactionBehavior};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::{
    Album, AlbumId, NewTrack, Performer, PerformerId, PerformerType, TrackId, TrackView,
};
use crate::schema::Database;

/// Projection shared by every read that returns [`TrackView`] rows.
///
/// Callers append a `WHERE` clause (or nothing) and map rows with
/// [`row_to_track_view`].
pub const TRACK_VIEW_SELECT: &str = "SELECT rolas.id_rola, rolas.title, performers.name, albums.name,
        rolas.year, rolas.genre, rolas.track
 FROM rolas
 JOIN performers ON rolas.id_performer = performers.id_performer
 JOIN albums ON rolas.id_album = albums.id_album";

/// Map a row produced by [`TRACK_VIEW_SELECT`].
pub fn row_to_track_view(row: &Row<'_>) -> rusqlite::Result<TrackView> {
    Ok(TrackView {
        id: row.get(0)?,
        title: row.get(1)?,
        performer: row.get(2)?,
        album: row.get(3)?,
        year: row.get(4)?,
        genre: row.get(5)?,
        track_number: row.get(6)?,
    })
}

/// Row counts for the populated catalog tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub performers: u64,
    pub albums: u64,
    pub tracks: u64,
}

// Track repository
impl Database {
    /// Every track joined with its performer and album names.
    ///
    /// Rows come back in store order; no ordering is promised.
    pub fn list_all_tracks(&self) -> Result<Vec<TrackView>> {
        let mut stmt = self.conn.prepare(TRACK_VIEW_SELECT)?;
        let tracks = stmt
            .query_map([], row_to_track_view)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tracks)
    }

    pub fn stats(&self) -> Result<CatalogStats> {
        let count = |table: &str| -> Result<u64> {
            let n: i64 =
                self.conn
                    .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
            Ok(u64::try_from(n).unwrap_or(0))
        };

        Ok(CatalogStats {
            performers: count("performers")?,
            albums: count("albums")?,
            tracks: count("rolas")?,
        })
    }

    /// Start a write unit.
    ///
    /// The unit is an immediate transaction: it takes the store's write lock
    /// up front, so the insert-if-absent checks it performs cannot interleave
    /// with another writer. Borrowing `self` mutably keeps a single writer per
    /// handle. Dropping the unit without [`WriteUnit::commit`] rolls it back.
    pub fn begin_write(&mut self) -> Result<WriteUnit<'_>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        Ok(WriteUnit { tx })
    }
}

/// Catalog writes for a single ingested file.
#[derive(Debug)]
pub struct WriteUnit<'conn> {
    tx: Transaction<'conn>,
}

impl WriteUnit<'_> {
    /// Whether a track with this file path is already cataloged.
    pub fn track_exists(&self, path: &Path) -> Result<bool> {
        let found: Option<i64> = self
            .tx
            .query_row(
                "SELECT 1 FROM rolas WHERE path = ?1 LIMIT 1",
                [path_text(path)],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Insert an album unless one with the same name exists.
    ///
    /// Returns `true` when a row was inserted.
    pub fn upsert_album(&self, name: &str, year: i32, path: &Path) -> Result<bool> {
        let inserted = self.tx.execute(
            "INSERT INTO albums (path, name, year)
             SELECT ?1, ?2, ?3
             WHERE NOT EXISTS (SELECT 1 FROM albums WHERE name = ?2)",
            rusqlite::params![path_text(path), name, year],
        )?;
        Ok(inserted > 0)
    }

    /// Insert a performer unless one with the same name exists.
    ///
    /// Returns `true` when a row was inserted.
    pub fn upsert_performer(&self, name: &str, kind: PerformerType) -> Result<bool> {
        let inserted = self.tx.execute(
            "INSERT INTO performers (id_type, name)
             SELECT ?1, ?2
             WHERE NOT EXISTS (SELECT 1 FROM performers WHERE name = ?2)",
            rusqlite::params![kind.id(), name],
        )?;
        Ok(inserted > 0)
    }

    /// The album with this name; the oldest row wins if several exist.
    pub fn album_by_name(&self, name: &str) -> Result<Option<Album>> {
        let album = self
            .tx
            .query_row(
                "SELECT id_album, name, year, path FROM albums
                 WHERE name = ?1 ORDER BY id_album LIMIT 1",
                [name],
                |row| {
                    Ok(Album {
                        id: row.get::<_, AlbumId>(0)?,
                        name: row.get(1)?,
                        year: row.get(2)?,
                        path: PathBuf::from(row.get::<_, String>(3)?),
                    })
                },
            )
            .optional()?;
        Ok(album)
    }

    /// The performer with this name; the oldest row wins if several exist.
    pub fn performer_by_name(&self, name: &str) -> Result<Option<Performer>> {
        let performer = self
            .tx
            .query_row(
                "SELECT id_performer, id_type, name FROM performers
                 WHERE name = ?1 ORDER BY id_performer LIMIT 1",
                [name],
                |row| {
                    Ok(Performer {
                        id: row.get::<_, PerformerId>(0)?,
                        kind: PerformerType::from_id(row.get(1)?),
                        name: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(performer)
    }

    pub fn insert_track(&self, track: &NewTrack) -> Result<TrackId> {
        self.tx.execute(
            "INSERT INTO rolas (id_performer, id_album, path, title, track, year, genre)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                track.performer_id,
                track.album_id,
                path_text(&track.path),
                track.title,
                track.track_number,
                track.year,
                track.genre,
            ],
        )?;
        Ok(TrackId::from_raw(self.tx.last_insert_rowid()))
    }

    pub fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }
}

fn path_text(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

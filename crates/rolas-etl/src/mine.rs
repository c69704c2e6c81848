use chrono::Datelike;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use rolas_core::model::{NewTrack, PerformerType, TrackId};
use rolas_core::Database;

use crate::error::{FileError, MineError};
use crate::normalize::{album_fallback, normalize};
use crate::tags::{LoftyTagReader, TagReader};

/// Receives the completed fraction of an ingestion run, in `[0, 1]`.
pub trait ProgressSink {
    fn report(&mut self, fraction: f64);
}

impl<F: FnMut(f64)> ProgressSink for F {
    fn report(&mut self, fraction: f64) {
        self(fraction);
    }
}

impl ProgressSink for tokio::sync::mpsc::UnboundedSender<f64> {
    fn report(&mut self, fraction: f64) {
        // A closed receiver drops the update.
        self.send(fraction).ok();
    }
}

/// Outcome counters of one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MineReport {
    /// Audio files counted by the pre-scan.
    pub total_files: usize,
    /// Audio files visited by the walk, whatever their outcome.
    pub files_processed: usize,
    pub tracks_added: usize,
    /// Files skipped because their path is already cataloged.
    pub already_present: usize,
    /// Files skipped because of a decode or lookup error.
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileOutcome {
    Added(TrackId),
    AlreadyPresent,
}

/// The ingestion pipeline.
///
/// Files are handled strictly one at a time in walk order. The caller must
/// not run two miners against the same store at once.
#[derive(Debug)]
pub struct Miner<R = LoftyTagReader> {
    reader: R,
    extensions: Vec<String>,
}

impl Miner {
    /// A miner reading tags with `lofty`, accepting `.mp3` files.
    #[must_use]
    pub fn new() -> Self {
        Self::with_reader(LoftyTagReader)
    }
}

impl Default for Miner {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: TagReader> Miner<R> {
    #[must_use]
    pub fn with_reader(reader: R) -> Self {
        Self {
            reader,
            extensions: vec!["mp3".to_string()],
        }
    }

    /// Replace the accepted file extensions (compared case-insensitively,
    /// without the leading dot).
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    fn is_audio_file(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            self.extensions.iter().any(|accepted| *accepted == ext)
        })
    }

    fn walker(music_dir: &Path) -> WalkDir {
        WalkDir::new(music_dir)
            .follow_links(false)
            .sort_by_file_name()
    }

    /// Count the audio files under `music_dir`.
    ///
    /// Only used to scale progress, so traversal errors are ignored here; a
    /// missing directory counts as empty.
    pub fn count_audio_files(&self, music_dir: &Path) -> usize {
        Self::walker(music_dir)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file() && self.is_audio_file(entry.path()))
            .count()
    }

    /// Ingest every audio file under `music_dir` into `db`.
    ///
    /// Files already cataloged (by path) are skipped, so re-running over the
    /// same tree is a no-op. Decode and lookup errors skip the file; store
    /// and traversal errors end the run. `progress` is called once per
    /// visited file unless the pre-scan found no files.
    pub fn mine(
        &self,
        music_dir: &Path,
        db: &mut Database,
        progress: &mut impl ProgressSink,
    ) -> Result<MineReport, MineError> {
        let mut report = MineReport {
            total_files: self.count_audio_files(music_dir),
            ..MineReport::default()
        };

        log::info!(
            "Starting ingestion of {} ({} audio files)",
            music_dir.display(),
            report.total_files
        );

        if !music_dir.exists() {
            log::warn!("Music directory {} does not exist", music_dir.display());
            return Ok(report);
        }

        let current_year = chrono::Local::now().year();

        for entry in Self::walker(music_dir) {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file() || !self.is_audio_file(path) {
                continue;
            }

            log::debug!("Ingesting: {}", path.display());

            match self.ingest_file(path, db, current_year) {
                Ok(FileOutcome::Added(id)) => {
                    log::debug!("Added track {id} for {}", path.display());
                    report.tracks_added += 1;
                }
                Ok(FileOutcome::AlreadyPresent) => {
                    report.already_present += 1;
                }
                Err(FileError::Store(e)) => return Err(MineError::Store(e)),
                Err(e) => {
                    log::warn!("Skipping {}: {e}", path.display());
                    report.failed += 1;
                }
            }

            report.files_processed += 1;
            if report.total_files > 0 {
                progress.report(fraction(report.files_processed, report.total_files));
            }
        }

        log::info!(
            "Ingestion complete: {} files processed, {} added, {} already present, {} failed",
            report.files_processed,
            report.tracks_added,
            report.already_present,
            report.failed
        );

        Ok(report)
    }

    fn ingest_file(
        &self,
        path: &Path,
        db: &mut Database,
        current_year: i32,
    ) -> Result<FileOutcome, FileError> {
        let raw = self.reader.read_tags(path)?;
        let tags = normalize(raw, &album_fallback(path), current_year);

        let unit = db.begin_write()?;
        if unit.track_exists(path)? {
            return Ok(FileOutcome::AlreadyPresent);
        }

        let album_dir = path.parent().unwrap_or(path);
        unit.upsert_album(&tags.album, tags.year, album_dir)?;
        unit.upsert_performer(&tags.artist, PerformerType::Unknown)?;

        let performer = unit
            .performer_by_name(&tags.artist)?
            .ok_or_else(|| FileError::LookupInconsistency {
                entity: "performer",
                name: tags.artist.clone(),
            })?;
        let album = unit
            .album_by_name(&tags.album)?
            .ok_or_else(|| FileError::LookupInconsistency {
                entity: "album",
                name: tags.album.clone(),
            })?;

        let id = unit.insert_track(&NewTrack {
            performer_id: performer.id,
            album_id: album.id,
            path: path.to_path_buf(),
            title: tags.title,
            track_number: tags.track_number,
            year: tags.year,
            genre: tags.genre,
        })?;
        unit.commit()?;

        Ok(FileOutcome::Added(id))
    }
}

#[allow(clippy::cast_precision_loss)]
fn fraction(done: usize, total: usize) -> f64 {
    (done as f64 / total as f64).min(1.0)
}

/// Run one ingestion on a blocking worker thread.
///
/// The store is opened on the worker and dropped when the run ends, on
/// every exit path. A panic inside the run is reported as
/// [`MineError::Aborted`] instead of crossing into the caller.
pub async fn mine_in_background<R, P>(
    miner: Miner<R>,
    music_dir: PathBuf,
    db_path: PathBuf,
    mut progress: P,
) -> Result<MineReport, MineError>
where
    R: TagReader + Send + 'static,
    P: ProgressSink + Send + 'static,
{
    let handle = tokio::task::spawn_blocking(move || {
        let mut db = Database::open(&db_path)?;
        miner.mine(&music_dir, &mut db, &mut progress)
    });

    match handle.await {
        Ok(result) => result,
        Err(e) if e.is_panic() => {
            let payload = e.into_panic();
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "ingestion worker panicked".to_string());
            log::error!("Ingestion worker panicked: {message}");
            Err(MineError::Aborted(message))
        }
        Err(e) => Err(MineError::Aborted(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::tags::RawTags;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    /// Serves tags keyed by file name; names listed in `broken` fail to decode.
    #[derive(Debug, Default)]
    struct FakeReader {
        tags: HashMap<String, RawTags>,
        broken: Vec<String>,
    }

    impl FakeReader {
        fn with(mut self, file_name: &str, tags: RawTags) -> Self {
            self.tags.insert(file_name.to_string(), tags);
            self
        }

        fn broken(mut self, file_name: &str) -> Self {
            self.broken.push(file_name.to_string());
            self
        }
    }

    impl TagReader for FakeReader {
        fn read_tags(&self, path: &Path) -> Result<RawTags, DecodeError> {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            if self.broken.contains(&name) {
                return Err(DecodeError::Malformed {
                    path: path.to_path_buf(),
                    message: "bad frame".to_string(),
                });
            }
            Ok(self.tags.get(&name).cloned().unwrap_or_default())
        }
    }

    fn tags(title: &str, artist: &str, album: &str, year: i32) -> RawTags {
        RawTags {
            title: title.to_string(),
            artist: artist.to_string(),
            album: album.to_string(),
            year,
            genre: "Rock".to_string(),
            track_number: 1,
            total_tracks: 0,
        }
    }

    fn touch(dir: &Path, relative: &str) -> PathBuf {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"fake audio").unwrap();
        path
    }

    fn beatles_tree() -> (TempDir, FakeReader) {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "beatles/abbey/01.mp3");
        touch(temp_dir.path(), "beatles/abbey/02.mp3");
        touch(temp_dir.path(), "beatles/letitbe/01b.mp3");
        touch(temp_dir.path(), "beatles/abbey/cover.jpg");

        let reader = FakeReader::default()
            .with("01.mp3", tags("Come Together", "The Beatles", "Abbey Road", 1969))
            .with("02.mp3", tags("Something", "The Beatles", "Abbey Road", 1969))
            .with("01b.mp3", tags("Two of Us", "The Beatles", "Let It Be", 1970));
        (temp_dir, reader)
    }

    #[test]
    fn test_is_audio_file() {
        let miner = Miner::new();
        assert!(miner.is_audio_file(Path::new("/music/test.mp3")));
        assert!(miner.is_audio_file(Path::new("/music/TEST.MP3")));
        assert!(!miner.is_audio_file(Path::new("/music/test.flac")));
        assert!(!miner.is_audio_file(Path::new("/music/test")));

        let miner = Miner::new().with_extensions([".flac", "MP3"]);
        assert!(miner.is_audio_file(Path::new("/music/test.flac")));
        assert!(miner.is_audio_file(Path::new("/music/test.mp3")));
    }

    #[test]
    fn test_count_audio_files() {
        let (temp_dir, reader) = beatles_tree();
        let miner = Miner::with_reader(reader);
        assert_eq!(miner.count_audio_files(temp_dir.path()), 3);
        assert_eq!(
            miner.count_audio_files(&temp_dir.path().join("does-not-exist")),
            0
        );
    }

    #[test]
    fn test_mine_inserts_tracks_albums_performers() {
        let (temp_dir, reader) = beatles_tree();
        let miner = Miner::with_reader(reader);
        let mut db = Database::open_in_memory().unwrap();

        let report = miner.mine(temp_dir.path(), &mut db, &mut |_: f64| {}).unwrap();

        assert_eq!(report.total_files, 3);
        assert_eq!(report.files_processed, 3);
        assert_eq!(report.tracks_added, 3);
        assert_eq!(report.failed, 0);

        let stats = db.stats().unwrap();
        assert_eq!(stats.tracks, 3);
        assert_eq!(stats.albums, 2);
        assert_eq!(stats.performers, 1);
    }

    #[test]
    fn test_mine_twice_is_idempotent() {
        let (temp_dir, reader) = beatles_tree();
        let miner = Miner::with_reader(reader);
        let mut db = Database::open_in_memory().unwrap();

        miner.mine(temp_dir.path(), &mut db, &mut |_: f64| {}).unwrap();
        let first = db.stats().unwrap();

        let report = miner.mine(temp_dir.path(), &mut db, &mut |_: f64| {}).unwrap();
        assert_eq!(report.tracks_added, 0);
        assert_eq!(report.already_present, 3);
        assert_eq!(db.stats().unwrap(), first);
    }

    #[test]
    fn test_same_path_yields_one_track_row() {
        let (temp_dir, reader) = beatles_tree();
        let miner = Miner::with_reader(reader);
        let mut db = Database::open_in_memory().unwrap();

        miner.mine(temp_dir.path(), &mut db, &mut |_: f64| {}).unwrap();
        miner.mine(temp_dir.path(), &mut db, &mut |_: f64| {}).unwrap();

        let path = temp_dir.path().join("beatles/abbey/01.mp3");
        let rows: i64 = db
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM rolas WHERE path = ?1",
                [path.to_string_lossy().into_owned()],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_decode_failure_skips_file_and_continues() {
        let (temp_dir, reader) = beatles_tree();
        let miner = Miner::with_reader(reader.broken("02.mp3"));
        let mut db = Database::open_in_memory().unwrap();

        let report = miner.mine(temp_dir.path(), &mut db, &mut |_: f64| {}).unwrap();

        assert_eq!(report.files_processed, 3);
        assert_eq!(report.failed, 1);
        assert_eq!(report.tracks_added, 2);
        let titles: Vec<String> = db
            .list_all_tracks()
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert!(!titles.contains(&"Something".to_string()));
    }

    #[test]
    fn test_progress_is_monotonic_and_reaches_one() {
        let (temp_dir, reader) = beatles_tree();
        let miner = Miner::with_reader(reader.broken("02.mp3"));
        let mut db = Database::open_in_memory().unwrap();

        let mut seen = Vec::new();
        miner
            .mine(temp_dir.path(), &mut db, &mut |f: f64| seen.push(f))
            .unwrap();

        assert_eq!(seen.len(), 3);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert!((seen[2] - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_progress_over_unbounded_channel() {
        let (temp_dir, reader) = beatles_tree();
        let miner = Miner::with_reader(reader);
        let mut db = Database::open_in_memory().unwrap();

        let (mut tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<f64>();
        miner.mine(temp_dir.path(), &mut db, &mut tx).unwrap();
        drop(tx);

        let mut seen = Vec::new();
        while let Ok(fraction) = rx.try_recv() {
            seen.push(fraction);
        }
        assert_eq!(seen.len(), 3);
        assert!((seen[2] - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_and_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let miner = Miner::with_reader(FakeReader::default());
        let mut db = Database::open_in_memory().unwrap();

        let mut calls = 0;
        let report = miner
            .mine(temp_dir.path(), &mut db, &mut |_: f64| calls += 1)
            .unwrap();
        assert_eq!(report, MineReport::default());

        let report = miner
            .mine(&temp_dir.path().join("missing"), &mut db, &mut |_: f64| calls += 1)
            .unwrap();
        assert_eq!(report, MineReport::default());
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_untagged_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "Loose Tapes/untitled.mp3");
        let miner = Miner::with_reader(FakeReader::default());
        let mut db = Database::open_in_memory().unwrap();

        miner.mine(temp_dir.path(), &mut db, &mut |_: f64| {}).unwrap();

        let tracks = db.list_all_tracks().unwrap();
        assert_eq!(tracks.len(), 1);
        let track = &tracks[0];
        assert_eq!(track.title, "Unknown");
        assert_eq!(track.performer, "Unknown");
        assert_eq!(track.album, "Loose Tapes");
        assert_eq!(track.genre, "Unknown");
        assert_eq!(track.year, chrono::Local::now().year());
        assert_eq!(track.track_number, 1);
    }

    #[test]
    fn test_album_keeps_first_year_and_directory() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "a/first.mp3");
        touch(temp_dir.path(), "b/second.mp3");
        let reader = FakeReader::default()
            .with("first.mp3", tags("One", "Artist A", "Greatest Hits", 1990))
            .with("second.mp3", tags("Two", "Artist B", "Greatest Hits", 2005));
        let miner = Miner::with_reader(reader);
        let mut db = Database::open_in_memory().unwrap();

        miner.mine(temp_dir.path(), &mut db, &mut |_: f64| {}).unwrap();

        let unit = db.begin_write().unwrap();
        let album = unit.album_by_name("Greatest Hits").unwrap().unwrap();
        assert_eq!(album.year, 1990);
        assert_eq!(album.path, temp_dir.path().join("a"));
    }

    /// Removes a directory the walk has not reached yet while reading tags.
    #[derive(Debug)]
    struct VanishingSiblingReader {
        doomed: PathBuf,
    }

    impl TagReader for VanishingSiblingReader {
        fn read_tags(&self, _path: &Path) -> Result<RawTags, DecodeError> {
            if self.doomed.exists() {
                fs::remove_dir_all(&self.doomed).unwrap();
            }
            Ok(tags("First", "Artist A", "Album A", 2001))
        }
    }

    #[test]
    fn test_walk_error_is_fatal_and_keeps_inserted_tracks() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "a/1.mp3");
        touch(temp_dir.path(), "b/2.mp3");
        let miner = Miner::with_reader(VanishingSiblingReader {
            doomed: temp_dir.path().join("b"),
        });
        let mut db = Database::open_in_memory().unwrap();

        let result = miner.mine(temp_dir.path(), &mut db, &mut |_: f64| {});

        match result {
            Err(MineError::Walk(e)) => {
                assert!(e.path().is_some_and(|p| p.ends_with("b")));
            }
            other => panic!("expected a walk error, got {other:?}"),
        }
        assert_eq!(db.stats().unwrap().tracks, 1);
        assert_eq!(db.list_all_tracks().unwrap()[0].title, "First");
    }

    #[tokio::test]
    async fn test_mine_in_background_opens_and_releases_store() {
        let (temp_dir, reader) = beatles_tree();
        let db_path = temp_dir.path().join("store").join("rolas.db");

        let report = mine_in_background(
            Miner::with_reader(reader),
            temp_dir.path().join("beatles"),
            db_path.clone(),
            |_: f64| {},
        )
        .await
        .unwrap();
        assert_eq!(report.tracks_added, 3);

        let db = Database::open(&db_path).unwrap();
        assert_eq!(db.stats().unwrap().tracks, 3);
    }

    #[derive(Debug)]
    struct PanickingReader;

    impl TagReader for PanickingReader {
        fn read_tags(&self, _path: &Path) -> Result<RawTags, DecodeError> {
            panic!("decoder blew up");
        }
    }

    #[tokio::test]
    async fn test_mine_in_background_converts_panic() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "x/1.mp3");

        let result = mine_in_background(
            Miner::with_reader(PanickingReader),
            temp_dir.path().to_path_buf(),
            temp_dir.path().join("rolas.db"),
            |_: f64| {},
        )
        .await;

        match result {
            Err(MineError::Aborted(message)) => assert!(message.contains("decoder blew up")),
            other => panic!("expected Aborted, got {other:?}"),
        }
    }
}

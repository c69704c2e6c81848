use rolas_core::catalog::row_to_track_view;
use rolas_core::model::TrackView;
use rolas_core::Database;

use crate::compiler::{compile, CompiledQuery};
use crate::error::SearchError;

/// Result of a search that ran successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Vec<TrackView>),
    /// The query was valid and matched no track.
    NoMatches,
}

impl SearchOutcome {
    fn from_rows(rows: Vec<TrackView>) -> Self {
        if rows.is_empty() {
            Self::NoMatches
        } else {
            Self::Found(rows)
        }
    }

    #[must_use]
    pub fn tracks(&self) -> &[TrackView] {
        match self {
            Self::Found(tracks) => tracks,
            Self::NoMatches => &[],
        }
    }

    #[must_use]
    pub fn into_tracks(self) -> Vec<TrackView> {
        match self {
            Self::Found(tracks) => tracks,
            Self::NoMatches => Vec::new(),
        }
    }
}

/// Run a search expression against the catalog.
///
/// An empty (or blank) expression lists every track without going through
/// the filter grammar.
pub fn search(db: &Database, expression: &str) -> Result<SearchOutcome, SearchError> {
    if expression.trim().is_empty() {
        return Ok(SearchOutcome::from_rows(db.list_all_tracks()?));
    }

    let query = compile(expression);
    log::debug!("Compiled {expression:?} to: {}", query.predicate());
    Ok(SearchOutcome::from_rows(execute(db, &query)?))
}

/// Run an already compiled query.
pub fn execute(db: &Database, query: &CompiledQuery) -> Result<Vec<TrackView>, SearchError> {
    let mut stmt = db.conn().prepare(&query.sql())?;
    let tracks = stmt
        .query_map(rusqlite::params_from_iter(query.args()), row_to_track_view)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tracks)
}

use thiserror::Error;

/// A search that could not be carried out. An empty result is not an error;
/// see [`crate::SearchOutcome::NoMatches`].
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("store error: {0}")]
    Store(#[from] rolas_core::Error),
}

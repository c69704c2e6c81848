//! Ingestion pipeline for rolas.
//!
//! Walks a music directory, reads embedded tags, normalizes absent fields
//! and upserts performers, albums and tracks into the catalog store.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod mine;
pub mod normalize;
pub mod tags;

pub use config::Config;
pub use error::{DecodeError, FileError, MineError};
pub use mine::{mine_in_background, MineReport, Miner, ProgressSink};
pub use normalize::{normalize, NormalizedTrack};
pub use tags::{LoftyTagReader, RawTags, TagReader};

//! Core data model for rolas.
//!
//! This crate defines the catalog entities (performers, albums, tracks),
//! the SQLite schema and the store handle shared by the ingestion
//! pipeline and the search compiler.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod error;
pub mod model;
pub mod schema;

pub use catalog::{CatalogStats, WriteUnit};
pub use error::{Error, Result};
pub use schema::Database;

//! Filter-query search for rolas.
//!
//! Compiles `key:value,...` search expressions into parameterized SQL over
//! the track/performer/album join and runs them against the catalog.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod compiler;
pub mod error;
pub mod search;

pub use compiler::{compile, parse_filters, CompiledQuery, Filter};
pub use error::SearchError;
pub use search::{execute, search, SearchOutcome};

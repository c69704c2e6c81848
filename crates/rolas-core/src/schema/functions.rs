use rusqlite::functions::{Context, FunctionFlags};
use rusqlite::types::ValueRef;
use rusqlite::Connection;

use crate::error::Result;

/// SQL name of the Unicode-aware substring test.
///
/// `rolas_contains(haystack, needle)` is true when `needle` occurs in
/// `haystack` after both are lowercased. Unlike the built-in `LIKE`, case
/// folding covers non-ASCII letters, and `%` / `_` have no special meaning.
/// Numbers are compared through their decimal text; `NULL` never matches.
pub const CONTAINS_FN: &str = "rolas_contains";

/// Register the catalog's SQL functions on a connection.
pub fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        CONTAINS_FN,
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        contains,
    )?;
    Ok(())
}

fn contains(ctx: &Context<'_>) -> rusqlite::Result<bool> {
    let (Some(haystack), Some(needle)) = (text_arg(ctx, 0), text_arg(ctx, 1)) else {
        return Ok(false);
    };
    Ok(haystack.to_lowercase().contains(&needle.to_lowercase()))
}

fn text_arg(ctx: &Context<'_>, idx: usize) -> Option<String> {
    match ctx.get_raw(idx) {
        ValueRef::Null | ValueRef::Blob(_) => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
    }
}

//! The filter-query grammar.
//!
//! An expression is a comma-separated list of `key:value` pairs:
//!
//! | key | field          | match              |
//! |-----|----------------|--------------------|
//! | `p` | performer name | substring          |
//! | `a` | album name     | substring          |
//! | `c` | track title    | substring          |
//! | `g` | genre          | substring          |
//! | `y` | year           | exact              |
//!
//! Keys are case-insensitive; keys and values are trimmed. Pairs without a
//! colon, with an empty value or with an unknown key are dropped. Recognized
//! filters are combined with AND. When none is recognized, the whole
//! expression is matched as a substring against every general field, OR-ed.
//!
//! Substring matches go through [`CONTAINS_FN`], which folds case for any
//! Unicode letter and treats `%` and `_` literally.

use rusqlite::types::Value;

use rolas_core::schema::CONTAINS_FN;

/// One recognized `key:value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Performer(String),
    Album(String),
    Title(String),
    Genre(String),
    Year(String),
}

impl Filter {
    /// Parse a single pair. `None` for malformed pairs and unknown keys.
    fn parse(pair: &str) -> Option<Self> {
        let (key, value) = pair.split_once(':')?;
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        let value = value.to_string();
        match key.trim().to_lowercase().as_str() {
            "p" => Some(Self::Performer(value)),
            "a" => Some(Self::Album(value)),
            "c" => Some(Self::Title(value)),
            "g" => Some(Self::Genre(value)),
            "y" => Some(Self::Year(value)),
            other => {
                log::debug!("Ignoring unknown filter key {other:?}");
                None
            }
        }
    }

    fn condition(&self) -> String {
        match self {
            Self::Performer(_) => contains_condition("performers.name"),
            Self::Album(_) => contains_condition("albums.name"),
            Self::Title(_) => contains_condition("rolas.title"),
            Self::Genre(_) => contains_condition("rolas.genre"),
            Self::Year(_) => "rolas.year = ?".to_string(),
        }
    }

    fn arg(&self) -> Value {
        match self {
            Self::Performer(v) | Self::Album(v) | Self::Title(v) | Self::Genre(v) => {
                Value::Text(v.clone())
            }
            // A non-numeric year stays text and matches no row.
            Self::Year(v) => v
                .parse::<i64>()
                .map_or_else(|_| Value::Text(v.clone()), Value::Integer),
        }
    }
}

/// Fields searched when an expression holds no recognized filter.
const GENERAL_FIELDS: &[&str] = &[
    "rolas.title",
    "rolas.year",
    "rolas.genre",
    "rolas.track",
    "performers.name",
    "albums.name",
];

/// A predicate over the track/performer/album join plus its bound arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    predicate: String,
    args: Vec<Value>,
}

impl CompiledQuery {
    /// The `WHERE` predicate, with one `?` per argument.
    #[must_use]
    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// The complete statement: the track view projection filtered by the
    /// predicate.
    #[must_use]
    pub fn sql(&self) -> String {
        format!(
            "{}\n WHERE {}",
            rolas_core::catalog::TRACK_VIEW_SELECT,
            self.predicate
        )
    }
}

/// The recognized filters of an expression, in order of appearance.
pub fn parse_filters(expression: &str) -> Vec<Filter> {
    expression
        .split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .filter_map(Filter::parse)
        .collect()
}

/// Compile a search expression.
pub fn compile(expression: &str) -> CompiledQuery {
    let filters = parse_filters(expression);

    if filters.is_empty() {
        let needle = expression.trim().to_string();
        let predicate = format!(
            "({})",
            GENERAL_FIELDS
                .iter()
                .map(|field| contains_condition(field))
                .collect::<Vec<_>>()
                .join(" OR ")
        );
        return CompiledQuery {
            predicate,
            args: vec![Value::Text(needle); GENERAL_FIELDS.len()],
        };
    }

    CompiledQuery {
        predicate: filters
            .iter()
            .map(Filter::condition)
            .collect::<Vec<_>>()
            .join(" AND "),
        args: filters.iter().map(Filter::arg).collect(),
    }
}

fn contains_condition(field: &str) -> String {
    format!("{CONTAINS_FN}({field}, ?)")
}

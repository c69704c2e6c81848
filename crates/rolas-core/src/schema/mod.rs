mod db;
mod ddl;
mod functions;

pub use db::{ensure_schema, missing_tables, Database, SchemaAction};
pub use ddl::REQUIRED_TABLES;
pub use functions::{register_functions, CONTAINS_FN};

//! Termcloud Store — corpus store seam and SQLite reference implementation.

pub mod schema;
pub mod sqlite;
pub mod store;
pub mod types;

pub use sqlite::{AddResponseOptions, SqliteStore};
pub use store::CorpusStore;
pub use types::{ResponseRow, RowPredicate};

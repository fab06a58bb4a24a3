//! SQLite-backed corpus store.
//!
//! Reference implementation of the `CorpusStore` seam. The row predicate is
//! compiled to a conjunctive WHERE clause with positional parameters; pages
//! are ordered by row id so chunked fetches are stable.

use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, Utc};
use parking_lot::Mutex;
use rusqlite::types::ToSql;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use tracing::info;

use crate::schema::SCHEMA_SQL;
use crate::store::CorpusStore;
use crate::types::{ResponseRow, RowPredicate};
use termcloud_core::{Error, Result};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// SQLite store holding datasets of question/response rows.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

/// Options for inserting a response row.
#[derive(Debug, Clone, Default)]
pub struct AddResponseOptions {
    pub question_text: Option<String>,
    pub response_text: Option<String>,
    pub org_name: Option<String>,
    pub user_id: Option<String>,
    pub tenant_name: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

impl SqliteStore {
    /// Open or create the store. `db_dir` is the directory; the file will be
    /// `db_dir/termcloud.db`.
    pub fn open(db_dir: impl AsRef<Path>) -> Result<Self> {
        let db_dir = db_dir.as_ref();
        std::fs::create_dir_all(db_dir).map_err(|e| Error::Storage(e.to_string()))?;
        let db_path = db_dir.join("termcloud.db");

        let conn = Self::create_connection(&db_path)?;
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };

        let dataset_count = store.count_datasets()?;
        info!(
            "SqliteStore initialized: {} datasets, path={}",
            dataset_count,
            store.db_path.display()
        );

        Ok(store)
    }

    fn create_connection(db_path: &Path) -> Result<Connection> {
        let conn = Connection::open(db_path).map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(conn)
    }

    /// Register a dataset. Idempotent.
    pub fn add_dataset(&self, dataset_id: &str, name: Option<&str>) -> Result<()> {
        let now = Utc::now().naive_utc().format(TIMESTAMP_FORMAT).to_string();
        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT OR IGNORE INTO datasets (id, name, created_at) VALUES (?1, ?2, ?3)",
        )
        .map_err(|e| Error::Database(e.to_string()))?
        .execute(rusqlite::params![dataset_id, name, now])
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    /// Insert a response row. Returns the new row id.
    pub fn add_response(&self, dataset_id: &str, opts: AddResponseOptions) -> Result<i64> {
        let created_at = opts
            .created_at
            .unwrap_or_else(|| Utc::now().naive_utc())
            .format(TIMESTAMP_FORMAT)
            .to_string();

        let conn = self.conn.lock();
        let id = conn
            .prepare_cached(
                "INSERT INTO responses
                 (dataset_id, question_text, response_text, org_name, user_id, tenant_name, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .insert(rusqlite::params![
                dataset_id,
                opts.question_text,
                opts.response_text,
                opts.org_name,
                opts.user_id,
                opts.tenant_name,
                created_at,
            ])
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(id)
    }

    /// Delete a dataset and its rows (cascade).
    pub fn delete_dataset(&self, dataset_id: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let count = conn
            .execute(
                "DELETE FROM datasets WHERE id = ?1",
                rusqlite::params![dataset_id],
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count > 0)
    }

    fn count_datasets(&self) -> Result<i64> {
        let conn = self.conn.lock();
        let count = conn
            .prepare_cached("SELECT COUNT(*) FROM datasets")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row([], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count)
    }

    /// Compile the predicate into WHERE conditions and their parameters.
    /// The dataset id is always the first condition.
    fn build_where(dataset_id: &str, predicate: &RowPredicate) -> (String, Vec<String>) {
        let mut conditions = vec!["dataset_id = ?".to_string()];
        let mut params = vec![dataset_id.to_string()];

        for (column, values) in [
            ("org_name", &predicate.org_names),
            ("user_id", &predicate.user_ids),
            ("tenant_name", &predicate.tenant_names),
        ] {
            if !values.is_empty() {
                let placeholders = vec!["?"; values.len()].join(", ");
                conditions.push(format!("{} IN ({})", column, placeholders));
                params.extend(values.iter().cloned());
            }
        }

        if let Some(range) = &predicate.date_range {
            if let Some(exact) = range.exact {
                conditions.push("date(created_at) = ?".to_string());
                params.push(exact.format("%Y-%m-%d").to_string());
            } else {
                if let Some(start) = range.start {
                    conditions.push("date(created_at) >= ?".to_string());
                    params.push(start.format("%Y-%m-%d").to_string());
                }
                if let Some(end) = range.end {
                    conditions.push("date(created_at) <= ?".to_string());
                    params.push(end.format("%Y-%m-%d").to_string());
                }
            }
        }

        (conditions.join(" AND "), params)
    }

    fn row_to_response(row: &Row<'_>) -> rusqlite::Result<ResponseRow> {
        let created_raw: String = row.get("created_at")?;
        let created_at = NaiveDateTime::parse_from_str(&created_raw, TIMESTAMP_FORMAT)
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    7,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;
        Ok(ResponseRow {
            id: row.get("id")?,
            dataset_id: row.get("dataset_id")?,
            question_text: row.get("question_text")?,
            response_text: row.get("response_text")?,
            org_name: row.get("org_name")?,
            user_id: row.get("user_id")?,
            tenant_name: row.get("tenant_name")?,
            created_at,
        })
    }
}

impl CorpusStore for SqliteStore {
    fn exists(&self, dataset_id: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let found: Option<i64> = conn
            .prepare_cached("SELECT 1 FROM datasets WHERE id = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(rusqlite::params![dataset_id], |row| row.get(0))
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(found.is_some())
    }

    fn count(&self, dataset_id: &str, predicate: &RowPredicate) -> Result<u64> {
        let (where_clause, params) = Self::build_where(dataset_id, predicate);
        let sql = format!("SELECT COUNT(*) FROM responses WHERE {}", where_clause);

        let conn = self.conn.lock();
        let count: i64 = conn
            .prepare_cached(&sql)
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params_from_iter(params.iter()), |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count as u64)
    }

    fn fetch_page(
        &self,
        dataset_id: &str,
        predicate: &RowPredicate,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<ResponseRow>> {
        let (where_clause, params) = Self::build_where(dataset_id, predicate);
        let sql = format!(
            "SELECT * FROM responses WHERE {} ORDER BY id LIMIT ? OFFSET ?",
            where_clause
        );

        let limit = limit as i64;
        let offset = offset as i64;
        let mut param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();
        param_refs.push(&limit);
        param_refs.push(&offset);

        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(&sql)
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params_from_iter(param_refs), Self::row_to_response)
            .map_err(|e| Error::Database(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;
    use termcloud_core::types::DateRange;

    fn test_store() -> (SqliteStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn seed_row(
        store: &SqliteStore,
        dataset: &str,
        question: &str,
        response: &str,
        org: Option<&str>,
        date: &str,
    ) {
        store
            .add_response(
                dataset,
                AddResponseOptions {
                    question_text: Some(question.into()),
                    response_text: Some(response.into()),
                    org_name: org.map(String::from),
                    created_at: Some(
                        NaiveDate::parse_from_str(date, "%Y-%m-%d")
                            .unwrap()
                            .and_hms_opt(9, 30, 0)
                            .unwrap(),
                    ),
                    ..Default::default()
                },
            )
            .unwrap();
    }

    #[test]
    fn test_exists() {
        let (store, _dir) = test_store();
        assert!(!store.exists("d1").unwrap());
        store.add_dataset("d1", Some("Survey 1")).unwrap();
        assert!(store.exists("d1").unwrap());
    }

    #[test]
    fn test_count_and_fetch_unfiltered() {
        let (store, _dir) = test_store();
        store.add_dataset("d1", None).unwrap();
        for i in 0..5 {
            seed_row(&store, "d1", &format!("q{}", i), "r", None, "2025-03-01");
        }

        let pred = RowPredicate::default();
        assert_eq!(store.count("d1", &pred).unwrap(), 5);

        let rows = store.fetch_page("d1", &pred, 0, 10).unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].question_text.as_deref(), Some("q0"));
    }

    #[test]
    fn test_paging_is_stable() {
        let (store, _dir) = test_store();
        store.add_dataset("d1", None).unwrap();
        for i in 0..7 {
            seed_row(&store, "d1", &format!("q{}", i), "r", None, "2025-03-01");
        }

        let pred = RowPredicate::default();
        let first = store.fetch_page("d1", &pred, 0, 3).unwrap();
        let second = store.fetch_page("d1", &pred, 3, 3).unwrap();
        let third = store.fetch_page("d1", &pred, 6, 3).unwrap();

        let all: Vec<String> = first
            .iter()
            .chain(&second)
            .chain(&third)
            .filter_map(|r| r.question_text.clone())
            .collect();
        assert_eq!(all, vec!["q0", "q1", "q2", "q3", "q4", "q5", "q6"]);
    }

    #[test]
    fn test_org_filter_matches_in_memory_predicate() {
        let (store, _dir) = test_store();
        store.add_dataset("d1", None).unwrap();
        seed_row(&store, "d1", "q1", "r", Some("Acme"), "2025-03-01");
        seed_row(&store, "d1", "q2", "r", Some("Globex"), "2025-03-01");
        seed_row(&store, "d1", "q3", "r", None, "2025-03-01");

        let pred = RowPredicate {
            org_names: BTreeSet::from(["Acme".to_string()]),
            ..Default::default()
        };
        assert_eq!(store.count("d1", &pred).unwrap(), 1);

        // SQL pushdown and in-memory evaluation agree
        let everything = store.fetch_page("d1", &RowPredicate::default(), 0, 100).unwrap();
        let in_memory = everything.iter().filter(|r| pred.matches(r)).count();
        assert_eq!(in_memory as u64, store.count("d1", &pred).unwrap());
    }

    #[test]
    fn test_date_filters() {
        let (store, _dir) = test_store();
        store.add_dataset("d1", None).unwrap();
        seed_row(&store, "d1", "jan", "r", None, "2025-01-15");
        seed_row(&store, "d1", "feb", "r", None, "2025-02-15");
        seed_row(&store, "d1", "mar", "r", None, "2025-03-15");

        let range = RowPredicate {
            date_range: Some(DateRange {
                start: Some(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()),
                end: Some(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()),
                exact: None,
            }),
            ..Default::default()
        };
        assert_eq!(store.count("d1", &range).unwrap(), 1);

        let exact = RowPredicate {
            date_range: Some(DateRange {
                start: Some(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
                end: Some(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()),
                exact: Some(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()),
            }),
            ..Default::default()
        };
        let rows = store.fetch_page("d1", &exact, 0, 10).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].question_text.as_deref(), Some("mar"));
    }

    #[test]
    fn test_delete_dataset_cascades() {
        let (store, _dir) = test_store();
        store.add_dataset("d1", None).unwrap();
        seed_row(&store, "d1", "q", "r", None, "2025-01-01");

        assert!(store.delete_dataset("d1").unwrap());
        assert!(!store.exists("d1").unwrap());
        assert_eq!(
            store.count("d1", &RowPredicate::default()).unwrap(),
            0
        );
    }
}

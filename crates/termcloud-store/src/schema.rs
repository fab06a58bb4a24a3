//! Database schema SQL.

/// Core tables: datasets registry plus response rows.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS datasets (
    id TEXT PRIMARY KEY,
    name TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS responses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    dataset_id TEXT NOT NULL REFERENCES datasets(id) ON DELETE CASCADE,
    question_text TEXT,
    response_text TEXT,
    org_name TEXT,
    user_id TEXT,
    tenant_name TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_responses_dataset ON responses(dataset_id);
CREATE INDEX IF NOT EXISTS idx_responses_org ON responses(dataset_id, org_name);
CREATE INDEX IF NOT EXISTS idx_responses_created ON responses(dataset_id, created_at);
"#;

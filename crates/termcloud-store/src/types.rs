//! Row and predicate types for corpus retrieval.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use termcloud_core::types::{DateRange, WordCloudRequest};

/// One question/response row from a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseRow {
    pub id: i64,
    pub dataset_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Conjunctive filter over response rows.
///
/// Empty sets mean "no constraint", not "match nothing". The exact date, if
/// set, takes precedence over the start/end range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowPredicate {
    pub org_names: BTreeSet<String>,
    pub user_ids: BTreeSet<String>,
    pub tenant_names: BTreeSet<String>,
    pub date_range: Option<DateRange>,
}

impl RowPredicate {
    /// Derive the row predicate from a request's filter fields.
    ///
    /// `selected_columns` is intentionally absent: it controls which text
    /// columns are extracted, not which rows match.
    pub fn from_request(request: &WordCloudRequest) -> Self {
        Self {
            org_names: request.org_names.clone(),
            user_ids: request.user_ids.clone(),
            tenant_names: request.tenant_names.clone(),
            date_range: request.date_range.clone(),
        }
    }

    /// Evaluate the predicate against a row in memory. Backends are free to
    /// push this down (the SQLite store compiles it to a WHERE clause); the
    /// two paths must agree.
    pub fn matches(&self, row: &ResponseRow) -> bool {
        if !self.org_names.is_empty()
            && !row
                .org_name
                .as_deref()
                .is_some_and(|v| self.org_names.contains(v))
        {
            return false;
        }
        if !self.user_ids.is_empty()
            && !row
                .user_id
                .as_deref()
                .is_some_and(|v| self.user_ids.contains(v))
        {
            return false;
        }
        if !self.tenant_names.is_empty()
            && !row
                .tenant_name
                .as_deref()
                .is_some_and(|v| self.tenant_names.contains(v))
        {
            return false;
        }
        if let Some(range) = &self.date_range {
            let row_date: NaiveDate = row.created_at.date();
            if let Some(exact) = range.exact {
                return row_date == exact;
            }
            if let Some(start) = range.start {
                if row_date < start {
                    return false;
                }
            }
            if let Some(end) = range.end {
                if row_date > end {
                    return false;
                }
            }
        }
        true
    }
}

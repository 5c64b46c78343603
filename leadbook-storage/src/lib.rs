//! Leadbook Storage - Remote Record Store boundary
//!
//! The [`RecordStore`] trait is the only way the access layers reach
//! persisted data. Rows cross the boundary as JSON objects keyed by the
//! store's column names; typed decoding happens on the caller's side.

pub mod mock;
pub mod rest;

pub use mock::{MockRecordStore, StoreCall, StoreOperation};
pub use rest::{RestRecordStore, StoreEndpoint};

use async_trait::async_trait;
use leadbook_core::StoreError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// Result type alias for record store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// ============================================================================
// TABLES AND QUERIES
// ============================================================================

/// Tables of the hosted store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Leads,
    LeadNotes,
    CalledByUsers,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Leads => "leads",
            Table::LeadNotes => "lead_notes",
            Table::CalledByUsers => "called_by_users",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result ordering on one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// Selection over a table: equality filters combined with AND, plus an
/// optional ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    filters: Vec<(String, String)>,
    order: Option<Order>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep rows whose `column` equals `value`.
    pub fn eq(mut self, column: impl Into<String>, value: impl fmt::Display) -> Self {
        self.filters.push((column.into(), value.to_string()));
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.into(),
            ascending,
        });
        self
    }

    pub fn filters(&self) -> &[(String, String)] {
        &self.filters
    }

    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    /// PostgREST query-string parameters for this selection.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(
            self.filters
                .iter()
                .map(|(column, value)| (column.clone(), format!("eq.{}", value))),
        );
        if let Some(order) = &self.order {
            let direction = if order.ascending { "asc" } else { "desc" };
            params.push(("order".to_string(), format!("{}.{}", order.column, direction)));
        }
        params
    }
}

// ============================================================================
// STORE TRAIT
// ============================================================================

/// Remote record store: select, insert, update and delete over the
/// hosted tables.
///
/// Implementations assign ids and timestamps on insert and return the
/// stored representation of every written row.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Rows matching `query`, in the query's order.
    async fn select(&self, table: Table, query: &Query) -> StoreResult<Vec<Value>>;

    /// Insert one or more rows in a single call. Either every row is
    /// stored or none is.
    async fn insert(&self, table: Table, rows: Vec<Value>) -> StoreResult<Vec<Value>>;

    /// Apply a partial update to the row with `id`. Fails with
    /// [`StoreError::NotFound`] when no row matched.
    async fn update(&self, table: Table, id: &str, patch: Value) -> StoreResult<Value>;

    /// Delete the row with `id`.
    async fn delete(&self, table: Table, id: &str) -> StoreResult<()>;
}

/// Decode one row into a typed record.
pub fn decode_row<T: DeserializeOwned>(table: Table, row: Value) -> StoreResult<T> {
    serde_json::from_value(row).map_err(|e| StoreError::Decode {
        table: table.name().to_string(),
        reason: e.to_string(),
    })
}

/// Decode every row, skipping malformed ones with a warning.
pub fn decode_valid_rows<T: DeserializeOwned>(table: Table, rows: Vec<Value>) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| match decode_row(table, row) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(table = %table, error = %err, "skipping malformed row");
                None
            }
        })
        .collect()
}

/// The first returned row of a write, or a decode error naming the table.
pub fn first_row(table: Table, rows: Vec<Value>) -> StoreResult<Value> {
    rows.into_iter().next().ok_or_else(|| StoreError::Decode {
        table: table.name().to_string(),
        reason: "store returned no rows".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_params_follow_postgrest_syntax() {
        let query = Query::new()
            .eq("remarks", "No Answer")
            .order_by("created_at", false);
        assert_eq!(
            query.to_params(),
            vec![
                ("select".to_string(), "*".to_string()),
                ("remarks".to_string(), "eq.No Answer".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
            ]
        );
    }

    #[test]
    fn bare_query_selects_everything() {
        assert_eq!(
            Query::new().to_params(),
            vec![("select".to_string(), "*".to_string())]
        );
    }

    #[test]
    fn decode_row_reports_table() {
        let err = decode_row::<leadbook_core::CalledByUser>(Table::CalledByUsers, json!({"x": 1}))
            .unwrap_err();
        assert!(matches!(err, StoreError::Decode { table, .. } if table == "called_by_users"));
    }

    #[test]
    fn valid_rows_survive_malformed_neighbours() {
        let rows = vec![
            json!({"name": "Ian"}),
            json!({"name": 7}),
            json!({"name": "Luisa"}),
        ];
        let users: Vec<leadbook_core::CalledByUser> =
            decode_valid_rows(Table::CalledByUsers, rows);
        let names: Vec<&str> = users.iter().map(|user| user.name.as_str()).collect();
        assert_eq!(names, vec!["Ian", "Luisa"]);
    }

    #[test]
    fn first_row_of_empty_write_is_error() {
        assert!(first_row(Table::Leads, vec![]).is_err());
        assert_eq!(
            first_row(Table::Leads, vec![json!({"id": "a"})]).unwrap(),
            json!({"id": "a"})
        );
    }
}

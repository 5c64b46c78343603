//! In-memory record store for tests.
//!
//! Mirrors the hosted store's observable behaviour: ids and timestamps are
//! assigned on insert, `updated_at` moves on every lead update, called-by
//! names are unique, notes must reference an existing lead and deleting a
//! lead deletes its notes. Every call is logged, and single calls can be
//! made to fail on demand.

use crate::{Query, RecordStore, StoreResult, Table};
use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use leadbook_core::{Remark, StoreError};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

type Row = Map<String, Value>;

/// Kind of store call, as recorded in the call log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    Select,
    Insert,
    Update,
    Delete,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            StoreOperation::Select => "select",
            StoreOperation::Insert => "insert",
            StoreOperation::Update => "update",
            StoreOperation::Delete => "delete",
        };
        f.write_str(value)
    }
}

/// One logged store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCall {
    pub operation: StoreOperation,
    pub table: Table,
    /// Row id for updates and deletes.
    pub target: Option<String>,
    /// Number of rows sent with an insert.
    pub rows: usize,
}

#[derive(Debug, Default)]
struct MockState {
    tables: HashMap<Table, Vec<Row>>,
    calls: Vec<StoreCall>,
    pending_failures: Vec<(StoreOperation, Table)>,
    last_timestamp: Option<DateTime<Utc>>,
}

/// In-memory [`RecordStore`]. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MockRecordStore {
    state: Arc<Mutex<MockState>>,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make the next `operation` on `table` fail with
    /// [`StoreError::Injected`]. The call is still logged.
    pub fn fail_next(&self, operation: StoreOperation, table: Table) {
        self.state().pending_failures.push((operation, table));
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.state().calls.clone()
    }

    /// Number of logged calls of one kind against one table.
    pub fn call_count(&self, operation: StoreOperation, table: Table) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| call.operation == operation && call.table == table)
            .count()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Stored rows of a table in insertion order.
    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.state()
            .tables
            .get(&table)
            .map(|rows| rows.iter().cloned().map(Value::Object).collect())
            .unwrap_or_default()
    }

    pub fn row_count(&self, table: Table) -> usize {
        self.state().tables.get(&table).map(Vec::len).unwrap_or(0)
    }

    /// Drop all data, logged calls and pending failures.
    pub fn clear(&self) {
        *self.state() = MockState::default();
    }
}

impl MockState {
    fn record(
        &mut self,
        operation: StoreOperation,
        table: Table,
        target: Option<&str>,
        rows: usize,
    ) -> StoreResult<()> {
        self.calls.push(StoreCall {
            operation,
            table,
            target: target.map(str::to_string),
            rows,
        });
        if let Some(index) = self
            .pending_failures
            .iter()
            .position(|pending| *pending == (operation, table))
        {
            self.pending_failures.remove(index);
            return Err(StoreError::Injected {
                operation: operation.to_string(),
                table: table.to_string(),
            });
        }
        Ok(())
    }

    /// Strictly increasing microsecond timestamps, so ordering by
    /// `created_at` is total.
    fn next_timestamp(&mut self) -> String {
        let now = Utc::now();
        let now = now - Duration::nanoseconds(i64::from(now.timestamp_subsec_nanos() % 1_000));
        let stamp = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(stamp);
        stamp.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn contains_id(&self, table: Table, id: &str) -> bool {
        self.tables
            .get(&table)
            .map(|rows| rows.iter().any(|row| row_id(row) == Some(id)))
            .unwrap_or(false)
    }

    fn check_insert(&self, table: Table, row: &Row, pending: &[Row]) -> StoreResult<()> {
        match table {
            Table::Leads => check_remarks(row),
            Table::LeadNotes => {
                let lead_id = row.get("lead_id").and_then(Value::as_str).unwrap_or("");
                if !self.contains_id(Table::Leads, lead_id) {
                    return Err(constraint(
                        table,
                        format!("lead_id '{}' does not reference a lead", lead_id),
                    ));
                }
                Ok(())
            }
            Table::CalledByUsers => {
                let name = row
                    .get("name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| constraint(table, "name must not be null"))?;
                let taken = self
                    .tables
                    .get(&table)
                    .into_iter()
                    .flatten()
                    .chain(pending)
                    .any(|existing| existing.get("name").and_then(Value::as_str) == Some(name));
                if taken {
                    return Err(constraint(
                        table,
                        format!("duplicate key value violates unique name '{}'", name),
                    ));
                }
                Ok(())
            }
        }
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn select(&self, table: Table, query: &Query) -> StoreResult<Vec<Value>> {
        let mut state = self.state();
        state.record(StoreOperation::Select, table, None, 0)?;

        let mut rows: Vec<&Row> = state
            .tables
            .get(&table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_filters(row, query.filters()))
                    .collect()
            })
            .unwrap_or_default();
        if let Some(order) = query.order() {
            rows.sort_by(|a, b| {
                let ordering = compare_values(a.get(&order.column), b.get(&order.column));
                if order.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }
        Ok(rows.into_iter().cloned().map(Value::Object).collect())
    }

    async fn insert(&self, table: Table, rows: Vec<Value>) -> StoreResult<Vec<Value>> {
        let mut state = self.state();
        state.record(StoreOperation::Insert, table, None, rows.len())?;

        let mut prepared: Vec<Row> = Vec::with_capacity(rows.len());
        for row in rows {
            let Value::Object(mut row) = row else {
                return Err(constraint(table, "row must be a JSON object"));
            };
            state.check_insert(table, &row, &prepared)?;
            row.entry("id")
                .or_insert_with(|| Value::String(Uuid::now_v7().to_string()));
            let stamp = Value::String(state.next_timestamp());
            if table == Table::Leads {
                row.insert("updated_at".to_string(), stamp.clone());
            }
            row.insert("created_at".to_string(), stamp);
            prepared.push(row);
        }

        state
            .tables
            .entry(table)
            .or_default()
            .extend(prepared.iter().cloned());
        Ok(prepared.into_iter().map(Value::Object).collect())
    }

    async fn update(&self, table: Table, id: &str, patch: Value) -> StoreResult<Value> {
        let mut state = self.state();
        state.record(StoreOperation::Update, table, Some(id), 1)?;

        let Value::Object(patch) = patch else {
            return Err(constraint(table, "patch must be a JSON object"));
        };
        if table == Table::Leads {
            check_remarks(&patch)?;
        }
        if !state.contains_id(table, id) {
            return Err(StoreError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            });
        }
        let stamp = (table == Table::Leads).then(|| state.next_timestamp());

        let rows = state.tables.entry(table).or_default();
        let Some(row) = rows.iter_mut().find(|row| row_id(row) == Some(id)) else {
            return Err(StoreError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            });
        };
        for (column, value) in patch {
            if column != "id" {
                row.insert(column, value);
            }
        }
        if let Some(stamp) = stamp {
            row.insert("updated_at".to_string(), Value::String(stamp));
        }
        Ok(Value::Object(row.clone()))
    }

    async fn delete(&self, table: Table, id: &str) -> StoreResult<()> {
        let mut state = self.state();
        state.record(StoreOperation::Delete, table, Some(id), 0)?;

        if let Some(rows) = state.tables.get_mut(&table) {
            rows.retain(|row| row_id(row) != Some(id));
        }
        if table == Table::Leads {
            if let Some(notes) = state.tables.get_mut(&Table::LeadNotes) {
                notes.retain(|note| note.get("lead_id").and_then(Value::as_str) != Some(id));
            }
        }
        Ok(())
    }
}

fn row_id(row: &Row) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

fn constraint(table: Table, reason: impl Into<String>) -> StoreError {
    StoreError::Constraint {
        table: table.to_string(),
        reason: reason.into(),
    }
}

fn check_remarks(row: &Row) -> StoreResult<()> {
    match row.get("remarks") {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(value)) if Remark::from_db_str(value).is_ok() => Ok(()),
        Some(other) => Err(constraint(
            Table::Leads,
            format!("invalid input value for enum lead_status: {}", other),
        )),
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn matches_filters(row: &Row, filters: &[(String, String)]) -> bool {
    filters.iter().all(|(column, expected)| {
        row.get(column).and_then(value_text).as_deref() == Some(expected.as_str())
    })
}

/// Nulls sort first; strings and numbers compare naturally.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn insert_lead(store: &MockRecordStore, first: &str, remarks: &str) -> Value {
        store
            .insert(Table::Leads, vec![json!({"firstname": first, "remarks": remarks})])
            .await
            .unwrap()
            .remove(0)
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamps() {
        let store = MockRecordStore::new();
        let row = insert_lead(&store, "Jane", "Leads").await;
        assert!(row["id"].as_str().is_some());
        assert_eq!(row["created_at"], row["updated_at"]);
        assert_eq!(store.row_count(Table::Leads), 1);
    }

    #[tokio::test]
    async fn select_filters_and_orders() {
        let store = MockRecordStore::new();
        insert_lead(&store, "A", "Leads").await;
        insert_lead(&store, "B", "Approved").await;
        insert_lead(&store, "C", "Leads").await;

        let query = Query::new().eq("remarks", "Leads").order_by("created_at", false);
        let rows = store.select(Table::Leads, &query).await.unwrap();
        let names: Vec<&str> = rows.iter().filter_map(|r| r["firstname"].as_str()).collect();
        assert_eq!(names, vec!["C", "A"]);
    }

    #[tokio::test]
    async fn invalid_status_is_rejected() {
        let store = MockRecordStore::new();
        let err = store
            .insert(Table::Leads, vec![json!({"firstname": "A", "remarks": "Hot"})])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint { .. }));
        assert_eq!(store.row_count(Table::Leads), 0);
    }

    #[tokio::test]
    async fn called_by_names_are_unique_and_batch_is_atomic() {
        let store = MockRecordStore::new();
        store
            .insert(Table::CalledByUsers, vec![json!({"name": "Ian"})])
            .await
            .unwrap();
        let err = store
            .insert(
                Table::CalledByUsers,
                vec![json!({"name": "Luisa"}), json!({"name": "Ian"})],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint { .. }));
        assert_eq!(store.row_count(Table::CalledByUsers), 1);
    }

    #[tokio::test]
    async fn notes_require_lead_and_cascade_on_delete() {
        let store = MockRecordStore::new();
        let orphan = store
            .insert(
                Table::LeadNotes,
                vec![json!({"lead_id": Uuid::now_v7().to_string(), "content": "x"})],
            )
            .await;
        assert!(orphan.is_err());

        let lead = insert_lead(&store, "Jane", "Leads").await;
        let lead_id = lead["id"].as_str().unwrap().to_string();
        store
            .insert(
                Table::LeadNotes,
                vec![json!({"lead_id": lead_id, "content": "first call"})],
            )
            .await
            .unwrap();
        assert_eq!(store.row_count(Table::LeadNotes), 1);

        store.delete(Table::Leads, &lead_id).await.unwrap();
        assert_eq!(store.row_count(Table::LeadNotes), 0);
    }

    #[tokio::test]
    async fn update_merges_patch_and_moves_updated_at() {
        let store = MockRecordStore::new();
        let lead = insert_lead(&store, "Jane", "Leads").await;
        let id = lead["id"].as_str().unwrap();

        let updated = store
            .update(Table::Leads, id, json!({"source": "Web", "id": "ignored"}))
            .await
            .unwrap();
        assert_eq!(updated["id"], lead["id"]);
        assert_eq!(updated["source"], "Web");
        assert_eq!(updated["created_at"], lead["created_at"]);
        assert_ne!(updated["updated_at"], lead["updated_at"]);
    }

    #[tokio::test]
    async fn update_of_missing_row_is_not_found() {
        let store = MockRecordStore::new();
        let err = store
            .update(Table::Leads, "nope", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn injected_failure_fires_once_and_is_logged() {
        let store = MockRecordStore::new();
        store.fail_next(StoreOperation::Select, Table::Leads);

        assert!(store.select(Table::Leads, &Query::new()).await.is_err());
        assert!(store.select(Table::Leads, &Query::new()).await.is_ok());
        assert_eq!(store.call_count(StoreOperation::Select, Table::Leads), 2);
    }

    #[tokio::test]
    async fn call_log_records_targets() {
        let store = MockRecordStore::new();
        store.delete(Table::Leads, "abc").await.unwrap();
        assert_eq!(
            store.calls(),
            vec![StoreCall {
                operation: StoreOperation::Delete,
                table: Table::Leads,
                target: Some("abc".to_string()),
                rows: 0,
            }]
        );
        store.clear_calls();
        assert!(store.calls().is_empty());
    }

    #[test]
    fn nulls_sort_first() {
        let text = json!("a");
        assert_eq!(compare_values(None, Some(&text)), Ordering::Less);
        assert_eq!(compare_values(Some(&Value::Null), None), Ordering::Equal);
    }
}

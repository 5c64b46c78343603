//! Lead access layer.
//!
//! Owns the cached lead list and the called-by directory for one status
//! view. Every remote failure is logged, surfaced as an error
//! notification and returned; the cache only changes after the store
//! confirms a write.

use crate::error::{ClientError, ClientResult};
use crate::notifications::Notifier;
use crate::state::LoadState;
use leadbook_core::{
    distinct_values, filter_leads, parse_leads_csv, suggest_called_by, CalledByUser, Lead,
    LeadDraft, LeadField, LeadFilters, LeadId, LeadPatch, PipelineKind, Remark, StoreError,
    ValidationError,
};
use leadbook_storage::{decode_row, decode_valid_rows, first_row, Query, RecordStore, Table};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::io::Read;
use std::sync::Arc;

/// Outcome of a batch delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchDeleteReport {
    pub deleted: Vec<LeadId>,
    pub failed: Vec<(LeadId, StoreError)>,
}

impl BatchDeleteReport {
    pub fn attempted(&self) -> usize {
        self.deleted.len() + self.failed.len()
    }
}

pub struct LeadAccess {
    store: Arc<dyn RecordStore>,
    notifier: Notifier,
    remark_filter: Option<Remark>,
    leads: Vec<Lead>,
    called_by_users: Vec<String>,
    directory_loaded: bool,
    state: LoadState,
}

impl LeadAccess {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Notifier, remark_filter: Option<Remark>) -> Self {
        Self {
            store,
            notifier,
            remark_filter,
            leads: Vec::new(),
            called_by_users: Vec::new(),
            directory_loaded: false,
            state: LoadState::Loading,
        }
    }

    /// Cached leads, newest first.
    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn get(&self, id: LeadId) -> Option<&Lead> {
        self.leads.iter().find(|lead| lead.id == id)
    }

    /// Known called-by names, sorted.
    pub fn called_by_users(&self) -> &[String] {
        &self.called_by_users
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn remark_filter(&self) -> Option<Remark> {
        self.remark_filter
    }

    /// Switch the status view. Takes effect on the next [`list`](Self::list).
    pub fn set_remark_filter(&mut self, remark_filter: Option<Remark>) {
        self.remark_filter = remark_filter;
    }

    /// Pipeline of the active status view; contacts when unfiltered.
    pub fn pipeline(&self) -> PipelineKind {
        self.remark_filter
            .map(|remark| remark.pipeline_kind())
            .unwrap_or_default()
    }

    // ========================================================================
    // REMOTE OPERATIONS
    // ========================================================================

    /// Reload the cache (newest first) and the called-by directory. A
    /// failed directory lookup is logged and keeps the previous names.
    pub async fn list(&mut self) -> ClientResult<&[Lead]> {
        self.state = LoadState::Loading;
        let leads = match self.fetch_leads().await {
            Ok(leads) => leads,
            Err(err) => {
                self.state = LoadState::Failed(err.to_string());
                return Err(self.report("Failed to fetch leads.", err));
            }
        };
        match self.fetch_called_by().await {
            Ok(names) => {
                self.called_by_users = names;
                self.directory_loaded = true;
            }
            Err(err) => tracing::warn!(error = %err, "failed to fetch called-by names"),
        }
        tracing::info!(
            count = leads.len(),
            remark_filter = ?self.remark_filter,
            "leads loaded"
        );
        self.leads = leads;
        self.state = LoadState::Loaded;
        Ok(self.leads.as_slice())
    }

    pub async fn create(&mut self, draft: LeadDraft) -> ClientResult<Lead> {
        match self.try_create(draft).await {
            Ok(lead) => {
                self.notifier.success("Lead added successfully.");
                Ok(lead)
            }
            Err(err) => Err(self.report("Failed to add lead.", err)),
        }
    }

    pub async fn update(&mut self, id: LeadId, patch: LeadPatch) -> ClientResult<Lead> {
        match self.try_update(id, patch).await {
            Ok(lead) => {
                self.notifier.success("Lead updated successfully.");
                Ok(lead)
            }
            Err(err) => Err(self.report("Failed to update lead.", err)),
        }
    }

    /// Move a lead to another status.
    pub async fn set_status(&mut self, id: LeadId, remarks: Remark) -> ClientResult<Lead> {
        self.update(id, LeadPatch::new().with_remarks(remarks)).await
    }

    pub async fn delete(&mut self, id: LeadId) -> ClientResult<()> {
        match self.store.delete(Table::Leads, &id.to_string()).await {
            Ok(()) => {
                self.leads.retain(|lead| lead.id != id);
                tracing::info!(lead_id = %id, "lead deleted");
                self.notifier.success("Lead deleted successfully.");
                Ok(())
            }
            Err(err) => Err(self.report("Failed to delete lead.", err)),
        }
    }

    /// Delete each id on its own, collecting failures. Deleted ids leave
    /// the cache even when others fail.
    pub async fn batch_delete(&mut self, ids: &[LeadId]) -> ClientResult<BatchDeleteReport> {
        let mut report = BatchDeleteReport::default();
        for id in ids {
            match self.store.delete(Table::Leads, &id.to_string()).await {
                Ok(()) => report.deleted.push(*id),
                Err(err) => {
                    tracing::error!(lead_id = %id, error = %err, "lead delete failed");
                    report.failed.push((*id, err));
                }
            }
        }

        let deleted: HashSet<LeadId> = report.deleted.iter().copied().collect();
        self.leads.retain(|lead| !deleted.contains(&lead.id));

        if report.failed.is_empty() {
            tracing::info!(count = report.deleted.len(), "leads deleted");
            if !report.deleted.is_empty() {
                self.notifier
                    .success(format!("{} leads deleted successfully.", report.deleted.len()));
            }
            Ok(report)
        } else {
            self.notifier.error(format!(
                "Failed to delete {} of {} leads.",
                report.failed.len(),
                report.attempted()
            ));
            Err(ClientError::BatchDelete { report })
        }
    }

    /// Insert many leads in one call, registering their new called-by
    /// names first, then reload the cache. Returns the inserted count.
    pub async fn batch_import(&mut self, drafts: Vec<LeadDraft>) -> ClientResult<usize> {
        let count = match self.try_batch_import(drafts).await {
            Ok(count) => count,
            Err(err) => return Err(self.report("Failed to import leads.", err)),
        };
        tracing::info!(count, "leads imported");
        self.notifier
            .success(format!("Successfully imported {} leads.", count));
        self.list().await?;
        Ok(count)
    }

    /// Parse a CSV file with the active pipeline's profile and import it.
    /// Structural failures abort before any remote call.
    pub async fn import_csv<R: Read>(&mut self, reader: R) -> ClientResult<usize> {
        let pipeline = self.pipeline();
        let default_remark = self
            .remark_filter
            .unwrap_or_else(|| pipeline.default_remark());
        let import = match parse_leads_csv(reader, pipeline, default_remark) {
            Ok(import) => import,
            Err(err) => {
                tracing::error!(error = %err, pipeline = %pipeline, "csv import rejected");
                self.notifier.error(err.to_string());
                return Err(err.into());
            }
        };
        if import.skipped_rows > 0 {
            tracing::warn!(skipped = import.skipped_rows, "csv rows without required values");
            self.notifier.warning(format!(
                "Skipped {} rows without required values.",
                import.skipped_rows
            ));
        }
        self.batch_import(import.drafts).await
    }

    // ========================================================================
    // LOCAL QUERIES
    // ========================================================================

    pub fn filter(&self, criteria: &LeadFilters) -> Vec<&Lead> {
        filter_leads(&self.leads, criteria)
    }

    pub fn distinct_values(&self, field: LeadField) -> Vec<String> {
        distinct_values(&self.leads, field)
    }

    pub fn suggest_called_by(&self, input: &str) -> Vec<&str> {
        suggest_called_by(&self.called_by_users, input)
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    async fn fetch_leads(&self) -> ClientResult<Vec<Lead>> {
        let mut query = Query::new().order_by("created_at", false);
        if let Some(remark) = self.remark_filter {
            query = query.eq(LeadField::Remarks.column(), remark.as_db_str());
        }
        tracing::debug!(remark_filter = ?self.remark_filter, "fetching leads");
        let rows = self.store.select(Table::Leads, &query).await?;
        Ok(decode_valid_rows(Table::Leads, rows))
    }

    async fn fetch_called_by(&self) -> ClientResult<Vec<String>> {
        let rows = self
            .store
            .select(Table::CalledByUsers, &Query::new().order_by("name", true))
            .await?;
        Ok(decode_valid_rows::<CalledByUser>(Table::CalledByUsers, rows)
            .into_iter()
            .map(|user| user.name)
            .collect())
    }

    async fn try_create(&mut self, draft: LeadDraft) -> ClientResult<Lead> {
        draft.validate()?;
        self.register_called_by(draft.called_by.as_deref()).await?;

        let rows = self.store.insert(Table::Leads, vec![draft.to_row()]).await?;
        let lead: Lead = decode_row(Table::Leads, first_row(Table::Leads, rows)?)?;
        if self.remark_filter.map_or(true, |remark| remark == lead.remarks) {
            self.leads.insert(0, lead.clone());
        }
        tracing::info!(lead_id = %lead.id, remarks = %lead.remarks, "lead created");
        Ok(lead)
    }

    async fn try_update(&mut self, id: LeadId, patch: LeadPatch) -> ClientResult<Lead> {
        self.register_called_by(patch.called_by()).await?;

        let row = self
            .store
            .update(Table::Leads, &id.to_string(), patch.to_row())
            .await?;
        let lead: Lead = decode_row(Table::Leads, row)?;

        let position = self.leads.iter().position(|cached| cached.id == id);
        match (self.remark_filter, position) {
            (Some(remark), Some(index)) if remark != lead.remarks => {
                self.leads.remove(index);
            }
            (_, Some(index)) => self.leads[index] = lead.clone(),
            (_, None) => {}
        }
        tracing::info!(lead_id = %id, fields = patch.fields().count(), "lead updated");
        Ok(lead)
    }

    async fn try_batch_import(&mut self, drafts: Vec<LeadDraft>) -> ClientResult<usize> {
        if drafts.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "leads".to_string(),
                reason: "no leads to import".to_string(),
            }
            .into());
        }
        for draft in &drafts {
            draft.validate()?;
        }
        self.register_called_by(drafts.iter().filter_map(|draft| draft.called_by.as_deref()))
            .await?;

        let rows: Vec<Value> = drafts.iter().map(LeadDraft::to_row).collect();
        let inserted = self.store.insert(Table::Leads, rows).await?;
        Ok(inserted.len())
    }

    /// Insert the names not yet in the directory, in one call. The
    /// directory is fetched first when no listing has loaded it. A failure
    /// here stops the lead write that triggered it.
    async fn register_called_by<'a>(
        &mut self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> ClientResult<()> {
        let names: Vec<&str> = names
            .into_iter()
            .filter(|name| !name.trim().is_empty())
            .collect();
        if names.is_empty() {
            return Ok(());
        }
        if !self.directory_loaded {
            self.called_by_users = self.fetch_called_by().await?;
            self.directory_loaded = true;
        }
        let unseen = CalledByUser::unseen(&self.called_by_users, names);
        if unseen.is_empty() {
            return Ok(());
        }
        let rows = unseen.iter().map(|name| json!({ "name": name })).collect();
        self.store.insert(Table::CalledByUsers, rows).await?;
        tracing::info!(count = unseen.len(), "called-by names registered");
        self.called_by_users.extend(unseen);
        self.called_by_users.sort();
        Ok(())
    }

    fn report(&self, message: &str, err: impl Into<ClientError>) -> ClientError {
        let err = err.into();
        tracing::error!(error = %err, "{}", message);
        self.notifier.error(message);
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn malformed_lead_rows_are_skipped() {
        let rows = vec![
            json!({
                "id": "0190f5a2-7c1e-7d3a-9b1e-1a2b3c4d5e6f",
                "firstname": "Jane",
                "remarks": "Leads",
                "created_at": "2024-05-01T10:00:00Z",
                "updated_at": "2024-05-01T10:00:00Z"
            }),
            json!({
                "id": "0190f5a2-7c1e-7d3a-9b1e-1a2b3c4d5e70",
                "firstname": "Ghost",
                "remarks": "Hot",
                "created_at": "2024-05-01T10:00:00Z",
                "updated_at": "2024-05-01T10:00:00Z"
            }),
        ];
        let leads: Vec<Lead> = decode_valid_rows(Table::Leads, rows);
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].first_name, "Jane");
    }

    #[test]
    fn report_counts_attempts() {
        let report = BatchDeleteReport {
            deleted: vec![LeadId::now_v7()],
            failed: vec![(
                LeadId::now_v7(),
                StoreError::Http {
                    reason: "offline".to_string(),
                },
            )],
        };
        assert_eq!(report.attempted(), 2);
        let err = ClientError::BatchDelete { report };
        assert_eq!(err.to_string(), "1 of 2 deletes failed");
    }
}

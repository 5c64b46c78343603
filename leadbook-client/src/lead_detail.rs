//! Single-lead loader.

use crate::error::{ClientError, ClientResult};
use crate::notifications::Notifier;
use leadbook_core::{Lead, LeadId, LeadPatch};
use leadbook_storage::{decode_row, Query, RecordStore, Table};
use std::sync::Arc;

/// What the detail view shows. `NotFound` is an inline state, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    Found(Box<Lead>),
    NotFound,
    Failed(String),
}

pub struct LeadDetail {
    store: Arc<dyn RecordStore>,
    notifier: Notifier,
    id: LeadId,
    state: DetailState,
}

impl LeadDetail {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Notifier, id: LeadId) -> Self {
        Self {
            store,
            notifier,
            id,
            state: DetailState::Loading,
        }
    }

    pub fn id(&self) -> LeadId {
        self.id
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn lead(&self) -> Option<&Lead> {
        match &self.state {
            DetailState::Found(lead) => Some(&**lead),
            _ => None,
        }
    }

    pub async fn load(&mut self) -> ClientResult<&DetailState> {
        self.state = DetailState::Loading;
        let query = Query::new().eq("id", self.id);
        let result = match self.store.select(Table::Leads, &query).await {
            Ok(rows) => match rows.into_iter().next() {
                Some(row) => decode_row::<Lead>(Table::Leads, row).map(Some),
                None => Ok(None),
            },
            Err(err) => Err(err),
        };
        match result {
            Ok(Some(lead)) => {
                tracing::debug!(lead_id = %self.id, "lead loaded");
                self.state = DetailState::Found(Box::new(lead));
            }
            Ok(None) => {
                tracing::info!(lead_id = %self.id, "lead not found");
                self.state = DetailState::NotFound;
            }
            Err(err) => {
                self.state = DetailState::Failed(err.to_string());
                return Err(self.report("Failed to fetch lead details.", err));
            }
        }
        Ok(&self.state)
    }

    /// Patch the lead and replace the loaded record with the stored one.
    pub async fn update(&mut self, patch: LeadPatch) -> ClientResult<Lead> {
        let result = match self
            .store
            .update(Table::Leads, &self.id.to_string(), patch.to_row())
            .await
        {
            Ok(row) => decode_row::<Lead>(Table::Leads, row),
            Err(err) => Err(err),
        };
        match result {
            Ok(lead) => {
                tracing::info!(lead_id = %self.id, "lead updated");
                self.state = DetailState::Found(Box::new(lead.clone()));
                self.notifier.success("Lead updated successfully.");
                Ok(lead)
            }
            Err(err) => Err(self.report("Failed to update lead.", err)),
        }
    }

    fn report(&self, message: &str, err: impl Into<ClientError>) -> ClientError {
        let err = err.into();
        tracing::error!(lead_id = %self.id, error = %err, "{}", message);
        self.notifier.error(message);
        err
    }
}

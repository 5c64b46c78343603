//! Note access layer for one lead.

use crate::error::{ClientError, ClientResult};
use crate::notifications::Notifier;
use crate::state::LoadState;
use leadbook_core::{note_content, LeadId, LeadNote, NoteDraft, NoteId, User};
use leadbook_storage::{decode_row, decode_valid_rows, first_row, Query, RecordStore, Table};
use serde_json::json;
use std::sync::Arc;

pub struct NoteAccess {
    store: Arc<dyn RecordStore>,
    notifier: Notifier,
    lead_id: LeadId,
    notes: Vec<LeadNote>,
    state: LoadState,
}

impl NoteAccess {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Notifier, lead_id: LeadId) -> Self {
        Self {
            store,
            notifier,
            lead_id,
            notes: Vec::new(),
            state: LoadState::Loading,
        }
    }

    pub fn lead_id(&self) -> LeadId {
        self.lead_id
    }

    /// Cached notes, newest first.
    pub fn notes(&self) -> &[LeadNote] {
        &self.notes
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub async fn list(&mut self) -> ClientResult<&[LeadNote]> {
        self.state = LoadState::Loading;
        let query = Query::new()
            .eq("lead_id", self.lead_id)
            .order_by("created_at", false);
        let result = self
            .store
            .select(Table::LeadNotes, &query)
            .await
            .map(|rows| decode_valid_rows::<LeadNote>(Table::LeadNotes, rows));
        match result {
            Ok(notes) => {
                tracing::info!(lead_id = %self.lead_id, count = notes.len(), "notes loaded");
                self.notes = notes;
                self.state = LoadState::Loaded;
                Ok(self.notes.as_slice())
            }
            Err(err) => {
                self.state = LoadState::Failed(err.to_string());
                Err(self.report("Failed to fetch notes.", err))
            }
        }
    }

    pub async fn create(&mut self, content: &str, author: &User) -> ClientResult<LeadNote> {
        match self.try_create(content, author).await {
            Ok(note) => {
                tracing::info!(lead_id = %self.lead_id, note_id = %note.id, "note added");
                self.notes.insert(0, note.clone());
                self.notifier.success("Note added.");
                Ok(note)
            }
            Err(err) => Err(self.report("Failed to add note.", err)),
        }
    }

    pub async fn update(&mut self, note_id: NoteId, content: &str) -> ClientResult<LeadNote> {
        match self.try_update(note_id, content).await {
            Ok(note) => {
                if let Some(cached) = self.notes.iter_mut().find(|cached| cached.id == note_id) {
                    *cached = note.clone();
                }
                tracing::info!(note_id = %note_id, "note updated");
                self.notifier.success("Note updated.");
                Ok(note)
            }
            Err(err) => Err(self.report("Failed to update note.", err)),
        }
    }

    pub async fn delete(&mut self, note_id: NoteId) -> ClientResult<()> {
        match self.store.delete(Table::LeadNotes, &note_id.to_string()).await {
            Ok(()) => {
                self.notes.retain(|note| note.id != note_id);
                tracing::info!(note_id = %note_id, "note deleted");
                self.notifier.success("Note deleted.");
                Ok(())
            }
            Err(err) => Err(self.report("Failed to delete note.", err)),
        }
    }

    async fn try_create(&self, content: &str, author: &User) -> ClientResult<LeadNote> {
        let draft = NoteDraft::new(self.lead_id, content, author)?;
        let rows = self
            .store
            .insert(Table::LeadNotes, vec![draft.to_row()])
            .await?;
        Ok(decode_row(Table::LeadNotes, first_row(Table::LeadNotes, rows)?)?)
    }

    async fn try_update(&self, note_id: NoteId, content: &str) -> ClientResult<LeadNote> {
        let content = note_content(content)?;
        let row = self
            .store
            .update(
                Table::LeadNotes,
                &note_id.to_string(),
                json!({ "content": content }),
            )
            .await?;
        Ok(decode_row(Table::LeadNotes, row)?)
    }

    fn report(&self, message: &str, err: impl Into<ClientError>) -> ClientError {
        let err = err.into();
        tracing::error!(lead_id = %self.lead_id, error = %err, "{}", message);
        self.notifier.error(message);
        err
    }
}

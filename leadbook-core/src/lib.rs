//! Leadbook Core - Record Types
//!
//! Pure data structures and the pure functions over them: filtering,
//! called-by suggestions and CSV import. No I/O beyond reading an
//! in-memory CSV source. All other crates depend on this.

mod entities;
mod enums;
mod error;
mod filter;
mod identity;
mod import;

pub use entities::{
    join_links, note_content, split_links, CalledByUser, ContactDetails, Lead, LeadDraft,
    LeadNote, LeadPatch, LeadRow, NoteDraft, PipelinePayload, PropertyDetails,
};
pub use enums::{LeadField, PipelineKind, Remark, RemarkParseError};
pub use error::{ImportError, LeadbookError, LeadbookResult, StoreError, ValidationError};
pub use filter::{distinct_values, filter_leads, suggest_called_by, LeadFilters};
pub use identity::{LeadId, NoteId, Timestamp, User};
pub use import::{csv_template, parse_leads_csv, split_full_name, CsvImport, ImportProfile};

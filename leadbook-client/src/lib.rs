//! Leadbook client: access layers over the record store, the current-user
//! session, notifications and configuration.

pub mod config;
pub mod error;
pub mod lead_detail;
pub mod leads;
pub mod notes;
pub mod notifications;
pub mod persistence;
pub mod session;
pub mod state;
pub mod telemetry;

pub use config::{ClientConfig, ConfigError, LogFormat};
pub use error::{ClientError, ClientResult};
pub use lead_detail::{DetailState, LeadDetail};
pub use leads::{BatchDeleteReport, LeadAccess};
pub use notes::NoteAccess;
pub use notifications::{Notification, NotificationAction, NotificationLevel, Notifier};
pub use session::Session;
pub use state::LoadState;

//! Outcome notifications for the presentation layer.

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAction {
    Dismiss,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
    pub action: Option<NotificationAction>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
            action: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_action(mut self, action: NotificationAction) -> Self {
        self.action = Some(action);
        self
    }
}

/// Sending half of the notification channel. Cheap to clone; sends never
/// block, and are dropped once the receiver is gone.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn notify(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            tracing::trace!("notification receiver dropped");
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(Notification::new(NotificationLevel::Success, "Success", message));
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.notify(Notification::new(NotificationLevel::Warning, "Warning", message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(
            Notification::new(NotificationLevel::Error, "Error", message)
                .with_action(NotificationAction::Dismiss),
        );
    }
}

/// Drain everything queued so far without waiting.
pub fn drain(receiver: &mut mpsc::UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut drained = Vec::new();
    while let Ok(notification) = receiver.try_recv() {
        drained.push(notification);
    }
    drained
}

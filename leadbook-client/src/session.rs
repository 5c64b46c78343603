//! Current-user session.
//!
//! The session owns the persisted user and publishes every change on a
//! watch channel. Another process editing the session file is picked up by
//! [`Session::reload`], which publishes only when the stored user differs.

use crate::error::{ClientError, ClientResult};
use crate::persistence;
use leadbook_core::User;
use std::path::{Path, PathBuf};
use tokio::sync::watch;

#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    known_users: Vec<String>,
    sender: watch::Sender<Option<User>>,
}

impl Session {
    /// Open the session stored at `path`, restoring any persisted user.
    pub fn open(path: impl Into<PathBuf>, known_users: Vec<String>) -> ClientResult<Self> {
        let path = path.into();
        let user = persistence::load_user(&path)?;
        let (sender, _) = watch::channel(user);
        Ok(Self {
            path,
            known_users,
            sender,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn known_users(&self) -> &[String] {
        &self.known_users
    }

    pub fn get(&self) -> Option<User> {
        self.sender.borrow().clone()
    }

    /// Persist and publish a new user. Users outside the configured list
    /// are rejected.
    pub fn set(&self, user: Option<User>) -> ClientResult<()> {
        if let Some(user) = &user {
            if !self.known_users.iter().any(|known| known == user.name()) {
                return Err(ClientError::UnknownUser {
                    name: user.name().to_string(),
                    known: self.known_users.clone(),
                });
            }
        }
        persistence::save_user(&self.path, user.as_ref())?;
        self.publish(user);
        Ok(())
    }

    pub fn login(&self, name: &str) -> ClientResult<User> {
        let user = User::new(name).ok_or_else(|| ClientError::UnknownUser {
            name: name.to_string(),
            known: self.known_users.clone(),
        })?;
        self.set(Some(user.clone()))?;
        tracing::info!(user = %user, "logged in");
        Ok(user)
    }

    pub fn logout(&self) -> ClientResult<()> {
        self.set(None)?;
        tracing::info!("logged out");
        Ok(())
    }

    /// Receiver that observes every published change.
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.sender.subscribe()
    }

    /// Re-read the session file. Returns `true` when the stored user
    /// changed and a change was published.
    pub fn reload(&self) -> ClientResult<bool> {
        let user = persistence::load_user(&self.path)?;
        Ok(self.publish(user))
    }

    fn publish(&self, user: Option<User>) -> bool {
        self.sender.send_if_modified(|current| {
            if *current == user {
                false
            } else {
                *current = user;
                true
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known() -> Vec<String> {
        vec!["Ian".to_string(), "Yhome".to_string(), "Luisa".to_string()]
    }

    #[test]
    fn persisted_user_is_restored_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let session = Session::open(&path, known()).unwrap();
        assert_eq!(session.get(), None);
        session.login("Yhome").unwrap();

        let reopened = Session::open(&path, known()).unwrap();
        assert_eq!(reopened.get(), User::new("Yhome"));
    }

    #[test]
    fn unknown_user_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::open(dir.path().join("session.json"), known()).unwrap();
        assert!(matches!(
            session.login("Mallory"),
            Err(ClientError::UnknownUser { .. })
        ));
        assert!(session.login("  ").is_err());
        assert_eq!(session.get(), None);
    }

    #[tokio::test]
    async fn subscribers_observe_changes() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::open(dir.path().join("session.json"), known()).unwrap();
        let mut changes = session.subscribe();

        session.login("Ian").unwrap();
        changes.changed().await.unwrap();
        assert_eq!(*changes.borrow_and_update(), User::new("Ian"));

        session.logout().unwrap();
        changes.changed().await.unwrap();
        assert_eq!(*changes.borrow_and_update(), None);
    }

    #[test]
    fn reload_publishes_external_edits_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let session = Session::open(&path, known()).unwrap();
        let other = Session::open(&path, known()).unwrap();
        let changes = session.subscribe();

        assert!(!session.reload().unwrap());
        other.login("Luisa").unwrap();
        assert!(session.reload().unwrap());
        assert!(changes.has_changed().unwrap());
        assert_eq!(session.get(), User::new("Luisa"));
        assert!(!session.reload().unwrap());
    }
}

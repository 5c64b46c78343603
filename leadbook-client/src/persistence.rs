//! Persistence for the session file.
//!
//! The file is a JSON object holding the current user under the fixed key
//! `currentUser`; other keys are preserved on save.

use leadbook_core::User;
use serde_json::{Map, Value};
use std::path::Path;

pub const CURRENT_USER_KEY: &str = "currentUser";

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Session file is not a JSON object")]
    NotAnObject,
}

fn read_object(path: &Path) -> Result<Map<String, Value>, PersistenceError> {
    if !path.exists() {
        return Ok(Map::new());
    }
    let contents = std::fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(&contents)? {
        Value::Object(map) => Ok(map),
        _ => Err(PersistenceError::NotAnObject),
    }
}

/// Stored user, or `None` when the file or key is missing or blank.
pub fn load_user(path: &Path) -> Result<Option<User>, PersistenceError> {
    let object = read_object(path)?;
    Ok(object
        .get(CURRENT_USER_KEY)
        .and_then(Value::as_str)
        .and_then(User::new))
}

/// Store `user`, removing the key when `None`.
pub fn save_user(path: &Path, user: Option<&User>) -> Result<(), PersistenceError> {
    let mut object = read_object(path)?;
    match user {
        Some(user) => {
            object.insert(
                CURRENT_USER_KEY.to_string(),
                Value::String(user.name().to_string()),
            );
        }
        None => {
            object.remove(CURRENT_USER_KEY);
        }
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_string_pretty(&Value::Object(object))?;
    std::fs::write(path, contents)?;
    Ok(())
}

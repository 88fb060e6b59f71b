//! Mock credential store and session records.
//!
//! A local JSON user registry with a separate active-session record. This
//! is a stand-in for a real identity provider: passwords are stored in
//! plaintext and nothing here is a security boundary. The rest of the
//! engine only consumes the session's email as an opaque identity string
//! to namespace persisted progress.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// File holding all registered users.
const USERS_FILE_NAME: &str = "users.json";
/// File holding the active session, if any.
const SESSION_FILE_NAME: &str = "session.json";

/// Errors raised by the mock credential store.
#[derive(Error, Debug)]
pub enum AuthError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Signup with an email that is already registered.
    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    /// Login with an unknown email or wrong password.
    #[error("email or password does not match")]
    InvalidCredentials,
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    pub email: String,
    pub password: String,
    pub provider: String,
}

/// The logged-in user as seen by the rest of the application.
///
/// `email` doubles as the identity string that namespaces persisted
/// questionnaire progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub name: String,
    pub email: String,
    pub provider: String,
}

/// File-backed mock credential store.
#[derive(Debug, Clone)]
pub struct AuthStore {
    users_path: PathBuf,
    session_path: PathBuf,
}

impl AuthStore {
    /// Create a store rooted at `data_dir`, creating the directory if
    /// needed.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, AuthError> {
        let dir = data_dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            users_path: dir.join(USERS_FILE_NAME),
            session_path: dir.join(SESSION_FILE_NAME),
        })
    }

    /// Register a new email user. Rejects an already-registered email.
    pub fn signup(&self, name: &str, email: &str, password: &str) -> Result<(), AuthError> {
        let mut users = self.load_users()?;
        if users.iter().any(|u| u.email == email) {
            return Err(AuthError::DuplicateEmail(email.to_string()));
        }
        users.push(UserRecord {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            provider: "email".to_string(),
        });
        write_json(&self.users_path, &users)?;
        info!(email, "registered new user");
        Ok(())
    }

    /// Log in with email credentials and persist the session.
    pub fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let users = self.load_users()?;
        let user = users
            .iter()
            .find(|u| u.email == email && u.password == password)
            .ok_or(AuthError::InvalidCredentials)?;
        let session = Session {
            name: user.name.clone(),
            email: user.email.clone(),
            provider: user.provider.clone(),
        };
        write_json(&self.session_path, &session)?;
        Ok(session)
    }

    /// Mock social login: fabricates a provider-derived session without any
    /// credential exchange.
    pub fn social_login(&self, provider: &str) -> Result<Session, AuthError> {
        let session = Session {
            name: format!("{provider} 사용자"),
            email: format!("user@{}.com", provider.to_lowercase()),
            provider: provider.to_string(),
        };
        write_json(&self.session_path, &session)?;
        Ok(session)
    }

    /// The active session, if one is stored.
    pub fn current(&self) -> Result<Option<Session>, AuthError> {
        match fs::read_to_string(&self.session_path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AuthError::Io(e)),
        }
    }

    /// Drop the active session, if any.
    pub fn logout(&self) -> Result<(), AuthError> {
        match fs::remove_file(&self.session_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::Io(e)),
        }
    }

    fn load_users(&self) -> Result<Vec<UserRecord>, AuthError> {
        match fs::read_to_string(&self.users_path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(AuthError::Io(e)),
        }
    }
}

/// Atomic JSON write: temp file in the same directory, then rename.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AuthError> {
    let json = serde_json::to_string_pretty(value)?;
    let temp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

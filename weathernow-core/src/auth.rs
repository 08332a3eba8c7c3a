//! Local accounts and bearer-token sessions.
//!
//! Passwords are stored as Argon2id PHC strings. Tokens are opaque random
//! identifiers with a fixed lifetime; [`AuthService::verify`] is the guard
//! callers run before touching the weather dashboard.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::{fs, io, path::PathBuf};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::error::AuthError;

/// Sessions expire one hour after login.
pub const SESSION_TTL_MINUTES: i64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Everything the account store persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountBook {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
}

pub trait AccountStore: Send + Sync {
    fn load(&self) -> Result<AccountBook, AuthError>;
    fn save(&self, book: &AccountBook) -> Result<(), AuthError>;
}

#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    book: Mutex<AccountBook>,
}

impl AccountStore for MemoryAccountStore {
    fn load(&self) -> Result<AccountBook, AuthError> {
        Ok(self.book.lock().clone())
    }

    fn save(&self, book: &AccountBook) -> Result<(), AuthError> {
        *self.book.lock() = book.clone();
        Ok(())
    }
}

/// Account book as a JSON file.
#[derive(Debug, Clone)]
pub struct FileAccountStore {
    path: PathBuf,
}

impl FileAccountStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AccountStore for FileAccountStore {
    fn load(&self) -> Result<AccountBook, AuthError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(AccountBook::default()),
            Err(e) => {
                return Err(AuthError::Storage(format!(
                    "Failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };

        serde_json::from_str(&contents)
            .map_err(|e| AuthError::Storage(format!("Failed to parse {}: {e}", self.path.display())))
    }

    fn save(&self, book: &AccountBook) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AuthError::Storage(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }

        let json = serde_json::to_string_pretty(book)
            .map_err(|e| AuthError::Storage(format!("Failed to serialize accounts: {e}")))?;

        fs::write(&self.path, json)
            .map_err(|e| AuthError::Storage(format!("Failed to write {}: {e}", self.path.display())))
    }
}

pub struct AuthService<S> {
    store: S,
    session_ttl: Duration,
}

impl<S: AccountStore> AuthService<S> {
    pub fn new(store: S) -> Self {
        Self { store, session_ttl: Duration::minutes(SESSION_TTL_MINUTES) }
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    #[instrument(skip(self, password))]
    pub fn register(&self, email: &str, password: &str) -> Result<Uuid, AuthError> {
        let email = required("email", email)?;
        if password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        let mut book = self.store.load()?;
        if book.users.iter().any(|u| u.email == email) {
            return Err(AuthError::DuplicateEmail);
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .to_string();

        let id = Uuid::new_v4();
        book.users.push(UserRecord { id, email: email.to_string(), password_hash });
        self.store.save(&book)?;

        info!(%id, "Registered user");
        Ok(id)
    }

    /// Check credentials and issue a fresh session token.
    #[instrument(skip(self, password))]
    pub fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        self.login_at(email, password, Utc::now())
    }

    fn login_at(&self, email: &str, password: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let email = required("email", email)?;
        let mut book = self.store.load()?;

        let user = book
            .users
            .iter()
            .find(|u| u.email == email)
            .ok_or(AuthError::InvalidCredentials)?;

        let parsed = PasswordHash::new(&user.password_hash)
            .map_err(|e| AuthError::Storage(format!("Corrupt password hash: {e}")))?;
        if Argon2::default().verify_password(password.as_bytes(), &parsed).is_err() {
            debug!("Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let user_id = user.id;
        let token = Uuid::new_v4().simple().to_string();
        book.sessions.retain(|s| s.expires_at > now);
        book.sessions.push(SessionRecord {
            token: token.clone(),
            user_id,
            expires_at: now + self.session_ttl,
        });
        self.store.save(&book)?;

        info!(%user_id, "Issued session");
        Ok(token)
    }

    /// Resolve a bearer token to its user id.
    pub fn verify(&self, token: &str) -> Result<Uuid, AuthError> {
        self.verify_at(token, Utc::now())
    }

    fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Uuid, AuthError> {
        let token = token.trim().trim_start_matches("Bearer ").trim();
        if token.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let book = self.store.load()?;
        let session = book
            .sessions
            .iter()
            .find(|s| s.token == token)
            .ok_or(AuthError::InvalidToken)?;

        if session.expires_at <= now {
            return Err(AuthError::SessionExpired);
        }
        Ok(session.user_id)
    }

    /// Drop a session. Unknown tokens are ignored.
    pub fn logout(&self, token: &str) -> Result<(), AuthError> {
        let mut book = self.store.load()?;
        let before = book.sessions.len();
        book.sessions.retain(|s| s.token != token);
        if book.sessions.len() != before {
            self.store.save(&book)?;
        }
        Ok(())
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, AuthError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AuthError::MissingField(field));
    }
    Ok(value)
}

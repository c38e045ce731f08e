//! JSON-file-backed user store with bcrypt password hashing.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::User => f.write_str("user"),
        }
    }
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserRecord {
    username: String,
    password_hash: String,
    role: Role,
}

/// Result of a registration attempt. `AlreadyExists` is a normal return
/// value, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Created,
    AlreadyExists,
}

/// User store over a pretty-printed JSON file, created on first write.
pub struct UserStore {
    path: PathBuf,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<UserRecord>, AuthError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = std::fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&data)?)
    }

    fn save(&self, users: &[UserRecord]) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(users)?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }

    /// Register a new user. Returns `AlreadyExists` without touching the
    /// store when the username is taken.
    pub fn register(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<RegisterOutcome, AuthError> {
        let mut users = self.load()?;
        if users.iter().any(|u| u.username == username) {
            return Ok(RegisterOutcome::AlreadyExists);
        }

        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| AuthError::Hash(e.to_string()))?;
        users.push(UserRecord {
            username: username.to_string(),
            password_hash,
            role,
        });
        self.save(&users)?;

        info!(username = %username, role = %role, "user registered");
        Ok(RegisterOutcome::Created)
    }

    /// Verify credentials. Returns the user's role on success, `None` for
    /// an unknown username or wrong password.
    pub fn verify(&self, username: &str, password: &str) -> Result<Option<Role>, AuthError> {
        let users = self.load()?;
        let Some(user) = users.iter().find(|u| u.username == username) else {
            return Ok(None);
        };

        let matches = bcrypt::verify(password, &user.password_hash)
            .map_err(|e| AuthError::Hash(e.to_string()))?;
        Ok(matches.then_some(user.role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> UserStore {
        UserStore::new(dir.path().join("credentials.json"))
    }

    #[test]
    fn register_then_verify() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let outcome = store.register("alice", "hunter2", Role::Admin).unwrap();
        assert_eq!(outcome, RegisterOutcome::Created);

        assert_eq!(store.verify("alice", "hunter2").unwrap(), Some(Role::Admin));
        assert_eq!(store.verify("alice", "wrong").unwrap(), None);
        assert_eq!(store.verify("bob", "hunter2").unwrap(), None);
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.register("alice", "one", Role::User).unwrap();
        let outcome = store.register("alice", "two", Role::Admin).unwrap();
        assert_eq!(outcome, RegisterOutcome::AlreadyExists);

        // The original password still verifies.
        assert_eq!(store.verify("alice", "one").unwrap(), Some(Role::User));
    }

    #[test]
    fn missing_file_means_no_users() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.verify("nobody", "pw").unwrap(), None);
    }

    #[test]
    fn passwords_are_stored_hashed() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.register("alice", "plaintext", Role::User).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(!raw.contains("plaintext"));
        assert!(raw.contains("alice"));
    }

    #[test]
    fn role_parse() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("root"), None);
    }
}

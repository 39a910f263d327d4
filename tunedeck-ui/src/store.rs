//! Account store: usernames and plaintext passwords.
//!
//! Passwords are stored and compared as plaintext strings. That is the
//! inherited contract of the surrounding system and is kept as-is;
//! credential security is explicitly out of scope.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tunedeck_common::{Error, Result};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Persistent username -> password map under the data root.
pub struct AccountStore {
    path: PathBuf,
    users: BTreeMap<String, String>,
}

impl AccountStore {
    /// Load the account file; a missing file is an empty store.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join("users.json");
        let users = if path.exists() {
            let text = std::fs::read_to_string(&path)?;
            serde_json::from_str(&text)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, users })
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    /// Register a new account and persist immediately.
    pub fn register(&mut self, username: &str, password: &str) -> Result<()> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::InvalidInput("Username cannot be empty".into()));
        }
        if self.users.contains_key(username) {
            return Err(Error::InvalidInput("Username already exists".into()));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(Error::InvalidInput(format!(
                "Password too short (min {MIN_PASSWORD_LEN} chars)"
            )));
        }
        self.users.insert(username.to_owned(), password.to_owned());
        self.save()
    }

    /// Plaintext comparison, matching the legacy credential check.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.users.get(username).map(String::as_str) == Some(password)
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&self.users)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn register_then_verify() {
        let root = TempDir::new().unwrap();
        let mut store = AccountStore::load(root.path()).unwrap();
        assert!(store.is_empty());

        store.register("ana", "secret123").unwrap();
        assert!(store.verify("ana", "secret123"));
        assert!(!store.verify("ana", "wrong"));
        assert!(!store.verify("bob", "secret123"));

        // Accounts persist across loads.
        let reloaded = AccountStore::load(root.path()).unwrap();
        assert!(reloaded.verify("ana", "secret123"));
    }

    #[test]
    fn register_validations() {
        let root = TempDir::new().unwrap();
        let mut store = AccountStore::load(root.path()).unwrap();

        assert!(store.register("", "secret123").is_err());
        assert!(store.register("ana", "short").is_err());
        store.register("ana", "secret123").unwrap();
        let err = store.register("ana", "other-password").unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}

use std::collections::HashMap;
use std::sync::RwLock;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::UserStore;
use crate::error::StoreError;

/// An account allowed to log in. The password is kept as a salted SHA-256
/// digest, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    username: String,
    salt: String,
    password_hash: String,
    role: String,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        password: &str,
        role: impl Into<String>,
    ) -> Self {
        let mut salt = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);
        let salt = hex::encode(salt);
        let password_hash = hash_password(&salt, password);
        Self {
            username: username.into(),
            salt,
            password_hash,
            role: role.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn is_correct_password(&self, password: &str) -> bool {
        let candidate = hash_password(&self.salt, password);
        // Constant-time comparison.
        candidate.len() == self.password_hash.len()
            && candidate
                .bytes()
                .zip(self.password_hash.bytes())
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for InMemoryUserStore {
    fn save(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self
            .users
            .write()
            .map_err(|_| StoreError::LockPoisoned("user write"))?;
        if users.contains_key(user.username()) {
            return Err(StoreError::AlreadyExists(user.username().to_string()));
        }
        users.insert(user.username().to_string(), user.clone());
        Ok(())
    }

    fn find(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self
            .users
            .read()
            .map_err(|_| StoreError::LockPoisoned("user read"))?;
        Ok(users.get(username).cloned())
    }
}

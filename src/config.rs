//! Runtime settings for the server and client executables.
//!
//! Both structs have usable defaults; the binaries overlay command-line flags
//! and environment variables (via clap) and then call `validate`.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::AccessRules;
use crate::grpc::{methods, MAX_IMAGE_SIZE};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("token secret must not be empty")]
    EmptySecret,
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("username must not be empty")]
    EmptyUsername,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Folder uploaded images are written to.
    pub image_dir: PathBuf,
    pub token_secret: String,
    pub token_ttl_secs: u64,
    pub max_image_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            image_dir: PathBuf::from("img"),
            token_secret: "secret".to_string(),
            token_ttl_secs: 15 * 60,
            max_image_size: MAX_IMAGE_SIZE,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if self.token_ttl_secs == 0 {
            return Err(ConfigError::Zero("token_ttl_secs"));
        }
        if self.max_image_size == 0 {
            return Err(ConfigError::Zero("max_image_size"));
        }
        Ok(())
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub address: String,
    pub username: String,
    pub password: String,
    pub refresh_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: "http://127.0.0.1:8080".to_string(),
            username: "admin1".to_string(),
            password: "secret".to_string(),
            refresh_secs: 30,
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.username.is_empty() {
            return Err(ConfigError::EmptyUsername);
        }
        if self.refresh_secs == 0 {
            return Err(ConfigError::Zero("refresh_secs"));
        }
        Ok(())
    }

    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }
}

/// Method → roles table the server enforces.
pub fn default_access_rules() -> AccessRules {
    AccessRules::new()
        .allow(methods::CREATE_ITEM, &["admin"])
        .allow(methods::UPLOAD_IMAGE, &["admin"])
        .allow(methods::RATE_ITEM, &["admin", "user"])
}

/// Paths the client attaches its token to.
pub fn default_auth_methods() -> Vec<&'static str> {
    vec![methods::CREATE_ITEM, methods::UPLOAD_IMAGE, methods::RATE_ITEM]
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use crate::{Error, Result};

pub const DEFAULT_DATA_PATH: &str = "data/news.json";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// The single username/password pair allowed into the admin area.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Settings file shape: `{"adminCredentials": {...}, "dataPath": ..., "bindAddr": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub admin_credentials: Option<AdminCredentials>,
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_data_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_PATH)
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            admin_credentials: None,
            data_path: default_data_path(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| Error::Config(format!("Invalid configuration: {}", e)))
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
    }

    /// Fills in credentials from another source when both parts are present.
    pub fn with_credentials(mut self, username: Option<String>, password: Option<String>) -> Self {
        match (username, password) {
            (Some(username), Some(password)) => {
                self.admin_credentials = Some(AdminCredentials { username, password });
            }
            (Some(username), None) => {
                if let Some(creds) = self.admin_credentials.as_mut() {
                    creds.username = username;
                }
            }
            (None, Some(password)) => {
                if let Some(creds) = self.admin_credentials.as_mut() {
                    creds.password = password;
                }
            }
            (None, None) => {}
        }
        self
    }

    pub fn credentials(&self) -> Result<&AdminCredentials> {
        match &self.admin_credentials {
            Some(creds) if !creds.username.is_empty() && !creds.password.is_empty() => Ok(creds),
            Some(_) => Err(Error::Config(
                "adminCredentials must have a non-empty username and password".to_string(),
            )),
            None => Err(Error::Config(
                "adminCredentials are not configured".to_string(),
            )),
        }
    }
}

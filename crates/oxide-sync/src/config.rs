//! Connection settings and their persistence.
//!
//! Settings live in a JSON file (`db_sync_config.json` by default) that is
//! rewritten after every successful validation, so the next run starts
//! from the last values used.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::mysql::MySqlConnectOptions;
use tracing::{debug, warn};

use crate::error::{Result, SyncError};

/// Default configuration file name.
pub const CONFIG_FILE: &str = "db_sync_config.json";

/// Default MySQL host.
pub const DEFAULT_HOST: &str = "localhost";

/// Default MySQL port.
pub const DEFAULT_PORT: u16 = 3306;

/// Default MySQL user.
pub const DEFAULT_USER: &str = "root";

/// Character set used for the connection and the script.
pub const CHARSET: &str = oxide_ddl::DEFAULT_CHARSET;

const MASK: &str = "********";

/// Everything needed to compare a DDL file against a database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Path of the DDL file holding the desired schema.
    pub sql_file_path: String,
    /// MySQL host.
    pub host: String,
    /// MySQL port.
    #[serde(deserialize_with = "port_from_number_or_string")]
    pub port: u16,
    /// MySQL user.
    pub user: String,
    /// MySQL password.
    pub password: String,
    /// Target database (schema) name.
    pub database: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            sql_file_path: String::new(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: DEFAULT_USER.to_string(),
            password: String::new(),
            database: String::new(),
        }
    }
}

/// Older config files store the port as a string.
fn port_from_number_or_string<'de, D>(deserializer: D) -> std::result::Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u16),
        Text(String),
    }

    match Port::deserialize(deserializer)? {
        Port::Number(port) => Ok(port),
        Port::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid port '{text}'"))),
    }
}

impl SyncConfig {
    /// Loads the configuration file.
    ///
    /// A missing file yields the defaults. An unreadable or malformed file
    /// also yields the defaults, with a warning.
    pub async fn load(path: &Path) -> Self {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Self::default();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read config, using defaults");
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(config) => {
                debug!(path = %path.display(), "Loaded config");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Invalid config file, using defaults");
                Self::default()
            }
        }
    }

    /// Writes the configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Io`] if the file cannot be written.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        debug!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Checks that everything needed to run a comparison is present.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] naming every missing setting.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("sql_file_path", &self.sql_file_path),
            ("host", &self.host),
            ("user", &self.user),
            ("database", &self.database),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SyncError::Config(format!(
                "missing required setting(s): {}",
                missing.join(", ")
            )))
        }
    }

    /// Applies command line overrides on top of this configuration.
    #[must_use]
    pub fn merge(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(path) = overrides.sql_file {
            self.sql_file_path = path.to_string_lossy().into_owned();
        }
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(user) = overrides.user {
            self.user = user;
        }
        if let Some(password) = overrides.password {
            self.password = password;
        }
        if let Some(database) = overrides.database {
            self.database = database;
        }
        self
    }

    /// Returns the DDL file path.
    #[must_use]
    pub fn sql_file(&self) -> PathBuf {
        PathBuf::from(&self.sql_file_path)
    }

    /// Returns a copy safe to display, with the password hidden.
    #[must_use]
    pub fn masked(&self) -> Self {
        let mut masked = self.clone();
        if !masked.password.is_empty() {
            masked.password = MASK.to_string();
        }
        masked
    }

    /// Builds sqlx connection options for the target database.
    #[must_use]
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database)
            .charset(CHARSET);
        if self.password.is_empty() {
            options
        } else {
            options.password(&self.password)
        }
    }
}

/// Values given on the command line, overriding the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// DDL file path.
    pub sql_file: Option<PathBuf>,
    /// MySQL host.
    pub host: Option<String>,
    /// MySQL port.
    pub port: Option<u16>,
    /// MySQL user.
    pub user: Option<String>,
    /// MySQL password.
    pub password: Option<String>,
    /// Target database.
    pub database: Option<String>,
}

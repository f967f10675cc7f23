/// Runtime configuration: credentials from the environment plus monitor
/// settings from an optional `flood_alert.toml`.
///
/// Everything is read once at process start and passed down explicitly;
/// no module reads the environment on its own.

use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::loader::DEFAULT_DATA_FILE;
use crate::model::DISCHARGE_MARKER;
use crate::threshold::DEFAULT_DISCHARGE_THRESHOLD;

/// Default settings file, relative to the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "flood_alert.toml";

/// Default timeout for registration store and gateway requests.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Service-role access to the hosted `users` table.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreCredentials {
    pub url: String,
    pub key: String,
}

/// Telerivet project credentials.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayCredentials {
    pub api_key: String,
    pub project_id: String,
}

/// Values the front-end is allowed to see.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublicConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

/// Everything the binaries pull from the environment.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub store: Option<StoreCredentials>,
    pub gateway: Option<GatewayCredentials>,
    pub public: PublicConfig,
}

impl AppConfig {
    /// Reads the process environment, loading `.env` first if present.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let store = match (get("SUPABASE_URL"), get("SUPABASE_KEY")) {
            (Some(url), Some(key)) => Some(StoreCredentials { url, key }),
            _ => None,
        };

        let gateway = match (get("TELERIVET_API_KEY"), get("TELERIVET_PROJECT_ID")) {
            (Some(api_key), Some(project_id)) => Some(GatewayCredentials { api_key, project_id }),
            _ => None,
        };

        let public = PublicConfig {
            supabase_url: get("SUPABASE_URL").unwrap_or_default(),
            supabase_anon_key: get("SUPABASE_ANON_KEY").unwrap_or_default(),
        };

        Self { store, gateway, public }
    }

    /// Store credentials, or `MissingCredentials` if either half is unset.
    pub fn require_store(&self) -> Result<&StoreCredentials, ConfigError> {
        self.store
            .as_ref()
            .ok_or(ConfigError::MissingCredentials("Supabase"))
    }
}

// ---------------------------------------------------------------------------
// Monitor settings
// ---------------------------------------------------------------------------

/// Tunables for a pipeline run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    /// Alert when discharge (cusecs) is strictly above this.
    pub discharge_threshold: f64,
    /// Substring identifying discharge metrics.
    pub discharge_marker: String,
    /// River data file to read.
    pub data_file: PathBuf,
    /// Timeout applied to every outbound HTTP request.
    pub request_timeout_secs: u64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            discharge_threshold: DEFAULT_DISCHARGE_THRESHOLD,
            discharge_marker: DISCHARGE_MARKER.to_string(),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl MonitorSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parses settings from TOML. Missing keys keep their defaults.
    pub fn from_toml(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| e.to_string())
    }

    /// Loads settings from `path`. A missing file yields the defaults;
    /// an unreadable or malformed one is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::Settings {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };

        Self::from_toml(&contents).map_err(|reason| ConfigError::Settings {
            path: path.to_path_buf(),
            reason,
        })
    }
}

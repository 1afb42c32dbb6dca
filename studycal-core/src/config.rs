//! Global studycal configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{StudyCalError, StudyCalResult};

static DEFAULT_TABLE: &str = "study_records";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const ENV_PREFIX: &str = "STUDYCAL";

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

fn is_default_table(table: &String) -> bool {
    table == DEFAULT_TABLE
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn is_default_request_timeout_secs(secs: &u64) -> bool {
    *secs == DEFAULT_REQUEST_TIMEOUT_SECS
}

/// Configuration at ~/.config/studycal/config.toml
///
/// Every key can be overridden from the environment with a `STUDYCAL_` prefix,
/// e.g. `STUDYCAL_STORE_URL` or `STUDYCAL_API_KEY`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StudyCalConfig {
    /// Base URL of the hosted project, e.g. `https://abc.supabase.co`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_table", skip_serializing_if = "is_default_table")]
    pub table: String,

    #[serde(
        default = "default_request_timeout_secs",
        skip_serializing_if = "is_default_request_timeout_secs"
    )]
    pub request_timeout_secs: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
}

impl Default for StudyCalConfig {
    fn default() -> Self {
        StudyCalConfig {
            store_url: None,
            api_key: None,
            table: default_table(),
            request_timeout_secs: default_request_timeout_secs(),
            cache_dir: None,
        }
    }
}

impl StudyCalConfig {
    pub fn config_path() -> StudyCalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| StudyCalError::Config("Could not determine config directory".into()))?
            .join("studycal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config, writing a commented default file on first use.
    pub fn load() -> StudyCalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path` (optional) layered under `STUDYCAL_*` environment variables.
    pub fn load_from(path: &Path) -> StudyCalResult<Self> {
        Self::layered(path, Some(Environment::with_prefix(ENV_PREFIX)))
    }

    /// Load from `path` alone, without environment overrides.
    ///
    /// Used before `save_to`, so values that only came from the environment
    /// are not written into the file.
    pub fn read_file(path: &Path) -> StudyCalResult<Self> {
        Self::layered(path, None)
    }

    fn layered(path: &Path, env: Option<Environment>) -> StudyCalResult<Self> {
        let mut builder =
            Config::builder().add_source(File::from(path.to_path_buf()).required(false));

        if let Some(env) = env {
            builder = builder.add_source(env.try_parsing(true));
        }

        builder
            .build()
            .map_err(|e| StudyCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| StudyCalError::Config(e.to_string()))
    }

    /// Write the config to `path` as TOML. Keys left at their defaults are omitted.
    pub fn save_to(&self, path: &Path) -> StudyCalResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| StudyCalError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StudyCalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, content)
            .map_err(|e| StudyCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Directory holding the local cache slot, with `~` expanded.
    pub fn cache_dir(&self) -> StudyCalResult<PathBuf> {
        match &self.cache_dir {
            Some(dir) => {
                let expanded = shellexpand::tilde(&dir.to_string_lossy()).into_owned();
                Ok(PathBuf::from(expanded))
            }
            None => dirs::cache_dir()
                .map(|dir| dir.join("studycal"))
                .ok_or_else(|| StudyCalError::Config("Could not determine cache directory".into())),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> StudyCalResult<()> {
        let contents = format!(
            "\
# studycal configuration

# Hosted project holding the study records table:
# store_url = \"https://your-project.supabase.co\"
# api_key = \"your-anon-key\"

# Table name:
# table = \"{DEFAULT_TABLE}\"

# Seconds to wait for the store before giving up:
# request_timeout_secs = {DEFAULT_REQUEST_TIMEOUT_SECS}

# Where the offline fallback copy is kept:
# cache_dir = \"~/.cache/studycal\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StudyCalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| StudyCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

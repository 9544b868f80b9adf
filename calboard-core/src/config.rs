//! calboard configuration.
//!
//! Settings come from `~/.config/calboard/config.toml`, overridden by
//! `CALBOARD_*` environment variables. Binaries may override both with flags.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{EventError, EventResult};

static DEFAULT_HOST: &str = "127.0.0.1";
static DEFAULT_DATA_DIR: &str = "~/.local/share/calboard";
static DEFAULT_API_URL: &str = "http://localhost:5000/api/events";
const DEFAULT_PORT: u16 = 5000;

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_data_dir() -> String {
    DEFAULT_DATA_DIR.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Address the server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the event documents. `~` is expanded.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Events endpoint the client talks to.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            host: default_host(),
            port: default_port(),
            data_dir: default_data_dir(),
            api_url: default_api_url(),
        }
    }
}

impl Settings {
    pub fn config_path() -> EventResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| EventError::Config("Could not determine config directory".into()))?
            .join("calboard");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default config file, creating a commented one if missing.
    pub fn load() -> EventResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from a specific file (which may be absent) plus the environment.
    pub fn load_from(path: &Path) -> EventResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("CALBOARD").try_parsing(true))
            .build()
            .map_err(|e| EventError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| EventError::Config(e.to_string()))
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.data_dir).into_owned())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> EventResult<()> {
        let contents = format!(
            "\
# calboard configuration

# Server bind address and port:
# host = \"{}\"
# port = {}

# Where the server keeps event documents:
# data_dir = \"{}\"

# Events API the client talks to:
# api_url = \"{}\"
",
            DEFAULT_HOST, DEFAULT_PORT, DEFAULT_DATA_DIR, DEFAULT_API_URL
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                EventError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| EventError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

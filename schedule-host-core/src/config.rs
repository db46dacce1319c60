//! Host configuration.
//!
//! Read from `<config dir>/schedule-host/config.toml`, with `SCHEDULE_HOST_*`
//! environment variables taking precedence (`SCHEDULE_HOST_RENDER__BASE_URL`
//! for nested keys).

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CIPHER, DEFAULT_IV_HEX, DEFAULT_MAX_ATTENDEES};
use crate::error::{HostError, HostResult};
use crate::render::RenderOptions;
use crate::store::StoreConfig;

static DEFAULT_DATA_DIR: &str = "~/schedule-host/data";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_cipher() -> String {
    DEFAULT_CIPHER.to_string()
}

fn default_iv() -> String {
    DEFAULT_IV_HEX.to_string()
}

fn default_max_attendees() -> usize {
    DEFAULT_MAX_ATTENDEES
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_cipher")]
    pub cipher: String,

    /// Hex IV shared by every record in this deployment
    #[serde(default = "default_iv")]
    pub iv: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default)]
    pub render: RenderDefaults,
}

/// Rendering defaults applied when a request doesn't override them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderDefaults {
    #[serde(default)]
    pub base_url: String,

    #[serde(default = "default_max_attendees")]
    pub max_attendees: usize,

    /// Seconds before the start
    #[serde(default)]
    pub alarms: Vec<i64>,

    #[serde(default)]
    pub skip_keywords: Vec<String>,
}

impl Default for RenderDefaults {
    fn default() -> Self {
        RenderDefaults {
            base_url: String::new(),
            max_attendees: DEFAULT_MAX_ATTENDEES,
            alarms: Vec::new(),
            skip_keywords: Vec::new(),
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        HostConfig {
            data_dir: default_data_dir(),
            cipher: default_cipher(),
            iv: default_iv(),
            username: None,
            password: None,
            render: RenderDefaults::default(),
        }
    }
}

impl HostConfig {
    pub fn config_path() -> HostResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| HostError::Config("Could not determine config directory".into()))?
            .join("schedule-host");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location plus the environment.
    pub fn load() -> HostResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path` (which may be absent) plus the environment.
    pub fn load_from(path: &Path) -> HostResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("SCHEDULE_HOST")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("render.alarms")
                    .with_list_parse_key("render.skip_keywords")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| HostError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| HostError::Config(e.to_string()))
    }

    /// `data_dir` with `~` and environment variables expanded.
    pub fn data_path(&self) -> HostResult<PathBuf> {
        let raw = self.data_dir.to_string_lossy();
        let expanded = shellexpand::full(&raw)
            .map_err(|e| HostError::Config(format!("Could not expand data_dir: {e}")))?;

        Ok(PathBuf::from(expanded.into_owned()))
    }

    pub fn store_config(&self) -> HostResult<StoreConfig> {
        let username = self
            .username
            .as_deref()
            .ok_or_else(|| HostError::Config("username is not configured".into()))?;
        let password = self
            .password
            .as_deref()
            .ok_or_else(|| HostError::Config("password is not configured".into()))?;

        StoreConfig::new(&self.cipher, &self.iv, username, password, self.data_path()?)
    }

    pub fn render_options(&self) -> HostResult<RenderOptions> {
        Ok(RenderOptions::default()
            .with_base_url(&self.render.base_url)
            .with_max_attendees(self.render.max_attendees)?
            .with_alarms(self.render.alarms.iter().copied())
            .with_skip_keywords(&self.render.skip_keywords))
    }

    /// Write the config to `path`, readable only by the owner on Unix.
    pub fn save(&self, path: &Path) -> HostResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| HostError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| HostError::Config(format!("Could not write config file: {e}")))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Create a config file with every option commented out.
    pub fn create_default_config(path: &Path) -> HostResult<()> {
        let contents = format!(
            "\
# schedule-host configuration

# Where encrypted records live:
# data_dir = \"{DEFAULT_DATA_DIR}\"

# Credential records are written with and checked against:
# username = \"alice\"
# password = \"change me\"

# Cipher settings (must match existing records):
# cipher = \"{DEFAULT_CIPHER}\"
# iv = \"{DEFAULT_IV_HEX}\"

[render]
# base_url = \"https://groupware.example.com/g\"
# max_attendees = {DEFAULT_MAX_ATTENDEES}
# alarms = [600]
# skip_keywords = [\"holiday\"]
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                HostError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| HostError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

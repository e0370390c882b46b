use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const DEFAULT_CONFIG: &str = r#"
[backend]
base_url = "http://localhost:8000"

[session]
# Where the CLI keeps the logged-in marker
# path = "/home/me/.local/share/leadgen/session.json"
"#;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ClientConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    pub session: Option<SessionConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SessionConfig {
    pub path: Option<PathBuf>,
}

impl ClientConfig {
    /// Load `client.toml` from the user config directory, writing a default
    /// one first if there is none. `LEADGEN_*` variables override the file,
    /// e.g. `LEADGEN_BACKEND__BASE_URL`.
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        let config_path = get_config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        if !config_path.exists() {
            std::fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let config = Self::load_from(&config_path)?;
        Ok((config, config_path))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::build(path, env_source())
    }

    fn build(path: &Path, env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()))
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    pub fn session_path(&self) -> Option<&Path> {
        self.session.as_ref().and_then(|s| s.path.as_deref())
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("LEADGEN")
        .prefix_separator("_")
        .separator("__")
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("leadgen").join("client.toml")
    } else {
        PathBuf::from("client.toml")
    }
}

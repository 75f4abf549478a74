use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Environment (dev, staging, prod)
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Root directory of the managed file tree
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: String,

    /// Directory holding the static frontend assets
    #[serde(default = "default_public_dir")]
    pub public_dir: String,

    /// Admin credentials checked by the login endpoint
    #[serde(default = "default_admin_username")]
    pub admin_username: String,
    #[serde(default = "default_admin_password")]
    pub admin_password: String,

    /// Whether authentication is required at all
    #[serde(default = "default_auth_enabled")]
    pub auth_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables or app.env file
    pub fn load() -> Result<Self, ConfigError> {
        // Try to load from app.env file first
        if std::path::Path::new("app.env").exists() {
            dotenvy::from_filename("app.env").ok();
        } else {
            // Fallback to .env file
            dotenvy::dotenv().ok();
        }

        // Load from environment variables using envy
        match envy::from_env::<Config>() {
            Ok(config) => {
                info!("✅ Configuration loaded successfully");
                Ok(config)
            }
            Err(e) => {
                error!("❌ Failed to load configuration: {}", e);
                Err(ConfigError::EnvError(e))
            }
        }
    }

    /// Get the full server address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Root of the sandboxed file tree
    pub fn uploads_path(&self) -> PathBuf {
        PathBuf::from(&self.uploads_dir)
    }

    /// Directory where the collaborative editor persists room content
    pub fn editor_path(&self) -> PathBuf {
        self.uploads_path().join("Editor")
    }

    /// Directory where manual editor exports land
    pub fn saved_path(&self) -> PathBuf {
        self.uploads_path().join("Saved")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            log_level: default_log_level(),
            uploads_dir: default_uploads_dir(),
            public_dir: default_public_dir(),
            admin_username: default_admin_username(),
            admin_password: default_admin_password(),
            auth_enabled: default_auth_enabled(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    EnvError(envy::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EnvError(e) => write!(f, "Environment variable error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_uploads_dir() -> String {
    "uploads".to_string()
}

fn default_public_dir() -> String {
    "public".to_string()
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

fn default_auth_enabled() -> bool {
    true
}

/// Configuration for the Tableau backend.
/// Reads config.json from $TABLEAU_CONFIG, else ~/.config/tableau/config.json
/// (or platform equivalent).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "TABLEAU_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Directory that relative data file names resolve against.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_tickets_file")]
    pub tickets_file: PathBuf,
    #[serde(default = "default_categories_file")]
    pub categories_file: PathBuf,
}

fn default_port() -> u16 {
    5000
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_tickets_file() -> PathBuf {
    PathBuf::from("kanban_data.json")
}

fn default_categories_file() -> PathBuf {
    PathBuf::from("categories.json")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            data_dir: default_data_dir(),
            tickets_file: default_tickets_file(),
            categories_file: default_categories_file(),
        }
    }
}

impl ServerConfig {
    pub fn tickets_path(&self) -> PathBuf {
        self.data_dir.join(&self.tickets_file)
    }

    pub fn categories_path(&self) -> PathBuf {
        self.data_dir.join(&self.categories_file)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("logs").join("backend.log")
    }
}

/// Config path: $TABLEAU_CONFIG when set, else ~/.config/tableau/config.json
pub fn default_config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tableau")
        .join("config.json")
}

/// Load config from path. Returns default if the file doesn't exist or is
/// malformed.
pub fn load_config(path: &Path) -> ServerConfig {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!(target: "tableau.config", "Failed to parse config {}: {}", path.display(), e);
            ServerConfig::default()
        }),
        Err(_) => {
            log::info!(target: "tableau.config", "No config at {}, using defaults", path.display());
            ServerConfig::default()
        }
    }
}

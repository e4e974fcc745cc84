//! Configuration resolution for memorial-web
//!
//! Priority order for every setting:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file (~/.config/memorial/config.toml)
//! 4. Compiled default (fallback)

use std::path::PathBuf;

use serde::Deserialize;
use tracing::warn;

/// Default listen port
pub const DEFAULT_PORT: u16 = 8741;

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub data_dir: PathBuf,
    pub port: u16,
}

/// Optional overrides read from the TOML config file
#[derive(Debug, Default, Deserialize)]
struct TomlConfig {
    data_dir: Option<PathBuf>,
    port: Option<u16>,
}

/// Resolve the service configuration from all tiers.
pub fn resolve(cli_data_dir: Option<PathBuf>, cli_port: Option<u16>) -> ServeConfig {
    let file = load_config_file().unwrap_or_default();

    let data_dir = cli_data_dir
        .or_else(|| std::env::var("MEMORIAL_DATA").ok().map(PathBuf::from))
        .or(file.data_dir)
        .unwrap_or_else(|| PathBuf::from("./data"));

    let port = cli_port
        .or_else(|| {
            std::env::var("MEMORIAL_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
        })
        .or(file.port)
        .unwrap_or(DEFAULT_PORT);

    ServeConfig { data_dir, port }
}

/// Read the TOML config file if one exists. A missing file is normal;
/// an unparseable one logs a warning and falls through to defaults.
fn load_config_file() -> Option<TomlConfig> {
    let path = dirs::config_dir()?.join("memorial").join("config.toml");
    let content = std::fs::read_to_string(&path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Ignoring invalid config file {}: {}", path.display(), e);
            None
        }
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod networks;

pub use networks::{futurenet, testnet, NetworkRegistry, StellarNetworkConfig};

use crate::logging::Verbosity;

/// Default base directory of the per-network address book files
pub const DEFAULT_ADDRESS_BOOK_PATH: &str = "./.soroban";

/// Environment variable consulted when the config file carries no admin secret
pub const ADMIN_SECRET_ENV: &str = "SOROBAN_ADMIN_SECRET";

/// Transaction status polling after submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Delay between status fetches in milliseconds
    pub interval_ms: u64,
    /// Fetches before giving up with a timeout error
    pub max_attempts: u32,
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            max_attempts: 30,
        }
    }
}

/// File-based toolkit configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolkitConfig {
    /// Admin secret seed (`S...`); prefer the environment variable outside development
    #[serde(default)]
    pub admin_secret: Option<String>,
    #[serde(default = "default_address_book_path")]
    pub address_book_path: PathBuf,
    #[serde(default)]
    pub verbosity: Verbosity,
    /// Contract name → WASM file path
    #[serde(default)]
    pub contract_paths: HashMap<String, PathBuf>,
    /// Networks added to (or overriding) the built-in presets
    #[serde(default)]
    pub networks: Vec<StellarNetworkConfig>,
    #[serde(default)]
    pub polling: PollConfig,
}

fn default_address_book_path() -> PathBuf {
    PathBuf::from(DEFAULT_ADDRESS_BOOK_PATH)
}

impl ToolkitConfig {
    /// Load configuration from TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ToolkitConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Admin secret from the file, falling back to `SOROBAN_ADMIN_SECRET`
    pub fn resolve_admin_secret(&self) -> Option<String> {
        self.admin_secret
            .clone()
            .filter(|secret| !secret.is_empty())
            .or_else(|| std::env::var(ADMIN_SECRET_ENV).ok())
    }
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            admin_secret: None,
            address_book_path: default_address_book_path(),
            verbosity: Verbosity::None,
            contract_paths: HashMap::new(),
            networks: vec![],
            polling: PollConfig::default(),
        }
    }
}

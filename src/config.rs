use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::solana::client::DEVNET_RPC_URL;
use crate::wallet::keyfile::KeyfileEnvironment;

const CONFIG_DIR: &str = ".devnet-handoff";
const CONFIG_FILE: &str = "config.json";
const LOG_FILE: &str = "devnet-handoff.log";

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// RPC endpoint, devnet when unset
    pub rpc_url: Option<String>,

    /// Path to the wallet keypair the provider connects with
    pub wallet_path: Option<String>,

    /// Let the dashboard reconnect to the wallet at startup without asking
    #[serde(default)]
    pub trust_wallet: bool,
}

impl AppConfig {
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
        Ok(home.join(CONFIG_DIR))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    pub fn default_log_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(LOG_FILE))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Missing file means defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;

        serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// For the `config` command: a file that does not parse must not stop
    /// the user from overwriting it. Returns defaults plus the load error.
    pub fn load_or_default_from(path: &Path) -> (Self, Option<anyhow::Error>) {
        match Self::load_from(path) {
            Ok(config) => (config, None),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %format!("{:#}", err), "ignoring unreadable config");
                (Self::default(), Some(err))
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, json).with_context(|| format!("Failed to write config {}", path.display()))?;

        Ok(())
    }

    /// CLI flag, then config, then devnet.
    pub fn resolve_rpc_url(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| self.rpc_url.clone())
            .unwrap_or_else(|| DEVNET_RPC_URL.to_string())
    }

    /// CLI flag, then config, then the Solana CLI default wallet.
    pub fn resolve_wallet_path(&self, cli: Option<&str>) -> Option<PathBuf> {
        cli.map(PathBuf::from)
            .or_else(|| self.wallet_path.as_ref().map(PathBuf::from))
            .or_else(KeyfileEnvironment::default_wallet_path)
    }
}

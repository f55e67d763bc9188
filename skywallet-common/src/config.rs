//! Configuration loading for SkyWallet
//!
//! Credentials resolve with ENV → TOML priority. A missing or placeholder
//! credential is not an error: every consumer degrades to its documented
//! fallback (bundled samples, default weather, no booking lookup).

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable names, one per credential
const ENV_AVIATIONSTACK: &str = "SKYWALLET_AVIATIONSTACK_API_KEY";
const ENV_OPENWEATHER: &str = "SKYWALLET_OPENWEATHER_API_KEY";
const ENV_AMADEUS_ID: &str = "SKYWALLET_AMADEUS_CLIENT_ID";
const ENV_AMADEUS_SECRET: &str = "SKYWALLET_AMADEUS_CLIENT_SECRET";

/// External-service credentials. All optional; `None` or a placeholder value
/// means the corresponding source is unconfigured.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WalletConfig {
    pub aviationstack_api_key: Option<String>,
    pub openweather_api_key: Option<String>,
    pub amadeus_client_id: Option<String>,
    pub amadeus_client_secret: Option<String>,
}

impl WalletConfig {
    /// Load configuration with ENV → TOML priority.
    ///
    /// Never fails: an unreadable or unparsable TOML file is logged and
    /// treated as absent.
    pub fn load() -> Self {
        let mut config = match default_config_path() {
            Some(path) if path.exists() => match Self::from_toml_file(&path) {
                Ok(config) => {
                    info!("Configuration loaded from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Ignoring unreadable config file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            _ => Self::default(),
        };

        // ENV overrides TOML
        if let Ok(key) = std::env::var(ENV_AVIATIONSTACK) {
            config.aviationstack_api_key = Some(key);
        }
        if let Ok(key) = std::env::var(ENV_OPENWEATHER) {
            config.openweather_api_key = Some(key);
        }
        if let Ok(id) = std::env::var(ENV_AMADEUS_ID) {
            config.amadeus_client_id = Some(id);
        }
        if let Ok(secret) = std::env::var(ENV_AMADEUS_SECRET) {
            config.amadeus_client_secret = Some(secret);
        }

        config
    }

    /// Parse a TOML config file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Amadeus credentials, present only when both halves are configured
    pub fn amadeus_credentials(&self) -> Option<(&str, &str)> {
        let id = configured_key(&self.amadeus_client_id)?;
        let secret = configured_key(&self.amadeus_client_secret)?;
        Some((id, secret))
    }
}

/// Treat a credential as configured only when present, non-blank, and not a
/// template placeholder (sample configs ship keys like "your_key_here").
pub fn configured_key(key: &Option<String>) -> Option<&str> {
    let key = key.as_deref()?;
    let trimmed = key.trim();
    if trimmed.is_empty() || trimmed.contains("your_") {
        None
    } else {
        Some(trimmed)
    }
}

/// Default configuration file path for the platform
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("skywallet").join("config.toml"))
}

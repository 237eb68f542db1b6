//! Registry configuration.
//!
//! Loaded from an optional TOML file, then overridden by `MULTIPASS__*`
//! environment variables (`__` separates nesting levels, e.g.
//! `MULTIPASS__TYPED_DATA__CHAIN_ID=5`).

use anyhow::{Context, Result};
use config::{Config, Environment, File as ConfigFile};
use multipass_crypto::TypedDataDomain;
use multipass_types::Address;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ENV_PREFIX: &str = "MULTIPASS";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub typed_data: TypedDataConfig,
    /// Initial registry owner.
    pub owner: Address,
    pub logging: LoggingConfig,
}

/// Signing domain every authorisation is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypedDataConfig {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

impl Default for TypedDataConfig {
    fn default() -> Self {
        Self {
            name: "MultipassDNS".to_string(),
            version: "0.0.1".to_string(),
            chain_id: 1,
            verifying_contract: Address::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `compact`.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl RegistryConfig {
    /// Load defaults, then `path` (if given), then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                anyhow::bail!("Configuration file {} not found", path.display());
            }
            builder = builder.add_source(ConfigFile::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        );

        let config: Self = builder
            .build()
            .context("failed to assemble registry configuration")?
            .try_deserialize()
            .context("invalid registry configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.owner.is_zero() {
            anyhow::bail!("registry owner must not be the zero address");
        }
        if self.typed_data.name.is_empty() || self.typed_data.version.is_empty() {
            anyhow::bail!("typed-data name and version must be set");
        }
        Ok(())
    }

    pub fn typed_data_domain(&self) -> TypedDataDomain {
        TypedDataDomain::new(
            self.typed_data.name.clone(),
            self.typed_data.version.clone(),
            self.typed_data.chain_id,
            self.typed_data.verifying_contract.0,
        )
    }
}

//! Layered service configuration.
//!
//! Sources, later ones winning: built-in defaults, an optional TOML file,
//! then `CAIRN_`-prefixed environment variables with `__` between nesting
//! levels (`CAIRN_GENERATOR__DATACENTER_ID=3`).

use anyhow::{bail, Context, Result};
use cairn_crypto::HasherConfig;
use cairn_ids::{GeneratorConfig, MAX_DATACENTER_ID, MAX_WORKER_ID};
use config::{Config, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "CAIRN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Sled,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Database directory, required for the sled backend.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub generator: GeneratorConfig,
    pub hasher: HasherConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Load from an optional file plus the process environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(config_path, Self::environment())
    }

    /// Load with an explicit environment source (tests inject a map here).
    pub fn load_with_env(config_path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            if !path.exists() {
                bail!("Configuration file {} not found", path.display());
            }
            builder = builder.add_source(ConfigFile::from(path));
        }

        builder = builder.add_source(env);

        let config: ServiceConfig = builder
            .build()
            .context("failed to assemble configuration sources")?
            .try_deserialize()
            .context("failed to deserialize service configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Static checks. The future-epoch check needs a clock and happens when
    /// the generator is built.
    pub fn validate(&self) -> Result<()> {
        if self.generator.datacenter_id > MAX_DATACENTER_ID {
            bail!(
                "generator.datacenter_id {} exceeds {}",
                self.generator.datacenter_id,
                MAX_DATACENTER_ID
            );
        }
        if let Some(worker_id) = self.generator.worker_id {
            if worker_id > MAX_WORKER_ID {
                bail!("generator.worker_id {worker_id} exceeds {MAX_WORKER_ID}");
            }
        }
        if self.hasher.reference_width == 0 {
            bail!("hasher.reference_width must be positive");
        }
        if self.store.backend == StoreBackend::Sled && self.store.path.is_none() {
            bail!("store.path is required for the sled backend");
        }
        Ok(())
    }
}

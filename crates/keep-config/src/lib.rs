//! # keep-config
//!
//! Layered configuration loading for Keepsake using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Caller overrides (the `keep` binary passes its command-line flags here)
//! 2. Environment variables (`KEEPSAKE_*` prefix)
//! 3. Built-in defaults
//!
//! There is deliberately no file layer: deployments configure Keepsake through
//! the environment of the process that invokes it.
//!
//! # Environment Variable Mapping
//!
//! Figment maps `KEEPSAKE_LOG_FILE` -> `log_file`, `KEEPSAKE_COLLISION` ->
//! `collision`, and so on. All keys are top-level.
//!
//! # Usage
//!
//! ```no_run
//! use keep_config::KeepConfig;
//!
//! let config = KeepConfig::load().expect("config");
//! println!("audit log: {}", config.log_file.display());
//! ```

mod defaults;
mod error;

pub use defaults::{DEFAULT_COMPRESSION_LEVEL, DEFAULT_LOG_FILE};
pub use error::ConfigError;

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use keep_core::CollisionPolicy;
use serde::{Deserialize, Serialize};

/// Prefix shared by every environment variable Keepsake reads.
pub const ENV_PREFIX: &str = "KEEPSAKE_";

/// Highest gzip level accepted by `compression_level`.
const MAX_COMPRESSION_LEVEL: u32 = 9;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeepConfig {
    /// Append-only audit log.
    #[serde(default = "defaults::log_file")]
    pub log_file: PathBuf,

    /// Directory in which a per-run staging directory is created.
    #[serde(default = "defaults::staging_dir")]
    pub staging_dir: PathBuf,

    /// Behaviour when the destination already holds an archive of the same name.
    #[serde(default)]
    pub collision: CollisionPolicy,

    /// Probe destination writability again right before the move.
    #[serde(default = "defaults::recheck_destination")]
    pub recheck_destination: bool,

    /// gzip level, 0 (store) to 9 (best).
    #[serde(default = "defaults::compression_level")]
    pub compression_level: u32,

    /// Archive symlink targets instead of the links themselves.
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl Default for KeepConfig {
    fn default() -> Self {
        Self {
            log_file: defaults::log_file(),
            staging_dir: defaults::staging_dir(),
            collision: CollisionPolicy::default(),
            recheck_destination: defaults::recheck_destination(),
            compression_level: defaults::compression_level(),
            follow_symlinks: false,
        }
    }
}

impl KeepConfig {
    /// Load configuration from defaults and `KEEPSAKE_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// Load configuration with caller-supplied overrides layered on top.
    ///
    /// `overrides` is serialized and merged last, so any field it carries wins
    /// over the environment. Fields skipped during serialization (for example
    /// `None` with `skip_serializing_if`) leave lower layers untouched.
    pub fn load_with_overrides<T: Serialize>(overrides: &T) -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment().merge(Serialized::defaults(overrides)))
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    /// Reject values that would only fail later, mid-backup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_file.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "log_file".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        if self.staging_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "staging_dir".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        if self.compression_level > MAX_COMPRESSION_LEVEL {
            return Err(ConfigError::InvalidValue {
                field: "compression_level".to_string(),
                reason: format!(
                    "{} is out of range (0..={MAX_COMPRESSION_LEVEL})",
                    self.compression_level
                ),
            });
        }

        Ok(())
    }

    fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }
}

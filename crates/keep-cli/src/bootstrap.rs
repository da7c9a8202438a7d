use std::io;
use std::path::PathBuf;

use anyhow::Context;
use keep_backup::{ArgsSource, PromptSource, RequestSource};
use keep_config::KeepConfig;
use keep_core::{BackupRequest, CollisionPolicy};
use serde::Serialize;

use crate::cli::Cli;

/// Command-line values that take precedence over the environment.
#[derive(Debug, Default, Serialize)]
struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    log_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    staging_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    collision: Option<CollisionPolicy>,
}

impl CliOverrides {
    fn from_cli(cli: &Cli) -> Self {
        Self {
            log_file: cli.log_file.clone(),
            staging_dir: cli.staging_dir.clone(),
            collision: cli.collision,
        }
    }
}

pub fn load_config(cli: &Cli) -> anyhow::Result<KeepConfig> {
    load_dotenv()?;

    let config = KeepConfig::load_with_overrides(&CliOverrides::from_cli(cli))
        .context("invalid configuration")?;
    tracing::debug!(
        log_file = %config.log_file.display(),
        staging_dir = %config.staging_dir.display(),
        collision = %config.collision,
        "configuration loaded"
    );
    Ok(config)
}

fn load_dotenv() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let env_path = cwd.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}

/// Collect the two directories from the arguments, prompting for whatever is
/// missing unless `--no-prompt` was given.
pub fn acquire_request(cli: &Cli) -> anyhow::Result<BackupRequest> {
    let mut source: Box<dyn RequestSource> = if cli.no_prompt {
        Box::new(ArgsSource::new(cli.source.clone(), cli.destination.clone()))
    } else {
        Box::new(
            PromptSource::new(io::stdin().lock(), io::stderr())
                .with_source(cli.source.clone())
                .with_destination(cli.destination.clone()),
        )
    };
    source.request().context("failed to read backup directories")
}

// Layered settings: defaults < user config file < --config file < environment < flags

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use merge_invoker_core::constants::DEFAULT_TIMEOUT_SECS;
use merge_invoker_core::InvokerConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_EXECUTABLE: &str = "./dart-ast-merge";
pub const ENV_PREFIX: &str = "MERGE_INVOKER";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Deserialize)]
struct Settings {
    executable: String,
    timeout_secs: u64,
}

/// Values given on the command line; `None` leaves the lower layers in charge
#[derive(Debug, Default)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub executable: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// `<user config dir>/merge-invoker/config.toml`, if the platform has one
pub fn user_config_file() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "merge-invoker")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Resolve the invoker configuration
///
/// `user_file` is optional and may be absent on disk; `overrides.config_file`
/// must exist. A leading `~` in the executable path is expanded.
pub fn load(user_file: Option<&Path>, overrides: &Overrides) -> Result<InvokerConfig> {
    let mut builder = Config::builder()
        .set_default("executable", DEFAULT_EXECUTABLE)?
        .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?;

    if let Some(path) = user_file {
        builder = builder.add_source(File::from(path).required(false));
    }

    if let Some(path) = &overrides.config_file {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    let settings: Settings = builder
        .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .set_override_option("executable", overrides.executable.clone())?
        .set_override_option("timeout_secs", overrides.timeout_secs)?
        .build()
        .context("Failed to load merge-invoker settings")?
        .try_deserialize()
        .context("Invalid merge-invoker settings")?;

    let executable = shellexpand::tilde(&settings.executable).into_owned();

    Ok(InvokerConfig::new(executable).with_timeout(Duration::from_secs(settings.timeout_secs)))
}

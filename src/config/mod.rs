// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};
use std::path::Path;

const ENV_PREFIX: &str = "URL_POLLER";

/// Build the poller configuration from an optional settings file (any
/// format the `config` crate understands). `URL_POLLER_*` environment
/// variables override values from the file.
pub fn load_config<P: AsRef<Path>>(path: Option<P>) -> Result<PollerConfig> {
    load_layered(path, ENV_PREFIX)
}

fn load_layered<P: AsRef<Path>>(path: Option<P>, env_prefix: &str) -> Result<PollerConfig> {
    let mut builder = ::config::Config::builder();

    if let Some(path) = path {
        let path = path.as_ref();
        builder = builder.add_source(::config::File::from(path).required(true));
    }

    let settings = builder
        .add_source(::config::Environment::with_prefix(env_prefix).try_parsing(true))
        .build()
        .context("Failed to read poller settings")?;

    let config: PollerConfig = settings
        .try_deserialize()
        .context("Failed to parse poller settings")?;

    config.validate()?;
    Ok(config)
}

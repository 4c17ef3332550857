#![deny(clippy::all, clippy::pedantic)]

use std::fs;
use std::sync::Arc;

use learnhub::LearnHubClient;
use learnhub::cache::CacheConfig;
use learnhub::config::{self, ApiSettings, LoadError, Settings};
use learnhub::error::ClientError;
use learnhub::telemetry::TelemetryError;
use thiserror::Error;

use crate::args::Cli;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read token file: {0}")]
    TokenFile(std::io::Error),
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to write output file {path}: {source}")]
    OutputFile {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to render output: {0}")]
    Output(String),
}

pub struct Ctx {
    pub client: Arc<LearnHubClient>,
}

impl Ctx {
    pub fn new(api: &ApiSettings, cache: CacheConfig) -> Result<Self, CliError> {
        let client = LearnHubClient::from_settings(api, cache)?;
        Ok(Self {
            client: Arc::new(client),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, CliError> {
        Self::new(&settings.api, settings.cache.to_config())
    }
}

/// Resolve settings for `cli`. A token file wins over `LEARNHUB_TOKEN`.
pub fn load_settings(cli: &Cli) -> Result<Settings, CliError> {
    let mut overrides = cli.config.clone();
    if let Some(path) = &cli.token_file {
        let token = fs::read_to_string(path).map_err(CliError::TokenFile)?;
        overrides.token = Some(token.trim().to_string());
    }
    Ok(config::load(cli.config_file.as_deref(), &overrides)?)
}

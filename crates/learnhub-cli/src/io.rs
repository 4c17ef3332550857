#![deny(clippy::all, clippy::pedantic)]

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::client::CliError;

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::InputFile {
        path: path.display().to_string(),
        source,
    })
}

pub fn read_opt_value(
    val: Option<String>,
    file: Option<PathBuf>,
) -> Result<Option<String>, CliError> {
    if let Some(path) = file {
        return read_file(&path).map(Some);
    }
    Ok(val)
}

pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let data = read_file(path)?;
    serde_json::from_str(&data)
        .map_err(|e| CliError::InvalidInput(format!("{}: {e}", path.display())))
}

pub fn parse_time(val: &str) -> Result<OffsetDateTime, CliError> {
    OffsetDateTime::parse(val, &Rfc3339).map_err(|e| CliError::InvalidInput(e.to_string()))
}

pub fn parse_time_opt(val: Option<String>) -> Result<Option<OffsetDateTime>, CliError> {
    val.as_deref().map(parse_time).transpose()
}

pub async fn write_output(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| CliError::OutputFile {
            path: path.display().to_string(),
            source,
        })
}

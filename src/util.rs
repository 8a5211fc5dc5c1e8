use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use mlmetrics::EngineConfig;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use tracing::info;

#[derive(Debug, Serialize)]
pub struct ReportEnvelope<T> {
    pub generated_at: String,
    pub input_path: String,
    pub input_sha256: String,
    pub report: T,
}

impl<T: Serialize> ReportEnvelope<T> {
    /// `input_sha256` is the digest returned alongside the parsed input by
    /// [`read_json_with_digest`].
    pub fn for_input(input_path: &Path, input_sha256: String, report: T) -> Self {
        Self {
            generated_at: now_utc_string(),
            input_path: input_path.display().to_string(),
            input_sha256,
            report,
        }
    }
}

pub fn now_utc_string() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn ensure_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory: {}", path.display()))
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    read_json_with_digest(path).map(|(value, _)| value)
}

/// Parses `path` and returns the SHA-256 of the same bytes that were parsed.
pub fn read_json_with_digest<T: DeserializeOwned>(path: &Path) -> Result<(T, String)> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let value = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok((value, sha256_hex(&raw)))
}

/// Loads the optional config file, falling back to defaults.
pub fn load_engine_config(path: Option<&Path>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => {
            let config = read_json::<EngineConfig>(path)?;
            info!(path = %path.display(), "loaded engine config");
            config
        }
        None => EngineConfig::default(),
    };
    config.validate().context("invalid engine config")?;
    Ok(config)
}

pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }

    let data = serde_json::to_vec_pretty(value)
        .with_context(|| format!("failed to serialize json: {}", path.display()))?;

    let mut file = File::create(path)
        .with_context(|| format!("failed to create json file: {}", path.display()))?;
    file.write_all(&data)
        .with_context(|| format!("failed to write json file: {}", path.display()))?;
    file.write_all(b"\n")
        .with_context(|| format!("failed to finalize json file: {}", path.display()))?;

    Ok(())
}

/// Writes the report to `output_path` or, when absent, pretty-prints it on
/// stdout.
pub fn emit_report<T: Serialize>(output_path: Option<&Path>, value: &T) -> Result<()> {
    if let Some(path) = output_path {
        write_json_pretty(path, value)?;
        info!(path = %path.display(), "wrote report");
        return Ok(());
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value).context("failed to serialize report")?;
    writeln!(handle).context("failed to write report")?;
    Ok(())
}

use anyhow::{Context, bail};
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::utils::expand_path;

/// Defaults shipped with the binary; also written out as the user's config on first run.
const BLUEPRINT: &str = include_str!("../lpp.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub endpoint: String,
    pub conversion_rate: f64,
    pub currency: String,
    pub timeout_secs: u64,
    pub log_level: String,
    pub log_file: Option<String>,
}

impl Settings {
    /// Loads settings from the blueprint, the user's config and `LPP_*` variables.
    pub fn new(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load(config_path, Environment::with_prefix("LPP"))
    }

    pub fn load(config_path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder =
            Config::builder().add_source(File::from_str(BLUEPRINT, FileFormat::Toml));

        builder = match config_path {
            // An explicit file replaces both file layers and must exist.
            Some(path) => builder.add_source(File::from(path.to_path_buf()).required(true)),
            None => {
                if let Some(user) = get_user_config_path() {
                    builder = builder.add_source(File::from(user).required(false));
                }
                builder.add_source(File::with_name("lpp.toml").required(false))
            }
        };

        builder
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        reqwest::Url::parse(&self.endpoint)
            .with_context(|| format!("endpoint {:?} is not a valid URL", self.endpoint))?;
        if !self.conversion_rate.is_finite() || self.conversion_rate <= 0.0 {
            bail!("conversion_rate must be a positive number, got {}", self.conversion_rate);
        }
        if self.currency.trim().is_empty() {
            bail!("currency must not be empty");
        }
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be at least 1");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Log file for the interactive form, which owns stdout.
    pub fn log_path(&self) -> PathBuf {
        match &self.log_file {
            Some(raw) => expand_path(raw),
            None => {
                let mut path = dirs::cache_dir().unwrap_or_else(std::env::temp_dir);
                path.push("laptop-price-predictor");
                path.push("lpp.log");
                path
            }
        }
    }
}

pub fn get_user_config_path() -> Option<PathBuf> {
    let mut path = dirs::home_dir()?;
    path.push(".config");
    path.push("laptop-price-predictor");
    path.push("lpp.toml");
    Some(path)
}

/// Writes the blueprint to `path` unless a config already exists there.
pub fn ensure_config_file(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("could not create {}", parent.display()))?;
    }
    fs::write(path, BLUEPRINT)
        .with_context(|| format!("could not write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote default configuration");
    Ok(())
}

/// Stores `endpoint` in the config file at `path`, keeping every other key.
pub fn save_endpoint(path: &Path, endpoint: &str) -> anyhow::Result<()> {
    reqwest::Url::parse(endpoint)
        .with_context(|| format!("{endpoint:?} is not a valid URL"))?;
    ensure_config_file(path)?;

    let config_str = fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    let mut doc = config_str
        .parse::<toml::Table>()
        .with_context(|| format!("{} is not valid TOML", path.display()))?;
    doc.insert("endpoint".to_string(), toml::Value::String(endpoint.to_string()));
    fs::write(path, doc.to_string())
        .with_context(|| format!("could not write {}", path.display()))?;

    Ok(())
}

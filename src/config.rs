use crate::utils::constants::{CONFIG_PATH_VAR, DEFAULT_LOG_LEVEL, DEFAULT_SEARCH_RADIUS_KM};
use anyhow::{anyhow, bail, Context, Result};
use log::LevelFilter;
use secrecy::{Secret, SecretString};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use teloxide::types::ChatId;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub bot_token: Option<SecretString>,
    pub admin_chat_id: Option<i64>,
    #[serde(default = "default_search_radius_km")]
    pub search_radius_km: f64,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize)]
pub struct LogConfig {
    pub file: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: default_log_level(),
        }
    }
}

fn default_search_radius_km() -> f64 {
    DEFAULT_SEARCH_RADIUS_KM
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_owned()
}

impl Config {
    /// Optional TOML file named by `PROXIMITY_BOT_CONFIG`, overridden by
    /// environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = match env::var(CONFIG_PATH_VAR) {
            Ok(path) => {
                let raw = fs::read_to_string(&path)
                    .with_context(|| format!("reading config file {path}"))?;
                Self::from_toml(&raw).with_context(|| format!("parsing config file {path}"))?
            }
            Err(_) => Self::from_toml("")?,
        };
        config.apply_overrides(|name| env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    fn apply_overrides<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = var("BOT_TOKEN").or_else(|| var("TELOXIDE_TOKEN")) {
            self.bot_token = Some(Secret::new(token));
        }
        if let Some(admin) = var("ADMIN_CHAT_ID") {
            self.admin_chat_id = Some(
                admin
                    .trim()
                    .parse()
                    .with_context(|| format!("ADMIN_CHAT_ID is not a chat id: {admin}"))?,
            );
        }
        if let Some(radius) = var("SEARCH_RADIUS_KM") {
            self.search_radius_km = radius
                .trim()
                .parse()
                .with_context(|| format!("SEARCH_RADIUS_KM is not a number: {radius}"))?;
        }
        if let Some(file) = var("LOG_FILE") {
            self.log.file = Some(PathBuf::from(file));
        }
        if let Some(level) = var("LOG_LEVEL") {
            self.log.level = level;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.bot_token.is_none() {
            bail!("bot token is missing, set BOT_TOKEN");
        }
        if !self.search_radius_km.is_finite() || self.search_radius_km <= 0.0 {
            bail!(
                "search radius must be a positive number of kilometres, got {}",
                self.search_radius_km
            );
        }
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.log.level)
            .map_err(|_| anyhow!("unknown log level: {}", self.log.level))
    }

    pub fn admin(&self) -> Option<ChatId> {
        self.admin_chat_id.map(ChatId)
    }
}

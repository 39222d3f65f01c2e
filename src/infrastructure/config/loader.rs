use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project config file read when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "quiz-harvester.yaml";

/// Prefix of environment overrides; `__` separates nested keys.
pub const ENV_PREFIX: &str = "QUIZ_HARVESTER_";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const VALID_LOG_FORMATS: [&str; 2] = ["json", "pretty"];

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    MissingFile(PathBuf),

    #[error("Invalid calls: {0}. Must be at least 1")]
    InvalidCalls(u32),

    #[error("Invalid attempts: {0}. Must be at least 1")]
    InvalidAttempts(u32),

    #[error("Invalid questions: {0}. Must be at least 1")]
    InvalidQuestions(u32),

    #[error("Invalid timeout: {0}s. Must be at least 1")]
    InvalidTimeout(u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Chat setting {0} cannot be empty")]
    EmptyChatSetting(&'static str),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Build the provider chain.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. YAML config file (`config_file`, or `quiz-harvester.yaml` if present)
    /// 3. Environment variables (QUIZ_HARVESTER_* prefix)
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let file = config_file.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load and validate configuration.
    pub fn load(config_file: Option<&Path>) -> Result<Config> {
        Self::load_with_overrides(config_file, &serde_json::Map::new())
    }

    /// Load configuration with `overrides` merged last (highest priority).
    ///
    /// `overrides` should serialize only the keys it sets, e.g. CLI flags
    /// that were actually given.
    pub fn load_with_overrides<T: Serialize>(config_file: Option<&Path>, overrides: &T) -> Result<Config> {
        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ConfigError::MissingFile(path.to_path_buf()).into());
            }
        }

        let config: Config = Self::figment(config_file)
            .merge(Serialized::defaults(overrides))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let harvest = &config.harvest;
        if harvest.calls == 0 {
            return Err(ConfigError::InvalidCalls(harvest.calls));
        }
        if harvest.attempts == 0 {
            return Err(ConfigError::InvalidAttempts(harvest.attempts));
        }
        if harvest.questions == 0 {
            return Err(ConfigError::InvalidQuestions(harvest.questions));
        }
        if harvest.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(harvest.timeout_secs));
        }

        if !VALID_LOG_LEVELS.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }
        if !VALID_LOG_FORMATS.contains(&config.logging.format.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let chat = &config.chat;
        for (name, value) in [
            ("base_url", &chat.base_url),
            ("model", &chat.model),
            ("api_key_env", &chat.api_key_env),
            ("unavailable_message", &chat.unavailable_message),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyChatSetting(name));
            }
        }

        Ok(())
    }
}

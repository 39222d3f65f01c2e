use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::harvest::ParseStrategy;

/// Fixed reply the chat client produces when it could not get a usable answer.
pub const DEFAULT_UNAVAILABLE_MESSAGE: &str =
    "Unusable response produced by ChatGPT, maybe its unavailable.";

/// Main configuration structure for the harvester
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Input file locations
    #[serde(default)]
    pub inputs: InputConfig,

    /// Control loop tuning
    #[serde(default)]
    pub harvest: HarvestConfig,

    /// Chat service connection
    #[serde(default)]
    pub chat: ChatConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Input file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct InputConfig {
    /// Template for the first prompt of a conversation
    #[serde(default = "default_prompt_file")]
    pub prompt_file: PathBuf,

    /// Template for follow-up prompts; the base template is reused when absent
    #[serde(default)]
    pub continue_file: Option<PathBuf>,

    /// Topic taxonomy (JSON)
    #[serde(default = "default_topics_file")]
    pub topics_file: PathBuf,

    /// Newline-delimited adjectives joined into `{prompt}`
    #[serde(default)]
    pub adjectives_file: Option<PathBuf>,
}

fn default_prompt_file() -> PathBuf {
    PathBuf::from("prompt.txt")
}

fn default_topics_file() -> PathBuf {
    PathBuf::from("topics.json")
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            prompt_file: default_prompt_file(),
            continue_file: None,
            topics_file: default_topics_file(),
            adjectives_file: None,
        }
    }
}

/// Control loop configuration. Durations are whole seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HarvestConfig {
    /// Wall-clock limit for a single chat request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_ranks")]
    pub ranks: u32,

    /// Calls per subcategory
    #[serde(default = "default_calls")]
    pub calls: u32,

    /// Questions requested per call; also the minimum accepted list length
    #[serde(default = "default_questions")]
    pub questions: u32,

    /// Attempts per call
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    #[serde(default = "default_wait_success_secs")]
    pub wait_success_secs: u64,

    #[serde(default = "default_wait_error_secs")]
    pub wait_error_secs: u64,

    /// Backoff after an unavailable response
    #[serde(default = "default_wait_block_secs")]
    pub wait_block_secs: u64,

    /// Pause after a parse failure, before the fresh conversation starts
    #[serde(default)]
    pub wait_parse_secs: u64,

    #[serde(default)]
    pub strategy: ParseStrategy,

    /// Root of the results tree
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// Category names to leave out of the run
    #[serde(default)]
    pub skip_categories: Vec<String>,
}

const fn default_timeout_secs() -> u64 {
    120
}

const fn default_ranks() -> u32 {
    6
}

const fn default_calls() -> u32 {
    3
}

const fn default_questions() -> u32 {
    10
}

const fn default_attempts() -> u32 {
    5
}

const fn default_wait_success_secs() -> u64 {
    5
}

const fn default_wait_error_secs() -> u64 {
    120
}

const fn default_wait_block_secs() -> u64 {
    600
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            ranks: default_ranks(),
            calls: default_calls(),
            questions: default_questions(),
            attempts: default_attempts(),
            wait_success_secs: default_wait_success_secs(),
            wait_error_secs: default_wait_error_secs(),
            wait_block_secs: default_wait_block_secs(),
            wait_parse_secs: 0,
            strategy: ParseStrategy::default(),
            results_dir: default_results_dir(),
            skip_categories: vec![],
        }
    }
}

impl HarvestConfig {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Chat service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChatConfig {
    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default)]
    pub temperature: Option<f32>,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Reply text treated as "service unavailable"
    #[serde(default = "default_unavailable_message")]
    pub unavailable_message: String,
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

const fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_unavailable_message() -> String {
    DEFAULT_UNAVAILABLE_MESSAGE.to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            unavailable_message: default_unavailable_message(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for per-run log files; console only when unset
    #[serde(default = "default_log_dir")]
    pub log_dir: Option<PathBuf>,

    #[serde(default = "default_true")]
    pub enable_stdout: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

#[allow(clippy::unnecessary_wraps)]
fn default_log_dir() -> Option<PathBuf> {
    Some(PathBuf::from("logs"))
}

const fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: default_log_dir(),
            enable_stdout: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_cli_defaults() {
        let config = Config::default();
        assert_eq!(config.harvest.timeout_secs, 120);
        assert_eq!(config.harvest.ranks, 6);
        assert_eq!(config.harvest.calls, 3);
        assert_eq!(config.harvest.questions, 10);
        assert_eq!(config.harvest.attempts, 5);
        assert_eq!(config.harvest.wait_success_secs, 5);
        assert_eq!(config.harvest.wait_error_secs, 120);
        assert_eq!(config.harvest.wait_block_secs, 600);
        assert_eq!(config.harvest.wait_parse_secs, 0);
        assert_eq!(config.harvest.timeout(), Duration::from_secs(120));
        assert_eq!(config.chat.unavailable_message, DEFAULT_UNAVAILABLE_MESSAGE);
        assert_eq!(config.logging.log_dir, Some(PathBuf::from("logs")));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"harvest": {"calls": 7}, "chat": {"model": "m"}}"#).unwrap();
        assert_eq!(config.harvest.calls, 7);
        assert_eq!(config.harvest.attempts, 5);
        assert_eq!(config.chat.model, "m");
        assert_eq!(config.chat.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.inputs.topics_file, PathBuf::from("topics.json"));
    }
}

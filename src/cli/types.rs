//! CLI type definitions
//!
//! A single flat command; every tuning flag is optional and only overrides
//! configuration when given.

use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

use crate::domain::models::ParseStrategy;

#[derive(Parser, Debug)]
#[command(name = "quiz-harvester")]
#[command(about = "Harvest quiz questions from a chat model across a topic taxonomy", long_about = None)]
#[command(version)]
pub struct Cli {
    /// YAML configuration file (default: quiz-harvester.yaml if present)
    #[arg(short, long, env = "QUIZ_HARVESTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Template for the first prompt of a conversation
    #[arg(long, alias = "prompt_file")]
    pub prompt_file: Option<PathBuf>,

    /// Template for follow-up prompts
    #[arg(long, alias = "continue_file")]
    pub continue_file: Option<PathBuf>,

    /// Topic taxonomy (JSON)
    #[arg(long, alias = "topics_file")]
    pub topics_file: Option<PathBuf>,

    /// Newline-delimited adjectives for the {prompt} placeholder
    #[arg(long, alias = "adjectives_file")]
    pub adjectives_file: Option<PathBuf>,

    /// Root directory for harvested artifacts
    #[arg(long, alias = "results_dir")]
    pub results_dir: Option<PathBuf>,

    /// Directory for per-run log files
    #[arg(long, alias = "log_dir")]
    pub log_dir: Option<PathBuf>,

    /// Seconds before a request is abandoned
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Number of difficulty ranks
    #[arg(long)]
    pub ranks: Option<u32>,

    /// Calls per subcategory
    #[arg(long)]
    pub calls: Option<u32>,

    /// Questions requested per call
    #[arg(long)]
    pub questions: Option<u32>,

    /// Attempts per call
    #[arg(long)]
    pub attempts: Option<u32>,

    /// Seconds to wait after a saved reply
    #[arg(long, alias = "wait_success")]
    pub wait_success: Option<u64>,

    /// Seconds to wait after a request error or timeout
    #[arg(long, alias = "wait_error")]
    pub wait_error: Option<u64>,

    /// Seconds to wait while the service is unavailable
    #[arg(long, alias = "wait_block")]
    pub wait_block: Option<u64>,

    /// Seconds to wait after an unparseable reply
    #[arg(long, alias = "wait_parse")]
    pub wait_parse: Option<u64>,

    /// How replies are parsed
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Category to skip (repeatable)
    #[arg(long = "skip-category", alias = "skip_category", value_name = "NAME")]
    pub skip_categories: Vec<String>,

    /// Chat model name
    #[arg(long)]
    pub model: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, alias = "log_level")]
    pub log_level: Option<String>,

    /// Output in JSON format
    #[arg(short, long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    EnumeratedList,
    SingleObject,
}

impl From<StrategyArg> for ParseStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::EnumeratedList => Self::EnumeratedList,
            StrategyArg::SingleObject => Self::SingleObject,
        }
    }
}

/// Flags given on the command line, shaped like the config file.
#[derive(Debug, Default, Serialize)]
pub struct ConfigOverrides {
    pub inputs: InputOverrides,
    pub harvest: HarvestOverrides,
    pub chat: ChatOverrides,
    pub logging: LoggingOverrides,
}

#[derive(Debug, Default, Serialize)]
pub struct InputOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continue_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjectives_file: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize)]
pub struct HarvestOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranks: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calls: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_success_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_error_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_block_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_parse_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<ParseStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skip_categories: Vec<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct ChatOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct LoggingOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    /// Configuration keys set by the given flags.
    pub fn config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            inputs: InputOverrides {
                prompt_file: self.prompt_file.clone(),
                continue_file: self.continue_file.clone(),
                topics_file: self.topics_file.clone(),
                adjectives_file: self.adjectives_file.clone(),
            },
            harvest: HarvestOverrides {
                timeout_secs: self.timeout,
                ranks: self.ranks,
                calls: self.calls,
                questions: self.questions,
                attempts: self.attempts,
                wait_success_secs: self.wait_success,
                wait_error_secs: self.wait_error,
                wait_block_secs: self.wait_block,
                wait_parse_secs: self.wait_parse,
                strategy: self.strategy.map(ParseStrategy::from),
                results_dir: self.results_dir.clone(),
                skip_categories: self.skip_categories.clone(),
            },
            chat: ChatOverrides {
                model: self.model.clone(),
            },
            logging: LoggingOverrides {
                level: self.log_level.clone(),
                log_dir: self.log_dir.clone(),
            },
        }
    }
}

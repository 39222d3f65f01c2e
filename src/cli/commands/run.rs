//! Implementation of the harvest run.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, info_span, Instrument};

use crate::adapters::chat::{OpenAiChatConfig, OpenAiChatSession};
use crate::adapters::storage::FsArtifactStore;
use crate::cli::output::{output, CommandOutput};
use crate::cli::types::Cli;
use crate::domain::models::{Config, RunSummary};
use crate::domain::ports::ChatSession;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::{run_timestamp, LogConfig, RunLogger};
use crate::services::{load_inputs, HarvestLoop, HarvestSettings, PromptTemplates};

#[derive(Debug, Serialize)]
pub struct SummaryOutput {
    pub results_dir: PathBuf,
    pub log_file: Option<PathBuf>,
    #[serde(flatten)]
    pub summary: RunSummary,
}

impl CommandOutput for SummaryOutput {
    fn to_human(&self) -> String {
        let s = &self.summary;
        let mut lines = vec![
            format!("Run {} finished", s.run_id),
            format!("  results:         {}", self.results_dir.display()),
        ];
        if let Some(log_file) = &self.log_file {
            lines.push(format!("  log:             {}", log_file.display()));
        }
        lines.push(format!("  requests:        {}", s.requests));
        lines.push(format!("  saved:           {}", s.saved));
        lines.push(format!("  parse failures:  {}", s.parse_failures));
        lines.push(format!("  timeouts:        {}", s.timeouts));
        lines.push(format!("  unavailable:     {}", s.unavailable));
        lines.push(format!("  request errors:  {}", s.dispatch_errors));
        lines.push(format!("  store errors:    {}", s.store_errors));
        lines.push(format!("  exhausted calls: {}", s.exhausted_calls));

        if !s.skipped_categories.is_empty() {
            lines.push(format!("\nSkipped categories: {}", s.skipped_categories.join(", ")));
        }

        let empty: Vec<String> = s
            .empty_subcategories()
            .map(|r| format!("  - {}/{}", r.category, r.subcategory))
            .collect();
        if !empty.is_empty() {
            lines.push("\nSubcategories with no saved artifacts:".to_string());
            lines.extend(empty);
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Load inputs and harvest the whole taxonomy with `session`.
pub async fn harvest<C: ChatSession>(config: &Config, session: C, run_id: &str) -> Result<RunSummary> {
    let inputs = load_inputs(&config.inputs)
        .await
        .context("Failed to load harvest inputs")?;

    let store = FsArtifactStore::new(&config.harvest.results_dir);
    let templates = PromptTemplates {
        base: inputs.base_template,
        continuation: inputs.continuation_template,
    };
    let settings = HarvestSettings::from_config(&config.harvest, &config.chat);

    info!(
        session = session.name(),
        results_dir = %store.root().display(),
        "starting harvest"
    );

    let mut harvest_loop = HarvestLoop::new(session, store, templates, &inputs.adjectives, settings);
    Ok(harvest_loop.run(&inputs.taxonomy, run_id).await)
}

pub async fn execute(cli: Cli) -> Result<()> {
    let config = ConfigLoader::load_with_overrides(cli.config.as_deref(), &cli.config_overrides())
        .context("Failed to load configuration")?;

    let run_id = run_timestamp();
    let logger = RunLogger::init(&LogConfig::from(&config.logging), &run_id)
        .context("Failed to initialize logging")?;

    let chat_config = OpenAiChatConfig::from_settings(&config.chat).context("Failed to configure chat client")?;
    let session = OpenAiChatSession::new(chat_config).context("Failed to create chat session")?;

    let summary = harvest(&config, session, &run_id)
        .instrument(info_span!("harvest", run_id = %run_id))
        .await?;

    let output_data = SummaryOutput {
        results_dir: config.harvest.results_dir.clone(),
        log_file: logger.log_file().map(PathBuf::from),
        summary,
    };
    drop(logger);

    output(&output_data, cli.json);
    Ok(())
}

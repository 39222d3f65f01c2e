//! The harvest control loop.
//!
//! Walks categories → subcategories → calls → attempts in file order. Each
//! attempt renders a prompt, dispatches it, parses the reply and saves the
//! payload; every failure kind maps to a fixed backoff/reset/retry action:
//!
//! | outcome            | wait          | conversation | next           |
//! |--------------------|---------------|--------------|----------------|
//! | chat error         | `wait_error`  | kept         | next attempt   |
//! | timeout            | `wait_error`  | reset        | next call      |
//! | unavailable        | `wait_block`  | kept         | next attempt   |
//! | parse failure      | `wait_parse`  | reset        | next call      |
//! | store failure      | none          | kept         | next attempt   |
//! | saved              | `wait_success`| continuing   | next call      |

use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::errors::DispatchError;
use crate::domain::models::{
    CallOutcome, ChatConfig, HarvestConfig, ParseStrategy, PromptParams, PromptState,
    PromptTemplate, RunSummary, SubcategoryReport, Taxonomy,
};
use crate::domain::ports::{ArtifactStore, ChatSession};
use crate::services::request_dispatcher::RequestDispatcher;
use crate::services::response_parser::{sanitize_path_segment, ResponseParser};

/// Subdirectory of a subcategory holding unparseable raw replies.
pub const FAILED_DIR: &str = "failed";

/// Sleep durations applied after each outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub success: Duration,
    pub error: Duration,
    pub block: Duration,
    pub parse: Duration,
}

/// Loop tuning, resolved from configuration.
#[derive(Debug, Clone)]
pub struct HarvestSettings {
    pub calls: u32,
    pub attempts: u32,
    pub questions: u32,
    pub ranks: u32,
    pub timeout: Duration,
    pub strategy: ParseStrategy,
    pub waits: WaitPolicy,
    pub unavailable_message: String,
    pub skip_categories: Vec<String>,
}

impl HarvestSettings {
    pub fn from_config(harvest: &HarvestConfig, chat: &ChatConfig) -> Self {
        Self {
            calls: harvest.calls,
            attempts: harvest.attempts,
            questions: harvest.questions,
            ranks: harvest.ranks,
            timeout: harvest.timeout(),
            strategy: harvest.strategy,
            waits: WaitPolicy {
                success: Duration::from_secs(harvest.wait_success_secs),
                error: Duration::from_secs(harvest.wait_error_secs),
                block: Duration::from_secs(harvest.wait_block_secs),
                parse: Duration::from_secs(harvest.wait_parse_secs),
            },
            unavailable_message: chat.unavailable_message.clone(),
            skip_categories: harvest.skip_categories.clone(),
        }
    }
}

/// Base and optional continuation templates.
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub base: PromptTemplate,
    pub continuation: Option<PromptTemplate>,
}

impl PromptTemplates {
    fn for_state(&self, state: PromptState) -> &PromptTemplate {
        match (state, &self.continuation) {
            (PromptState::Continuing, Some(continuation)) => continuation,
            _ => &self.base,
        }
    }
}

struct Target<'a> {
    category: &'a str,
    subcategory: &'a str,
    dir: PathBuf,
}

/// Drives one chat session through the whole taxonomy.
pub struct HarvestLoop<C, A> {
    session: C,
    store: A,
    dispatcher: RequestDispatcher,
    parser: ResponseParser,
    templates: PromptTemplates,
    adjectives: String,
    settings: HarvestSettings,
    requests: u64,
}

impl<C, A> HarvestLoop<C, A>
where
    C: ChatSession,
    A: ArtifactStore,
{
    pub fn new(
        session: C,
        store: A,
        templates: PromptTemplates,
        adjectives: &[String],
        settings: HarvestSettings,
    ) -> Self {
        let min_items = usize::try_from(settings.questions).unwrap_or(usize::MAX);
        Self {
            session,
            store,
            dispatcher: RequestDispatcher::new(settings.timeout),
            parser: ResponseParser::new(settings.strategy, min_items),
            templates,
            adjectives: adjectives.join(", "),
            settings,
            requests: 0,
        }
    }

    /// Requests sent so far in this run.
    pub const fn requests(&self) -> u64 {
        self.requests
    }

    /// Harvest every subcategory of `taxonomy` in order.
    pub async fn run(&mut self, taxonomy: &Taxonomy, run_id: &str) -> RunSummary {
        let mut summary = RunSummary::new(run_id);

        info!(
            categories = taxonomy.categories.len(),
            calls = self.settings.calls,
            attempts = self.settings.attempts,
            strategy = %self.parser.strategy(),
            timeout_secs = self.dispatcher.timeout().as_secs(),
            "harvest started"
        );

        for category in &taxonomy.categories {
            if self.settings.skip_categories.contains(&category.name) {
                info!(category = %category.name, "category skipped");
                summary.skipped_categories.push(category.name.clone());
                continue;
            }

            for subcategory in &category.subcategories {
                let report = self.harvest_subcategory(&category.name, subcategory).await;
                summary.absorb(report);
            }
        }

        info!(
            requests = summary.requests,
            saved = summary.saved,
            parse_failures = summary.parse_failures,
            timeouts = summary.timeouts,
            exhausted_calls = summary.exhausted_calls,
            "harvest finished"
        );
        for empty in summary.empty_subcategories() {
            warn!(
                category = %empty.category,
                subcategory = %empty.subcategory,
                "no artifacts saved for subcategory"
            );
        }

        summary
    }

    /// Run all calls for one subcategory on a fresh conversation.
    pub async fn harvest_subcategory(&mut self, category: &str, subcategory: &str) -> SubcategoryReport {
        let target = Target {
            category,
            subcategory,
            dir: Path::new(&sanitize_path_segment(category)).join(sanitize_path_segment(subcategory)),
        };
        let mut report = SubcategoryReport::new(category, subcategory);
        let mut state = PromptState::Fresh;
        self.reset_conversation(&mut state).await;

        info!(category, subcategory, "subcategory started");

        for call in 1..=self.settings.calls {
            let outcome = self.run_call(&target, call, &mut state, &mut report).await;
            report.record(&outcome);
        }

        info!(
            category,
            subcategory,
            saved = report.saved,
            requests = report.requests,
            exhausted_calls = report.exhausted_calls,
            "subcategory finished"
        );
        report
    }

    async fn run_call(
        &mut self,
        target: &Target<'_>,
        call: u32,
        state: &mut PromptState,
        report: &mut SubcategoryReport,
    ) -> CallOutcome {
        let waits = self.settings.waits;

        for attempt in 1..=self.settings.attempts {
            self.requests += 1;
            report.requests += 1;
            let request = self.requests;

            let prompt = self.render_prompt(target, call, *state);
            info!(request, call, attempt, %prompt, "send request");

            let reply = match self.dispatcher.dispatch(&mut self.session, &prompt).await {
                Ok(reply) => reply,
                Err(DispatchError::Timeout(limit)) => {
                    error!(request, timeout_secs = limit.as_secs(), "request failed: Timeout reached");
                    sleep(waits.error).await;
                    self.reset_conversation(state).await;
                    return CallOutcome::TimedOut;
                }
                Err(DispatchError::Chat(err)) if err.is_unavailable() => {
                    error!(request, error = %err, "request failed: Service unavailable");
                    report.unavailable += 1;
                    sleep(waits.block).await;
                    continue;
                }
                Err(DispatchError::Chat(err)) => {
                    error!(request, error = %err, "request failed");
                    report.dispatch_errors += 1;
                    sleep(waits.error).await;
                    continue;
                }
            };

            if reply.text == self.settings.unavailable_message {
                error!(request, "request failed: Service unavailable");
                report.unavailable += 1;
                sleep(waits.block).await;
                continue;
            }

            info!(request, elapsed_secs = reply.elapsed.as_secs_f64(), "request ok");

            let parsed = match self.parser.parse(&reply.text) {
                Ok(parsed) => parsed,
                Err(err) => {
                    error!(request, error = %err, response = %reply.text, "parsing response failed");
                    self.save_failed(target, request, &reply.text).await;
                    self.reset_conversation(state).await;
                    if !waits.parse.is_zero() {
                        sleep(waits.parse).await;
                    }
                    return CallOutcome::ParseFailed;
                }
            };
            info!(request, "parsing response ok");

            match self.store.save(&target.dir, &parsed.filename, &parsed.payload).await {
                Ok(path) => {
                    *state = PromptState::Continuing;
                    info!(request, path = %path.display(), "saving response ok");
                    sleep(waits.success).await;
                    return CallOutcome::Saved(path);
                }
                Err(err) => {
                    error!(request, error = %err, response = %reply.text, "saving response failed");
                    report.store_errors += 1;
                }
            }
        }

        warn!(
            category = target.category,
            subcategory = target.subcategory,
            call,
            attempts = self.settings.attempts,
            "call exhausted its attempts"
        );
        CallOutcome::Exhausted
    }

    fn render_prompt(&self, target: &Target<'_>, call: u32, state: PromptState) -> String {
        self.templates.for_state(state).render(&PromptParams {
            calls: self.settings.calls,
            call,
            category: target.category,
            sub_category: target.subcategory,
            questions: self.settings.questions,
            ranks: self.settings.ranks,
            prompt: &self.adjectives,
        })
    }

    async fn save_failed(&self, target: &Target<'_>, request: u64, raw: &str) {
        let failed_dir = target.dir.join(FAILED_DIR);
        let id = Uuid::new_v4().to_string();
        match self.store.save(&failed_dir, &id, raw).await {
            Ok(path) => info!(request, path = %path.display(), "raw response kept"),
            Err(err) => error!(request, error = %err, "saving raw response failed"),
        }
    }

    async fn reset_conversation(&mut self, state: &mut PromptState) {
        *state = PromptState::Fresh;
        if let Err(err) = self.session.new_conversation().await {
            warn!(error = %err, "failed to start a new conversation");
        }
    }
}

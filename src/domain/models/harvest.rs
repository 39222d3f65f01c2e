use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// How a raw reply is reduced to a payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParseStrategy {
    /// One JSON object with a `question.en` field.
    SingleObject,
    /// Numbered lines, one question each.
    #[default]
    EnumeratedList,
}

impl std::fmt::Display for ParseStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SingleObject => f.write_str("single-object"),
            Self::EnumeratedList => f.write_str("enumerated-list"),
        }
    }
}

/// A parsed reply ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    /// Canonical JSON payload.
    pub payload: String,
    /// Filesystem-safe name without extension.
    pub filename: String,
}

/// A chat reply and how long it took.
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub elapsed: Duration,
}

/// Whether the next prompt opens a conversation or continues one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PromptState {
    #[default]
    Fresh,
    Continuing,
}

/// How a single call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    /// Payload written to this path.
    Saved(PathBuf),
    /// Reply could not be parsed; conversation was reset.
    ParseFailed,
    /// Dispatch hit the deadline; conversation was reset.
    TimedOut,
    /// Every attempt failed without reaching a terminal outcome.
    Exhausted,
}

/// Counters for one subcategory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcategoryReport {
    pub category: String,
    pub subcategory: String,
    pub requests: u64,
    pub saved: u32,
    pub parse_failures: u32,
    pub timeouts: u32,
    pub unavailable: u32,
    pub dispatch_errors: u32,
    pub store_errors: u32,
    pub exhausted_calls: u32,
}

impl SubcategoryReport {
    pub fn new(category: impl Into<String>, subcategory: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            subcategory: subcategory.into(),
            ..Default::default()
        }
    }

    /// Record the terminal outcome of a call.
    pub fn record(&mut self, outcome: &CallOutcome) {
        match outcome {
            CallOutcome::Saved(_) => self.saved += 1,
            CallOutcome::ParseFailed => self.parse_failures += 1,
            CallOutcome::TimedOut => self.timeouts += 1,
            CallOutcome::Exhausted => self.exhausted_calls += 1,
        }
    }
}

/// Totals for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub requests: u64,
    pub saved: u32,
    pub parse_failures: u32,
    pub timeouts: u32,
    pub unavailable: u32,
    pub dispatch_errors: u32,
    pub store_errors: u32,
    pub exhausted_calls: u32,
    pub skipped_categories: Vec<String>,
    pub subcategories: Vec<SubcategoryReport>,
}

impl RunSummary {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            ..Default::default()
        }
    }

    /// Fold a finished subcategory into the totals.
    pub fn absorb(&mut self, report: SubcategoryReport) {
        self.requests += report.requests;
        self.saved += report.saved;
        self.parse_failures += report.parse_failures;
        self.timeouts += report.timeouts;
        self.unavailable += report.unavailable;
        self.dispatch_errors += report.dispatch_errors;
        self.store_errors += report.store_errors;
        self.exhausted_calls += report.exhausted_calls;
        self.subcategories.push(report);
    }

    /// Subcategories that finished without a single saved artifact.
    pub fn empty_subcategories(&self) -> impl Iterator<Item = &SubcategoryReport> {
        self.subcategories.iter().filter(|r| r.saved == 0)
    }
}

use super::config::{LogConfig, LogFormat};
use anyhow::{Context, Result};
use std::io;
use std::path::{Path, PathBuf};
use tracing::subscriber::DefaultGuard;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Timestamp used to name a run and its log file.
pub fn run_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string()
}

/// Logger scoped to a single harvest run.
///
/// The subscriber is the thread default only while this value is alive;
/// dropping it flushes the run's log file.
pub struct RunLogger {
    // Dropped before the worker guard so no events race the final flush.
    _default: DefaultGuard,
    _guard: Option<WorkerGuard>,
    log_file: Option<PathBuf>,
}

impl RunLogger {
    /// Install the run's subscriber on the current thread.
    ///
    /// With a `log_dir` configured, events also go to `<log_dir>/<run_label>.log`.
    ///
    /// # Errors
    /// Returns an error for an invalid level or when the log file cannot be created
    pub fn init(config: &LogConfig, run_label: &str) -> Result<Self> {
        let default_level = parse_log_level(&config.level)?;
        let env_filter = EnvFilter::builder()
            .with_default_directive(default_level.into())
            .from_env_lossy();

        let mut layers: Vec<BoxedLayer> = Vec::new();
        let mut guard = None;
        let mut log_file = None;

        if let Some(ref log_dir) = config.log_dir {
            std::fs::create_dir_all(log_dir)
                .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(run_label)
                .filename_suffix("log")
                .build(log_dir)
                .context("Failed to create run log file")?;
            let (non_blocking_file, worker_guard) = tracing_appender::non_blocking(file_appender);

            layers.push(fmt_layer(config.format, non_blocking_file, false));
            guard = Some(worker_guard);
            log_file = Some(log_path(log_dir, run_label));
        }

        if config.enable_stdout {
            layers.push(fmt_layer(config.format, io::stdout, true));
        }

        let subscriber = tracing_subscriber::registry().with(layers).with(env_filter);
        let default = tracing::subscriber::set_default(subscriber);

        Ok(Self {
            _default: default,
            _guard: guard,
            log_file,
        })
    }

    /// Path of this run's log file, if file logging is enabled.
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
}

fn log_path(log_dir: &Path, run_label: &str) -> PathBuf {
    log_dir.join(format!("{run_label}.log"))
}

fn fmt_layer<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .with_ansi(false)
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(ansi)
            .with_target(false)
            .with_span_events(FmtSpan::NONE)
            .boxed(),
    }
}

/// Parse log level string to tracing Level
fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(anyhow::anyhow!("Invalid log level: {level}")),
    }
}

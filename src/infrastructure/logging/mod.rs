//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - Pretty or JSON formatting
//! - One log file per run via tracing-appender
//! - Run-scoped subscriber installation

pub mod config;
pub mod logger;

pub use config::{LogConfig, LogFormat};
pub use logger::{run_timestamp, RunLogger};

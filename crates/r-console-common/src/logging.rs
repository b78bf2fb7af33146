//! ---
//! console_section: "01-core-functionality"
//! console_subsection: "module"
//! console_type: "source"
//! console_scope: "code"
//! console_description: "Shared primitives and utilities for the navigation core."
//! console_version: "v0.0.0-prealpha"
//! console_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;

const LOG_ENV: &str = "R_CONSOLE_LOG";

/// Output format of the stderr console layer. The log file is always JSON.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    StructuredJson,
    #[default]
    Pretty,
}

/// Keeps the background file writer alive. Buffered lines are flushed on drop,
/// so hold it until the process is about to exit.
#[must_use = "dropping the guard stops the log file writer"]
#[derive(Debug)]
pub struct TracingGuard {
    log_file: Option<PathBuf>,
    installed: bool,
    _writer: Option<WorkerGuard>,
}

impl TracingGuard {
    /// Stem of the rolling log file (the appender appends a date suffix).
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    /// `false` when another subscriber was already installed for this process.
    pub fn installed(&self) -> bool {
        self.installed
    }
}

fn file_filter() -> EnvFilter {
    match std::env::var(LOG_ENV) {
        Ok(directive) => EnvFilter::try_new(&directive).unwrap_or_else(|err| {
            eprintln!("invalid {LOG_ENV} directive '{directive}' ({err}); using info");
            EnvFilter::new("info")
        }),
        Err(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

/// Install the process-wide subscriber for `service_name`.
///
/// Console output goes to stderr at `console_level` so command output on
/// stdout stays machine readable. With `directory` set, a daily rolling JSON
/// file `<file_prefix or service>.log.<date>` is written as well, filtered by
/// `R_CONSOLE_LOG`, then `RUST_LOG`, then `info`.
pub fn init_tracing(service_name: &str, config: &LoggingConfig) -> Result<TracingGuard> {
    let console_level = config.console_filter()?;
    let console_layer = match config.format {
        LogFormat::StructuredJson => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(console_level)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(console_level)
            .boxed(),
    };

    let (file_layer, log_file, writer_guard) = match &config.directory {
        Some(directory) => {
            fs::create_dir_all(directory).with_context(|| {
                format!("unable to create log directory {}", directory.display())
            })?;
            let stem = format!(
                "{}.log",
                config.file_prefix.as_deref().unwrap_or(service_name)
            );
            let appender = tracing_appender::rolling::daily(directory, &stem);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(file_filter());
            (Some(layer), Some(directory.join(stem)), Some(guard))
        }
        None => (None, None, None),
    };

    let installed = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok();

    info!(
        service = %service_name,
        log_file = ?log_file,
        format = ?config.format,
        "tracing initialised"
    );
    Ok(TracingGuard {
        log_file,
        installed,
        _writer: writer_guard,
    })
}

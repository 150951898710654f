//! Logging setup
//!
//! Installs the global `tracing` subscriber. `RUST_LOG` takes precedence over
//! the configured level. File output goes through a non-blocking appender;
//! keep the returned guard alive until exit or buffered lines are lost.

use crate::config::{LogFormat, LoggingConfig};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Errors raised while installing the subscriber
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{filter}': {error}")]
    Filter { filter: String, error: String },

    #[error("Failed to open log file {path:?}: {error}")]
    File {
        path: PathBuf,
        #[source]
        error: InitError,
    },

    #[error("A global subscriber is already installed")]
    AlreadyInitialized,
}

/// Filter directive for a configured level
///
/// A bare level applies to this crate only; anything containing `=` or `,`
/// is passed through as a full directive.
pub fn directive_for(level: &str) -> String {
    let level = level.trim();
    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("appsight={}", level)
    }
}

fn env_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let directive = directive_for(level);
    EnvFilter::try_new(&directive).map_err(|e| LoggingError::Filter {
        filter: directive,
        error: e.to_string(),
    })
}

fn file_appender(path: &str) -> Result<RollingFileAppender, LoggingError> {
    let path = Path::new(path);
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "appsight.log".to_string());

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)
        .map_err(|error| LoggingError::File {
            path: path.to_path_buf(),
            error,
        })
}

/// Install the global subscriber described by `config`
///
/// Returns the appender's worker guard when logging to a file.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = env_filter(&config.level)?;

    let (writer, ansi, guard) = match &config.file {
        Some(path) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender(path)?);
            (BoxMakeWriter::new(non_blocking), false, Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stderr), true, None),
    };

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(writer))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_ansi(ansi).with_writer(writer))
            .try_init(),
    };

    result.map_err(|_| LoggingError::AlreadyInitialized)?;
    Ok(guard)
}

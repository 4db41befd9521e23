//! Tracing setup.
//!
//! Events go to stderr, or to [`LoggingConfig::file`] when one is set, so
//! stdout is left to command output such as replayed point sets.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::HandlensResult;

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
///
/// Fails if the log file cannot be opened. An already installed global
/// subscriber is kept.
pub fn init_logging(config: &LoggingConfig) -> HandlensResult<()> {
    let subscriber = build_subscriber(config)?;
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("Global subscriber already installed, keeping it");
    }
    Ok(())
}

/// Build the subscriber `init_logging` would install.
pub fn build_subscriber(
    config: &LoggingConfig,
) -> HandlensResult<Box<dyn tracing::Subscriber + Send + Sync>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (writer, ansi) = match &config.file {
        Some(path) => (open_log_file(path)?, false),
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true);

    if config.json {
        Ok(Box::new(builder.json().finish()))
    } else {
        Ok(Box::new(builder.finish()))
    }
}

/// Open `path` for appending, creating it and its directory if needed.
fn open_log_file(path: &Path) -> HandlensResult<BoxMakeWriter> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(BoxMakeWriter::new(Arc::new(file)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlensError;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("handlens-{name}-{}", std::process::id()))
    }

    #[test]
    fn test_events_are_appended_to_log_file() {
        let dir = scratch_dir("log");
        let path = dir.join("logs").join("handlens.log");
        let config = LoggingConfig {
            level: "info".to_string(),
            json: true,
            file: Some(path.clone()),
        };

        for frame in [7, 8] {
            let subscriber = build_subscriber(&config).unwrap();
            tracing::subscriber::with_default(subscriber, || {
                tracing::info!(frame, "Frame stabilized");
                tracing::trace!("below the configured level");
            });
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["fields"]["message"], "Frame stabilized");
        assert_eq!(lines[0]["fields"]["frame"], 7);
        assert_eq!(lines[1]["fields"]["frame"], 8);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unopenable_log_file_is_an_error() {
        let dir = scratch_dir("log-dir");
        std::fs::create_dir_all(&dir).unwrap();
        let config = LoggingConfig {
            file: Some(dir.clone()),
            ..LoggingConfig::default()
        };

        assert!(matches!(build_subscriber(&config), Err(HandlensError::Io(_))));

        std::fs::remove_dir_all(&dir).ok();
    }
}

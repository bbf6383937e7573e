//! Tracing setup shared by the binary and the integration tests.
//!
//! [`init_logging`] wires a daily-rolling file sink (and optionally stderr)
//! into the global `tracing` subscriber. It is idempotent: the first caller
//! wins and later callers just get back the resolved log file path, which
//! keeps test binaries that race on initialisation well behaved.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use chrono::Local;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Configuration passed to [`init_logging`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Logical component name; doubles as log file stem and data-dir name.
    pub app_name: &'static str,
    /// Explicit log directory. When `None` we consult `GIST_LOG_DIR`, then
    /// fall back to `~/.local/share/<app_name>`.
    pub log_dir: Option<PathBuf>,
    /// Duplicate events to stderr in addition to the file sink. The CLI
    /// leaves this off so stdout/stderr stay clean for the printed digest.
    pub emit_stderr: bool,
    /// Filter applied when `RUST_LOG` is unset.
    pub default_filter: &'static str,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "pagegist",
            log_dir: None,
            emit_stderr: false,
            default_filter: "info",
        }
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Returns the log file path for the current day.
pub fn init_logging(config: LogConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = LOG_PATH.get() {
        return Ok(path.clone());
    }

    let dir = resolve_log_dir(config.app_name, config.log_dir.as_deref());
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory: {}", dir.display()))?;

    let filename = format!("{}.log", config.app_name);
    let full_path = dated_log_path(&dir, &filename);

    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(dir, filename));
    let _ = LOG_GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.default_filter));

    let file_layer = fmt::layer().with_writer(writer).with_ansi(false);
    if config.emit_stderr {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .try_init()
            .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;
    }

    let _ = LOG_PATH.set(full_path.clone());
    Ok(full_path)
}

/// The daily roller appends the date to the file stem, so today's file is
/// `<dir>/<filename>.YYYY-MM-DD`.
fn dated_log_path(dir: &Path, filename: &str) -> PathBuf {
    let today = Local::now().format("%Y-%m-%d").to_string();
    dir.join(format!("{filename}.{today}"))
}

fn resolve_log_dir(app_name: &str, explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return expand_home(dir);
    }
    if let Ok(env_dir) = std::env::var("GIST_LOG_DIR") {
        return expand_home(Path::new(&env_dir));
    }
    default_data_dir(app_name)
}

fn expand_home(path: &Path) -> PathBuf {
    if let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/")) {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    path.to_path_buf()
}

fn default_data_dir(app_name: &str) -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(app_name)
    } else {
        PathBuf::from(".").join(app_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dated_log_path_matches_daily_roller_naming() {
        let dir = Path::new("/var/log/pagegist");
        let path = dated_log_path(dir, "pagegist.log");
        assert_eq!(path.parent(), Some(dir));

        let name = path.file_name().unwrap().to_str().unwrap();
        let today = Local::now().format("%Y-%m-%d").to_string();
        assert_eq!(name, format!("pagegist.log.{today}"));
    }
}

//! Process-wide logging bootstrap.
//!
//! # Responsibility
//! - Start one rotating file logger per process.
//! - Capture panics as sanitized log events.
//!
//! # Invariants
//! - Repeated init with identical settings is a no-op.
//! - Init with a different level or directory is rejected, not applied.
//! - Task titles and notes are never written to logs.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "weekplan";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static ACTIVE_LOGGER: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    level: &'static str,
    log_dir: PathBuf,
    _handle: LoggerHandle,
}

/// Errors returned by [`init_logging`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    UnsupportedLevel(String),
    InvalidLogDir(String),
    /// Logging already runs with different settings.
    Conflict {
        active: String,
        requested: String,
    },
    Backend(String),
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::InvalidLogDir(message) => write!(f, "invalid log_dir: {message}"),
            Self::Conflict { active, requested } => write!(
                f,
                "logging already initialized with {active}; refusing to switch to {requested}"
            ),
            Self::Backend(message) => write!(f, "logger backend failed: {message}"),
        }
    }
}

impl Error for LoggingError {}

/// Starts file logging at `level` under the absolute directory `log_dir`.
///
/// # Errors
/// - `UnsupportedLevel` / `InvalidLogDir` for bad input.
/// - `Conflict` when already initialized with other settings.
/// - `Backend` when the directory or logger cannot be created.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), LoggingError> {
    let level = normalize_level(level)?;
    let log_dir = normalize_log_dir(log_dir)?;

    let active = ACTIVE_LOGGER.get_or_try_init(|| start_logger(level, &log_dir))?;
    if active.level != level || active.log_dir != log_dir {
        return Err(LoggingError::Conflict {
            active: describe(active.level, &active.log_dir),
            requested: describe(level, &log_dir),
        });
    }
    Ok(())
}

/// Returns `(level, log_dir)` of the running logger, if any.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE_LOGGER
        .get()
        .map(|active| (active.level, active.log_dir.clone()))
}

/// `debug` for debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(level: &'static str, log_dir: &Path) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(log_dir).map_err(|err| {
        LoggingError::Backend(format!("cannot create `{}`: {err}", log_dir.display()))
    })?;

    let handle = Logger::try_with_str(level)
        .map_err(|err| LoggingError::Backend(err.to_string()))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    install_panic_hook();
    info!(
        "event=logging_start module=core status=ok level={level} log_dir={} version={}",
        log_dir.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        level,
        log_dir: log_dir.to_path_buf(),
        _handle: handle,
    })
}

fn describe(level: &str, log_dir: &Path) -> String {
    format!("level `{level}` at `{}`", log_dir.display())
}

fn normalize_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(LoggingError::UnsupportedLevel(other.to_string())),
    }
}

fn normalize_log_dir(log_dir: &str) -> Result<PathBuf, LoggingError> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err(LoggingError::InvalidLogDir("must not be empty".to_string()));
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(LoggingError::InvalidLogDir(format!(
            "must be absolute, got `{trimmed}`"
        )));
    }
    Ok(path.to_path_buf())
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        error!(
            "event=panic_captured module=core status=error location={} payload={}",
            location,
            sanitize_message(&payload, MAX_PANIC_PAYLOAD_CHARS)
        );
        previous_hook(panic_info);
    }));
}

fn sanitize_message(value: &str, max_chars: usize) -> String {
    let flattened = value.replace(['\n', '\r'], " ");
    let mut out: String = flattened.chars().take(max_chars).collect();
    if flattened.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{
        init_logging, logging_status, normalize_level, normalize_log_dir, sanitize_message,
        LoggingError,
    };

    #[test]
    fn normalize_level_accepts_aliases_and_case() {
        assert_eq!(normalize_level(" WARNING ").unwrap(), "warn");
        assert_eq!(normalize_level("Debug").unwrap(), "debug");
        assert_eq!(
            normalize_level("verbose").unwrap_err(),
            LoggingError::UnsupportedLevel("verbose".to_string())
        );
    }

    #[test]
    fn normalize_log_dir_requires_absolute_path() {
        assert!(matches!(
            normalize_log_dir("logs/dev"),
            Err(LoggingError::InvalidLogDir(_))
        ));
        assert!(matches!(
            normalize_log_dir("  "),
            Err(LoggingError::InvalidLogDir(_))
        ));
    }

    #[test]
    fn sanitize_message_flattens_and_truncates() {
        let out = sanitize_message("a\nb\rc-long-tail", 5);
        assert_eq!(out, "a b c...");
    }

    #[test]
    fn init_is_idempotent_and_rejects_reconfiguration() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        let dir_str = dir.path().to_str().unwrap();
        let other_str = other.path().to_str().unwrap();

        init_logging("info", dir_str).unwrap();
        init_logging("INFO", dir_str).unwrap();

        let level_err = init_logging("debug", dir_str).unwrap_err();
        assert!(matches!(level_err, LoggingError::Conflict { .. }));
        let dir_err = init_logging("info", other_str).unwrap_err();
        assert!(dir_err.to_string().contains("refusing to switch"));

        let (level, active_dir) = logging_status().unwrap();
        assert_eq!(level, "info");
        assert_eq!(active_dir, dir.path());
    }
}

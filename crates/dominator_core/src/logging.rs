//! Process-wide logging bootstrap.
//!
//! Core code only emits metadata (`event=... module=... status=...`), never
//! titles or other user text. Initialization happens at most once per
//! process; repeating it with the same settings is a no-op.

use crate::error::AppError;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "dominator";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    log_dir: Option<PathBuf>,
    _logger: LoggerHandle,
}

/// Starts logging at `level`, to rotating files under `log_dir` when given and
/// to stderr otherwise.
///
/// # Errors
/// - unsupported level or relative `log_dir`
/// - logging already running with a different level or destination
/// - the backend fails to start
pub fn init_logging(level: &str, log_dir: Option<&Path>) -> Result<(), AppError> {
    let level = normalize_level(level)?;
    let log_dir = log_dir.map(normalize_log_dir).transpose()?;

    let state = LOGGING_STATE.get_or_try_init(|| start_logger(level, log_dir.clone()))?;

    if state.level != level {
        return Err(AppError::invalid_input(format!(
            "logging already initialized with level `{}`; refusing to switch to `{level}`",
            state.level
        )));
    }
    if state.log_dir != log_dir {
        return Err(AppError::invalid_input(
            "logging already initialized with a different destination",
        ));
    }
    Ok(())
}

pub fn logging_status() -> Option<(&'static str, Option<PathBuf>)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.log_dir.clone()))
}

fn start_logger(level: &'static str, log_dir: Option<PathBuf>) -> Result<LoggingState, AppError> {
    let logger = Logger::try_with_str(level)
        .map_err(|err| AppError::invalid_input(format!("invalid log level `{level}`: {err}")))?;

    let logger = match log_dir.as_deref() {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            logger
                .log_to_file(FileSpec::default().directory(dir).basename(LOG_FILE_BASENAME))
                .rotate(
                    Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(MAX_LOG_FILES),
                )
                .write_mode(WriteMode::BufferAndFlush)
                .append()
                .format_for_files(flexi_logger::detailed_format)
        }
        None => logger.log_to_stderr(),
    };

    let handle = logger
        .start()
        .map_err(|err| AppError::io(format!("failed to start logger: {err}")))?;

    info!(
        "event=logging_init module=core status=ok level={} target={} version={}",
        level,
        if log_dir.is_some() { "file" } else { "stderr" },
        env!("CARGO_PKG_VERSION")
    );

    Ok(LoggingState {
        level,
        log_dir,
        _logger: handle,
    })
}

fn normalize_level(level: &str) -> Result<&'static str, AppError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => Ok("off"),
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(AppError::invalid_input(format!(
            "unsupported log level `{other}`; expected off|trace|debug|info|warn|error"
        ))),
    }
}

fn normalize_log_dir(log_dir: &Path) -> Result<PathBuf, AppError> {
    if !log_dir.is_absolute() {
        return Err(AppError::invalid_input(format!(
            "log directory must be an absolute path, got `{}`",
            log_dir.display()
        )));
    }
    Ok(log_dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::{init_logging, logging_status, normalize_level, normalize_log_dir};
    use std::path::Path;

    #[test]
    fn normalize_level_accepts_known_values() {
        assert_eq!(normalize_level("INFO").unwrap(), "info");
        assert_eq!(normalize_level(" warning ").unwrap(), "warn");
        assert_eq!(normalize_level("verbose").unwrap_err().code(), "invalid_input");
    }

    #[test]
    fn normalize_log_dir_rejects_relative_path() {
        let err = normalize_log_dir(Path::new("logs/dev")).unwrap_err();
        assert!(err.message().contains("absolute"));
    }

    #[test]
    fn init_logging_is_idempotent_and_rejects_conflicts() {
        let dir = tempfile::tempdir().unwrap();

        init_logging("info", Some(dir.path())).unwrap();
        init_logging("info", Some(dir.path())).unwrap();

        let level_err = init_logging("debug", Some(dir.path())).unwrap_err();
        assert!(level_err.message().contains("refusing to switch"));

        let target_err = init_logging("info", None).unwrap_err();
        assert_eq!(target_err.code(), "invalid_input");

        let (level, log_dir) = logging_status().unwrap();
        assert_eq!(level, "info");
        assert_eq!(log_dir.as_deref(), Some(dir.path()));
    }
}

//! Rolling file logging for the core, initialized once per process.
//!
//! # Responsibility
//! - Start the file logger and keep its handle alive for the process.
//! - Route panics into the log as structured `panic_captured` events.
//!
//! # Invariants
//! - The first successful `init_logging` call fixes level and directory;
//!   later calls with the same configuration succeed, any other
//!   configuration is rejected.
//! - Initialization must not panic.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "memedex";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 5;
const PANIC_PAYLOAD_MAX_CHARS: usize = 160;

const LEVELS: &[(&str, &str)] = &[
    ("trace", "trace"),
    ("debug", "debug"),
    ("info", "info"),
    ("warn", "warn"),
    ("warning", "warn"),
    ("error", "error"),
];

static ACTIVE_LOGGING: OnceCell<ActiveLogging> = OnceCell::new();
static PANIC_HOOK_SET: OnceCell<()> = OnceCell::new();

struct ActiveLogging {
    config: LogConfig,
    _handle: LoggerHandle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LogConfig {
    level: &'static str,
    dir: PathBuf,
}

impl LogConfig {
    fn parse(level: &str, log_dir: &str) -> Result<Self, String> {
        let level = normalize_level(level)?;
        let trimmed = log_dir.trim();
        if trimmed.is_empty() {
            return Err("log_dir cannot be empty".to_string());
        }
        let dir = Path::new(trimmed);
        if !dir.is_absolute() {
            return Err(format!("log_dir must be an absolute path, got `{trimmed}`"));
        }
        Ok(Self {
            level,
            dir: dir.to_path_buf(),
        })
    }

    fn conflict_message(&self, requested: &LogConfig) -> String {
        if self.dir != requested.dir {
            format!(
                "logging already active at `{}`; refusing to switch to `{}`",
                self.dir.display(),
                requested.dir.display()
            )
        } else {
            format!(
                "logging already active with level `{}`; refusing to switch to `{}`",
                self.level, requested.level
            )
        }
    }
}

/// Starts file logging at `level` under the absolute directory `log_dir`.
///
/// The first successful call owns the process-wide logger. Repeating the
/// call with the identical configuration is a no-op; asking for a different
/// level or directory returns an error instead of restarting the logger.
///
/// # Errors
/// - `level` is not one of trace, debug, info, warn, error.
/// - `log_dir` is empty, relative, or cannot be created.
/// - The logger backend fails to start.
/// - Logging is already active with a different configuration.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let requested = LogConfig::parse(level, log_dir)?;

    let active = ACTIVE_LOGGING.get_or_try_init(|| -> Result<ActiveLogging, String> {
        let handle = start_file_logger(&requested)?;
        install_panic_hook();
        info!(
            "event=core_start module=logging status=ok platform={} build_mode={} version={}",
            std::env::consts::OS,
            build_mode(),
            env!("CARGO_PKG_VERSION")
        );
        info!(
            "event=logging_init module=logging status=ok level={} log_dir={}",
            requested.level,
            requested.dir.display()
        );
        Ok(ActiveLogging {
            config: requested.clone(),
            _handle: handle,
        })
    })?;

    if active.config != requested {
        return Err(active.config.conflict_message(&requested));
    }
    Ok(())
}

/// Returns `(level, log_dir)` of the active logger, or `None` before
/// initialization.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE_LOGGING
        .get()
        .map(|active| (active.config.level, active.config.dir.clone()))
}

/// Default log level for the current build mode: `debug` in debug builds,
/// `info` in release builds.
pub fn default_log_level() -> &'static str {
    if build_mode() == "debug" {
        "debug"
    } else {
        "info"
    }
}

fn start_file_logger(config: &LogConfig) -> Result<LoggerHandle, String> {
    std::fs::create_dir_all(&config.dir).map_err(|err| {
        format!(
            "failed to create log directory `{}`: {err}",
            config.dir.display()
        )
    })?;

    Logger::try_with_str(config.level)
        .map_err(|err| format!("invalid log level `{}`: {err}", config.level))?
        .log_to_file(
            FileSpec::default()
                .directory(config.dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .append()
        .write_mode(WriteMode::BufferAndFlush)
        // detailed_format lines read as:
        // [YYYY-MM-DD HH:MM:SS.ffffff TZ] LEVEL [module] file:line: message
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))
}

fn normalize_level(level: &str) -> Result<&'static str, String> {
    let wanted = level.trim().to_ascii_lowercase();
    LEVELS
        .iter()
        .find_map(|(alias, canonical)| (*alias == wanted).then_some(*canonical))
        .ok_or_else(|| {
            format!("unsupported log level `{wanted}`; expected trace|debug|info|warn|error")
        })
}

fn build_mode() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

fn install_panic_hook() {
    PANIC_HOOK_SET.get_or_init(|| {
        let previous_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let location = panic_info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()))
                .unwrap_or_else(|| "unknown".to_string());
            // Panic payloads can carry user-entered text; flatten and cap
            // them before they reach the log file.
            let payload = panic_info
                .payload()
                .downcast_ref::<&str>()
                .map(|text| (*text).to_string())
                .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            error!(
                "event=panic_captured module=logging status=error location={} payload={}",
                location,
                compact_for_log(&payload, PANIC_PAYLOAD_MAX_CHARS)
            );
            previous_hook(panic_info);
        }));
    });
}

/// Flattens line breaks to spaces and keeps at most `max_chars` characters,
/// marking truncation with a trailing `...`.
fn compact_for_log(text: &str, max_chars: usize) -> String {
    let mut compact = String::new();
    let mut flattened = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c });
    compact.extend(flattened.by_ref().take(max_chars));
    if flattened.next().is_some() {
        compact.push_str("...");
    }
    compact
}

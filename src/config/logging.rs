//! File logger bootstrap
//!
//! Diagnostics go to rotating files under `<base>/logs/` so they never mix
//! with command output on stdout. The level comes from the settings file and
//! may be overridden with the `MINEX_LOG` environment variable.

use std::path::Path;

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};
use log::info;

use crate::error::{MinexError, MinexResult};

const LOG_FILE_BASENAME: &str = "minex";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;
const SUPPORTED_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Start the file logger.
///
/// The returned handle must be kept alive for as long as logging is needed.
pub fn init_logging(level: &str, log_dir: &Path) -> MinexResult<LoggerHandle> {
    let requested = std::env::var("MINEX_LOG").unwrap_or_else(|_| level.to_string());
    let level = normalize_level(&requested)?;

    let handle = Logger::try_with_str(level)
        .map_err(|e| MinexError::Config(format!("Invalid log level '{}': {}", level, e)))?
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
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|e| MinexError::Config(format!("Failed to start logger: {}", e)))?;

    info!(
        "event=app_start version={} level={} log_dir={}",
        env!("CARGO_PKG_VERSION"),
        level,
        log_dir.display()
    );

    Ok(handle)
}

/// Map a user supplied level onto one of the supported level names
fn normalize_level(level: &str) -> MinexResult<&'static str> {
    let trimmed = level.trim().to_ascii_lowercase();
    let wanted = if trimmed == "warning" { "warn" } else { trimmed.as_str() };

    SUPPORTED_LEVELS
        .iter()
        .copied()
        .find(|candidate| *candidate == wanted)
        .ok_or_else(|| MinexError::Config(format!("Unsupported log level: {}", level)))
}

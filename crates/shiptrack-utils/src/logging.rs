/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Shiptrack Logging Module
//!
//! A process-wide logger behind the `log` facade.
//!
//! ## Usage
//!
//! ```ignore
//! shiptrack_utils::logging::init_with_format("info", "json")?;
//! info!("Recorded deploy for {}", app_name);
//! shiptrack_utils::logging::update_log_level("debug")?;
//! ```
//!
//! Lines go to stderr either as `YYYY-MM-DD HH:MM:SS - LEVEL: message` or, in
//! JSON mode, as one object per line carrying timestamp, level, target, module,
//! file and line. The level can be changed at runtime from any thread.

use log::{LevelFilter, Metadata, Record, SetLoggerError};
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub use log::{debug, error, info, trace, warn};

static LOGGER: ShiptrackLogger = ShiptrackLogger;
static CURRENT_LEVEL: AtomicUsize = AtomicUsize::new(LevelFilter::Info as usize);
static JSON_FORMAT: AtomicBool = AtomicBool::new(false);
static INIT: OnceCell<Result<(), String>> = OnceCell::new();

/// Logger installed by [`init`] and [`init_with_format`]
pub struct ShiptrackLogger;

impl ShiptrackLogger {
    fn format_record(record: &Record) -> String {
        if JSON_FORMAT.load(Ordering::Relaxed) {
            serde_json::json!({
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "level": record.level().to_string().to_lowercase(),
                "target": record.target(),
                "message": record.args().to_string(),
                "module": record.module_path(),
                "file": record.file(),
                "line": record.line()
            })
            .to_string()
        } else {
            format!(
                "{} - {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        }
    }
}

impl log::Log for ShiptrackLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= current_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", Self::format_record(record));
        }
    }

    fn flush(&self) {}
}

/// Initializes logging in text format.
pub fn init(level: &str) -> Result<(), SetLoggerError> {
    init_with_format(level, "text")
}

/// Initializes logging with the given level and format ("text" or "json").
///
/// Safe to call more than once; later calls only change level and format.
/// Fails if a different logger was installed before the first call.
pub fn init_with_format(level: &str, format: &str) -> Result<(), SetLoggerError> {
    let installed = INIT.get_or_init(|| {
        log::set_logger(&LOGGER)
            .map(|()| log::set_max_level(LevelFilter::Trace))
            .map_err(|e| e.to_string())
    });

    JSON_FORMAT.store(format.eq_ignore_ascii_case("json"), Ordering::Relaxed);
    let level_filter = str_to_level_filter(level);
    CURRENT_LEVEL.store(level_filter as usize, Ordering::Relaxed);
    log::set_max_level(level_filter);

    match installed {
        Ok(()) => Ok(()),
        // Surface the original failure from the facade on every call.
        Err(_) => log::set_logger(&LOGGER),
    }
}

/// Updates the current log level. Unknown names fall back to "info".
pub fn update_log_level(level: &str) -> Result<(), String> {
    let new_level = str_to_level_filter(level);
    CURRENT_LEVEL.store(new_level as usize, Ordering::Relaxed);
    log::set_max_level(new_level);
    Ok(())
}

/// The level currently applied by the logger.
pub fn current_level() -> LevelFilter {
    level_filter_from_usize(CURRENT_LEVEL.load(Ordering::Relaxed))
}

fn str_to_level_filter(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

fn level_filter_from_usize(v: usize) -> LevelFilter {
    match v {
        1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        3 => LevelFilter::Info,
        4 => LevelFilter::Debug,
        5 => LevelFilter::Trace,
        _ => LevelFilter::Off,
    }
}

pub mod prelude {
    pub use log::{debug, error, info, trace, warn};
}

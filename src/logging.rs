//! Initialisation of the crate's logger.
//!
//! The library itself only emits records through the `log` facade. Hosts that want them printed
//! call [`init`], which installs a `fern` dispatcher writing coloured, timestamped lines to
//! standard error. The level can be overridden with the `BATCH_PROVENANCE_LOG_LEVEL`
//! environment variable.
use std::env;
use std::io::IsTerminal;
use std::sync::OnceLock;

use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::Dispatch;
use log::LevelFilter;

use crate::error::{ProvenanceError, Result};

/// A flag indicating whether the logger has been initialised
static LOGGER_INIT: OnceLock<()> = OnceLock::new();

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const LOG_LEVEL_ENV_VAR: &str = "BATCH_PROVENANCE_LOG_LEVEL";

pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Convert a level name (`off`, `error`, `warn`, `info`, `debug`, `trace`) to a filter.
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    match level.trim().to_lowercase().as_str() {
        "off" => Ok(LevelFilter::Off),
        "error" => Ok(LevelFilter::Error),
        "warn" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        unknown => Err(ProvenanceError::UnknownLogLevel(unknown.to_string())),
    }
}

/// Pick the level to log at. The environment variable takes precedence over
/// `level_from_settings`, which in turn falls back to [`DEFAULT_LOG_LEVEL`].
pub fn resolve_level(level_from_settings: Option<&str>) -> Result<LevelFilter> {
    match env::var(LOG_LEVEL_ENV_VAR) {
        Ok(level) => parse_level(&level),
        Err(_) => parse_level(level_from_settings.unwrap_or(DEFAULT_LOG_LEVEL)),
    }
}

/// Install the logger at the level chosen by [`resolve_level`]. Calling this more than once
/// is a no-op.
pub fn init(level_from_settings: Option<&str>) -> Result<()> {
    if is_logger_initialised() {
        return Ok(());
    }

    let level = resolve_level(level_from_settings)?;

    let colours = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);
    let use_colour = std::io::stderr().is_terminal();

    Dispatch::new()
        .format(move |out, message, record| {
            let timestamp = Local::now().format("%H:%M:%S");
            if use_colour {
                out.finish(format_args!(
                    "[{timestamp} {} {}] {message}",
                    colours.color(record.level()),
                    record.target()
                ));
            } else {
                out.finish(format_args!(
                    "[{timestamp} {} {}] {message}",
                    record.level(),
                    record.target()
                ));
            }
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;

    LOGGER_INIT.get_or_init(|| ());
    Ok(())
}

//! Initialisation of the program logger.
//!
//! The interactive host owns the terminal, so it sends log output to a file; headless runs log to
//! stderr with optional colourisation.
use anyhow::{bail, Context, Result};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Record};
use std::env;
use std::fmt::{Arguments, Display};
use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::Path;

/// The default log level for the program.
///
/// Used as a fallback if the user hasn't specified something else with the EAT_MAP_LOG_LEVEL
/// environment variable or the settings file.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the configured log level
const LOG_LEVEL_VAR: &str = "EAT_MAP_LOG_LEVEL";

/// Convert a log level name to a filter
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    Ok(match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        unknown => bail!("Unknown log level: {}", unknown),
    })
}

/// Initialise the program logger.
///
/// The level comes from `EAT_MAP_LOG_LEVEL` if set, else from the settings file, else `info`.
///
/// # Arguments
///
/// * `log_level_from_settings`: The log level specified in the settings file
/// * `log_file_path`: If Some, write all messages to this file instead of stderr
pub fn init(log_level_from_settings: Option<&str>, log_file_path: Option<&Path>) -> Result<()> {
    let log_level = env::var(LOG_LEVEL_VAR).unwrap_or_else(|_| {
        log_level_from_settings
            .unwrap_or(DEFAULT_LOG_LEVEL)
            .to_string()
    });
    let log_level = parse_level(&log_level)?;

    let dispatch = if let Some(path) = log_file_path {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("Could not open log file {}", path.display()))?;
        Dispatch::new()
            .format(write_log_plain)
            .level(log_level)
            .chain(file)
    } else {
        let colours = ColoredLevelConfig::new()
            .error(Color::Red)
            .warn(Color::Yellow)
            .info(Color::Green)
            .debug(Color::Blue)
            .trace(Color::Magenta);
        let use_colour = std::io::stderr().is_terminal();
        Dispatch::new()
            .format(move |out, message, record| {
                write_log_colour(out, message, record, use_colour, &colours);
            })
            .level(log_level)
            .chain(std::io::stderr())
    };

    dispatch.apply().context("Logger already initialised")?;
    Ok(())
}

fn write_log<T: Display>(out: FormatCallback, level: T, target: &str, message: &Arguments) {
    let timestamp = Local::now().format("%H:%M:%S");

    out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
}

/// Write to the log with no colours
fn write_log_plain(out: FormatCallback, message: &Arguments, record: &Record) {
    write_log(out, record.level(), record.target(), message);
}

/// Write to the log with optional colours
fn write_log_colour(
    out: FormatCallback,
    message: &Arguments,
    record: &Record,
    use_colour: bool,
    colours: &ColoredLevelConfig,
) {
    if use_colour {
        write_log(out, colours.color(record.level()), record.target(), message);
    } else {
        write_log_plain(out, message, record);
    }
}

//! Platform logging initialization for batchwatch.
//!
//! Stdout carries the live display or the JSON records, so logs go to stderr
//! or to a file chosen on the command line.

use std::path::PathBuf;

use log::LevelFilter;

/// Destination for log output.
pub(crate) enum LogDestination {
    /// Write to stderr; warnings and errors only unless debugging.
    Terminal,
    /// Append to the given file.
    File(PathBuf),
}

/// Initialize the logger with the specified destination.
pub(crate) fn initialize(destination: &LogDestination, debug: bool) {
    match destination {
        LogDestination::Terminal => {
            let level = if debug {
                LevelFilter::Debug
            } else {
                LevelFilter::Warn
            };
            watch_logging::initialize_stderr(level);
        }
        LogDestination::File(path) => {
            let level = if debug {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            };
            if let Err(err) = watch_logging::initialize_file(level, path) {
                eprintln!("Warning: Could not open log file at {:?}: {}", path, err);
                watch_logging::initialize_stderr(LevelFilter::Warn);
            }
        }
    }
}

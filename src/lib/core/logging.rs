//! Run log set-up.
//!
//! Every event is written as one line to an append-mode log file and echoed
//! to stderr:
//!
//! ```text
//! [radalign: 2016-10-04T12:00:00Z] INFO -- Running the bwa stage of the pipeline
//! ```
//!
//! The `log` facade is initialised once, from `main`, through [`init`].
//! Library code only emits through the `log` macros.

use crate::core::error::{RadalignError, Result};
use crate::core::fs::make_parent_dirs;
use env_logger::{fmt::WriteStyle, Builder, Env, Target};
use log::LevelFilter;
use std::env;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

/// Name printed in front of every log line.
pub const LOGGER_NAME: &str = "radalign";

/// Default log file, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "ddradseq.log";

/// Where and how verbosely to log.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub path: PathBuf,
    pub level: LevelFilter,
    pub echo_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_LOG_FILE),
            level: LevelFilter::Info,
            echo_stderr: true,
        }
    }
}

impl LogConfig {
    /// Map a `-v` occurrence count onto a level filter.
    pub fn with_verbosity(mut self, verbose: u8) -> Self {
        self.level = match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        self
    }
}

/// Writes every line to the log file and, optionally, to stderr.
struct TeeWriter {
    file: File,
    echo_stderr: bool,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write_all(buf)?;
        if self.echo_stderr {
            // A closed stderr must not take the log file down with it.
            let _ = io::stderr().write_all(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.echo_stderr {
            let _ = io::stderr().flush();
        }
        Ok(())
    }
}

fn open_log_file(config: &LogConfig) -> Result<File> {
    make_parent_dirs(&config.path).map_err(|e| {
        RadalignError::InvalidInput(format!(
            "Failed to create log directory for {}: {}",
            config.path.display(),
            e
        ))
    })?;
    Ok(OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.path)?)
}

/// Install the process-wide logger. Must be called once, before any stage runs.
///
/// `RUST_LOG` still overrides the configured level when set.
pub fn init(config: &LogConfig) -> Result<()> {
    let file = open_log_file(config)?;
    let writer = TeeWriter {
        file,
        echo_stderr: config.echo_stderr,
    };

    Builder::new()
        .filter_level(config.level)
        .parse_env(Env::default())
        .write_style(WriteStyle::Never)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}: {}] {} -- {}",
                LOGGER_NAME,
                buf.timestamp_seconds(),
                record.level(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(writer)))
        .try_init()
        .map_err(|e| RadalignError::Config(format!("Logger already initialised: {}", e)))
}

/// Login name of the invoking user, `"unknown"` when the environment has none.
pub fn current_user() -> String {
    ["USER", "LOGNAME"]
        .iter()
        .filter_map(|key| env::var(key).ok())
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(LogConfig::default().with_verbosity(0).level, LevelFilter::Info);
        assert_eq!(LogConfig::default().with_verbosity(1).level, LevelFilter::Debug);
        assert_eq!(LogConfig::default().with_verbosity(5).level, LevelFilter::Trace);
    }

    #[test]
    fn tee_writer_appends_to_file() {
        let dir = tempdir().unwrap();
        let config = LogConfig {
            path: dir.path().join("logs/run.log"),
            level: LevelFilter::Info,
            echo_stderr: false,
        };

        for line in ["first\n", "second\n"] {
            let mut writer = TeeWriter {
                file: open_log_file(&config).unwrap(),
                echo_stderr: false,
            };
            writer.write_all(line.as_bytes()).unwrap();
            writer.flush().unwrap();
        }

        let contents = std::fs::read_to_string(&config.path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn current_user_is_never_empty() {
        assert!(!current_user().is_empty());
    }
}

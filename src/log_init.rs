use log::{LevelFilter, Metadata, Record};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Line logger writing `[LEVEL] message` to stderr or appending to a file.
struct LineLogger {
    level: LevelFilter,
    file_path: Option<PathBuf>,
}

impl log::Log for LineLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match &self.file_path {
            Some(path) => {
                if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                    let _ = writeln!(file, "[{}] {}", record.level(), record.args());
                }
            }
            None => {
                let _ = writeln!(std::io::stderr(), "[{}] {}", record.level(), record.args());
            }
        }
    }

    fn flush(&self) {}
}

/// Maps the `-v` count to a level filter.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs the process logger.
///
/// A second call keeps the logger already installed and only reports it.
pub fn init_logger(verbosity: u8, file_path: Option<PathBuf>) -> crate::error::Result<()> {
    let level = level_for(verbosity);
    let logger = LineLogger { level, file_path };
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);
    Ok(())
}

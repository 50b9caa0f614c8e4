use chrono::{Local, NaiveDateTime};
use env_logger::Logger;
use log::{Level, Log, Metadata, Record, SetLoggerError};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Append-only handle on `<data_dir>/logs/backend.log`, reopened lazily if
/// the first open failed.
struct LogFile {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl LogFile {
    fn new(path: PathBuf) -> Self {
        let file = Self::open(&path).ok();
        Self {
            path,
            file: Mutex::new(file),
        }
    }

    fn open(path: &Path) -> io::Result<File> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(path)
    }

    fn write_line(&self, line: &str) {
        let Ok(mut guard) = self.file.lock() else {
            return;
        };
        if guard.is_none() {
            *guard = Self::open(&self.path).ok();
        }
        if let Some(file) = guard.as_mut() {
            let _ = writeln!(file, "{}", line);
        }
    }
}

static LOG_FILE: OnceLock<LogFile> = OnceLock::new();

/// `2024-01-10T09:30:00.125 WARN  tableau.api.move: message`, one line per
/// record. Embedded newlines are escaped so a record never spans lines.
fn format_line(at: NaiveDateTime, level: Level, target: &str, message: &str) -> String {
    format!(
        "{} {:<5} {}: {}",
        at.format(TIMESTAMP_FORMAT),
        level,
        target,
        message.replace('\n', "\\n")
    )
}

/// Same line on stderr and, once configured, in the log file.
fn emit(level: Level, target: &str, message: &str) {
    let line = format_line(Local::now().naive_local(), level, target, message);
    eprintln!("{}", line);
    if let Some(file) = LOG_FILE.get() {
        file.write_line(&line);
    }
}

/// env_logger supplies the RUST_LOG filter; output goes through `emit`.
struct TableauLogger {
    filter: Logger,
}

impl Log for TableauLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.filter.enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        if self.filter.matches(record) {
            emit(record.level(), record.target(), &record.args().to_string());
        }
    }

    fn flush(&self) {
        if let Some(file) = LOG_FILE.get() {
            if let Ok(mut guard) = file.file.lock() {
                if let Some(f) = guard.as_mut() {
                    let _ = f.flush();
                }
            }
        }
    }
}

/// Install the global logger, writing to stderr until `set_log_file` is
/// called. Filter defaults to `info`, override with RUST_LOG.
pub fn init() -> Result<(), SetLoggerError> {
    let filter =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).build();
    let max_level = filter.filter();
    let logger = Box::leak(Box::new(TableauLogger { filter }));
    log::set_logger(logger)?;
    log::set_max_level(max_level);
    Ok(())
}

/// Mirror every later record into `path`. Only the first call takes effect.
pub fn set_log_file(path: PathBuf) {
    if LOG_FILE.set(LogFile::new(path)).is_err() {
        log::debug!(target: "tableau.log_bridge", "Log file already configured");
    }
}

pub fn log_file_path() -> Option<String> {
    LOG_FILE.get().map(|f| f.path.display().to_string())
}

/// For failures that happen before (or instead of) logger setup.
pub fn write_fallback_line(message: &str) {
    emit(Level::Error, "tableau.log_bridge", message);
}

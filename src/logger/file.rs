/// Log file persistence
///
/// One append-only file per day under the logs directory. Line buffered, so a
/// crash loses at most the line being written.
use chrono::Local;
use once_cell::sync::Lazy;
use std::fs::{self, File, OpenOptions};
use std::io::{LineWriter, Write};
use std::sync::Mutex;

use super::config::get_logger_config;
use crate::paths;

static LOG_FILE: Lazy<Mutex<Option<LineWriter<File>>>> = Lazy::new(|| Mutex::new(None));

/// Open today's log file if file logging is enabled
pub fn init_file_logging() {
    if !get_logger_config().file_logging {
        return;
    }

    let dir = paths::get_logs_directory();
    if let Err(e) = fs::create_dir_all(&dir) {
        eprintln!("Failed to create logs directory {}: {}", dir.display(), e);
        return;
    }

    let path = dir.join(format!("cliprelay_{}.log", Local::now().format("%Y-%m-%d")));
    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => {
            if let Ok(mut slot) = LOG_FILE.lock() {
                *slot = Some(LineWriter::new(file));
            }
        }
        Err(e) => eprintln!("Failed to open log file {}: {}", path.display(), e),
    }
}

/// Append one line to the log file (no-op when file logging is off)
pub fn write_to_file(line: &str) {
    if let Ok(mut slot) = LOG_FILE.lock() {
        if let Some(writer) = slot.as_mut() {
            let _ = writeln!(writer, "{}", line);
        }
    }
}

pub fn flush_file_logging() {
    if let Ok(mut slot) = LOG_FILE.lock() {
        if let Some(writer) = slot.as_mut() {
            let _ = writer.flush();
        }
    }
}

//! Per-run file logging with `level | stage | action | detail` lines.
//!
//! Libraries in this workspace stay log-free; the shell owns the run log
//! and is responsible for redacting anything sensitive before it reaches
//! [`RunLogger::write_line`].

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use time::OffsetDateTime;

/// Append-only log file scoped to one process run.
pub struct RunLogger {
    file: Mutex<File>,
    path: PathBuf,
}

impl RunLogger {
    /// Creates a timestamped log file inside `directory`.
    ///
    /// # Errors
    /// Returns a message when the file cannot be created.
    pub fn create_in(directory: &Path) -> Result<Self, String> {
        let timestamp = timestamp_compact_utc();
        let path = directory.join(format!("{timestamp}_cloudguard_log.txt"));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|error| format!("unable to create log file '{}': {error}", path.display()))?;

        Ok(Self {
            file: Mutex::new(file),
            path,
        })
    }

    /// Returns the log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one structured log line.
    pub fn write_line(&self, level: &str, stage: &str, action: &str, detail: &str) {
        let timestamp = timestamp_compact_utc();
        let line = format!("{timestamp} | {level} | {stage} | {action} | {detail}\n");

        if let Ok(mut file) = self.file.lock() {
            let _ = file.write_all(line.as_bytes());
            if level == "ERROR" {
                let _ = file.flush();
            }
        }
    }

    /// Appends one INFO line.
    pub fn info(&self, stage: &str, action: &str, detail: &str) {
        self.write_line("INFO", stage, action, detail);
    }

    /// Appends one ERROR line and flushes.
    pub fn error(&self, stage: &str, action: &str, detail: &str) {
        self.write_line("ERROR", stage, action, detail);
    }
}

fn timestamp_compact_utc() -> String {
    let now = OffsetDateTime::now_utc();
    format!(
        "{:04}{:02}{:02}_{:02}{:02}{:02}",
        now.year(),
        now.month() as u8,
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}

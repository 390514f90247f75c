//! JSONL writer for deliberation turn records.
//!
//! The orchestrator hands every completed turn back as a [`TurnOutcome`];
//! persisting it is the caller's job. This logger is the reference
//! consumer: one JSON object per line with a `type` and `timestamp`,
//! appended to a file.

use resolve_application::TurnOutcome;
use serde_json::json;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Appending JSONL logger for turn outcomes.
///
/// Thread-safe via `Mutex<BufWriter<File>>`; flushed after every record
/// and on `Drop`.
pub struct JsonlRunLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlRunLogger {
    /// Open the log for appending, creating the file and parent
    /// directories if needed. `None` when the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Could not create run log directory {}: {}", parent.display(), e);
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open run log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one turn. Logging failures are warned about, never raised —
    /// losing a log line must not break a deliberation.
    pub fn log(&self, outcome: &TurnOutcome) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let record = json!({
            "type": "deliberation_turn",
            "timestamp": timestamp,
            "message": &outcome.message,
            "run": &outcome.run,
        });

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlRunLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

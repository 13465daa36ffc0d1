//! Append-only payment event log
//!
//! One JSON object per line (JSONL). Entries are appended and flushed
//! immediately; nothing is ever rewritten or removed.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{TallyError, TallyResult};
use crate::models::PaymentEvent;

use super::file_io::lock_error;

/// Writer and reader for the payment event log file
pub struct PaymentEventLog {
    log_path: PathBuf,
    /// Serializes appends so lines never interleave
    writer: Mutex<()>,
}

impl PaymentEventLog {
    pub fn new(log_path: PathBuf) -> Self {
        Self {
            log_path,
            writer: Mutex::new(()),
        }
    }

    /// Append one event as a JSON line
    pub fn append(&self, event: &PaymentEvent) -> TallyResult<()> {
        let _guard = self.writer.lock().map_err(|e| lock_error("log", e))?;

        let json = serde_json::to_string(event)
            .map_err(|e| TallyError::Json(format!("Failed to serialize payment event: {}", e)))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| TallyError::Storage(format!("Failed to open payment event log: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| TallyError::Storage(format!("Failed to write payment event: {}", e)))?;

        file.flush()
            .map_err(|e| TallyError::Storage(format!("Failed to flush payment event log: {}", e)))?;

        Ok(())
    }

    /// Read every event, oldest first
    pub fn read_all(&self) -> TallyResult<Vec<PaymentEvent>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| TallyError::Storage(format!("Failed to open payment event log: {}", e)))?;

        let mut events = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                TallyError::Storage(format!(
                    "Failed to read payment event log line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let event: PaymentEvent = serde_json::from_str(&line).map_err(|e| {
                TallyError::Json(format!(
                    "Failed to parse payment event at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;
            events.push(event);
        }

        Ok(events)
    }

    /// Most recent `count` events, oldest first
    pub fn read_recent(&self, count: usize) -> TallyResult<Vec<PaymentEvent>> {
        let mut events = self.read_all()?;
        let start = events.len().saturating_sub(count);
        Ok(events.split_off(start))
    }

    pub fn entry_count(&self) -> TallyResult<usize> {
        if !self.log_path.exists() {
            return Ok(0);
        }

        let file = File::open(&self.log_path)
            .map_err(|e| TallyError::Storage(format!("Failed to open payment event log: {}", e)))?;

        Ok(BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter(|l| !l.trim().is_empty())
            .count())
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

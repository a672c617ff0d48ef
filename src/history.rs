// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Basecoat contributors

//! Append-only rename log with undo support

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::Result;

/// One applied rename
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub original_path: PathBuf,
    pub new_path: PathBuf,
    pub title: String,
    pub alt_text: String,
    pub undone: bool,
}

impl LogEntry {
    pub fn new(original_path: PathBuf, new_path: PathBuf, title: String, alt_text: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            original_path,
            new_path,
            title,
            alt_text,
            undone: false,
        }
    }
}

/// JSONL-backed log of renames, oldest first
pub struct RenameLog {
    path: PathBuf,
}

impl RenameLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append one entry
    pub fn record(&self, entry: &LogEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", serde_json::to_string(entry)?)?;
        Ok(())
    }

    /// All entries, skipping lines that no longer parse
    pub fn entries(&self) -> Result<Vec<LogEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!("Skipping unreadable log line: {}", e),
            }
        }
        Ok(entries)
    }

    /// The most recent `count` entries, newest first
    pub fn recent(&self, count: usize) -> Result<Vec<LogEntry>> {
        let mut entries = self.entries()?;
        entries.reverse();
        entries.truncate(count);
        Ok(entries)
    }

    /// Entries whose rename has not been undone, oldest first
    pub fn undoable(&self) -> Result<Vec<LogEntry>> {
        Ok(self.entries()?.into_iter().filter(|e| !e.undone).collect())
    }

    /// Flag an entry as undone, rewriting the file
    pub fn mark_undone(&self, id: &str) -> Result<()> {
        let entries = self.entries()?;
        let mut writer = BufWriter::new(File::create(&self.path)?);

        for mut entry in entries {
            if entry.id == id {
                entry.undone = true;
            }
            writeln!(writer, "{}", serde_json::to_string(&entry)?)?;
        }
        Ok(())
    }

    /// Delete the log file
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(from: &str, to: &str) -> LogEntry {
        LogEntry::new(
            PathBuf::from(from),
            PathBuf::from(to),
            "Some Title".to_string(),
            "Some alt text".to_string(),
        )
    }

    #[test]
    fn record_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let log = RenameLog::new(dir.path().join("log.jsonl"));

        log.record(&entry("a.jpg", "Title-A.jpg")).unwrap();
        log.record(&entry("b.jpg", "Title-B.jpg")).unwrap();

        let entries = log.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].new_path, PathBuf::from("Title-A.jpg"));

        let recent = log.recent(1).unwrap();
        assert_eq!(recent[0].new_path, PathBuf::from("Title-B.jpg"));
    }

    #[test]
    fn missing_log_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = RenameLog::new(dir.path().join("log.jsonl"));
        assert!(log.entries().unwrap().is_empty());
    }

    #[test]
    fn mark_undone_persists() {
        let dir = tempfile::tempdir().unwrap();
        let log = RenameLog::new(dir.path().join("log.jsonl"));

        let e = entry("a.jpg", "Title-A.jpg");
        log.record(&e).unwrap();
        log.record(&entry("b.jpg", "Title-B.jpg")).unwrap();

        log.mark_undone(&e.id).unwrap();

        let undoable = log.undoable().unwrap();
        assert_eq!(undoable.len(), 1);
        assert_eq!(undoable[0].original_path, PathBuf::from("b.jpg"));
    }

    #[test]
    fn unreadable_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.jsonl");
        let log = RenameLog::new(path.clone());

        log.record(&entry("a.jpg", "Title-A.jpg")).unwrap();
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "garbage line").unwrap();
        log.record(&entry("b.jpg", "Title-B.jpg")).unwrap();

        assert_eq!(log.entries().unwrap().len(), 2);
    }
}

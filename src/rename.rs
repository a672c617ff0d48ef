// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Basecoat contributors

//! Batch rename executor
//!
//! Applies (possibly user-edited) titles to the files of a batch. Each
//! record is handled independently: a failure marks that record and the
//! pass continues, so the report always has one outcome per input record,
//! in input order.

use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::batch::{Batch, RecordStatus};
use crate::history::{LogEntry, RenameLog};
use crate::naming;

/// Outcome of one record's rename attempt
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Renamed,
    Skipped(String),
    Failed(String),
}

/// Report row for one input record
#[derive(Debug, Clone, Serialize)]
pub struct RenameOutcome {
    pub original_path: PathBuf,
    pub new_path: Option<PathBuf>,
    pub status: OutcomeStatus,
}

/// Rename every record of the batch to its slugified title.
///
/// Collisions are resolved against both the directory contents and the
/// names assigned earlier in this same pass. With `dry_run` the final
/// names are computed but nothing touches the filesystem or the log.
pub fn rename_all(batch: &mut Batch, log: Option<&RenameLog>, dry_run: bool) -> Vec<RenameOutcome> {
    let dir = batch.folder.clone();
    let mut reserved: HashSet<String> = HashSet::new();
    let mut outcomes = Vec::with_capacity(batch.records.len());

    for record in &mut batch.records {
        let original = record.original_path.clone();

        if let RecordStatus::Error(ref e) = record.status {
            outcomes.push(RenameOutcome {
                original_path: original,
                new_path: None,
                status: OutcomeStatus::Skipped(format!("analysis failed: {}", e)),
            });
            continue;
        }

        let slug = naming::slugify(&record.generated_title);
        if slug.is_empty() {
            record.status = RecordStatus::Error("empty title".to_string());
            outcomes.push(RenameOutcome {
                original_path: original,
                new_path: None,
                status: OutcomeStatus::Failed("empty title".to_string()),
            });
            continue;
        }

        let ext = original.extension().and_then(|e| e.to_str());
        let desired = match ext {
            Some(ext) => format!("{}.{}", slug, ext),
            None => slug.clone(),
        };

        // Already named after its own title: nothing to do
        let current_stem = original
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        if current_stem.eq_ignore_ascii_case(&slug) {
            naming::reserve(&mut reserved, &desired);
            outcomes.push(RenameOutcome {
                original_path: original,
                new_path: None,
                status: OutcomeStatus::Skipped("already named after its title".to_string()),
            });
            continue;
        }

        let final_name = match naming::resolve(&desired, &dir, &reserved) {
            Ok(name) => name,
            Err(e) => {
                record.status = RecordStatus::Error(e.to_string());
                outcomes.push(RenameOutcome {
                    original_path: original,
                    new_path: None,
                    status: OutcomeStatus::Failed(e.to_string()),
                });
                continue;
            }
        };

        let new_path = dir.join(&final_name);

        if dry_run {
            info!("DRY RUN: {:?} -> {}", original, final_name);
            naming::reserve(&mut reserved, &final_name);
            outcomes.push(RenameOutcome {
                original_path: original,
                new_path: Some(new_path),
                status: OutcomeStatus::Renamed,
            });
            continue;
        }

        match std::fs::rename(&original, &new_path) {
            Ok(()) => {
                info!("Renamed {:?} -> {}", original, final_name);
                naming::reserve(&mut reserved, &final_name);

                if let Some(log) = log {
                    let entry = LogEntry::new(
                        original.clone(),
                        new_path.clone(),
                        record.generated_title.clone(),
                        record.generated_alt_text.clone(),
                    );
                    if let Err(e) = log.record(&entry) {
                        warn!("Failed to write rename log entry: {}", e);
                    }
                }

                record.original_path = new_path.clone();
                outcomes.push(RenameOutcome {
                    original_path: original,
                    new_path: Some(new_path),
                    status: OutcomeStatus::Renamed,
                });
            }
            Err(e) => {
                warn!("Rename failed for {:?}: {}", original, e);
                record.status = RecordStatus::Error(e.to_string());
                outcomes.push(RenameOutcome {
                    original_path: original,
                    new_path: None,
                    status: OutcomeStatus::Failed(e.to_string()),
                });
            }
        }
    }

    outcomes
}

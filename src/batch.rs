// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Basecoat contributors

//! Folder scanning and sequential per-image analysis
//!
//! A batch is the editable result set for one folder run: it serializes to
//! pretty JSON so the user (or a GUI) can review and edit titles and alt
//! text before the rename pass.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::gemini::ImageAnalysis;
use crate::tags::{self, ContextTag};
use crate::{BasecoatError, Result};

/// Image extensions eligible for processing (matched case-insensitively)
pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "webp", "bmp", "tiff", "gif"];

/// Per-record processing state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Pending,
    Done,
    Error(String),
}

/// One image's place in a batch: where it lives and what the model said
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageRecord {
    pub original_path: PathBuf,
    pub generated_title: String,
    pub generated_alt_text: String,
    pub status: RecordStatus,
    /// Preview bytes for display; never persisted with the batch file
    #[serde(skip)]
    pub thumbnail: Option<Vec<u8>>,
}

impl ImageRecord {
    pub fn new(original_path: PathBuf) -> Self {
        Self {
            original_path,
            generated_title: String::new(),
            generated_alt_text: String::new(),
            status: RecordStatus::Pending,
            thumbnail: None,
        }
    }
}

/// The result set of one folder-processing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub folder: PathBuf,
    pub tags: Vec<ContextTag>,
    pub records: Vec<ImageRecord>,
}

/// Whether a path has a supported image extension
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Enumerate the supported image files in a folder, sorted by name.
///
/// Sorting is for stable output only; callers must not depend on it.
pub fn scan_folder(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(folder)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_supported(p))
        .collect();

    files.sort();
    Ok(files)
}

/// Analyze every supported image in `folder`, one at a time.
///
/// A failing image marks its own record with an error and the run
/// continues; the returned batch always has one record per scanned file.
pub async fn process(
    folder: &Path,
    tags: &[ContextTag],
    analyzer: &dyn ImageAnalysis,
) -> Result<Batch> {
    let files = scan_folder(folder)?;
    let labels = tags::enabled_labels(tags);
    info!("Found {} image(s) in {:?}", files.len(), folder);

    let mut records = Vec::with_capacity(files.len());

    for (i, path) in files.iter().enumerate() {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        info!("Processing {}/{}: {}", i + 1, files.len(), name);

        let mut record = ImageRecord::new(path.clone());
        match analyzer.analyze(path, &labels).await {
            Ok(caption) => {
                record.generated_title = caption.title;
                record.generated_alt_text = caption.alt_text;
                record.status = RecordStatus::Done;
            }
            Err(e) => {
                warn!("Analysis failed for {}: {}", name, e);
                record.status = RecordStatus::Error(e.to_string());
            }
        }
        records.push(record);
    }

    Ok(Batch {
        folder: folder.to_path_buf(),
        tags: tags.to_vec(),
        records,
    })
}

impl Batch {
    /// Write the batch as pretty JSON for review and editing
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load a (possibly edited) batch file and validate its records
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let batch: Self = serde_json::from_str(&content)?;
        batch.validate()?;
        Ok(batch)
    }

    /// Every record must point at a supported image inside the batch folder
    fn validate(&self) -> Result<()> {
        for record in &self.records {
            if !is_supported(&record.original_path) {
                return Err(BasecoatError::Config(format!(
                    "Unsupported image extension: {:?}",
                    record.original_path
                )));
            }
            if record.original_path.parent() != Some(self.folder.as_path()) {
                return Err(BasecoatError::Config(format!(
                    "Record {:?} is outside the batch folder {:?}",
                    record.original_path, self.folder
                )));
            }
        }
        Ok(())
    }

    /// Records that analysis completed successfully
    pub fn done_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.status == RecordStatus::Done)
            .count()
    }

    /// Records that failed analysis
    pub fn error_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.status, RecordStatus::Error(_)))
            .count()
    }
}

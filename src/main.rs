// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Basecoat contributors

//! Basecoat: AI-powered SEO image titler and batch renamer
//!
//! Command-line front end over the library pipeline: scan a folder, ask
//! Gemini for titles and alt text, write an editable batch file, rename.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use basecoat::batch::{self, Batch, RecordStatus};
use basecoat::gemini::GeminiClient;
use basecoat::history::RenameLog;
use basecoat::rename::{rename_all, OutcomeStatus};
use basecoat::settings::Settings;
use basecoat::tags;
use basecoat::thumbnail;
use basecoat::{BasecoatError, Result};

const HISTORY_FILE: &str = "basecoat_history.jsonl";

/// Basecoat CLI - SEO image titler and batch renamer
#[derive(Parser, Debug)]
#[command(name = "basecoat")]
#[command(version = "1.0.0")]
#[command(about = "AI-powered SEO image titler and batch renamer", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the settings file (JSON format)
    #[arg(short, long, default_value = "config.json", global = true)]
    settings: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Output format for results
    #[arg(long, global = true, default_value = "text", value_parser = ["text", "json", "jsonl"])]
    format: String,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze every image in a folder and write an editable batch file
    Process {
        /// Folder of images to process
        folder: PathBuf,

        /// Enable a context tag (repeatable, case-insensitive)
        #[arg(short, long)]
        tag: Vec<String>,

        /// Enable every predefined context tag
        #[arg(long)]
        all_tags: bool,

        /// Where to write the batch file (default: <folder>/basecoat_batch.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write JPEG previews of each image into this directory
        #[arg(long)]
        thumbnails: Option<PathBuf>,

        /// Rename immediately instead of stopping at the batch file
        #[arg(long)]
        apply: bool,

        /// With --apply: compute final names without touching files
        #[arg(long)]
        dry_run: bool,
    },

    /// Apply the renames described by a (possibly edited) batch file
    Rename {
        /// Batch file written by `process`
        batch: PathBuf,

        /// Show what would be renamed without touching files
        #[arg(long)]
        dry_run: bool,
    },

    /// Check API key, endpoint reachability and model availability
    Status,

    /// Settings management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Rename log and undo operations
    History {
        #[command(subcommand)]
        action: HistoryCommands,
    },

    /// List the predefined context tags
    Tags,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current settings (key redacted)
    Show,

    /// Store the Gemini API key
    SetKey {
        /// The API key
        key: String,
    },

    /// Print the settings file path
    Path,
}

#[derive(Subcommand, Debug)]
enum HistoryCommands {
    /// List recent renames
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "10")]
        count: usize,
    },

    /// Undo recent renames
    Undo {
        /// Number of renames to undo
        #[arg(short, long, default_value = "1")]
        count: usize,

        /// Show what would be undone
        #[arg(long)]
        dry_run: bool,
    },

    /// Clear the rename log
    Clear {
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let settings = Settings::load(&cli.settings);

    match cli.command {
        Commands::Process {
            folder,
            tag,
            all_tags,
            output,
            thumbnails,
            apply,
            dry_run,
        } => {
            run_process(
                settings, folder, tag, all_tags, output, thumbnails, apply, dry_run, &cli.format,
            )
            .await
        }
        Commands::Rename { batch, dry_run } => run_rename(batch, dry_run, &cli.format),
        Commands::Status => run_status(settings).await,
        Commands::Config { action } => run_config(action, settings, &cli.settings),
        Commands::History { action } => {
            let log = RenameLog::new(PathBuf::from(HISTORY_FILE));
            run_history(action, &log)
        }
        Commands::Tags => {
            for label in tags::TAG_LABELS {
                println!("{}", label);
            }
            Ok(())
        }
    }
}

/// Scan, analyze and (optionally) rename a folder of images
#[allow(clippy::too_many_arguments)]
async fn run_process(
    settings: Settings,
    folder: PathBuf,
    tag_labels: Vec<String>,
    all_tags: bool,
    output: Option<PathBuf>,
    thumbnails: Option<PathBuf>,
    apply: bool,
    dry_run: bool,
    format: &str,
) -> Result<()> {
    if !folder.is_dir() {
        return Err(BasecoatError::Config(format!(
            "Not a directory: {}",
            folder.display()
        )));
    }

    let mut context_tags = tags::default_tags();
    if all_tags {
        tags::set_all(&mut context_tags, true);
    }
    tags::select(&mut context_tags, &tag_labels)?;

    // Fails here when no key is configured: a batch never starts without one
    let client = GeminiClient::new(&settings)?;

    let mut batch = batch::process(&folder, &context_tags, &client).await?;

    if let Some(thumb_dir) = thumbnails {
        std::fs::create_dir_all(&thumb_dir)?;
        for record in &batch.records {
            if let Err(e) =
                thumbnail::write_preview(&record.original_path, &thumb_dir, thumbnail::DEFAULT_MAX_PX)
            {
                warn!("Preview failed for {:?}: {}", record.original_path, e);
            }
        }
    }

    let batch_path = output.unwrap_or_else(|| folder.join("basecoat_batch.json"));
    batch.save(&batch_path)?;
    info!(
        "Processed {} image(s): {} ok, {} error(s)",
        batch.records.len(),
        batch.done_count(),
        batch.error_count()
    );

    print_batch(&batch, format)?;

    if apply {
        let log = RenameLog::new(PathBuf::from(HISTORY_FILE));
        let outcomes = rename_all(&mut batch, Some(&log), dry_run);
        batch.save(&batch_path)?;
        print_outcomes(&outcomes, format)?;
    } else {
        info!(
            "Review and edit {}, then run: basecoat rename {}",
            batch_path.display(),
            batch_path.display()
        );
    }

    Ok(())
}

/// Apply a batch file's titles as renames
fn run_rename(batch_path: PathBuf, dry_run: bool, format: &str) -> Result<()> {
    let mut batch = Batch::load(&batch_path)?;

    if dry_run {
        warn!("DRY RUN MODE - files will not be renamed");
    }

    let log = RenameLog::new(PathBuf::from(HISTORY_FILE));
    let outcomes = rename_all(&mut batch, Some(&log), dry_run);

    if !dry_run {
        batch.save(&batch_path)?;
    }
    print_outcomes(&outcomes, format)?;
    Ok(())
}

/// Check key, endpoint and model availability
async fn run_status(settings: Settings) -> Result<()> {
    println!("Basecoat v1.0.0 Status");
    println!("======================");

    if !settings.has_key() {
        println!("API key: not configured");
        println!("\nSet one with: basecoat config set-key <KEY>");
        return Ok(());
    }
    println!("API key: configured");
    println!("Endpoint: {}", settings.endpoint);

    let client = GeminiClient::new(&settings)?;
    match client.list_models().await {
        Ok(models) => {
            println!("Endpoint reachable, {} model(s) visible", models.len());
            if client.model_available().await? {
                println!("Model '{}': available", settings.model);
            } else {
                println!("Model '{}': NOT visible to this key", settings.model);
            }
        }
        Err(e) => println!("Endpoint check failed: {}", e),
    }

    Ok(())
}

/// Settings subcommands
fn run_config(action: ConfigCommands, mut settings: Settings, path: &Path) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            println!("Settings ({}):", path.display());
            println!("  api_key: {}", mask_key(&settings.api_key));
            println!("  model: {}", settings.model);
            println!("  endpoint: {}", settings.endpoint);
            println!("  timeout_secs: {}", settings.timeout_secs);
        }
        ConfigCommands::SetKey { key } => {
            let key = key.trim().to_string();
            if key.is_empty() {
                return Err(BasecoatError::Config("API key must not be empty".to_string()));
            }
            settings.api_key = key;
            settings.save(path)?;
            println!("API key saved to {}", path.display());
        }
        ConfigCommands::Path => {
            println!("{}", path.display());
        }
    }
    Ok(())
}

/// Rename log subcommands
fn run_history(action: HistoryCommands, log: &RenameLog) -> Result<()> {
    match action {
        HistoryCommands::List { count } => {
            let entries = log.recent(count)?;
            println!("Recent renames ({} entries):", entries.len());
            for entry in entries {
                let status = if entry.undone { "[UNDONE]" } else { "" };
                println!(
                    "  {} {} -> {} {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M"),
                    entry.original_path.display(),
                    entry.new_path.display(),
                    status
                );
            }
        }
        HistoryCommands::Undo { count, dry_run } => {
            let entries = log.undoable()?;
            let to_undo: Vec<_> = entries.into_iter().rev().take(count).collect();

            if to_undo.is_empty() {
                println!("No renames to undo");
                return Ok(());
            }

            for entry in to_undo {
                if !entry.new_path.exists() {
                    warn!("File not found (moved or deleted): {:?}", entry.new_path);
                    continue;
                }
                // Never clobber a file that now lives at the original path
                if entry.original_path.exists() {
                    warn!(
                        "Original path already occupied, skipping undo: {:?}",
                        entry.original_path
                    );
                    continue;
                }
                if dry_run {
                    println!(
                        "Would undo: {} -> {}",
                        entry.new_path.display(),
                        entry.original_path.display()
                    );
                } else {
                    std::fs::rename(&entry.new_path, &entry.original_path)?;
                    log.mark_undone(&entry.id)?;
                    println!(
                        "Undone: {} -> {}",
                        entry.new_path.display(),
                        entry.original_path.display()
                    );
                }
            }
        }
        HistoryCommands::Clear { force } => {
            if !force {
                eprintln!("Use --force to confirm clearing the rename log");
                return Ok(());
            }
            log.clear()?;
            println!("Rename log cleared");
        }
    }

    Ok(())
}

/// Print analysis results in the requested format
fn print_batch(batch: &Batch, format: &str) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&batch.records)?);
        }
        "jsonl" => {
            for record in &batch.records {
                println!("{}", serde_json::to_string(record)?);
            }
        }
        _ => {
            for record in &batch.records {
                let name = record
                    .original_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or_default();
                match &record.status {
                    RecordStatus::Error(e) => println!("{}: ERROR - {}", name, e),
                    _ => println!(
                        "{}: {} | {}",
                        name, record.generated_title, record.generated_alt_text
                    ),
                }
            }
        }
    }
    Ok(())
}

/// Print rename outcomes in the requested format
fn print_outcomes(outcomes: &[basecoat::rename::RenameOutcome], format: &str) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(outcomes)?);
        }
        "jsonl" => {
            for outcome in outcomes {
                println!("{}", serde_json::to_string(outcome)?);
            }
        }
        _ => {
            let mut renamed = 0;
            let mut errors = 0;
            for outcome in outcomes {
                let from = outcome
                    .original_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or_default();
                match &outcome.status {
                    OutcomeStatus::Renamed => {
                        renamed += 1;
                        let to = outcome
                            .new_path
                            .as_ref()
                            .and_then(|p| p.file_name())
                            .and_then(|n| n.to_str())
                            .unwrap_or_default();
                        println!("{} -> {}", from, to);
                    }
                    OutcomeStatus::Skipped(reason) => println!("{}: skipped ({})", from, reason),
                    OutcomeStatus::Failed(reason) => {
                        errors += 1;
                        println!("{}: FAILED ({})", from, reason);
                    }
                }
            }
            println!("\nRenamed {} file(s), {} error(s)", renamed, errors);
        }
    }
    Ok(())
}

/// Redact an API key for display
fn mask_key(key: &str) -> String {
    let len = key.chars().count();
    if len == 0 {
        "(not set)".to_string()
    } else if len <= 8 {
        "********".to_string()
    } else {
        let tail: String = key.chars().skip(len - 4).collect();
        format!("****{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basecoat::history::LogEntry;

    #[test]
    fn test_cli_process_command() {
        let cli = Cli::try_parse_from([
            "basecoat",
            "process",
            "/tmp/photos",
            "--tag",
            "Deck Painting",
            "--apply",
            "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Commands::Process {
                folder,
                tag,
                apply,
                dry_run,
                ..
            } => {
                assert_eq!(folder, PathBuf::from("/tmp/photos"));
                assert_eq!(tag, vec!["Deck Painting".to_string()]);
                assert!(apply);
                assert!(dry_run);
            }
            _ => panic!("Expected Process command"),
        }
    }

    #[test]
    fn test_cli_rename_command() {
        let cli = Cli::try_parse_from(["basecoat", "rename", "batch.json", "--dry-run"]).unwrap();

        match cli.command {
            Commands::Rename { batch, dry_run } => {
                assert_eq!(batch, PathBuf::from("batch.json"));
                assert!(dry_run);
            }
            _ => panic!("Expected Rename command"),
        }
    }

    #[test]
    fn test_cli_config_set_key() {
        let cli = Cli::try_parse_from(["basecoat", "config", "set-key", "abc"]).unwrap();

        match cli.command {
            Commands::Config {
                action: ConfigCommands::SetKey { key },
            } => assert_eq!(key, "abc"),
            _ => panic!("Expected Config SetKey command"),
        }
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key(""), "(not set)");
        assert_eq!(mask_key("short"), "********");
        assert_eq!(mask_key("AIzaSyExampleKey1234"), "****1234");
        // Multi-byte characters must not split
        assert_eq!(mask_key("clé-secrète-très-longue"), "****ngue");
    }

    #[test]
    fn undo_skips_when_original_path_is_occupied() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("a.jpg");
        let renamed = dir.path().join("Deck-Staining.jpg");
        std::fs::write(&renamed, b"renamed contents").unwrap();
        // A fresh file now lives at the original path
        std::fs::write(&original, b"precious new file").unwrap();

        let log = RenameLog::new(dir.path().join("log.jsonl"));
        log.record(&LogEntry::new(
            original.clone(),
            renamed.clone(),
            "Deck Staining".to_string(),
            "A stained deck".to_string(),
        ))
        .unwrap();

        run_history(
            HistoryCommands::Undo {
                count: 1,
                dry_run: false,
            },
            &log,
        )
        .unwrap();

        assert_eq!(std::fs::read(&original).unwrap(), b"precious new file");
        assert!(renamed.exists());
        // Entry stays undoable since nothing was undone
        assert_eq!(log.undoable().unwrap().len(), 1);
    }

    #[test]
    fn undo_restores_the_original_name() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("a.jpg");
        let renamed = dir.path().join("Barn-Painting.jpg");
        std::fs::write(&renamed, b"contents").unwrap();

        let log = RenameLog::new(dir.path().join("log.jsonl"));
        log.record(&LogEntry::new(
            original.clone(),
            renamed.clone(),
            "Barn Painting".to_string(),
            "A red barn".to_string(),
        ))
        .unwrap();

        run_history(
            HistoryCommands::Undo {
                count: 1,
                dry_run: false,
            },
            &log,
        )
        .unwrap();

        assert!(original.exists());
        assert!(!renamed.exists());
        assert!(log.undoable().unwrap().is_empty());
    }
}

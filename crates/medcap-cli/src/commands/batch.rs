//! Batch command for multiple saved pages.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, error, warn};

use medcap_core::{Document, ExtractionResult, Pipeline};

use crate::export::ExportSink;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory, one export folder per input file under a
    /// subdirectory named after the file
    #[arg(short, long, required = true)]
    output_dir: PathBuf,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Outcome of processing a single file.
struct FileOutcome {
    path: PathBuf,
    result: Option<ExtractionResult>,
    folder: Option<PathBuf>,
    error: Option<String>,
    processing_time_ms: u64,
}

impl FileOutcome {
    fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// One line of `summary.csv`.
#[derive(Serialize)]
struct SummaryRow<'a> {
    filename: &'a str,
    status: &'static str,
    mode: String,
    records: usize,
    identity: bool,
    folder: String,
    message: &'a str,
    processing_time_ms: u64,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;
    let pipeline = Pipeline::with_config(config);
    pipeline
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_html(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    fs::create_dir_all(&args.output_dir)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut outcomes = Vec::with_capacity(files.len());
    let mut used_roots = HashSet::new();
    for path in files {
        let file_start = Instant::now();
        let root = args.output_dir.join(export_root_name(&path, &mut used_roots));
        let processed = process_single_file(&path, &pipeline, &root);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        let outcome = match processed {
            Ok((result, folder)) if result.success => FileOutcome {
                path,
                result: Some(result),
                folder,
                error: None,
                processing_time_ms,
            },
            Ok((result, folder)) => {
                let message = result.message.clone();
                FileOutcome {
                    path,
                    result: Some(result),
                    folder,
                    error: Some(message),
                    processing_time_ms,
                }
            }
            Err(e) => FileOutcome {
                path,
                result: None,
                folder: None,
                error: Some(e.to_string()),
                processing_time_ms,
            },
        };

        if let Some(error_msg) = &outcome.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", outcome.path.display(), error_msg);
            } else {
                error!("Failed to process {}: {}", outcome.path.display(), error_msg);
                pb.abandon();
                anyhow::bail!("Processing failed for {}: {}", outcome.path.display(), error_msg);
            }
        }

        outcomes.push(outcome);
        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    if args.summary {
        let summary_path = args.output_dir.join("summary.csv");
        write_summary(&summary_path, &outcomes)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let successful = outcomes.iter().filter(|o| o.succeeded()).count();
    let failed: Vec<_> = outcomes.iter().filter(|o| !o.succeeded()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        outcomes.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for outcome in &failed {
            println!(
                "  - {}: {}",
                outcome.path.display(),
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn is_html(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    matches!(ext.to_lowercase().as_str(), "html" | "htm")
}

/// Directory under the output dir for one input: its file name, with a
/// numeric suffix when an earlier input already took that name.
fn export_root_name(path: &Path, used: &mut HashSet<String>) -> String {
    let base = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("page")
        .to_string();

    let mut name = base.clone();
    let mut n = 1;
    while !used.insert(name.clone()) {
        n += 1;
        name = format!("{base}-{n}");
    }
    name
}

/// Run the pipeline on one file and export under `root`.
fn process_single_file(
    path: &Path,
    pipeline: &Pipeline,
    root: &Path,
) -> anyhow::Result<(ExtractionResult, Option<PathBuf>)> {
    let html = fs::read_to_string(path)?;
    let doc = Document::parse(&html);
    let result = pipeline.run(&doc);

    let sink = ExportSink::new(root, pipeline.config().export.clone());
    let folder = sink.write(&result)?.map(|files| files.folder);
    if let Some(folder) = &folder {
        debug!("Exported {} to {}", path.display(), folder.display());
    }

    Ok((result, folder))
}

fn write_summary(path: &Path, outcomes: &[FileOutcome]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    for outcome in outcomes {
        let filename = outcome
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let result = outcome.result.as_ref();

        wtr.serialize(SummaryRow {
            filename,
            status: if outcome.succeeded() { "success" } else { "error" },
            mode: result
                .and_then(|r| r.mode)
                .map(|mode| mode.to_string())
                .unwrap_or_default(),
            records: result.map_or(0, ExtractionResult::record_count),
            identity: result.is_some_and(|r| r.identity.is_some()),
            folder: outcome
                .folder
                .as_ref()
                .map(|f| f.display().to_string())
                .unwrap_or_default(),
            message: outcome
                .error
                .as_deref()
                .or(result.map(|r| r.message.as_str()))
                .unwrap_or(""),
            processing_time_ms: outcome.processing_time_ms,
        })?;
    }

    wtr.flush()?;
    Ok(())
}

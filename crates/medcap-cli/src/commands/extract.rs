//! Extract command - capture records from a single saved page.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::{measure_text_width, pad_str, style, Alignment};
use tracing::{debug, info};

use medcap_core::export::{result_to_json, to_csv_with};
use medcap_core::models::ExportConfig;
use medcap_core::{Document, ExtractionResult, Pipeline, RecordSet};

use crate::export::ExportSink;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input HTML file
    #[arg(required = true)]
    input: PathBuf,

    /// URL the page was saved from
    #[arg(long)]
    url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write an export folder under this directory
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Full result as JSON
    Json,
    /// Records as CSV
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;
    let pipeline = Pipeline::with_config(config);
    pipeline
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());
    let html = fs::read_to_string(&args.input)?;
    let mut doc = Document::parse(&html);
    if let Some(url) = &args.url {
        doc = doc.with_url(url.as_str());
    }

    let result = pipeline.run(&doc);
    let export_config = &pipeline.config().export;

    let output = format_result(&result, args.format, export_config)?;
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if let Some(output_dir) = &args.output_dir {
        let sink = ExportSink::new(output_dir, export_config.clone());
        if let Some(files) = sink.write(&result)? {
            eprintln!(
                "{} Exported to {}",
                style("✓").green(),
                files.folder.display()
            );
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    if !result.success {
        anyhow::bail!("{}", result.message);
    }

    Ok(())
}

pub fn format_result(
    result: &ExtractionResult,
    format: OutputFormat,
    export: &ExportConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(result_to_json(result)?),
        OutputFormat::Csv => Ok(result
            .records
            .as_ref()
            .map(|records| to_csv_with(records, export))
            .unwrap_or_default()),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

/// Data rows shown by the text format before the table is cut off.
const PREVIEW_ROWS: usize = 20;

/// Status line, identity fields, then a preview table of the records.
pub fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Status: {}\n", result.message));
    if let Some(mode) = result.mode {
        output.push_str(&format!("Page: {}\n", mode));
    }

    if let Some(identity) = &result.identity {
        output.push_str("\nPatient:\n");
        let fields = [
            ("ID", &identity.id_number),
            ("Name", &identity.name),
            ("Birth date", &identity.birth_date),
            ("Birth date (AD)", &identity.birth_date_ad),
            ("Gender", &identity.gender),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                output.push_str(&format!("  {}: {}\n", label, value));
            }
        }
    }

    if let Some(records) = &result.records {
        format_records(&mut output, records);
    }

    output
}

/// Aligned column table under the first record's headers.
fn format_records(output: &mut String, records: &RecordSet) {
    let headers = records.headers();
    if headers.is_empty() {
        return;
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .take(PREVIEW_ROWS)
        .map(|record| {
            headers
                .iter()
                .map(|header| record.get(header).unwrap_or("").replace('\n', " / "))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .map(|row| measure_text_width(&row[i]))
                .chain(std::iter::once(measure_text_width(header)))
                .max()
                .unwrap_or(0)
        })
        .collect();

    output.push('\n');
    push_row(output, headers.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(output, rule.iter().map(String::as_str), &widths);
    for row in &rows {
        push_row(output, row.iter().map(String::as_str), &widths);
    }

    if records.len() > PREVIEW_ROWS {
        output.push_str(&format!("... {} more records\n", records.len() - PREVIEW_ROWS));
    }
}

fn push_row<'a>(output: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| pad_str(cell, *width, Alignment::Left, None).into_owned())
        .collect::<Vec<_>>()
        .join(" | ");
    output.push_str(line.trim_end());
    output.push('\n');
}

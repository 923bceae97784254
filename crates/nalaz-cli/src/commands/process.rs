//! Process command - extract the analyte table from a single report file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use nalaz_core::pdf::PdfTextExtractor;
use nalaz_core::{AnalyteRecord, ExportRow, ReportParser};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Only show values outside their reference range
    #[arg(long)]
    only_deviations: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Aligned text table
    Text,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());
    let text = read_report_text(&args.input)?;

    if text.trim().is_empty() {
        println!(
            "{} {}: no extractable text (scanned document without a text layer?)",
            style("!").yellow(),
            args.input.display()
        );
        return Ok(());
    }

    let parser = ReportParser::new()
        .with_catalog(config.catalog())
        .with_window_chars(config.extraction.window_chars);

    let mut records = parser.parse(&text);

    if args.only_deviations {
        records.retain(|r| r.status.is_deviation());
    }

    if records.is_empty() {
        println!("{} No analyte rows recognized", style("!").yellow());
        return Ok(());
    }

    let output = format_records(&records, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} {} rows written to {}",
            style("✓").green(),
            records.len(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Read report text: PDFs go through the provider chain, anything else is
/// treated as plain text.
pub fn read_report_text(path: &Path) -> nalaz_core::Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if extension == "pdf" {
        let data = fs::read(path)?;
        Ok(PdfTextExtractor::new().extract_text(&data))
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

/// Render records in the requested output format.
pub fn format_records(records: &[AnalyteRecord], format: OutputFormat) -> anyhow::Result<String> {
    let rows: Vec<ExportRow> = records.iter().map(ExportRow::from).collect();

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&rows)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(Vec::new());
            for row in &rows {
                wtr.serialize(row)?;
            }
            let data = wtr
                .into_inner()
                .map_err(|e| anyhow::anyhow!("flushing CSV output failed: {e}"))?;
            Ok(String::from_utf8(data)?)
        }
        OutputFormat::Text => Ok(format_text_table(records)),
    }
}

fn format_text_table(records: &[AnalyteRecord]) -> String {
    let header = ["Analyte", "Value", "Unit", "Reference", "Status"];

    let rows: Vec<[String; 5]> = records
        .iter()
        .map(|r| {
            let name = if r.subtype.tag().is_empty() {
                r.analyte.clone()
            } else {
                format!("{} {}", r.analyte, r.subtype.tag())
            };
            [
                name,
                r.value.display(),
                r.unit.clone(),
                r.reference.display(),
                r.status.tag().to_string(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let render = |cells: &[String]| {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    let header_cells: Vec<String> = header.iter().map(|h| (*h).to_string()).collect();
    out.push_str(&render(&header_cells));
    out.push('\n');
    out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)));
    for row in &rows {
        out.push('\n');
        out.push_str(&render(row));
    }

    out
}

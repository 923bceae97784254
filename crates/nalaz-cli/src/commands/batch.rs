//! Batch command - process multiple report files into one combined table.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use nalaz_core::pdf::PdfTextExtractor;
use nalaz_core::{ExportRow, ReportParser};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Combined CSV output file
    #[arg(short, long, default_value = "lab_extract_combined.csv")]
    output: PathBuf,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|p| p.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No files matched: {}", args.input);
    }

    let parser = ReportParser::new()
        .with_catalog(config.catalog())
        .with_window_chars(config.extraction.window_chars);
    let extractor = PdfTextExtractor::new();

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    // Identical documents share one extraction, keyed by content digest.
    let mut text_cache: HashMap<String, String> = HashMap::new();

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&args.output)?;
    wtr.write_record([
        "file",
        "analyte",
        "subtype",
        "value",
        "unit",
        "ref_low",
        "ref_high",
        "ref_type",
        "ref_qualitative",
        "status",
        "source",
        "origin",
    ])?;

    let mut total_rows = 0usize;
    let mut skipped = 0usize;

    for path in &files {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        pb.set_message(file_name.clone());

        let data = fs::read(path)?;
        let digest = hex::encode(Sha256::digest(&data));

        let text = match text_cache.get(&digest) {
            Some(text) => text.clone(),
            None => {
                let text = extract_report_text(path, &data, &extractor);
                text_cache.insert(digest, text.clone());
                text
            }
        };

        if text.trim().is_empty() {
            warn!("{}: no extractable text", path.display());
            skipped += 1;
            pb.inc(1);
            continue;
        }

        let records = parser.parse(&text);
        if records.is_empty() {
            warn!("{}: no analyte rows recognized", path.display());
            skipped += 1;
            pb.inc(1);
            continue;
        }

        for record in &records {
            let row = ExportRow::from(record);
            let ref_low = fmt_bound(row.ref_low);
            let ref_high = fmt_bound(row.ref_high);
            wtr.write_record([
                file_name.as_str(),
                row.analyte.as_str(),
                row.subtype.as_str(),
                row.value.as_str(),
                row.unit.as_str(),
                ref_low.as_str(),
                ref_high.as_str(),
                row.ref_type.as_str(),
                row.ref_qualitative.as_str(),
                row.status.as_str(),
                row.source.as_str(),
                row.origin.as_str(),
            ])?;
        }

        total_rows += records.len();
        pb.inc(1);
    }

    wtr.flush()?;
    pb.finish_with_message("Done");

    println!(
        "{} {} rows from {} files written to {} ({} skipped)",
        style("✓").green(),
        total_rows,
        files.len(),
        args.output.display(),
        skipped
    );

    debug!("Batch finished in {:?}", start.elapsed());

    Ok(())
}

fn extract_report_text(path: &Path, data: &[u8], extractor: &PdfTextExtractor) -> String {
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        extractor.extract_text(data)
    } else {
        String::from_utf8_lossy(data).into_owned()
    }
}

fn fmt_bound(bound: Option<f64>) -> String {
    bound.map(|b| b.to_string()).unwrap_or_default()
}

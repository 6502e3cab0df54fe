//! Extract command - batch image extraction from PDF reports.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};

use tunlab_core::{DocumentStats, ExtractOptions, extract_document};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input directory of PDF reports, or a glob pattern
    input: Option<String>,

    /// Output root for extracted images
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Minimum image width in pixels
    #[arg(long)]
    min_width: Option<u32>,

    /// Minimum image height in pixels
    #[arg(long)]
    min_height: Option<u32>,

    /// Continue with the next document when one fails
    #[arg(long)]
    continue_on_error: bool,
}

/// Outcome for a single document.
struct DocumentResult {
    path: PathBuf,
    stats: Option<DocumentStats>,
    error: Option<String>,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    let input = args
        .input
        .clone()
        .unwrap_or_else(|| config.extract.input_dir.display().to_string());
    let output_root = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.extract.output_dir.clone());
    let opts = ExtractOptions {
        min_width: args.min_width.unwrap_or(config.extract.min_width),
        min_height: args.min_height.unwrap_or(config.extract.min_height),
    };

    let files = collect_documents(&input)?;
    if files.is_empty() {
        anyhow::bail!("No PDF documents found at: {}", input);
    }

    println!(
        "{} Found {} documents to process",
        style("ℹ").blue(),
        files.len()
    );

    fs::create_dir_all(&output_root)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());
    for path in files {
        match extract_document(&path, &output_root, &opts) {
            Ok(stats) => {
                results.push(DocumentResult {
                    path,
                    stats: Some(stats),
                    error: None,
                });
            }
            Err(e) => {
                let msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), msg);
                    results.push(DocumentResult {
                        path,
                        stats: None,
                        error: Some(msg),
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), msg);
                    anyhow::bail!("Extraction failed for {}: {}", path.display(), msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    let written: usize = results
        .iter()
        .filter_map(|r| r.stats.as_ref())
        .map(|s| s.written.len())
        .sum();
    let skipped: usize = results
        .iter()
        .filter_map(|r| r.stats.as_ref())
        .map(|s| s.skipped_small)
        .sum();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    println!();
    println!(
        "{} Processed {} documents in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} images extracted to {}, {} below {}x{} threshold",
        style(written).green(),
        output_root.display(),
        skipped,
        opts.min_width,
        opts.min_height
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed documents:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Enumerate PDF documents from a directory or a glob pattern.
fn collect_documents(input: &str) -> anyhow::Result<Vec<PathBuf>> {
    let path = PathBuf::from(input);

    let files = if path.is_dir() {
        fs::read_dir(&path)?
            .filter_map(|r| r.ok())
            .map(|entry| entry.path())
            .filter(|p| is_pdf(p))
            .collect()
    } else {
        glob(input)?
            .filter_map(|r| r.ok())
            .filter(|p| is_pdf(p))
            .collect()
    };

    Ok(files)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

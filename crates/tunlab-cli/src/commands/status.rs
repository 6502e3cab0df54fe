//! Status command - dataset progress overview.

use std::path::PathBuf;

use clap::Args;
use console::style;

use tunlab_core::{CsvLedger, LabelRecord, LabelStore, LedgerError, scan_candidates};

/// Arguments for the status command.
#[derive(Args)]
pub struct StatusArgs {
    /// Directory tree of extracted images
    #[arg(short, long)]
    image_dir: Option<PathBuf>,

    /// Path of the label ledger CSV
    #[arg(short, long)]
    ledger: Option<PathBuf>,
}

/// Store that treats every image as unlabeled; used to count the full tree.
struct NoLabels;

impl LabelStore for NoLabels {
    fn contains(&self, _key: &str) -> bool {
        false
    }

    fn append(&mut self, _record: &LabelRecord) -> Result<(), LedgerError> {
        Ok(())
    }

    fn len(&self) -> usize {
        0
    }
}

pub async fn run(args: StatusArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let image_dir = args.image_dir.unwrap_or(config.label.image_dir);
    let ledger_path = args.ledger.unwrap_or(config.label.ledger_path);

    let total = if image_dir.exists() {
        scan_candidates(&image_dir, &NoLabels)?.len()
    } else {
        0
    };

    // Opening a missing ledger would create it; status stays read-only
    let (labeled, remaining) = if ledger_path.exists() {
        let ledger = CsvLedger::open(&ledger_path, config.label.schema)?;
        let remaining = if image_dir.exists() {
            scan_candidates(&image_dir, &ledger)?.len()
        } else {
            0
        };
        (ledger.len(), remaining)
    } else {
        (0, total)
    };

    println!("Image tree:  {}", image_dir.display());
    println!("Ledger:      {}", ledger_path.display());
    println!();
    println!("{} Extracted images: {}", style("ℹ").blue(), total);
    println!("{} Labeled rows:     {}", style("ℹ").blue(), labeled);
    println!("{} Remaining:        {}", style("ℹ").blue(), remaining);

    if total > 0 && remaining == 0 {
        println!();
        println!("{} All extracted images are labeled.", style("✓").green());
    }

    Ok(())
}

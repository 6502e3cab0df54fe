//! Label command - interactive labeling session for extracted images.

use std::path::{Path, PathBuf};

use clap::Args;
use console::{Term, style};
use tracing::debug;

use tunlab_core::{
    CsvLedger, DisplacementValues, FormValues, LabelConfig, LabelSession, LabelStore,
    LedgerSchema, MAX_TUNNELS, scan_candidates,
};

/// Arguments for the label command.
#[derive(Args)]
pub struct LabelArgs {
    /// Directory tree of extracted images
    #[arg(short, long)]
    image_dir: Option<PathBuf>,

    /// Path of the label ledger CSV
    #[arg(short, long)]
    ledger: Option<PathBuf>,

    /// Ledger schema
    #[arg(short, long, value_enum)]
    schema: Option<SchemaArg>,

    /// Disable the inline terminal image preview
    #[arg(long)]
    no_preview: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum SchemaArg {
    /// Per-tunnel crown and sidewall values (17 columns)
    Granular,
    /// One crown value and one sidewall value (7 columns)
    Scalar,
}

impl From<SchemaArg> for LedgerSchema {
    fn from(value: SchemaArg) -> Self {
        match value {
            SchemaArg::Granular => LedgerSchema::Granular,
            SchemaArg::Scalar => LedgerSchema::Scalar,
        }
    }
}

enum Action {
    Label,
    Skip,
    Quit,
}

pub async fn run(args: LabelArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let label_cfg = config.label;

    let image_dir = args.image_dir.unwrap_or_else(|| label_cfg.image_dir.clone());
    let ledger_path = args.ledger.unwrap_or_else(|| label_cfg.ledger_path.clone());
    let schema = args.schema.map(Into::into).unwrap_or(label_cfg.schema);

    if !image_dir.exists() {
        anyhow::bail!(
            "Image directory not found: {}. Run 'tunlab extract' first.",
            image_dir.display()
        );
    }

    let ledger = CsvLedger::open(&ledger_path, schema)?;
    let already_labeled = ledger.len();
    let candidates = scan_candidates(&image_dir, &ledger)?;

    if candidates.is_empty() {
        println!(
            "{} All images classified! ({} rows in {})",
            style("✓").green(),
            already_labeled,
            ledger_path.display()
        );
        return Ok(());
    }

    println!(
        "{} {} images to label, {} already in the ledger",
        style("ℹ").blue(),
        candidates.len(),
        already_labeled
    );

    let term = Term::stdout();
    let mut session = LabelSession::new(candidates, ledger);

    while let Some(path) = session.current().map(Path::to_path_buf) {
        println!();
        println!(
            "{} [{}/{}] {}",
            style("Classify:").bold(),
            session.position() + 1,
            session.total(),
            path.display()
        );
        show_image(&path, args.no_preview);

        match prompt_action(&term)? {
            Action::Skip => {
                session.skip();
                continue;
            }
            Action::Quit => {
                println!(
                    "{} Stopped with {} images left to label",
                    style("ℹ").blue(),
                    session.remaining()
                );
                return Ok(());
            }
            Action::Label => {}
        }

        let form = fill_form(&term, schema, &label_cfg)?;
        session.submit(&form)?;
        println!(
            "{} Saved label ({} rows total)",
            style("✓").green(),
            session.store().len()
        );
    }

    println!();
    println!("{} All images classified!", style("✓").green());
    Ok(())
}

/// Show dimensions and, where the terminal supports it, an inline preview.
fn show_image(path: &Path, no_preview: bool) {
    match image::image_dimensions(path) {
        Ok((w, h)) => println!("  {} {}x{}", style("Size:").dim(), w, h),
        Err(e) => debug!("Could not read dimensions for {}: {}", path.display(), e),
    }

    if no_preview {
        return;
    }

    let display_config = viuer::Config {
        width: Some(72),
        absolute_offset: false,
        ..Default::default()
    };
    match image_0_24::open(path) {
        Ok(img) => {
            let _ = viuer::print(&img, &display_config);
        }
        Err(e) => debug!("Preview unavailable for {}: {}", path.display(), e),
    }
}

fn prompt_action(term: &Term) -> anyhow::Result<Action> {
    term.write_str("  [Enter] label  [s] skip  [q] quit > ")?;
    let line = term.read_line()?;
    Ok(match line.trim() {
        "s" | "S" => Action::Skip,
        "q" | "Q" => Action::Quit,
        _ => Action::Label,
    })
}

/// Walk the operator through the form for one image.
fn fill_form(term: &Term, schema: LedgerSchema, cfg: &LabelConfig) -> anyhow::Result<FormValues> {
    let mut form = FormValues::blank(schema);

    form.software = prompt_choice(term, "Software output", &cfg.software_options)?;
    form.output_type = prompt_choice(term, "Output type", &cfg.output_type_options)?;
    form.num_tunnels = prompt_text(term, "Number of tunnels (1-4)")?;

    form.values = match schema {
        LedgerSchema::Granular => DisplacementValues::Granular {
            crown: prompt_tunnel_group(term, "Crown")?,
            sidewall_left: prompt_tunnel_group(term, "Sidewall left")?,
            sidewall_right: prompt_tunnel_group(term, "Sidewall right")?,
        },
        LedgerSchema::Scalar => DisplacementValues::Scalar {
            crown: prompt_text(term, "Crown value")?,
            sidewall: prompt_text(term, "Sidewall value")?,
        },
    };

    form.tunnel_shape = prompt_choice(term, "Tunnel shape", &cfg.shape_options)?;
    Ok(form)
}

fn prompt_text(term: &Term, label: &str) -> anyhow::Result<String> {
    term.write_str(&format!("  {} [blank = N/A]: ", label))?;
    Ok(term.read_line()?)
}

fn prompt_tunnel_group(term: &Term, label: &str) -> anyhow::Result<[String; MAX_TUNNELS]> {
    let mut values: [String; MAX_TUNNELS] = Default::default();
    for (i, slot) in values.iter_mut().enumerate() {
        *slot = prompt_text(term, &format!("{} tunnel {}", label, i + 1))?;
    }
    Ok(values)
}

/// Numbered menu; a number picks an option, anything else is kept verbatim.
fn prompt_choice(term: &Term, label: &str, options: &[String]) -> anyhow::Result<String> {
    println!("  {}:", style(label).bold());
    for (i, option) in options.iter().enumerate() {
        println!("    {}. {}", i + 1, option);
    }
    term.write_str("  Choice [blank = N/A]: ")?;

    let line = term.read_line()?;
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }

    match trimmed.parse::<usize>() {
        Ok(n) if (1..=options.len()).contains(&n) => Ok(options[n - 1].clone()),
        _ => Ok(trimmed.to_string()),
    }
}

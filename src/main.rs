mod input;
mod model;
mod pipeline;
mod report;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::input::coef::parse_coef_taxa;
use crate::input::profile::parse_profile;
use crate::input::refdb::load_refdb;
use crate::pipeline::reconcile::reconcile;
use crate::pipeline::select::select_candidates;
use crate::pipeline::{RunSummary, species_rows, unclassified_shortcut};

#[derive(Debug, Parser)]
#[command(name = "marker-map", version, about = "Reconciles a per-sample MetaPhlAn profile against reference abundance statistics.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Reconcile one sample and write the marker table.
    Run(RunArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// MetaPhlAn profile report (tab-separated, optionally gzipped)
    #[arg(long)]
    mpa: PathBuf,
    /// Coefficient-derived taxa list supplying the fallback tier
    #[arg(long)]
    coef: Option<PathBuf>,
    /// Reference statistics CSV with Taxon, mean and median columns
    #[arg(long)]
    db: PathBuf,
    /// Sample identifier
    #[arg(long)]
    sample: String,
    /// Output TSV path
    #[arg(long)]
    output: PathBuf,
    /// Optional JSON run summary path
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Commands::Run(args) = cli.command;
    if let Err(err) = run(&args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(args: &RunArgs) -> Result<(), String> {
    let profile = parse_profile(&args.mpa).map_err(|e| e.to_string())?;
    info!(
        "loaded profile: {} rows from {}",
        profile.len(),
        args.mpa.display()
    );

    let (records, summary) = if let Some(record) = unclassified_shortcut(&args.sample, &profile) {
        info!(
            "sample {} is fully unclassified; skipping selection and join",
            args.sample
        );
        let summary = RunSummary {
            tool: "marker-map",
            version: env!("CARGO_PKG_VERSION"),
            sample: args.sample.clone(),
            profile_rows: profile.len(),
            species_rows: 0,
            primary: 0,
            fallback: 0,
            emitted: 1,
            unclassified: true,
        };
        (vec![record], summary)
    } else {
        let db = load_refdb(&args.db).map_err(|e| e.to_string())?;
        info!(
            "reference database: {} taxa from {}",
            db.len(),
            args.db.display()
        );
        let coef_taxa = match &args.coef {
            Some(path) => Some(parse_coef_taxa(path).map_err(|e| e.to_string())?),
            None => None,
        };

        let rows = species_rows(&profile);
        let selection = select_candidates(&rows, coef_taxa.as_deref(), &db);
        info!(
            "selected {} primary and {} fallback candidates",
            selection.n_primary, selection.n_fallback
        );
        let records = reconcile(&args.sample, &selection.candidates, &db);
        let summary = RunSummary {
            tool: "marker-map",
            version: env!("CARGO_PKG_VERSION"),
            sample: args.sample.clone(),
            profile_rows: profile.len(),
            species_rows: rows.len(),
            primary: selection.n_primary,
            fallback: selection.n_fallback,
            emitted: records.len(),
            unclassified: false,
        };
        (records, summary)
    };

    report::write_table(&args.output, &records).map_err(|e| e.to_string())?;
    info!(
        "wrote {} records to {}",
        records.len(),
        args.output.display()
    );

    if let Some(path) = &args.summary {
        let json = report::render_summary(&summary).map_err(|e| e.to_string())?;
        report::write_text(path, &json).map_err(|e| e.to_string())?;
        info!("wrote run summary to {}", path.display());
    }

    Ok(())
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use apoe_onset::data::loader::{load_donor_table, load_file};
use apoe_onset::data::merge::merge_by_donor;
use apoe_onset::report::AnalysisReport;
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Compare onset age between APOE E4 carriers and non-carriers, and regress
/// onset age on years of education.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Clinical table (.csv, .tsv, .json or .parquet).
    input: PathBuf,

    /// Secondary table joined by donor id; fills values missing from INPUT.
    #[arg(long)]
    merge: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut patients = load_file(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;

    if let Some(path) = &args.merge {
        let table =
            load_donor_table(path).with_context(|| format!("loading {}", path.display()))?;
        patients = merge_by_donor(patients, &table).patients;
    }

    if patients.is_empty() {
        log::warn!("No rows with an onset age in {}", args.input.display());
    }

    let report = AnalysisReport::build(patients.records());
    match args.format {
        Format::Text => print!("{}", report.render_text()),
        Format::Json => println!("{}", report.to_json().context("serializing report")?),
    }
    Ok(())
}

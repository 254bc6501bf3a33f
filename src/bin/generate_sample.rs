use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use penguin_dash::data::{export, sample};

/// Write the built-in penguin sample to a file for use with `--data`.
#[derive(Debug, Parser)]
#[command(name = "generate_sample", version, about)]
struct Cli {
    /// Output path; the extension (.csv, .json, .parquet) picks the format.
    #[arg(default_value = "penguins.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let dataset = sample::penguins();
    export::write_file(&dataset, &cli.output)?;

    println!(
        "Wrote {} penguins ({:?}) to {}",
        dataset.len(),
        dataset.species_counts(),
        cli.output.display()
    );
    Ok(())
}

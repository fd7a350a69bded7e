use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pricing_data::{encode_cost_structure, read_cost_data_from_file};

/// Validate a cost CSV file and print what it contains.
///
/// The file must have a `Type,Name,Amount,Period,Rate,Hours` header. Rows
/// are typed `Direct`, `Indirect`, `Time` or `Settings`.
#[derive(Parser, Debug)]
#[command(name = "pricing-csv-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing cost data
    #[arg(short, long)]
    file: PathBuf,

    /// Print the file re-encoded in canonical form
    #[arg(short, long, default_value_t = false)]
    normalize: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    println!("Checking cost data in: {}", args.file.display());

    let import = read_cost_data_from_file(&args.file)
        .await
        .with_context(|| format!("Failed to import: {}", args.file.display()))?;
    let cost = &import.cost_structure;

    println!(
        "Parsed {} direct, {} indirect and {} time costs",
        cost.direct_costs.len(),
        cost.indirect_costs.len(),
        cost.time_costs.len()
    );
    println!(
        "Target margin {}, expected volume {}",
        cost.target_margin, cost.expected_volume
    );
    if import.skipped_rows > 0 {
        println!(
            "Skipped {} row(s) with the wrong number of columns",
            import.skipped_rows
        );
    }

    if args.normalize {
        let text = encode_cost_structure(cost).context("Failed to re-encode cost data")?;
        print!("{text}");
    }

    Ok(())
}

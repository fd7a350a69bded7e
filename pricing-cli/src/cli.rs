use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use pricing_core::{PricingStrategy, ScenarioId};
use rust_decimal::Decimal;

use crate::config::AppConfig;
use crate::utils::parse_decimal;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Pricing calculator for small businesses.
///
/// Derives unit cost, recommended price, break-even and profitability
/// figures from a cost CSV, and keeps named scenarios for comparison.
#[derive(Debug, Parser)]
#[command(name = "pricing", version, about)]
pub struct Cli {
    /// Configuration file (defaults to `pricing.toml` when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage backend for scenarios and preferences (`file` or `memory`).
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Storage location passed to the backend; a file path for `file`.
    #[arg(long, global = true)]
    pub store: Option<String>,

    /// Log level or filter directive.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Also append log records to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Applies command-line overrides on top of file configuration.
    pub fn apply_overrides(
        &self,
        mut config: AppConfig,
    ) -> AppConfig {
        if let Some(backend) = &self.backend {
            config.storage.backend = backend.clone();
        }
        if let Some(store) = &self.store {
            config.storage.location = store.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
        config
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the full cost and pricing analysis for a cost file.
    Analyze(AnalyzeArgs),

    /// Print demonstration cost data, or write it to a directory.
    Sample {
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Manage saved scenarios.
    #[command(subcommand)]
    Scenario(ScenarioCommand),

    /// Show or change the display theme preference.
    Theme {
        #[arg(value_enum)]
        action: Option<ThemeAction>,
    },

    /// Render a document for a cost file.
    Report {
        /// `pricing-strategy`, `value-assessment` or `dashboard`.
        #[arg(long)]
        kind: String,

        #[command(flatten)]
        analysis: AnalyzeArgs,

        /// Directory the document is written to.
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum ScenarioCommand {
    /// Save the analysis of a cost file under a name.
    Save {
        #[arg(long)]
        name: String,

        #[command(flatten)]
        analysis: AnalyzeArgs,
    },

    /// List saved scenarios.
    List,

    /// Print the analysis saved with a scenario.
    Show { id: ScenarioId },

    Rename { id: ScenarioId, name: String },

    Delete { id: ScenarioId },

    /// Compare two or more scenarios metric by metric.
    Compare {
        #[arg(num_args = 2.., required = true)]
        ids: Vec<ScenarioId>,
    },

    /// Export scenarios as JSON (all of them unless `--ids` is given).
    Export {
        #[arg(long, num_args = 1..)]
        ids: Vec<ScenarioId>,

        /// Write `scenarios.json` here instead of printing it.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Append scenarios from an exported JSON file.
    Import { file: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeAction {
    Light,
    Dark,
    Toggle,
}

/// Cost file plus optional overrides and pricing inputs.
#[derive(Debug, Clone, Args)]
pub struct AnalyzeArgs {
    /// Cost CSV with a `Type,Name,Amount,Period,Rate,Hours` header.
    #[arg(long)]
    pub csv: PathBuf,

    /// Override the file's target margin (fraction, e.g. 0.35).
    #[arg(long, value_parser = parse_decimal)]
    pub target_margin: Option<Decimal>,

    /// Override the file's expected monthly volume.
    #[arg(long, value_parser = parse_decimal)]
    pub volume: Option<Decimal>,

    #[command(flatten)]
    pub pricing: PricingArgs,
}

#[derive(Debug, Clone, Default, Args)]
pub struct PricingArgs {
    /// Selling price; the recommended price is used when omitted.
    #[arg(long, value_parser = parse_decimal)]
    pub price: Option<Decimal>,

    /// Up-front investment for ROI and payback.
    #[arg(long, value_parser = parse_decimal)]
    pub investment: Option<Decimal>,

    /// Observed change in volume, for elasticity.
    #[arg(long, value_parser = parse_decimal, allow_hyphen_values = true)]
    pub volume_change: Option<Decimal>,

    /// Price change that caused it.
    #[arg(long, value_parser = parse_decimal, allow_hyphen_values = true)]
    pub price_change: Option<Decimal>,
}

impl PricingArgs {
    pub fn strategy(&self) -> PricingStrategy {
        PricingStrategy {
            price: self.price.unwrap_or_default(),
            investment: self.investment.unwrap_or_default(),
            volume_change_pct: self.volume_change.unwrap_or_default(),
            price_change_pct: self.price_change.unwrap_or_default(),
        }
    }
}

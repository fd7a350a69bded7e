use anyhow::{Context, Result};
use pricing_core::calculations::PricingReport;
use pricing_core::export::{FileDownload, dispatch_export};
use pricing_core::preferences::{load_theme, save_theme, toggle_theme};
use pricing_core::scenarios::{ComparisonResult, compare};
use pricing_core::storage::{StorageConfig, StorageRegistry};
use pricing_core::{
    CostStructure, KeyValueStore, ScenarioError, ScenarioId, ScenarioState, ScenarioStore, Theme,
};
use pricing_data::read_cost_data_from_file;
use pricing_data::sample::sample_csv;
use pricing_store_file::FileStorageFactory;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::cli::{AnalyzeArgs, Command, ScenarioCommand, ThemeAction};
use crate::config::{AppConfig, CostDefaults};
use crate::export::{DirectoryDownload, JSON_CONTENT_TYPE, TextReportRenderer, report_payload};
use crate::utils::{format_metric, format_pct, metric_label};

pub const SAMPLE_FILE: &str = "sample-costs.csv";
pub const SCENARIO_EXPORT_FILE: &str = "scenarios.json";

/// Number of leading [`PricingReport::entries`] that describe costs.
const COST_METRIC_COUNT: usize = 6;

/// Registry with every storage backend this binary ships.
pub fn build_registry() -> StorageRegistry {
    let mut registry = StorageRegistry::new();
    registry.register(Box::new(FileStorageFactory));
    registry
}

pub fn open_backend(config: &StorageConfig) -> Result<Box<dyn KeyValueStore>> {
    debug!(backend = %config.backend, location = %config.location, "opening storage");
    build_registry()
        .create(config)
        .with_context(|| format!("Failed to open {} storage", config.backend))
}

/// Imports the cost file named by `args`.
///
/// Command-line flags always override the file. Configured defaults only
/// fill settings the file leaves out.
pub async fn load_cost_structure(
    args: &AnalyzeArgs,
    defaults: &CostDefaults,
) -> Result<CostStructure> {
    let import = read_cost_data_from_file(&args.csv)
        .await
        .with_context(|| format!("Failed to import: {}", args.csv.display()))?;
    if import.skipped_rows > 0 {
        warn!(
            file = %args.csv.display(),
            skipped = import.skipped_rows,
            "ignored rows with the wrong number of columns"
        );
    }

    let file = import.settings;
    let mut cost = import.cost_structure;
    if let Some(margin) = args
        .target_margin
        .or_else(|| default_unless_set(file.target_margin, defaults.target_margin))
    {
        cost.target_margin = margin;
    }
    if let Some(volume) = args
        .volume
        .or_else(|| default_unless_set(file.expected_volume, defaults.expected_volume))
    {
        cost.expected_volume = volume;
    }
    Ok(cost)
}

/// `default` when the file did not set the value itself.
fn default_unless_set(
    from_file: Option<Decimal>,
    default: Option<Decimal>,
) -> Option<Decimal> {
    if from_file.is_some() {
        None
    } else {
        default
    }
}

fn push_metrics(
    out: &mut String,
    entries: &[(&str, f64)],
) {
    for (name, value) in entries {
        out.push_str(&format!(
            "  {:<22}{:>16}\n",
            metric_label(name),
            format_metric(name, *value)
        ));
    }
}

pub fn render_analysis(report: &PricingReport) -> String {
    let entries = report.entries();
    let (cost, pricing) = entries.split_at(COST_METRIC_COUNT);

    let mut out = String::from("Cost analysis\n");
    push_metrics(&mut out, cost);
    out.push_str("\nPricing analysis\n");
    push_metrics(&mut out, pricing);
    out
}

pub fn render_scenario_list(store: &ScenarioStore) -> String {
    if store.is_empty() {
        return "No saved scenarios.\n".to_string();
    }
    store
        .list()
        .iter()
        .map(|s| {
            format!(
                "{}  {}  (saved {})\n",
                s.id,
                s.name,
                s.created_at.format("%Y-%m-%d %H:%M")
            )
        })
        .collect()
}

pub fn render_comparison(
    store: &ScenarioStore,
    result: &ComparisonResult,
) -> String {
    if result.is_empty() {
        return "Nothing to compare: choose at least two scenarios with shared metrics.\n"
            .to_string();
    }
    let name_of = |id: ScenarioId| {
        store
            .get(id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| id.to_string())
    };

    let mut out = format!("{:<22}", "Metric");
    for id in &result.scenario_ids {
        out.push_str(&format!("{:>16}", name_of(*id)));
    }
    out.push_str("  Difference\n");

    for (name, comparison) in &result.metrics {
        out.push_str(&format!("{:<22}", metric_label(name)));
        for id in &result.scenario_ids {
            let value = comparison.values.get(id).copied().unwrap_or(f64::NAN);
            out.push_str(&format!("{:>16}", format_metric(name, value)));
        }
        let differences: Vec<String> = comparison
            .differences
            .iter()
            .map(|d| format_pct(d.pct_difference))
            .collect();
        out.push_str(&format!("  {}\n", differences.join(" / ")));
    }
    out
}

/// Executes `command` and returns the text to print.
pub async fn run(
    command: &Command,
    config: &AppConfig,
) -> Result<String> {
    match command {
        Command::Analyze(args) => {
            let cost = load_cost_structure(args, &config.defaults).await?;
            let report = PricingReport::analyze(&cost, &args.pricing.strategy());
            Ok(render_analysis(&report))
        }
        Command::Sample { out } => {
            let text = sample_csv().context("Failed to encode sample data")?;
            match out {
                Some(dir) => {
                    let sink = DirectoryDownload::new(dir);
                    sink.download(&text, SAMPLE_FILE, "text/csv")?;
                    Ok(format!(
                        "Sample cost data written to {}\n",
                        sink.path_for(SAMPLE_FILE).display()
                    ))
                }
                None => Ok(text),
            }
        }
        Command::Scenario(command) => run_scenario(command, config).await,
        Command::Theme { action } => {
            let mut backend = open_backend(&config.storage)?;
            let theme = match action {
                None => load_theme(&*backend)?,
                Some(ThemeAction::Light) => set_theme(&mut *backend, Theme::Light)?,
                Some(ThemeAction::Dark) => set_theme(&mut *backend, Theme::Dark)?,
                Some(ThemeAction::Toggle) => toggle_theme(&mut *backend)?,
            };
            Ok(format!("Theme: {theme}\n"))
        }
        Command::Report {
            kind,
            analysis,
            out,
        } => {
            let cost = load_cost_structure(analysis, &config.defaults).await?;
            let report = PricingReport::analyze(&cost, &analysis.pricing.strategy());
            let title = analysis
                .csv
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let renderer = TextReportRenderer::new(DirectoryDownload::new(out));
            let message = dispatch_export(&renderer, kind, &report_payload(&title, &report)).await?;
            Ok(format!("{message}\n"))
        }
    }
}

fn set_theme(
    backend: &mut dyn KeyValueStore,
    theme: Theme,
) -> Result<Theme> {
    save_theme(backend, theme)?;
    Ok(theme)
}

async fn run_scenario(
    command: &ScenarioCommand,
    config: &AppConfig,
) -> Result<String> {
    let mut store = ScenarioStore::open(open_backend(&config.storage)?)
        .context("Failed to load saved scenarios")?;

    match command {
        ScenarioCommand::Save { name, analysis } => {
            let cost = load_cost_structure(analysis, &config.defaults).await?;
            let state = ScenarioState::capture(&cost, &analysis.pricing.strategy());
            let scenario = store.create(name.as_str(), &state)?;
            Ok(format!("Saved scenario {} ({})\n", scenario.name, scenario.id))
        }
        ScenarioCommand::List => Ok(render_scenario_list(&store)),
        ScenarioCommand::Show { id } => {
            let scenario = store.get(*id).ok_or(ScenarioError::NotFound(*id))?;
            Ok(format!(
                "{} ({})\n\n{}",
                scenario.name,
                scenario.id,
                render_analysis(&scenario.state.report())
            ))
        }
        ScenarioCommand::Rename { id, name } => {
            store.update(*id, Some(name.clone()), None)?;
            Ok(format!("Renamed scenario {id} to {name}\n"))
        }
        ScenarioCommand::Delete { id } => {
            store.delete(*id)?;
            Ok(format!("Deleted scenario {id}\n"))
        }
        ScenarioCommand::Compare { ids } => {
            let result = compare(&store, ids)?;
            Ok(render_comparison(&store, &result))
        }
        ScenarioCommand::Export { ids, out } => {
            let (text, count) = if ids.is_empty() {
                (store.export(None)?, store.len())
            } else {
                (store.export(Some(ids.as_slice()))?, ids.len())
            };
            match out {
                Some(dir) => {
                    let sink = DirectoryDownload::new(dir);
                    sink.download(&text, SCENARIO_EXPORT_FILE, JSON_CONTENT_TYPE)?;
                    Ok(format!(
                        "Exported {count} scenario(s) to {}\n",
                        sink.path_for(SCENARIO_EXPORT_FILE).display()
                    ))
                }
                None => Ok(format!("{text}\n")),
            }
        }
        ScenarioCommand::Import { file } => {
            let text = tokio::fs::read_to_string(file)
                .await
                .with_context(|| format!("Failed to read: {}", file.display()))?;
            let ids = store.import(&text)?;
            Ok(format!("Imported {} scenario(s)\n", ids.len()))
        }
    }
}

//! Cost structures to and from the `Type,Name,Amount,Period,Rate,Hours` file
//! format.

use pricing_core::{CostPeriod, CostStructure, DirectCost, IndirectCost, TimeCost};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::codec::{CsvCodecError, CsvRecord, CsvTable, decode_csv};

pub const HEADER: [&str; 6] = ["Type", "Name", "Amount", "Period", "Rate", "Hours"];

const SETTING_TARGET_MARGIN: &str = "targetMargin";
const SETTING_EXPECTED_VOLUME: &str = "expectedVolume";

#[derive(Debug, Error)]
pub enum CsvImportError {
    #[error("Error reading file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Error parsing CSV: {0}")]
    Parse(#[from] CsvCodecError),
}

/// A decoded cost structure together with the number of rows the lenient
/// decoder had to drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostImport {
    pub cost_structure: CostStructure,
    pub skipped_rows: usize,
    /// `Settings` values the file itself supplied.
    pub settings: FileSettings,
}

/// Which settings a cost file set explicitly. `None` means the structure
/// carries the built-in default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileSettings {
    pub target_margin: Option<Decimal>,
    pub expected_volume: Option<Decimal>,
}

/// Replaces commas and line breaks with spaces and collapses the gaps, so a
/// name can never add a column.
pub fn sanitize_name(name: &str) -> String {
    name.split([',', '\n', '\r'])
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Encodes `cost` as CSV text with a header row and two trailing `Settings`
/// rows.
pub fn encode_cost_structure(cost: &CostStructure) -> Result<String, CsvCodecError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for c in &cost.direct_costs {
        let name = sanitize_name(&c.name);
        let amount = c.amount.to_string();
        writer.write_record(["Direct", name.as_str(), amount.as_str(), "", "", ""])?;
    }
    for c in &cost.indirect_costs {
        let name = sanitize_name(&c.name);
        let amount = c.amount.to_string();
        writer.write_record([
            "Indirect",
            name.as_str(),
            amount.as_str(),
            c.period.as_str(),
            "",
            "",
        ])?;
    }
    for c in &cost.time_costs {
        let name = sanitize_name(&c.name);
        let rate = c.rate.to_string();
        let hours = c.hours.to_string();
        writer.write_record(["Time", name.as_str(), "", "", rate.as_str(), hours.as_str()])?;
    }
    let target_margin = cost.target_margin.to_string();
    let expected_volume = cost.expected_volume.to_string();
    writer.write_record(["Settings", SETTING_TARGET_MARGIN, target_margin.as_str(), "", "", ""])?;
    writer.write_record(["Settings", SETTING_EXPECTED_VOLUME, expected_volume.as_str(), "", "", ""])?;

    let bytes = writer
        .into_inner()
        .map_err(|e| CsvCodecError::Encoding(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CsvCodecError::Encoding(e.to_string()))
}

/// Groups decoded rows by their `Type` column into a [`CostStructure`].
///
/// Unknown types are skipped. Missing numeric cells read as zero; the
/// settings keep their defaults unless a `Settings` row overrides them.
pub fn cost_structure_from_table(table: &CsvTable) -> CostStructure {
    read_table(table).0
}

fn read_table(table: &CsvTable) -> (CostStructure, FileSettings) {
    let mut cost = CostStructure::default();
    let mut settings = FileSettings::default();

    for record in table.records() {
        let kind = record.text("Type");
        match kind.to_ascii_lowercase().as_str() {
            "direct" => cost.direct_costs.push(DirectCost {
                name: record.text("Name"),
                amount: amount(&record, "Amount"),
            }),
            "indirect" => cost.indirect_costs.push(IndirectCost {
                name: record.text("Name"),
                amount: amount(&record, "Amount"),
                period: period(&record),
            }),
            "time" => cost.time_costs.push(TimeCost {
                name: record.text("Name"),
                rate: amount(&record, "Rate"),
                hours: amount(&record, "Hours"),
            }),
            "settings" => read_setting(&mut settings, &record),
            _ => debug!(kind = %kind, "ignoring CSV row with unknown type"),
        }
    }

    if let Some(margin) = settings.target_margin {
        cost.target_margin = margin;
    }
    if let Some(volume) = settings.expected_volume {
        cost.expected_volume = volume;
    }
    (cost, settings)
}

/// Decodes CSV text into a cost structure.
///
/// # Errors
///
/// [`CsvImportError::Parse`] when the text holds no data.
///
/// # Examples
///
/// ```
/// use pricing_data::parse_cost_data_from_csv;
/// use rust_decimal::Decimal;
///
/// let cost = parse_cost_data_from_csv("Type,Name,Amount,Period,Rate,Hours\nDirect,Parts,10,,,\n").unwrap();
///
/// assert_eq!(cost.direct_costs.len(), 1);
/// assert_eq!(cost.direct_costs[0].name, "Parts");
/// assert_eq!(cost.direct_costs[0].amount, Decimal::from(10));
/// ```
pub fn parse_cost_data_from_csv(text: &str) -> Result<CostStructure, CsvImportError> {
    import_cost_data(text).map(|import| import.cost_structure)
}

/// Like [`parse_cost_data_from_csv`] but also reports dropped rows.
pub fn import_cost_data(text: &str) -> Result<CostImport, CsvImportError> {
    let table = decode_csv(text)?;
    let (cost_structure, settings) = read_table(&table);
    Ok(CostImport {
        cost_structure,
        skipped_rows: table.skipped_rows(),
        settings,
    })
}

fn amount(
    record: &CsvRecord<'_>,
    column: &str,
) -> Decimal {
    record.decimal(column).unwrap_or(Decimal::ZERO)
}

fn period(record: &CsvRecord<'_>) -> CostPeriod {
    let raw = record.text("Period");
    if raw.is_empty() {
        return CostPeriod::default();
    }
    CostPeriod::parse(&raw).unwrap_or_else(|| {
        warn!(period = %raw, "unknown cost period; treating as monthly");
        CostPeriod::default()
    })
}

fn read_setting(
    settings: &mut FileSettings,
    record: &CsvRecord<'_>,
) {
    let name = record.text("Name");
    let Some(value) = record.decimal("Amount") else {
        debug!(setting = %name, "ignoring non-numeric setting");
        return;
    };
    if name.eq_ignore_ascii_case(SETTING_TARGET_MARGIN) {
        settings.target_margin = Some(value);
    } else if name.eq_ignore_ascii_case(SETTING_EXPECTED_VOLUME) {
        settings.expected_volume = Some(value);
    } else {
        debug!(setting = %name, "ignoring unknown setting");
    }
}

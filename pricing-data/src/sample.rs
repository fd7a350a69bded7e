//! Demonstration data for a small bakery selling loaves of bread.

use pricing_core::{CostPeriod, CostStructure, DirectCost, IndirectCost, TimeCost};
use rust_decimal::Decimal;

use crate::codec::CsvCodecError;
use crate::cost_csv::encode_cost_structure;

fn d(
    num: i64,
    scale: u32,
) -> Decimal {
    Decimal::new(num, scale)
}

fn direct(
    name: &str,
    amount: Decimal,
) -> DirectCost {
    DirectCost {
        name: name.to_string(),
        amount,
    }
}

fn indirect(
    name: &str,
    amount: Decimal,
    period: CostPeriod,
) -> IndirectCost {
    IndirectCost {
        name: name.to_string(),
        amount,
        period,
    }
}

pub fn sample_cost_structure() -> CostStructure {
    CostStructure {
        direct_costs: vec![
            direct("Flour", d(120, 2)),
            direct("Yeast and salt", d(30, 2)),
            direct("Paper bag", d(15, 2)),
        ],
        indirect_costs: vec![
            indirect("Kitchen rent", d(900, 0), CostPeriod::Month),
            indirect("Oven maintenance", d(1200, 0), CostPeriod::Year),
            indirect("Market stall", d(25, 0), CostPeriod::Week),
        ],
        time_costs: vec![TimeCost {
            name: "Baking".to_string(),
            rate: d(18, 0),
            hours: d(40, 0),
        }],
        target_margin: d(35, 2),
        expected_volume: d(600, 0),
    }
}

/// Sample cost data as CSV text, followed by one short row that a lenient
/// import drops.
pub fn sample_csv() -> Result<String, CsvCodecError> {
    let mut text = encode_cost_structure(&sample_cost_structure())?;
    text.push_str("Direct,Sesame seeds\n");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::cost_csv::import_cost_data;

    #[test]
    fn sample_has_every_kind_of_cost() {
        let cost = sample_cost_structure();

        assert_eq!(cost.total_direct_cost(), dec!(1.65));
        // 900 + 1200/12 + 25*52/12 + 18*40
        assert_eq!(cost.total_fixed_cost().round_dp(2), dec!(1828.33));
    }

    #[test]
    fn sample_csv_imports_with_one_skipped_row() {
        let import = import_cost_data(&sample_csv().unwrap()).unwrap();

        assert_eq!(import.cost_structure, sample_cost_structure());
        assert_eq!(import.skipped_rows, 1);
    }
}

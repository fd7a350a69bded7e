use std::path::PathBuf;

use pretty_assertions::assert_eq;
use pricing_core::{CostPeriod, CostStructure, DirectCost};
use pricing_data::{
    CsvImportError, encode_cost_structure, parse_cost_data_from_csv, read_cost_data_from_file,
};
use rust_decimal_macros::dec;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[tokio::test]
async fn reads_fixture_file() {
    let import = read_cost_data_from_file(fixture_path("bakery.csv"))
        .await
        .expect("fixture should import");
    let cost = import.cost_structure;

    assert_eq!(import.skipped_rows, 1);
    assert_eq!(cost.direct_costs.len(), 2);
    assert_eq!(cost.total_direct_cost(), dec!(1.35));
    assert_eq!(cost.indirect_costs[1].period, CostPeriod::Year);
    assert_eq!(cost.monthly_indirect_cost(), dec!(1000));
    assert_eq!(cost.total_time_cost(), dec!(720));
    assert_eq!(cost.target_margin, dec!(0.35));
    assert_eq!(cost.expected_volume, dec!(600));
}

#[tokio::test]
async fn missing_file_is_a_read_error() {
    let err = read_cost_data_from_file(fixture_path("does-not-exist.csv"))
        .await
        .unwrap_err();

    assert!(matches!(err, CsvImportError::Read(_)));
    assert!(err.to_string().starts_with("Error reading file: "));
}

#[tokio::test]
async fn fixture_survives_encode_and_decode() {
    let original = read_cost_data_from_file(fixture_path("bakery.csv"))
        .await
        .unwrap()
        .cost_structure;

    let decoded = parse_cost_data_from_csv(&encode_cost_structure(&original).unwrap()).unwrap();

    assert_eq!(decoded, original);
}

#[test]
fn round_trip_keeps_numbers_exact() {
    let cost = CostStructure {
        direct_costs: vec![DirectCost {
            name: "Widget, A".to_string(),
            amount: dec!(0.1234567890123),
        }],
        target_margin: dec!(0.333333),
        expected_volume: dec!(12345.678),
        ..CostStructure::default()
    };

    let decoded = parse_cost_data_from_csv(&encode_cost_structure(&cost).unwrap()).unwrap();

    assert_eq!(decoded.direct_costs[0].name, "Widget A");
    assert_eq!(decoded.direct_costs[0].amount, dec!(0.1234567890123));
    assert_eq!(decoded.target_margin, dec!(0.333333));
    assert_eq!(decoded.expected_volume, dec!(12345.678));
}

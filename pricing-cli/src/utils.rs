use pricing_core::calculations::metric;
use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Parses a command-line amount into a [`Decimal`].
///
/// Commas are taken as thousands separators (`"1,234.56"`). Empty input is 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = s.trim().replace(',', "");
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| ParseDecimalError {
        input: s.to_string(),
        source: e,
    })
}

fn is_fraction(name: &str) -> bool {
    matches!(name, metric::MARGIN | metric::MARKUP | metric::ROI)
}

/// Formats a metric for display: fractions as percentages, unbounded values
/// as `∞`, everything else to two places.
pub fn format_metric(
    name: &str,
    value: f64,
) -> String {
    if value.is_nan() {
        return "n/a".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }
    match name {
        n if is_fraction(n) => format!("{:.1}%", value * 100.0),
        metric::BREAK_EVEN_VOLUME => format!("{} units", value.ceil()),
        metric::PAYBACK_PERIOD => format!("{value:.2} years"),
        _ => format!("{value:.2}"),
    }
}

/// Formats a fraction as a percentage with one decimal place.
pub fn format_pct(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// Converts `snake_case` metric names to sentence case for reports.
pub fn metric_label(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // -----------------------------------------------------------------------
    // parse_decimal
    // -----------------------------------------------------------------------

    #[test]
    fn parse_decimal_accepts_thousands_separators() {
        assert_eq!(parse_decimal("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal("  42 ").unwrap(), dec!(42));
        assert_eq!(parse_decimal("").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_decimal_rejects_garbage() {
        let err = parse_decimal("ten").unwrap_err();

        assert!(err.to_string().starts_with("invalid decimal 'ten'"));
    }

    // -----------------------------------------------------------------------
    // formatting
    // -----------------------------------------------------------------------

    #[test]
    fn fractions_render_as_percentages() {
        assert_eq!(format_metric(metric::MARGIN, 0.5), "50.0%");
        assert_eq!(format_metric(metric::ROI, 1.25), "125.0%");
    }

    #[test]
    fn unbounded_values_render_as_infinity() {
        assert_eq!(format_metric(metric::BREAK_EVEN_VOLUME, f64::INFINITY), "∞");
        assert_eq!(format_metric(metric::PAYBACK_PERIOD, f64::INFINITY), "∞");
        assert_eq!(format_metric(metric::PRICE, f64::NAN), "n/a");
    }

    #[test]
    fn volumes_round_up_to_whole_units() {
        assert_eq!(format_metric(metric::BREAK_EVEN_VOLUME, 111.2), "112 units");
        assert_eq!(format_metric(metric::PRICE, 18.0), "18.00");
    }

    #[test]
    fn labels_are_sentence_case() {
        assert_eq!(metric_label("break_even_volume"), "Break even volume");
        assert_eq!(metric_label(""), "");
    }
}

//! Plain-text documents and a directory-backed download sink.

use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Local;
use pricing_core::calculations::{PricingReport, metric};
use pricing_core::export::{DocumentRenderer, ExportError, ExportKind, FileDownload};
use serde_json::{Map, Value, json};
use tracing::info;

use crate::utils::{format_metric, metric_label};

pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Writes downloads into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectoryDownload {
    dir: PathBuf,
}

impl DirectoryDownload {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(
        &self,
        file_name: &str,
    ) -> PathBuf {
        self.dir.join(file_name)
    }
}

impl FileDownload for DirectoryDownload {
    fn download(
        &self,
        content: &str,
        file_name: &str,
        content_type: &str,
    ) -> Result<(), ExportError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(file_name);
        fs::write(&path, content)?;
        info!(path = %path.display(), content_type, bytes = content.len(), "file written");
        Ok(())
    }
}

/// Builds the renderer payload for a named analysis.
///
/// Unbounded metrics are carried as `null`.
pub fn report_payload(
    title: &str,
    report: &PricingReport,
) -> Value {
    let metrics: Map<String, Value> = report
        .entries()
        .into_iter()
        .map(|(name, value)| (name.to_string(), Value::from(value)))
        .collect();
    json!({
        "title": title,
        "generated_at": Local::now().format("%Y-%m-%d %H:%M").to_string(),
        "metrics": metrics,
    })
}

fn metrics_for(kind: ExportKind) -> &'static [&'static str] {
    match kind {
        ExportKind::PricingStrategy => &[
            metric::UNIT_COST,
            metric::RECOMMENDED_PRICE,
            metric::PRICE,
            metric::MARGIN,
            metric::MARKUP,
            metric::BREAK_EVEN_VOLUME,
            metric::BREAK_EVEN_PRICE,
            metric::OPTIMAL_PRICE,
        ],
        ExportKind::ValueAssessment => &[
            metric::PRICE,
            metric::UNIT_COST,
            metric::MARGIN,
            metric::ELASTICITY,
            metric::OPTIMAL_PRICE,
            metric::REVENUE,
            metric::MONTHLY_PROFIT,
        ],
        ExportKind::Dashboard => &[
            metric::UNIT_VARIABLE_COST,
            metric::TOTAL_FIXED_COST,
            metric::UNIT_COST,
            metric::RECOMMENDED_PRICE,
            metric::BREAK_EVEN_VOLUME,
            metric::BREAK_EVEN_PRICE,
            metric::PRICE,
            metric::MARGIN,
            metric::MARKUP,
            metric::REVENUE,
            metric::MONTHLY_PROFIT,
            metric::TOTAL_COST,
            metric::ROI,
            metric::PAYBACK_PERIOD,
            metric::ELASTICITY,
            metric::OPTIMAL_PRICE,
        ],
    }
}

fn metric_text(
    name: &str,
    value: Option<&Value>,
) -> String {
    match value {
        Some(Value::Null) => format_metric(name, f64::INFINITY),
        Some(v) => v
            .as_f64()
            .map(|n| format_metric(name, n))
            .unwrap_or_else(|| v.to_string()),
        None => "n/a".to_string(),
    }
}

/// Lays out `payload` as a plain-text document of the given kind.
pub fn render_text(
    kind: ExportKind,
    payload: &Value,
) -> Result<String, ExportError> {
    let metrics = payload
        .get("metrics")
        .and_then(Value::as_object)
        .ok_or_else(|| ExportError::Render("payload has no metrics".to_string()))?;

    let heading = kind.title();
    let mut doc = format!("{heading}\n{}\n", "=".repeat(heading.chars().count()));
    if let Some(title) = payload.get("title").and_then(Value::as_str) {
        doc.push_str(&format!("Product:   {title}\n"));
    }
    if let Some(at) = payload.get("generated_at").and_then(Value::as_str) {
        doc.push_str(&format!("Generated: {at}\n"));
    }
    doc.push('\n');

    for name in metrics_for(kind) {
        let value = metric_text(name, metrics.get(*name));
        doc.push_str(&format!("{:<22}{value:>16}\n", metric_label(name)));
    }
    Ok(doc)
}

/// Renders documents as plain text and hands them to a [`FileDownload`].
pub struct TextReportRenderer<D> {
    download: D,
}

impl<D> TextReportRenderer<D> {
    pub fn new(download: D) -> Self {
        Self { download }
    }
}

#[async_trait]
impl<D> DocumentRenderer for TextReportRenderer<D>
where
    D: FileDownload + Send + Sync,
{
    async fn render(
        &self,
        kind: ExportKind,
        payload: &Value,
    ) -> Result<String, ExportError> {
        let text = render_text(kind, payload)?;
        let file_name = kind.file_name("txt");
        self.download.download(&text, &file_name, TEXT_CONTENT_TYPE)?;
        Ok(format!("{} exported as {file_name}", kind.title()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;
    use pricing_core::export::dispatch_export;
    use pricing_core::{CostStructure, DirectCost, PricingStrategy};
    use rust_decimal_macros::dec;

    use super::*;

    #[derive(Default)]
    struct RecordingDownload {
        files: Mutex<Vec<(String, String, String)>>,
    }

    impl FileDownload for RecordingDownload {
        fn download(
            &self,
            content: &str,
            file_name: &str,
            content_type: &str,
        ) -> Result<(), ExportError> {
            self.files.lock().unwrap().push((
                file_name.to_string(),
                content_type.to_string(),
                content.to_string(),
            ));
            Ok(())
        }
    }

    fn report(price: rust_decimal::Decimal) -> PricingReport {
        let cost = CostStructure {
            direct_costs: vec![DirectCost {
                name: "Parts".to_string(),
                amount: dec!(10),
            }],
            target_margin: dec!(0.5),
            expected_volume: dec!(100),
            ..CostStructure::default()
        };
        PricingReport::analyze(&cost, &PricingStrategy::with_price(price))
    }

    #[test]
    fn payload_carries_every_metric() {
        let payload = report_payload("Widget", &report(dec!(25)));

        assert_eq!(payload["title"], "Widget");
        assert_eq!(payload["metrics"].as_object().unwrap().len(), 16);
        assert_eq!(payload["metrics"][metric::PRICE], 25.0);
    }

    #[test]
    fn unbounded_metrics_render_as_infinity() {
        // Selling at variable cost never breaks even.
        let payload = report_payload("Widget", &report(dec!(10)));

        assert!(payload["metrics"][metric::BREAK_EVEN_VOLUME].is_null());

        let text = render_text(ExportKind::PricingStrategy, &payload).unwrap();
        let line = text
            .lines()
            .find(|l| l.starts_with("Break even volume"))
            .unwrap();
        assert!(line.ends_with('∞'));
    }

    #[test]
    fn document_lists_kind_specific_metrics() {
        let text = render_text(ExportKind::ValueAssessment, &report_payload("Widget", &report(dec!(25)))).unwrap();

        assert!(text.starts_with("Value Assessment\n================\n"));
        assert!(text.contains("Product:   Widget\n"));
        assert!(text.contains("Elasticity"));
        assert!(!text.contains("Break even price"));
    }

    #[test]
    fn payload_without_metrics_is_a_render_error() {
        let err = render_text(ExportKind::Dashboard, &json!({"title": "x"})).unwrap_err();

        assert!(matches!(err, ExportError::Render(_)));
    }

    #[test]
    fn directory_download_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectoryDownload::new(dir.path().join("out"));

        sink.download("hello", "note.txt", TEXT_CONTENT_TYPE).unwrap();

        assert_eq!(fs::read_to_string(sink.path_for("note.txt")).unwrap(), "hello");
    }

    #[tokio::test]
    async fn dispatch_renders_and_downloads() {
        let renderer = TextReportRenderer::new(RecordingDownload::default());
        let payload = report_payload("Widget", &report(dec!(25)));

        let message = dispatch_export(&renderer, "dashboard", &payload).await.unwrap();

        assert_eq!(message, "Pricing Dashboard exported as dashboard.txt");
        let files = renderer.download.files.lock().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].0, "dashboard.txt");
        assert_eq!(files[0].1, TEXT_CONTENT_TYPE);
        assert!(files[0].2.contains("Monthly profit"));
    }
}

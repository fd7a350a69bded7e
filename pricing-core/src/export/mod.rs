//! Hand-off points to document renderers and file downloads.
//!
//! The core never renders documents itself. It picks an [`ExportKind`] from
//! a tag, passes a plain JSON payload to a [`DocumentRenderer`], and hands
//! finished text to a [`FileDownload`].

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unknown export type: {0}")]
    UnknownExportType(String),

    #[error("Render failed: {0}")]
    Render(String),

    #[error("Export I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Kinds of document a renderer knows how to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    PricingStrategy,
    ValueAssessment,
    Dashboard,
}

impl ExportKind {
    pub const ALL: [ExportKind; 3] = [Self::PricingStrategy, Self::ValueAssessment, Self::Dashboard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PricingStrategy => "pricing-strategy",
            Self::ValueAssessment => "value-assessment",
            Self::Dashboard => "dashboard",
        }
    }

    /// Human-readable title used in document headers.
    pub fn title(&self) -> &'static str {
        match self {
            Self::PricingStrategy => "Pricing Strategy",
            Self::ValueAssessment => "Value Assessment",
            Self::Dashboard => "Pricing Dashboard",
        }
    }

    /// Suggested file name for a rendered document with `extension`.
    pub fn file_name(
        &self,
        extension: &str,
    ) -> String {
        format!("{}.{extension}", self.as_str())
    }
}

impl fmt::Display for ExportKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportKind {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ExportError::UnknownExportType(s.to_string()))
    }
}

/// Produces a document from a payload and reports a success message.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(
        &self,
        kind: ExportKind,
        payload: &Value,
    ) -> Result<String, ExportError>;
}

/// Delivers finished content to the user (a save dialog, a file on disk).
pub trait FileDownload {
    fn download(
        &self,
        content: &str,
        file_name: &str,
        content_type: &str,
    ) -> Result<(), ExportError>;
}

/// Resolves `tag` and renders `payload` with `renderer`.
///
/// # Errors
///
/// [`ExportError::UnknownExportType`] when `tag` names no known kind; the
/// renderer is not called in that case.
pub async fn dispatch_export(
    renderer: &dyn DocumentRenderer,
    tag: &str,
    payload: &Value,
) -> Result<String, ExportError> {
    let kind: ExportKind = tag.parse()?;
    let message = renderer.render(kind, payload).await?;
    info!(%kind, "document exported");
    Ok(message)
}

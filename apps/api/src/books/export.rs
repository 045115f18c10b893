//! Plan → PDF export: layout with the builtin metrics, render with `PdfBackend`.
//!
//! CPU-bound; the handler runs it inside `tokio::task::spawn_blocking`.

use tracing::debug;

use crate::errors::AppError;
use crate::layout::{BuiltinMetrics, LayoutConfig, LayoutEngine, StyleRules};
use crate::render::{render_pages, PdfBackend};

pub const PDF_FILENAME_SUFFIX: &str = "Action Plan";

/// Lays out `content` and renders it as a PDF titled `title`.
pub fn render_plan_pdf(
    content: &str,
    title: &str,
    rules: &StyleRules,
    config: LayoutConfig,
) -> Result<Vec<u8>, AppError> {
    let engine = LayoutEngine::new(&BuiltinMetrics, rules, config);
    let pages = engine.layout(content, title)?;

    debug!(
        pages = pages.len(),
        commands = pages.iter().map(|p| p.commands.len()).sum::<usize>(),
        "Plan laid out"
    );

    Ok(render_pages(&pages, rules, PdfBackend::new(title))?)
}

/// `Content-Disposition` value for a downloaded plan. The title is percent-encoded.
pub fn content_disposition(title: &str) -> String {
    format!(
        "attachment; filename=\"{} - {PDF_FILENAME_SUFFIX}.pdf\"",
        urlencoding::encode(title)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_encodes_title() {
        assert_eq!(
            content_disposition("Deep Work"),
            "attachment; filename=\"Deep%20Work - Action Plan.pdf\""
        );
    }

    #[test]
    fn test_content_disposition_encodes_non_ascii_and_quotes() {
        let value = content_disposition("\"Атомные\" привычки");
        assert!(value.is_ascii());
        assert!(value.starts_with("attachment; filename=\"%22"));
        assert!(value.ends_with(" - Action Plan.pdf\""));
    }

    #[test]
    fn test_render_plan_pdf_produces_pdf() {
        let bytes = render_plan_pdf(
            "Deep Work - Cal Newport\n\nMAIN IDEAS:\n1. Focus is rare.",
            "Deep Work",
            &StyleRules::default(),
            LayoutConfig::default(),
        )
        .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_plan_pdf_rejects_blank_content() {
        let err = render_plan_pdf(
            "   ",
            "Deep Work",
            &StyleRules::default(),
            LayoutConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}

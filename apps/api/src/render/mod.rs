//! Rendering backends for laid-out pages.
//!
//! The layout engine produces backend-agnostic `Page`s. A `RenderBackend`
//! turns them into bytes; `render_pages` drives any backend in emission order.

use thiserror::Error;

use crate::layout::{DrawCommand, LineKind, Page, PageSize, StyleRules, TextStyle};

pub mod pdf;

pub use pdf::PdfBackend;

#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error("document has no pages")]
    NoPages,

    #[error("draw command received before any page was started")]
    NoActivePage,

    #[error("no text style for line kind {0:?}")]
    MissingStyle(LineKind),
}

/// A paginated canvas that accepts positioned text.
pub trait RenderBackend {
    /// Starts a new page; subsequent draws land on it.
    fn start_page(&mut self, size: PageSize);

    fn draw_text(&mut self, command: &DrawCommand, style: &TextStyle) -> Result<(), RenderError>;

    /// Finalizes the document into its byte representation.
    fn finish(self) -> Result<Vec<u8>, RenderError>;
}

/// Feeds every page and draw command to `backend`, then finalizes it.
pub fn render_pages<B: RenderBackend>(
    pages: &[Page],
    rules: &StyleRules,
    mut backend: B,
) -> Result<Vec<u8>, RenderError> {
    if pages.is_empty() {
        return Err(RenderError::NoPages);
    }

    for page in pages {
        backend.start_page(page.size);
        for command in &page.commands {
            let style = rules
                .style_for(command.kind)
                .ok_or(RenderError::MissingStyle(command.kind))?;
            backend.draw_text(command, style)?;
        }
    }

    backend.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{BuiltinMetrics, LayoutConfig, LayoutEngine};

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl RenderBackend for Recorder {
        fn start_page(&mut self, size: PageSize) {
            self.events
                .push(format!("page {}x{}", size.width_pt, size.height_pt));
        }

        fn draw_text(
            &mut self,
            command: &DrawCommand,
            style: &TextStyle,
        ) -> Result<(), RenderError> {
            self.events
                .push(format!("text {} {} {}", command.text, command.y, style.size_pt));
            Ok(())
        }

        fn finish(self) -> Result<Vec<u8>, RenderError> {
            Ok(self.events.join("\n").into_bytes())
        }
    }

    #[test]
    fn test_render_pages_drives_backend_in_order() {
        let rules = StyleRules::default();
        let engine = LayoutEngine::new(&BuiltinMetrics, &rules, LayoutConfig::default());
        let pages = engine.layout("Plan\nFirst step", "Plan").unwrap();

        let bytes = render_pages(&pages, &rules, Recorder::default()).unwrap();
        let log = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = log.lines().collect();

        assert_eq!(lines[0], "page 595x842");
        assert_eq!(lines[1], "text Plan 792 18");
        assert!(lines[2].starts_with("text First step "));
        assert!(lines[2].ends_with(" 10"));
    }

    #[test]
    fn test_render_pages_rejects_empty_document() {
        let rules = StyleRules::default();
        assert_eq!(
            render_pages(&[], &rules, Recorder::default()),
            Err(RenderError::NoPages)
        );
    }

    #[test]
    fn test_render_pages_rejects_unstyled_command() {
        let rules = StyleRules::default();
        let page = Page {
            index: 0,
            size: PageSize::A4,
            commands: vec![DrawCommand {
                text: "----".to_string(),
                x: 50.0,
                y: 792.0,
                size_pt: 10.0,
                kind: LineKind::Rule,
                page_index: 0,
            }],
        };
        assert_eq!(
            render_pages(&[page], &rules, Recorder::default()),
            Err(RenderError::MissingStyle(LineKind::Rule))
        );
    }
}

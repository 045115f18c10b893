//! PDF backend using `printpdf` (v0.8 ops-based API) and the builtin Helvetica family.
//!
//! Builtin fonts use WinAnsiEncoding and cannot show Cyrillic or other
//! non-Latin scripts. Text is therefore folded to printable ASCII before it is
//! written: common typographic punctuation gets an ASCII stand-in and anything
//! else becomes `?`, matching the fallback width in `layout::font_metrics`.

use printpdf::{
    BuiltinFont, Color, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Point, Pt, TextItem,
};
use tracing::debug;

use crate::layout::{DrawCommand, FontSlant, FontWeight, PageSize, TextStyle};
use crate::render::{RenderBackend, RenderError};

const PT_TO_MM: f32 = 0.352778;
/// Distance from the top of the line box to the baseline, as a fraction of the font size.
const ASCENT_RATIO: f32 = 0.75;

struct PendingPage {
    size: PageSize,
    ops: Vec<Op>,
}

pub struct PdfBackend {
    doc: PdfDocument,
    pages: Vec<PdfPage>,
    current: Option<PendingPage>,
}

impl PdfBackend {
    /// Creates an empty document. `title` goes into the PDF metadata.
    pub fn new(title: &str) -> Self {
        Self {
            doc: PdfDocument::new(title),
            pages: Vec::new(),
            current: None,
        }
    }

    /// Flushes the pending page and hands the pages to the document.
    fn into_document(mut self) -> Result<PdfDocument, RenderError> {
        self.flush_page();
        if self.pages.is_empty() {
            return Err(RenderError::NoPages);
        }
        self.doc.with_pages(self.pages);
        Ok(self.doc)
    }

    fn flush_page(&mut self) {
        if let Some(page) = self.current.take() {
            self.pages.push(PdfPage::new(
                Mm(page.size.width_pt * PT_TO_MM),
                Mm(page.size.height_pt * PT_TO_MM),
                page.ops,
            ));
        }
    }
}

impl RenderBackend for PdfBackend {
    fn start_page(&mut self, size: PageSize) {
        self.flush_page();
        self.current = Some(PendingPage {
            size,
            ops: Vec::new(),
        });
    }

    fn draw_text(&mut self, command: &DrawCommand, style: &TextStyle) -> Result<(), RenderError> {
        let page = self.current.as_mut().ok_or(RenderError::NoActivePage)?;
        let font = builtin_font(style);

        page.ops.push(Op::StartTextSection);
        page.ops.push(Op::SetTextCursor {
            pos: Point {
                x: Pt(command.x),
                y: Pt(command.y - command.size_pt * ASCENT_RATIO),
            },
        });
        page.ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(command.size_pt),
            font,
        });
        page.ops.push(Op::SetFillColor {
            col: Color::Rgb(printpdf::Rgb {
                r: style.color.r,
                g: style.color.g,
                b: style.color.b,
                icc_profile: None,
            }),
        });
        page.ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(to_builtin_charset(&command.text))],
            font,
        });
        page.ops.push(Op::EndTextSection);
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, RenderError> {
        let doc = self.into_document()?;
        let page_count = doc.pages.len();
        let mut warnings = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);

        debug!(
            pages = page_count,
            bytes = bytes.len(),
            warnings = warnings.len(),
            "PDF document finalized"
        );
        Ok(bytes)
    }
}

fn builtin_font(style: &TextStyle) -> BuiltinFont {
    match (style.weight, style.slant) {
        (FontWeight::Bold, FontSlant::Italic) => BuiltinFont::HelveticaBoldOblique,
        (FontWeight::Bold, FontSlant::Normal) => BuiltinFont::HelveticaBold,
        (FontWeight::Regular, FontSlant::Italic) => BuiltinFont::HelveticaOblique,
        (FontWeight::Regular, FontSlant::Normal) => BuiltinFont::Helvetica,
    }
}

/// Folds text to the printable-ASCII subset every builtin font can show.
fn to_builtin_charset(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' => '\'',
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{00AB}' | '\u{00BB}' => '"',
            '\u{2013}' | '\u{2014}' | '\u{2022}' => '-',
            '\u{00A0}' | '\t' => ' ',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '?',
        })
        .collect()
}

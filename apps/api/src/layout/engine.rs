//! Document layout engine. Turns plan text into pages of positioned draw commands.
//!
//! # Coordinates
//! PDF user space: origin at the bottom-left, `y` grows upwards. A draw
//! command's `y` is the top of its line box; a line occupies
//! `[y - size_pt, y]` and the cursor then drops by `size_pt + line_gap_pt`.
//!
//! # Pass structure
//! 1. Each source line is trimmed and classified (`StyleRules::classify`).
//! 2. Blank lines move the cursor, rules are dropped.
//! 3. Drawable lines are greedily word-wrapped against the text width using the
//!    injected `TextMeasure`, then placed one fragment at a time. A fragment that
//!    would cross the bottom margin starts a new page first.
//!
//! Words wider than the text width are never split; they are emitted on a line
//! of their own and overflow the right margin.
//!
//! The engine holds no mutable state. Every call builds its own `LayoutState`,
//! so one engine can serve concurrent requests.

use serde::Serialize;
use thiserror::Error;

use crate::layout::font_metrics::TextMeasure;
use crate::layout::style::{LineKind, StyleRules, TextStyle};

// ────────────────────────────────────────────────────────────────────────────
// Configuration
// ────────────────────────────────────────────────────────────────────────────

/// Page dimensions in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSize {
    pub width_pt: f32,
    pub height_pt: f32,
}

impl PageSize {
    /// ISO A4, rounded to whole points.
    pub const A4: PageSize = PageSize {
        width_pt: 595.0,
        height_pt: 842.0,
    };
}

/// Geometry shared by every page of a layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutConfig {
    pub page: PageSize,
    /// Applied on all four sides.
    pub margin_pt: f32,
    /// Gap between consecutive lines, added to the font size.
    pub line_gap_pt: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            page: PageSize::A4,
            margin_pt: 50.0,
            line_gap_pt: 4.0,
        }
    }
}

impl LayoutConfig {
    /// Usable line width between the left and right margins.
    pub fn text_width(&self) -> f32 {
        self.page.width_pt - 2.0 * self.margin_pt
    }

    /// Cursor position at the top of a fresh page.
    pub fn top(&self) -> f32 {
        self.page.height_pt - self.margin_pt
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// A fully positioned text fragment, ready for a rendering backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawCommand {
    pub text: String,
    pub x: f32,
    /// Top of the line box.
    pub y: f32,
    pub size_pt: f32,
    /// Style reference; resolve with `StyleRules::style_for`.
    pub kind: LineKind,
    pub page_index: usize,
}

/// One laid-out page. Commands are in emission order, top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub index: usize,
    pub size: PageSize,
    pub commands: Vec<DrawCommand>,
}

impl Page {
    fn new(index: usize, size: PageSize) -> Self {
        Page {
            index,
            size,
            commands: Vec::new(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("{0} must not be empty")]
    EmptyInput(&'static str),
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

pub struct LayoutEngine<'a, M: TextMeasure> {
    measure: &'a M,
    rules: &'a StyleRules,
    config: LayoutConfig,
}

impl<'a, M: TextMeasure> LayoutEngine<'a, M> {
    pub fn new(measure: &'a M, rules: &'a StyleRules, config: LayoutConfig) -> Self {
        Self {
            measure,
            rules,
            config,
        }
    }

    /// Lays out `content` for a document titled `title`.
    ///
    /// Both must contain at least one non-whitespace character. The title is
    /// document metadata; the first line of `content` is what renders as the
    /// heading.
    pub fn layout(&self, content: &str, title: &str) -> Result<Vec<Page>, LayoutError> {
        if title.trim().is_empty() {
            return Err(LayoutError::EmptyInput("title"));
        }
        if content.trim().is_empty() {
            return Err(LayoutError::EmptyInput("content"));
        }
        Ok(self.layout_lines(content))
    }

    /// Unchecked layout pass. Always returns at least one page.
    pub fn layout_lines(&self, content: &str) -> Vec<Page> {
        let mut state = LayoutState::new(self.config);

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            let kind = self.rules.classify(index, line);
            match self.rules.style_for(kind) {
                Some(style) => self.place_block(&mut state, kind, style, line),
                None if kind == LineKind::Blank => state.advance(self.rules.blank_spacing_pt),
                None => {}
            }
        }

        state.finish()
    }

    fn place_block(&self, state: &mut LayoutState, kind: LineKind, style: &TextStyle, line: &str) {
        if !state.at_page_top() {
            state.advance(style.pre_spacing_pt);
        }
        for fragment in self.wrap(line, style) {
            state.place_line(fragment, kind, style.size_pt);
        }
        state.advance(style.post_spacing_pt);
    }

    /// Greedy word wrap against the text width.
    ///
    /// Words are separated by single spaces in the output; runs of whitespace
    /// in the input collapse. An empty or all-whitespace input yields no lines.
    pub fn wrap(&self, text: &str, style: &TextStyle) -> Vec<String> {
        let max_width = self.config.text_width();
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if self.measure.measure_width(&candidate, style) > max_width {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            } else {
                current = candidate;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Per-pass state
// ────────────────────────────────────────────────────────────────────────────

/// Cursor and page bookkeeping for a single layout pass.
struct LayoutState {
    config: LayoutConfig,
    finished: Vec<Page>,
    current: Page,
    y: f32,
}

impl LayoutState {
    fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            finished: Vec::new(),
            current: Page::new(0, config.page),
            y: config.top(),
        }
    }

    fn at_page_top(&self) -> bool {
        self.current.commands.is_empty()
    }

    fn advance(&mut self, points: f32) {
        self.y -= points;
    }

    fn place_line(&mut self, text: String, kind: LineKind, size_pt: f32) {
        if self.y < self.config.margin_pt + size_pt {
            if self.at_page_top() {
                // Only blank-line spacing got us here; nothing to carry over.
                self.y = self.config.top();
            } else {
                self.new_page();
            }
        }

        self.current.commands.push(DrawCommand {
            text,
            x: self.config.margin_pt,
            y: self.y,
            size_pt,
            kind,
            page_index: self.current.index,
        });
        self.y -= size_pt + self.config.line_gap_pt;
    }

    fn new_page(&mut self) {
        let next = Page::new(self.current.index + 1, self.config.page);
        self.finished.push(std::mem::replace(&mut self.current, next));
        self.y = self.config.top();
    }

    fn finish(mut self) -> Vec<Page> {
        self.finished.push(self.current);
        self.finished
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

//! Line classification and text styles for plan documents.
//!
//! Classification is a two-step process: `StyleRules::classify` maps a trimmed
//! line to one of a closed set of `LineKind`s (first match wins, in the order
//! listed on the enum), then `StyleRules::style_for` maps the kind to its
//! `TextStyle`. Keeping the two apart lets the classifier be tested without
//! any measurement or page state.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Style primitives
// ────────────────────────────────────────────────────────────────────────────

/// An sRGB color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Builds a color from a `0xRRGGBB` literal.
    pub fn from_hex(hex: u32) -> Rgb {
        Rgb {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontSlant {
    Normal,
    Italic,
}

/// Visual style of a block of text. Spacing values are in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub size_pt: f32,
    pub weight: FontWeight,
    pub slant: FontSlant,
    pub color: Rgb,
    /// Vertical space inserted before the block (skipped at the top of a page).
    pub pre_spacing_pt: f32,
    /// Vertical space inserted after the last line of the block.
    pub post_spacing_pt: f32,
}

// ────────────────────────────────────────────────────────────────────────────
// Line kinds
// ────────────────────────────────────────────────────────────────────────────

/// The closed set of line kinds, in classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// First line of the document.
    Title,
    /// Empty after trimming. Consumes half a body line, draws nothing.
    Blank,
    /// Decorative separator such as `━━━━━━`. Draws nothing, consumes nothing.
    Rule,
    /// Structural heading, e.g. `MAIN IDEAS:`.
    Section,
    /// Start of an action item, e.g. `Action 2:`.
    ActionHeader,
    /// Explanation attached to an action, e.g. `Why: ...`.
    Rationale,
    Body,
}

// ────────────────────────────────────────────────────────────────────────────
// Rule set
// ────────────────────────────────────────────────────────────────────────────

/// Markers and styles used to classify and style plan text.
///
/// Markers are matched case-sensitively, the way the plan generator emits them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleRules {
    /// A line containing any of these is a section heading.
    pub section_markers: Vec<String>,
    /// A line starting with one of these, followed by a number or a colon, is an action header.
    pub action_markers: Vec<String>,
    /// A line starting with any of these is a rationale.
    pub rationale_markers: Vec<String>,
    /// Characters that form decorative rules when repeated.
    pub rule_chars: Vec<char>,
    /// Minimum run length before a repeated rule character counts as a separator.
    pub min_rule_len: usize,
    /// Vertical space consumed by a blank line.
    pub blank_spacing_pt: f32,
    pub title: TextStyle,
    pub section: TextStyle,
    pub action_header: TextStyle,
    pub rationale: TextStyle,
    pub body: TextStyle,
}

impl Default for StyleRules {
    fn default() -> Self {
        StyleRules {
            section_markers: vec![
                "MAIN IDEAS".to_string(),
                "CONCRETE ACTIONS".to_string(),
                "ГЛАВНЫЕ ИДЕИ".to_string(),
                "КОНКРЕТНЫЕ ДЕЙСТВИЯ".to_string(),
            ],
            action_markers: vec!["Action".to_string(), "Действие".to_string()],
            rationale_markers: vec!["Why:".to_string(), "Зачем:".to_string()],
            rule_chars: vec!['━', '─', '—', '-', '=', '_', '*', '·'],
            min_rule_len: 3,
            // Half of a 10pt body line plus its 4pt gap.
            blank_spacing_pt: 7.0,
            title: TextStyle {
                size_pt: 18.0,
                weight: FontWeight::Bold,
                slant: FontSlant::Normal,
                color: Rgb::BLACK,
                pre_spacing_pt: 0.0,
                post_spacing_pt: 18.0,
            },
            section: TextStyle {
                size_pt: 14.0,
                weight: FontWeight::Bold,
                slant: FontSlant::Normal,
                color: Rgb::from_hex(0x8A5CF6),
                pre_spacing_pt: 7.0,
                post_spacing_pt: 7.0,
            },
            action_header: TextStyle {
                size_pt: 12.0,
                weight: FontWeight::Bold,
                slant: FontSlant::Normal,
                color: Rgb::BLACK,
                pre_spacing_pt: 6.0,
                post_spacing_pt: 4.0,
            },
            rationale: TextStyle {
                size_pt: 10.0,
                weight: FontWeight::Regular,
                slant: FontSlant::Italic,
                color: Rgb::from_hex(0x666666),
                pre_spacing_pt: 0.0,
                post_spacing_pt: 3.0,
            },
            body: TextStyle {
                size_pt: 10.0,
                weight: FontWeight::Regular,
                slant: FontSlant::Normal,
                color: Rgb::BLACK,
                pre_spacing_pt: 0.0,
                post_spacing_pt: 2.0,
            },
        }
    }
}

impl StyleRules {
    /// Classifies a line. `index` is the line's position in the source text;
    /// `line` must already be trimmed.
    pub fn classify(&self, index: usize, line: &str) -> LineKind {
        if line.is_empty() {
            LineKind::Blank
        } else if index == 0 {
            LineKind::Title
        } else if self.is_rule(line) {
            LineKind::Rule
        } else if self.section_markers.iter().any(|m| line.contains(m.as_str())) {
            LineKind::Section
        } else if self.action_markers.iter().any(|m| is_action_header(line, m)) {
            LineKind::ActionHeader
        } else if self
            .rationale_markers
            .iter()
            .any(|m| line.starts_with(m.as_str()))
        {
            LineKind::Rationale
        } else {
            LineKind::Body
        }
    }

    /// Returns the style for a drawable kind, `None` for `Blank` and `Rule`.
    pub fn style_for(&self, kind: LineKind) -> Option<&TextStyle> {
        match kind {
            LineKind::Title => Some(&self.title),
            LineKind::Section => Some(&self.section),
            LineKind::ActionHeader => Some(&self.action_header),
            LineKind::Rationale => Some(&self.rationale),
            LineKind::Body => Some(&self.body),
            LineKind::Blank | LineKind::Rule => None,
        }
    }

    /// A run of one repeated rule character. Inner whitespace is ignored.
    fn is_rule(&self, line: &str) -> bool {
        let mut chars = line.chars().filter(|c| !c.is_whitespace());
        let Some(first) = chars.next() else {
            return false;
        };
        if !self.rule_chars.contains(&first) {
            return false;
        }
        let mut count = 1;
        for c in chars {
            if c != first {
                return false;
            }
            count += 1;
        }
        count >= self.min_rule_len
    }
}

/// `Action 3:` and `Action:` match, `Actionable insight` does not.
fn is_action_header(line: &str, marker: &str) -> bool {
    let Some(rest) = line.strip_prefix(marker) else {
        return false;
    };
    if rest.starts_with(':') {
        return true;
    }
    let trimmed = rest.trim_start();
    trimmed.len() < rest.len() && trimmed.starts_with(|c: char| c.is_ascii_digit())
}

// Plan document layout: line classification, greedy word wrap, pagination.
// Pure and synchronous; callers on the async runtime wrap it in spawn_blocking.

pub mod engine;
pub mod font_metrics;
pub mod style;

// Re-export the public API consumed by the render module and handlers.
pub use engine::{DrawCommand, LayoutConfig, LayoutEngine, LayoutError, Page, PageSize};
pub use font_metrics::BuiltinMetrics;
pub use style::{FontSlant, FontWeight, LineKind, StyleRules, TextStyle};

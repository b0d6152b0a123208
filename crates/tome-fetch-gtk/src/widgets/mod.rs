//! Widgets module - reusable UI components

mod format_hints;

pub use format_hints::FormatHints;

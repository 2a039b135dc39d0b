//! FILENAME: core/binding/src/lib.rs
//! PURPOSE: Library root for Relato's binding resolution layer.
//! CONTEXT: Sits between the dataset engine and any rendering surface.
//! Takes a template's elements plus the executed dataset rows and resolves
//! what each element actually displays: placeholder text, table rows, chart
//! samples, stat card figures. Everything here is pure and total; a broken
//! binding degrades to empty output instead of failing the document.

pub mod context;
pub mod element;
pub mod format;
pub mod text;

pub use context::RenderContext;
pub use element::{resolve_binding_value, resolve_chart_series, resolve_table_rows, ChartPoint};
pub use format::{display_value, format_number, BindingLocale, EMPTY_MARKER};
pub use text::resolve_template_text;

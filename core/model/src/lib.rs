//! FILENAME: core/model/src/lib.rs
//! PURPOSE: Relato's document model: the serializable template definitions,
//! the shared scalar value type, and the designer layout geometry.
//! CONTEXT: Base crate of the workspace. Everything here is pure data plus
//! small pure helpers; execution engines live in the crates layered on top.

pub mod audit;
pub mod dataset;
pub mod element;
pub mod governance;
pub mod layout;
pub mod template;
pub mod value;

pub use audit::{AuditEvent, AuditLogEntry};
pub use dataset::{
    AggregateFn, AggregateSpec, CalculatedField, DatasetSpec, FilterOperator, FilterSource,
    FilterSpec, JoinSpec, SortDirection, SortKey,
};
pub use element::{
    paint_order, Band, ChartProps, ChartVariant, Element, ElementProps, HeaderProps, ImageFit,
    ImageProps, StatCardProps, SummaryFn, TableColumn, TableProps, TableRowFilter, TextAlign,
    TextProps, TextStyle,
};
pub use governance::{Approval, Governance};
pub use layout::{
    DragInteraction, DragKind, Rect, ResizeHandle, MIN_ELEMENT_HEIGHT, MIN_ELEMENT_WIDTH,
    POSITION_GRID, SIZE_GRID,
};
pub use template::{
    Margins, Orientation, PageSettings, PaperSize, ParameterKind, ParameterSpec, Template,
};
pub use value::{format_plain_number, lookup_path, parse_numeric_text, Record, Value};

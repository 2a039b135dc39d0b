//! FILENAME: core/model/src/element.rs
//! PURPOSE: Visual element definitions for report templates.
//! CONTEXT: An element is a positioned rectangle in a report band carrying
//! one type-specific props payload. The payload is adjacently tagged on the
//! wire ({"type": "statCard", "props": {...}}) and flattened into the element
//! record, so consumers match exhaustively on the variant instead of probing
//! optional fields.

use serde::{Deserialize, Serialize};

use crate::dataset::SortKey;
use crate::layout::{DragInteraction, DragKind, Rect};
use crate::value::Value;

// ============================================================================
// BANDS
// ============================================================================

/// Vertical report band an element is placed in. Bands render in this order;
/// `detail` repeats per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Band {
    ReportHeader,
    PageHeader,
    GroupHeader,
    #[default]
    Detail,
    GroupFooter,
    ReportFooter,
    PageFooter,
}

// ============================================================================
// ELEMENT
// ============================================================================

/// A single positioned element of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: String,
    #[serde(default)]
    pub band: Band,
    pub layout: Rect,
    /// Locked elements never start a drag interaction.
    #[serde(default)]
    pub locked: bool,
    /// Paint order only. Interaction eligibility ignores it.
    #[serde(default)]
    pub layer_index: i32,
    #[serde(flatten)]
    pub props: ElementProps,
}

impl Element {
    /// Starts a move/resize interaction on this element, or `None` when the
    /// element is locked.
    pub fn begin_drag(&self, kind: DragKind) -> Option<DragInteraction> {
        if self.locked {
            return None;
        }
        Some(DragInteraction::new(self.layout, kind))
    }

    /// Dataset id this element reads from, for the variants that bind data.
    pub fn data_source(&self) -> Option<&str> {
        match &self.props {
            ElementProps::Table(props) => Some(props.data_source.as_str()),
            ElementProps::Chart(props) => Some(props.data_source.as_str()),
            ElementProps::StatCard(props) => props.data_source.as_deref(),
            ElementProps::Header(_) | ElementProps::Text(_) | ElementProps::Image(_) => None,
        }
    }
}

/// Returns the elements in paint order: ascending `layerIndex`, declaration
/// order as the tie-break (stable sort).
pub fn paint_order(elements: &[Element]) -> Vec<&Element> {
    let mut ordered: Vec<&Element> = elements.iter().collect();
    ordered.sort_by_key(|element| element.layer_index);
    ordered
}

// ============================================================================
// TYPE-SPECIFIC PROPS
// ============================================================================

/// Per-type element payload, adjacently tagged on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "props", rename_all = "camelCase")]
pub enum ElementProps {
    Header(HeaderProps),
    Text(TextProps),
    Table(TableProps),
    Chart(ChartProps),
    StatCard(StatCardProps),
    Image(ImageProps),
}

/// Section heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderProps {
    pub title: String,
    #[serde(default)]
    pub style: TextStyle,
}

/// Free text body. `content` may contain `{{path}}` placeholders resolved
/// against the current record at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    pub content: String,
    #[serde(default)]
    pub style: TextStyle,
}

/// Tabular listing over one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableProps {
    pub data_source: String,
    #[serde(default)]
    pub columns: Vec<TableColumn>,
    #[serde(default)]
    pub row_limit: Option<usize>,
    /// Overrides the dataset's sort for this table only.
    #[serde(default)]
    pub sort: Option<SortKey>,
    /// Keeps only rows whose `field` equals the current record's
    /// `recordField`.
    #[serde(default)]
    pub row_filter: Option<TableRowFilter>,
    #[serde(default = "default_true")]
    pub show_header: bool,
}

/// One table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableColumn {
    pub field: String,
    pub label: String,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub align: Option<TextAlign>,
}

/// Equality restriction of table rows against the current record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRowFilter {
    pub field: String,
    pub record_field: String,
}

/// Chart over one dataset, one point per row (or per label-group when an
/// aggregation is declared).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartProps {
    pub variant: ChartVariant,
    pub data_source: String,
    pub label_field: String,
    pub value_field: String,
    #[serde(default)]
    pub aggregation: Option<SummaryFn>,
    #[serde(default = "default_true")]
    pub show_legend: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartVariant {
    #[default]
    Bar,
    Line,
    Pie,
    Donut,
}

/// Single headline figure. A declared data binding (dataSource + valueField
/// + aggregation) takes precedence over `staticValue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatCardProps {
    pub label: String,
    #[serde(default)]
    pub data_source: Option<String>,
    #[serde(default)]
    pub value_field: Option<String>,
    #[serde(default)]
    pub aggregation: Option<SummaryFn>,
    #[serde(default)]
    pub static_value: Option<Value>,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Summary function for element-level bindings (stat cards, chart groups).
/// Dataset-level aggregation has its own richer set in `dataset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SummaryFn {
    Count,
    Sum,
    Avg,
}

/// Static image reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProps {
    pub source: String,
    #[serde(default)]
    pub fit: ImageFit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageFit {
    #[default]
    Contain,
    Cover,
    Stretch,
}

// ============================================================================
// TEXT STYLING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default)]
    pub color: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            font_size: default_font_size(),
            bold: false,
            italic: false,
            align: TextAlign::default(),
            color: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

fn default_true() -> bool {
    true
}

fn default_font_size() -> f64 {
    10.0
}

//! FILENAME: core/model/src/template.rs
//! PURPOSE: The versioned report template document.
//! CONTEXT: A template bundles elements, dataset specs, parameters, page
//! settings and governance under a target module. Versioning fields (version,
//! isActive, timestamps) are owned by the template store; code constructing a
//! draft leaves them at their defaults.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dataset::DatasetSpec;
use crate::element::Element;
use crate::governance::Governance;
use crate::value::Value;

// ============================================================================
// TEMPLATE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub title: String,
    /// Grouping key: versions compete per module, not globally.
    pub target_module: String,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub datasets: Vec<DatasetSpec>,
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
    #[serde(default)]
    pub page_settings: PageSettings,
    #[serde(default)]
    pub governance: Governance,
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Template {
    /// Empty draft for a module. The store assigns id, version and flags on
    /// save; the placeholder id only exists so a draft is addressable.
    pub fn draft(title: &str, target_module: &str) -> Self {
        let now = Utc::now();
        Template {
            id: String::new(),
            title: title.to_string(),
            target_module: target_module.to_string(),
            elements: Vec::new(),
            datasets: Vec::new(),
            parameters: Vec::new(),
            page_settings: PageSettings::default(),
            governance: Governance::default(),
            version: 0,
            is_active: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn dataset(&self, id: &str) -> Option<&DatasetSpec> {
        self.datasets.iter().find(|dataset| dataset.id == id)
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|element| element.id == id)
    }
}

// ============================================================================
// PARAMETERS
// ============================================================================

/// A runtime input the host supplies when rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSpec {
    pub id: String,
    /// Key the runtime value is looked up under.
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: ParameterKind,
    #[serde(default, rename = "default")]
    pub default_value: Value,
    /// Choices for `select` parameters.
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterKind {
    #[default]
    Text,
    Number,
    Date,
    Boolean,
    Select,
}

// ============================================================================
// PAGE SETTINGS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSettings {
    #[serde(default)]
    pub paper_size: PaperSize,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub margins: Margins,
    #[serde(default = "default_true")]
    pub show_grid: bool,
    #[serde(default = "default_true")]
    pub snap_to_grid: bool,
}

impl Default for PageSettings {
    fn default() -> Self {
        PageSettings {
            paper_size: PaperSize::default(),
            orientation: Orientation::default(),
            margins: Margins::default(),
            show_grid: true,
            snap_to_grid: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaperSize {
    #[default]
    A4,
    A5,
    Letter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Page margins in page units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Margins {
            top: 24.0,
            right: 24.0,
            bottom: 24.0,
            left: 24.0,
        }
    }
}

fn default_true() -> bool {
    true
}

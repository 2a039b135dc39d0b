//! FILENAME: core/binding/src/context.rs
//! PURPOSE: Render-time context shared by all binding resolution.
//! CONTEXT: Groups the borrowed pieces every resolver needs (active record,
//! executed dataset rows, runtime parameters, locale) so element resolution
//! never threads four loose arguments around.

use crate::format::BindingLocale;
use crate::text::resolve_template_text;
use dataset_engine::DatasetResults;
use model::{Record, Value};

/// Borrowed render inputs for one document pass.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub record: &'a Record,
    pub results: &'a DatasetResults,
    pub parameters: &'a Record,
    pub locale: &'a BindingLocale,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        record: &'a Record,
        results: &'a DatasetResults,
        parameters: &'a Record,
        locale: &'a BindingLocale,
    ) -> Self {
        RenderContext {
            record,
            results,
            parameters,
            locale,
        }
    }

    /// Rows of an executed dataset. Unknown ids resolve to no rows, so a
    /// stale `dataSource` reference renders an empty element instead of
    /// failing the document.
    pub fn dataset_rows(&self, dataset_id: &str) -> &'a [Record] {
        match self.results.get(dataset_id) {
            Some(rows) => rows.as_slice(),
            None => {
                log::debug!("no executed rows for dataset {:?}", dataset_id);
                &[]
            }
        }
    }

    /// Builds the lookup map placeholders resolve against.
    ///
    /// Record fields sit at the root, with three aliases layered on top:
    /// `row` (the record as a map), `rows` (a single-element array, so text
    /// written against list-shaped data keeps working on a single record),
    /// and `params` (the runtime parameter map).
    pub fn text_context(&self) -> Record {
        let mut context = self.record.clone();
        context.insert("row".to_string(), Value::Map(self.record.clone()));
        context.insert(
            "rows".to_string(),
            Value::Array(vec![Value::Map(self.record.clone())]),
        );
        context.insert("params".to_string(), Value::Map(self.parameters.clone()));
        context
    }

    /// Substitutes `{{path}}` placeholders in `text` against this context.
    pub fn resolve_text(&self, text: &str) -> String {
        resolve_template_text(text, &self.text_context(), self.locale)
    }
}

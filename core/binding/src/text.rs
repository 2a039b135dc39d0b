//! FILENAME: core/binding/src/text.rs
//! PURPOSE: `{{path}}` placeholder substitution for template text.
//! CONTEXT: Headers, text blocks and stat card labels accept inline
//! placeholders. Resolution is total: unknown paths and blank values render
//! as the empty marker so a half-filled record still produces a legible
//! document.

use crate::format::{display_value, BindingLocale, EMPTY_MARKER};
use model::{lookup_path, Record};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([^{}]+?)\s*\}\}").unwrap());

/// Replaces every `{{path}}` occurrence in `text` with the looked-up value.
///
/// Paths may be dotted (`customer.name`) and whitespace inside the braces is
/// ignored. A path that resolves to nothing, or to a value whose rendering
/// is blank, substitutes [`EMPTY_MARKER`]. Text without placeholders passes
/// through untouched.
pub fn resolve_template_text(text: &str, context: &Record, locale: &BindingLocale) -> String {
    PLACEHOLDER_RE
        .replace_all(text, |caps: &Captures| {
            let rendered = match lookup_path(context, &caps[1]) {
                Some(value) => display_value(value, locale),
                None => String::new(),
            };
            if rendered.trim().is_empty() {
                EMPTY_MARKER.to_string()
            } else {
                rendered
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::Value;

    fn create_test_context() -> Record {
        let mut customer = Record::new();
        customer.insert("name".to_string(), Value::from("Ali Rezaei"));

        let mut context = Record::new();
        context.insert("tracking_code".to_string(), Value::from("WO-0001"));
        context.insert("total".to_string(), Value::from(12500.0));
        context.insert("note".to_string(), Value::from("   "));
        context.insert("closed".to_string(), Value::Bool(false));
        context.insert("customer".to_string(), Value::Map(customer));
        context
    }

    #[test]
    fn substitutes_a_single_placeholder() {
        let context = create_test_context();
        let locale = BindingLocale::default();
        assert_eq!(
            resolve_template_text("code: {{tracking_code}}", &context, &locale),
            "code: WO-0001"
        );
    }

    #[test]
    fn substitutes_multiple_placeholders_in_one_pass() {
        let context = create_test_context();
        let locale = BindingLocale::default();
        assert_eq!(
            resolve_template_text(
                "{{tracking_code}} / {{customer.name}} / {{total}}",
                &context,
                &locale
            ),
            "WO-0001 / Ali Rezaei / 12,500"
        );
    }

    #[test]
    fn whitespace_inside_braces_is_ignored() {
        let context = create_test_context();
        let locale = BindingLocale::default();
        assert_eq!(
            resolve_template_text("code: {{  tracking_code  }}", &context, &locale),
            "code: WO-0001"
        );
    }

    #[test]
    fn unknown_path_renders_the_empty_marker() {
        let context = create_test_context();
        let locale = BindingLocale::default();
        assert_eq!(
            resolve_template_text("code: {{missing_field}}", &context, &locale),
            "code: ---"
        );
    }

    #[test]
    fn blank_value_renders_the_empty_marker() {
        let context = create_test_context();
        let locale = BindingLocale::default();
        // Whitespace-only text counts as blank.
        assert_eq!(
            resolve_template_text("note: {{note}}", &context, &locale),
            "note: ---"
        );
    }

    #[test]
    fn booleans_render_locale_words() {
        let context = create_test_context();
        let locale = BindingLocale::default();
        assert_eq!(
            resolve_template_text("closed: {{closed}}", &context, &locale),
            "closed: No"
        );
    }

    #[test]
    fn text_without_placeholders_passes_through() {
        let context = create_test_context();
        let locale = BindingLocale::default();
        assert_eq!(
            resolve_template_text("plain report text", &context, &locale),
            "plain report text"
        );
    }

    #[test]
    fn unclosed_braces_are_left_alone() {
        let context = create_test_context();
        let locale = BindingLocale::default();
        assert_eq!(
            resolve_template_text("{{tracking_code", &context, &locale),
            "{{tracking_code"
        );
    }
}

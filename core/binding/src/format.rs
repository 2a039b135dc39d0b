//! FILENAME: core/binding/src/format.rs
//! PURPOSE: Locale-aware display formatting for bound values.
//! CONTEXT: Every value that reaches a rendered surface (placeholder text,
//! table cells, stat cards, chart labels) goes through `display_value`, so
//! numbers, booleans and lists read the same way across the whole document.

use model::{format_plain_number, Value};

/// Rendered stand-in for placeholders that resolve to nothing.
pub const EMPTY_MARKER: &str = "---";

/// Display conventions for one rendered document.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingLocale {
    pub group_separator: char,
    pub decimal_separator: char,
    pub yes: String,
    pub no: String,
}

impl Default for BindingLocale {
    fn default() -> Self {
        BindingLocale {
            group_separator: ',',
            decimal_separator: '.',
            yes: "Yes".to_string(),
            no: "No".to_string(),
        }
    }
}

/// Formats a number with digit grouping in the integer part.
/// `-1234567.5` renders as `-1,234,567.5` under the default locale.
pub fn format_number(n: f64, locale: &BindingLocale) -> String {
    let plain = format_plain_number(n);
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };
    // Exponent renderings of extreme magnitudes pass through ungrouped.
    if !integer.bytes().all(|b| b.is_ascii_digit()) {
        return plain;
    }

    let mut grouped = String::with_capacity(plain.len() + integer.len() / 3);
    grouped.push_str(sign);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(locale.group_separator);
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push(locale.decimal_separator);
        grouped.push_str(fraction);
    }
    grouped
}

/// Formats a value for display on a rendered surface.
///
/// `Null` and nested maps render as empty text; callers substitute
/// [`EMPTY_MARKER`] where a visible stand-in is wanted. Arrays render their
/// items comma-separated.
pub fn display_value(value: &Value, locale: &BindingLocale) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(flag) => {
            if *flag {
                locale.yes.clone()
            } else {
                locale.no.clone()
            }
        }
        Value::Number(n) => format_number(*n, locale),
        Value::Text(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| display_value(item, locale))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Map(_) => String::new(),
    }
}

use formula_format::{FormatOptions, FormattedValue, Value as FmtValue};

use crate::Value;

/// Format an evaluated [`Value`] into a user-visible string using an Excel
/// number format code.
///
/// The formatting rules are implemented in [`formula_format`]. This helper
/// exists to keep UI callers from needing to understand the engine's internal
/// value representation. An omitted argument displays like an empty cell.
pub fn format_value_for_display(
    value: &Value,
    format_code: Option<&str>,
    options: &FormatOptions,
) -> FormattedValue {
    let fmt_value = match value {
        Value::Number(n) => FmtValue::Number(*n),
        Value::Text(s) => FmtValue::Text(s),
        Value::Bool(b) => FmtValue::Bool(*b),
        Value::Blank | Value::Missing => FmtValue::Blank,
        Value::Error(e) => FmtValue::Error(e.as_code()),
    };
    formula_format::format_value(fmt_value, format_code, options)
}

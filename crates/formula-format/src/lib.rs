//! Excel-compatible time display formatting.
//!
//! This crate renders fractional-day serial values (the representation produced by
//! `TIME()`/`TIMEVALUE()`) through Excel/OOXML time format codes such as `hh:mm:ss`,
//! `h:mm AM/PM`, `[h]:mm:ss` and `mm:ss.0`, including multi-section codes like
//! `hh:mm;[Red]"late"`.
//!
//! Only time patterns are rendered token by token. Numbers under any other format code are
//! rendered with Excel's `General` rule, and codes containing calendar tokens (`y`, `d`, month
//! `m`) fall back to `General` as well.

use std::collections::BTreeSet;
use std::sync::{Mutex, OnceLock};

use serde::{Deserialize, Serialize};

mod builtin;
mod datetime;
mod literal;
mod number;
mod parse;

pub use crate::builtin::{
    builtin_format_code, builtin_format_id, resolve_builtin_placeholder, DataFormatError,
    DataFormatTable, BUILTIN_NUM_FMT_ID_PLACEHOLDER_PREFIX, FIRST_CUSTOM_NUM_FMT_ID,
};
pub use crate::datetime::{TimeParts, SECONDS_PER_DAY};
pub use crate::parse::{Condition, FormatCode, ParseError, SelectedSection};

/// A locale definition used for formatting separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    /// Decimal separator, also used in front of subsecond digits (`ss.00`).
    pub decimal_sep: char,
    /// Thousands separator.
    pub thousands_sep: char,
    /// Time separator used when the format code uses `:`.
    pub time_sep: char,
}

impl Locale {
    pub const fn en_us() -> Self {
        Self {
            decimal_sep: '.',
            thousands_sep: ',',
            time_sep: ':',
        }
    }

    pub const fn de_de() -> Self {
        Self {
            decimal_sep: ',',
            thousands_sep: '.',
            time_sep: ':',
        }
    }

    pub const fn fr_fr() -> Self {
        Self {
            decimal_sep: ',',
            thousands_sep: '\u{00A0}',
            time_sep: ':',
        }
    }

    /// Finnish writes times with a period (`18.49.01`).
    pub const fn fi_fi() -> Self {
        Self {
            decimal_sep: ',',
            thousands_sep: '\u{00A0}',
            time_sep: '.',
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::en_us()
    }
}

/// Formatting options that affect how serial times and numbers are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub locale: Locale,
}

/// A minimal value representation for formatting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Number(f64),
    Text(&'a str),
    Bool(bool),
    Blank,
    Error(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentHint {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedValue {
    pub text: String,
    pub alignment: AlignmentHint,
}

/// Excel fills a cell with `#` when a time pattern receives a negative serial.
pub const INVALID_TIME_TEXT: &str = "########";

/// Format a value using an Excel number format code.
///
/// If `format_code` is `None` or empty, `"General"` is used. Built-in placeholders of the form
/// `__builtin_numFmtId:<id>` are resolved through [`builtin_format_code`]. Codes that fail to
/// parse, or that need calendar rendering, are logged once and rendered as `General`.
pub fn format_value(
    value: Value<'_>,
    format_code: Option<&str>,
    options: &FormatOptions,
) -> FormattedValue {
    let code_str = format_code.unwrap_or("General");
    let code_str = if code_str.trim().is_empty() {
        "General"
    } else {
        code_str
    };
    let code_str = resolve_builtin_placeholder(code_str).unwrap_or(code_str);

    let code = match FormatCode::parse(code_str) {
        Ok(code) => code,
        Err(err) => {
            warn_unsupported_format_code(code_str, &err.to_string());
            FormatCode::general()
        }
    };

    match value {
        Value::Blank => FormattedValue {
            text: String::new(),
            alignment: AlignmentHint::Left,
        },
        Value::Error(err) => FormattedValue {
            text: err.to_string(),
            alignment: AlignmentHint::Center,
        },
        Value::Text(s) => FormattedValue {
            text: render_text(&code, s),
            alignment: AlignmentHint::Left,
        },
        Value::Bool(b) => FormattedValue {
            text: if b { "TRUE" } else { "FALSE" }.to_string(),
            alignment: AlignmentHint::Center,
        },
        Value::Number(n) => {
            if !n.is_finite() {
                // Excel does not have NaN/Infinity numeric values; treat them as #NUM!.
                return FormattedValue {
                    text: "#NUM!".to_string(),
                    alignment: AlignmentHint::Center,
                };
            }
            FormattedValue {
                text: render_number(code_str, &code, n, options),
                alignment: AlignmentHint::Right,
            }
        }
    }
}

fn render_text(code: &FormatCode, text: &str) -> String {
    match code.select_section_for_text() {
        Some(pattern) => literal::render_text_section(pattern, text),
        None => text.to_string(),
    }
}

fn render_number(code_str: &str, code: &FormatCode, n: f64, options: &FormatOptions) -> String {
    let Some(section) = code.select_section_for_number(n) else {
        return number::format_general(n, options);
    };
    let n = if section.auto_negative_sign { n } else { n.abs() };

    if section.pattern.is_empty() {
        // `hh:mm;;` hides negative numbers.
        return String::new();
    }
    // `@` is the text placeholder; numbers that land in a text section show as `General`.
    if section.pattern.trim().eq_ignore_ascii_case("general")
        || parse::contains_unquoted(section.pattern, '@')
    {
        return number::format_general(n, options);
    }

    match datetime::tokenize(section.pattern) {
        Ok(tokens) if datetime::has_time_fields(&tokens) => {
            datetime::format_time(n, &tokens, options)
        }
        // Literal-only sections print their text without a sign.
        Ok(tokens) if !number::has_digit_placeholders(section.pattern) => {
            datetime::render_literals(&tokens, options)
        }
        // Only `General`, time and literal-only patterns are rendered; digit patterns show as
        // `General`.
        Ok(_) => number::format_general(n, options),
        Err(err) => {
            warn_unsupported_format_code(code_str, &err.to_string());
            number::format_general(n, options)
        }
    }
}

fn warn_unsupported_format_code(code: &str, reason: &str) {
    static WARNED: OnceLock<Mutex<BTreeSet<String>>> = OnceLock::new();

    let warned = WARNED.get_or_init(|| Mutex::new(BTreeSet::new()));
    let mut warned = match warned.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    if warned.insert(code.to_string()) {
        log::warn!("format code {code:?} rendered as General: {reason}");
    }
}

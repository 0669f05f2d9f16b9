pub(crate) mod number;

use serde::{Deserialize, Serialize};

use crate::functions::date_time;
use crate::value::{ErrorKind, Value};

/// Locale rules used when text is coerced to a number (`"1,5"`, `"18.49.01"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueLocaleConfig {
    pub decimal_separator: char,
    pub group_separator: char,
    pub time_separator: char,
}

impl ValueLocaleConfig {
    #[must_use]
    pub const fn en_us() -> Self {
        Self {
            decimal_separator: '.',
            group_separator: ',',
            time_separator: ':',
        }
    }

    #[must_use]
    pub const fn de_de() -> Self {
        Self {
            decimal_separator: ',',
            group_separator: '.',
            time_separator: ':',
        }
    }

    /// The value-parsing counterpart of a display locale.
    #[must_use]
    pub const fn from_format_locale(locale: formula_format::Locale) -> Self {
        Self {
            decimal_separator: locale.decimal_sep,
            group_separator: locale.thousands_sep,
            time_separator: locale.time_sep,
        }
    }
}

impl Default for ValueLocaleConfig {
    fn default() -> Self {
        Self::en_us()
    }
}

/// Coerce a scalar to a number using Excel's implicit conversion rules.
///
/// - blank cells and omitted arguments read as `0`
/// - `TRUE`/`FALSE` read as `1`/`0`
/// - text is parsed as a number, then as a time of day; anything else is `#VALUE!`
/// - error values propagate unchanged
pub fn coerce_to_number(value: &Value, cfg: ValueLocaleConfig) -> Result<f64, ErrorKind> {
    match value {
        Value::Number(n) => Ok(*n),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Blank | Value::Missing => Ok(0.0),
        Value::Text(s) => coerce_text_to_number(s, cfg),
        Value::Error(e) => Err(*e),
    }
}

fn coerce_text_to_number(text: &str, cfg: ValueLocaleConfig) -> Result<f64, ErrorKind> {
    if let Ok(n) = number::parse_number(text, cfg) {
        return Ok(n);
    }
    date_time::timevalue(text, cfg).map_err(ErrorKind::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_coerce_like_excel() {
        let cfg = ValueLocaleConfig::en_us();
        assert_eq!(coerce_to_number(&Value::Missing, cfg), Ok(0.0));
        assert_eq!(coerce_to_number(&Value::Blank, cfg), Ok(0.0));
        assert_eq!(coerce_to_number(&Value::Bool(true), cfg), Ok(1.0));
        assert_eq!(coerce_to_number(&Value::from("12"), cfg), Ok(12.0));
        assert_eq!(coerce_to_number(&Value::from("6:00"), cfg), Ok(0.25));
        assert_eq!(
            coerce_to_number(&Value::from("noon"), cfg),
            Err(ErrorKind::Value)
        );
        assert_eq!(
            coerce_to_number(&Value::Error(ErrorKind::Ref), cfg),
            Err(ErrorKind::Ref)
        );
    }

    #[test]
    fn locale_config_deserializes_with_defaults() {
        let cfg: ValueLocaleConfig = serde_json::from_str(r#"{"time_separator":"."}"#).unwrap();
        assert_eq!(cfg.time_separator, '.');
        assert_eq!(cfg.decimal_separator, '.');

        let json = serde_json::to_string(&ValueLocaleConfig::de_de()).unwrap();
        let restored: ValueLocaleConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, ValueLocaleConfig::de_de());
    }

    #[test]
    fn locale_config_follows_display_locale() {
        let cfg = ValueLocaleConfig::from_format_locale(formula_format::Locale::fi_fi());
        assert_eq!(cfg.decimal_separator, ',');
        assert_eq!(cfg.time_separator, '.');
    }
}

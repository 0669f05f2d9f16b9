use crate::coercion::ValueLocaleConfig;
use crate::error::{ExcelError, ExcelResult};

/// Parse numeric text the way Excel's implicit conversion does.
///
/// Accepts an optional sign, group separators in the integer part, the locale decimal
/// separator, an exponent and a trailing `%`. Leading/trailing whitespace is ignored.
pub(crate) fn parse_number(text: &str, cfg: ValueLocaleConfig) -> ExcelResult<f64> {
    let trimmed = text.trim();
    let (body, percent) = match trimmed.strip_suffix('%') {
        Some(rest) => (rest.trim_end(), true),
        None => (trimmed, false),
    };
    if body.is_empty() {
        return Err(ExcelError::Value);
    }

    let mut normalized = String::with_capacity(body.len());
    let mut seen_decimal = false;
    let mut seen_exponent = false;
    for ch in body.chars() {
        match ch {
            '0'..='9' => normalized.push(ch),
            '+' | '-' => normalized.push(ch),
            'e' | 'E' if !seen_exponent => {
                seen_exponent = true;
                normalized.push('e');
            }
            c if c == cfg.decimal_separator && !seen_decimal && !seen_exponent => {
                seen_decimal = true;
                normalized.push('.');
            }
            c if c == cfg.group_separator && !seen_decimal && !seen_exponent => {}
            _ => return Err(ExcelError::Value),
        }
    }

    let n: f64 = normalized.parse().map_err(|_| ExcelError::Value)?;
    if !n.is_finite() {
        return Err(ExcelError::Num);
    }
    Ok(if percent { n / 100.0 } else { n })
}

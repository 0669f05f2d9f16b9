use crate::FormatOptions;

/// Significant digits Excel shows for `General` in a default-width column.
const GENERAL_SIGNIFICANT_DIGITS: i32 = 10;

/// Render a number the way Excel's `General` format does: up to ten significant digits, no
/// trailing zeros, and scientific notation for very large or very small magnitudes.
pub(crate) fn format_general(value: f64, options: &FormatOptions) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let abs = value.abs();
    let s = if !(1e-9..1e11).contains(&abs) {
        format_general_scientific(value)
    } else {
        let int_digits = (abs.log10().floor() as i32 + 1).max(1);
        let decimals = (GENERAL_SIGNIFICANT_DIGITS - int_digits).max(0) as usize;
        trim_fraction_zeros(format!("{value:.decimals$}"))
    };

    if options.locale.decimal_sep != '.' {
        s.replace('.', &options.locale.decimal_sep.to_string())
    } else {
        s
    }
}

/// Whether a pattern contains unquoted digit placeholders (`0`, `#`, `?`).
pub(crate) fn has_digit_placeholders(pattern: &str) -> bool {
    let mut in_quotes = false;
    let mut chars = pattern.chars();
    while let Some(ch) = chars.next() {
        if in_quotes {
            in_quotes = ch != '"';
            continue;
        }
        match ch {
            '"' => in_quotes = true,
            '\\' | '_' | '*' => {
                let _ = chars.next();
            }
            '0' | '#' | '?' => return true,
            _ => {}
        }
    }
    false
}

fn format_general_scientific(value: f64) -> String {
    let raw = format!("{value:.5e}");
    let (mantissa, exponent) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let mantissa = trim_fraction_zeros(mantissa.to_string());
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}E{sign}{:02}", exponent.abs())
}

fn trim_fraction_zeros(mut s: String) -> String {
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    s
}

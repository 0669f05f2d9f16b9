use thiserror::Error;

use crate::literal::{currency_symbol_from_bracket, take_bracket, take_literal};
use crate::{FormatOptions, INVALID_TIME_TEXT};

pub const SECONDS_PER_DAY: i64 = 86_400;

/// Excel renders at most millisecond precision (`ss.000`).
const MAX_SUBSECOND_DIGITS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum TimePatternError {
    #[error("calendar token `{0}` needs date rendering")]
    CalendarToken(char),
    #[error("unterminated bracket token")]
    UnterminatedBracket,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TimeToken {
    /// `h` / `hh`: hour of day (1-12 when the pattern has an AM/PM token).
    Hour { padded: bool },
    /// `m` / `mm` in a time context.
    Minute { padded: bool },
    /// `s` / `ss`.
    Second { padded: bool },
    /// `[h]`, `[hh]`, ...: total elapsed hours.
    ElapsedHours { width: usize },
    ElapsedMinutes { width: usize },
    ElapsedSeconds { width: usize },
    /// `.0`, `.00`, `.000` after a seconds token.
    SubSecond { digits: u32 },
    /// `AM/PM` (or `A/P` when `short`).
    AmPm { short: bool, lowercase: bool },
    /// `:` renders as the locale time separator.
    TimeSeparator,
    Literal(String),
}

impl TimeToken {
    fn is_time_field(&self) -> bool {
        !matches!(self, TimeToken::TimeSeparator | TimeToken::Literal(_))
    }

    fn is_seconds(&self) -> bool {
        matches!(self, TimeToken::Second { .. } | TimeToken::ElapsedSeconds { .. })
    }
}

/// Time-of-day fields of a serial value, rounded to the nearest whole second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeParts {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl TimeParts {
    /// Decompose the time-of-day portion of a non-negative serial.
    ///
    /// Whole days are discarded. A fraction that rounds up to a full day wraps to `00:00:00`.
    pub fn from_serial(serial: f64) -> Option<Self> {
        if !serial.is_finite() || serial < 0.0 {
            return None;
        }
        let seconds = (serial.fract() * SECONDS_PER_DAY as f64).round() as i64;
        Some(Self::from_seconds_of_day(seconds.rem_euclid(SECONDS_PER_DAY)))
    }

    fn from_seconds_of_day(seconds: i64) -> Self {
        // `seconds` is already reduced to `0..86_400`, so the casts are lossless.
        Self {
            hour: (seconds / 3600) as u32,
            minute: (seconds / 60 % 60) as u32,
            second: (seconds % 60) as u32,
        }
    }

    pub fn seconds_of_day(self) -> i64 {
        i64::from(self.hour) * 3600 + i64::from(self.minute) * 60 + i64::from(self.second)
    }
}

/// Split a single format section into time tokens.
///
/// Calendar tokens (`y`, `d` and `m` outside a time context) are rejected: this crate only
/// renders time-of-day and elapsed-time patterns.
pub(crate) fn tokenize(pattern: &str) -> Result<Vec<TimeToken>, TimePatternError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    // True after an hour token until a seconds token closes the time group.
    let mut in_time_context = false;

    while i < chars.len() {
        let c = chars[i];

        if matches!(c, '"' | '\\' | '_' | '*') {
            let mut rest = chars[i + 1..].iter().copied();
            let literal = take_literal(c, &mut rest).unwrap_or_default();
            i = chars.len() - rest.len();
            push_literal(&mut tokens, &literal);
            continue;
        }

        if c == '[' {
            let mut rest = chars[i + 1..].iter().copied();
            let content = take_bracket(&mut rest).ok_or(TimePatternError::UnterminatedBracket)?;
            i = chars.len() - rest.len();
            match elapsed_token(&content) {
                Some(token) => {
                    in_time_context = matches!(token, TimeToken::ElapsedHours { .. });
                    tokens.push(token);
                }
                None => {
                    // Colors and locale tags carry no text.
                    if let Some(symbol) = currency_symbol_from_bracket(&content) {
                        push_literal(&mut tokens, symbol);
                    }
                }
            }
            continue;
        }

        if c.eq_ignore_ascii_case(&'a') {
            if let Some((token, len)) = am_pm_token(&chars[i..]) {
                tokens.push(token);
                i += len;
                continue;
            }
            push_literal(&mut tokens, &c.to_string());
            i += 1;
            continue;
        }

        if c == ':' {
            tokens.push(TimeToken::TimeSeparator);
            i += 1;
            continue;
        }

        if c == '.' && tokens.last().is_some_and(TimeToken::is_seconds) {
            let zeros = chars[i + 1..].iter().take_while(|ch| **ch == '0').count();
            if zeros > 0 {
                // Zeros past millisecond precision are dropped.
                let digits = zeros.min(MAX_SUBSECOND_DIGITS as usize);
                tokens.push(TimeToken::SubSecond {
                    digits: digits as u32,
                });
                i += 1 + zeros;
                continue;
            }
        }

        let lower = c.to_ascii_lowercase();
        let run = chars[i..]
            .iter()
            .take_while(|ch| ch.to_ascii_lowercase() == lower)
            .count();

        match lower {
            'h' => {
                in_time_context = true;
                tokens.push(TimeToken::Hour { padded: run >= 2 });
                i += run;
            }
            'm' => {
                if !(in_time_context || is_followed_by_seconds(&chars, i + run)) {
                    return Err(TimePatternError::CalendarToken(c));
                }
                tokens.push(TimeToken::Minute { padded: run >= 2 });
                i += run;
            }
            's' => {
                in_time_context = false;
                tokens.push(TimeToken::Second { padded: run >= 2 });
                i += run;
            }
            'y' | 'd' => return Err(TimePatternError::CalendarToken(c)),
            _ => {
                push_literal(&mut tokens, &c.to_string());
                i += 1;
            }
        }
    }

    Ok(tokens)
}

pub(crate) fn has_time_fields(tokens: &[TimeToken]) -> bool {
    tokens.iter().any(TimeToken::is_time_field)
}

fn push_literal(tokens: &mut Vec<TimeToken>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(TimeToken::Literal(prev)) = tokens.last_mut() {
        prev.push_str(text);
    } else {
        tokens.push(TimeToken::Literal(text.to_string()));
    }
}

fn elapsed_token(content: &str) -> Option<TimeToken> {
    let first = content.chars().next()?.to_ascii_lowercase();
    if !content.chars().all(|c| c.to_ascii_lowercase() == first) {
        return None;
    }
    let width = content.chars().count();
    match first {
        'h' => Some(TimeToken::ElapsedHours { width }),
        'm' => Some(TimeToken::ElapsedMinutes { width }),
        's' => Some(TimeToken::ElapsedSeconds { width }),
        _ => None,
    }
}

fn am_pm_token(chars: &[char]) -> Option<(TimeToken, usize)> {
    let lowercase = chars.first()?.is_ascii_lowercase();
    let matches_at = |text: &str| {
        text.chars().count() <= chars.len()
            && text
                .chars()
                .zip(chars)
                .all(|(expected, actual)| actual.eq_ignore_ascii_case(&expected))
    };

    if matches_at("am/pm") {
        Some((TimeToken::AmPm { short: false, lowercase }, 5))
    } else if matches_at("a/p") {
        Some((TimeToken::AmPm { short: true, lowercase }, 3))
    } else {
        None
    }
}

/// `m` is minutes when a seconds token follows before any other date/time component.
fn is_followed_by_seconds(chars: &[char], start: usize) -> bool {
    for ch in &chars[start.min(chars.len())..] {
        match ch.to_ascii_lowercase() {
            's' => return true,
            'h' | 'y' | 'd' | 'm' => return false,
            _ => {}
        }
    }
    false
}

/// Render a serial value through a tokenized time pattern.
///
/// The value is rounded to the precision the pattern displays (whole seconds, or up to three
/// subsecond digits) before it is split into fields, so `0.49999999` under `hh:mm:ss` shows
/// `12:00:00`.
pub(crate) fn format_time(serial: f64, tokens: &[TimeToken], options: &FormatOptions) -> String {
    if serial < 0.0 {
        return INVALID_TIME_TEXT.to_string();
    }

    let max_digits = tokens
        .iter()
        .filter_map(|t| match t {
            TimeToken::SubSecond { digits } => Some(*digits),
            _ => None,
        })
        .max()
        .unwrap_or(0);
    let scale = 10_i64.pow(max_digits);

    let scaled = (serial * SECONDS_PER_DAY as f64 * scale as f64).round();
    if scaled >= i64::MAX as f64 {
        return INVALID_TIME_TEXT.to_string();
    }
    let scaled = scaled as i64;
    let total_seconds = scaled / scale;
    let fraction = scaled % scale;

    let has_am_pm = tokens.iter().any(|t| matches!(t, TimeToken::AmPm { .. }));
    let hour_of_day = total_seconds / 3600 % 24;
    let minute = total_seconds / 60 % 60;
    let second = total_seconds % 60;

    let mut out = String::new();
    for token in tokens {
        match token {
            TimeToken::Hour { padded } => {
                let hour = if has_am_pm {
                    match hour_of_day % 12 {
                        0 => 12,
                        h => h,
                    }
                } else {
                    hour_of_day
                };
                push_field(&mut out, hour, *padded);
            }
            TimeToken::Minute { padded } => push_field(&mut out, minute, *padded),
            TimeToken::Second { padded } => push_field(&mut out, second, *padded),
            TimeToken::ElapsedHours { width } => {
                out.push_str(&format!("{:0width$}", total_seconds / 3600, width = *width));
            }
            TimeToken::ElapsedMinutes { width } => {
                out.push_str(&format!("{:0width$}", total_seconds / 60, width = *width));
            }
            TimeToken::ElapsedSeconds { width } => {
                out.push_str(&format!("{:0width$}", total_seconds, width = *width));
            }
            TimeToken::SubSecond { digits } => {
                out.push(options.locale.decimal_sep);
                let padded = format!("{:0width$}", fraction, width = max_digits as usize);
                out.push_str(&padded[..*digits as usize]);
            }
            TimeToken::AmPm { short, lowercase } => {
                let pm = hour_of_day >= 12;
                let text = match (short, pm) {
                    (false, false) => "AM",
                    (false, true) => "PM",
                    (true, false) => "A",
                    (true, true) => "P",
                };
                if *lowercase {
                    out.push_str(&text.to_ascii_lowercase());
                } else {
                    out.push_str(text);
                }
            }
            TimeToken::TimeSeparator => out.push(options.locale.time_sep),
            TimeToken::Literal(text) => out.push_str(text),
        }
    }
    out
}

/// Render a pattern that has no time fields (e.g. a quoted `"zero"` section).
pub(crate) fn render_literals(tokens: &[TimeToken], options: &FormatOptions) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            TimeToken::Literal(text) => out.push_str(text),
            TimeToken::TimeSeparator => out.push(options.locale.time_sep),
            _ => {}
        }
    }
    out
}

fn push_field(out: &mut String, value: i64, padded: bool) {
    if padded {
        out.push_str(&format!("{value:02}"));
    } else {
        out.push_str(&value.to_string());
    }
}

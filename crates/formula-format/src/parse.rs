use thiserror::Error;

/// Maximum number of `;`-separated sections in an Excel format code
/// (`positive;negative;zero;text`).
const MAX_SECTIONS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unterminated quoted literal")]
    UnterminatedQuote,
    #[error("unterminated bracket token")]
    UnterminatedBracket,
    #[error("format code has {0} sections; at most 4 are allowed")]
    TooManySections(usize),
    #[error("invalid condition `[{0}]`")]
    InvalidCondition(String),
}

/// A section condition such as `[<0]` or `[>=100]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    Lt(f64),
    Le(f64),
    Gt(f64),
    Ge(f64),
    Eq(f64),
    Ne(f64),
}

impl Condition {
    pub fn matches(self, n: f64) -> bool {
        match self {
            Condition::Lt(v) => n < v,
            Condition::Le(v) => n <= v,
            Condition::Gt(v) => n > v,
            Condition::Ge(v) => n >= v,
            Condition::Eq(v) => n == v,
            Condition::Ne(v) => n != v,
        }
    }

    /// A condition that only admits negative numbers owns the sign, so the section renders
    /// the absolute value (Excel's `[<0]` behaves like an explicit negative section).
    fn selects_only_negatives(self) -> bool {
        matches!(self, Condition::Lt(v) if v <= 0.0) || matches!(self, Condition::Le(v) if v < 0.0)
    }

    fn parse(content: &str) -> Result<Self, ParseError> {
        // Two-character operators must be tried before their one-character prefixes.
        const OPERATORS: [(&str, fn(f64) -> Condition); 6] = [
            ("<=", Condition::Le),
            (">=", Condition::Ge),
            ("<>", Condition::Ne),
            ("<", Condition::Lt),
            (">", Condition::Gt),
            ("=", Condition::Eq),
        ];

        let content = content.trim();
        let invalid = || ParseError::InvalidCondition(content.to_string());
        let (ctor, rest) = OPERATORS
            .iter()
            .find_map(|(op, ctor)| content.strip_prefix(*op).map(|rest| (*ctor, rest)))
            .ok_or_else(invalid)?;

        rest.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(ctor)
            .ok_or_else(invalid)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Section {
    /// Section pattern with any condition token removed.
    pattern: String,
    condition: Option<Condition>,
}

/// The section chosen to render a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedSection<'a> {
    pub pattern: &'a str,
    /// `true` when the pattern does not own the sign and a negative value must be rendered with
    /// its sign (single-section codes, unconditioned fallbacks).
    pub auto_negative_sign: bool,
}

/// A parsed Excel number format code.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatCode {
    sections: Vec<Section>,
}

impl FormatCode {
    pub fn general() -> Self {
        Self {
            sections: vec![Section {
                pattern: "General".to_string(),
                condition: None,
            }],
        }
    }

    /// Split a format code into its sections and extract their conditions.
    ///
    /// Quoted literals (`"a;b"`), backslash escapes (`\;`) and bracket tokens are honoured when
    /// looking for section separators. Color, locale and elapsed-time bracket tokens are left in
    /// the section pattern for the renderer.
    pub fn parse(code: &str) -> Result<Self, ParseError> {
        let raw = split_sections(code)?;
        if raw.len() > MAX_SECTIONS {
            return Err(ParseError::TooManySections(raw.len()));
        }

        let sections = raw
            .into_iter()
            .map(parse_section)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { sections })
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Choose the section used to render `n`.
    ///
    /// Returns `None` when the code has conditions and none of them (nor an unconditioned
    /// fallback section) admits `n`; callers render `General` in that case.
    pub fn select_section_for_number(&self, n: f64) -> Option<SelectedSection<'_>> {
        let numeric = &self.sections[..self.sections.len().min(3)];

        if numeric.iter().any(|s| s.condition.is_some()) {
            for section in numeric {
                if let Some(cond) = section.condition {
                    if cond.matches(n) {
                        return Some(SelectedSection {
                            pattern: &section.pattern,
                            auto_negative_sign: !cond.selects_only_negatives(),
                        });
                    }
                }
            }
            return numeric
                .iter()
                .find(|s| s.condition.is_none())
                .map(|s| SelectedSection {
                    pattern: &s.pattern,
                    auto_negative_sign: true,
                });
        }

        let (idx, auto_negative_sign) = match numeric.len() {
            1 => (0, true),
            2 => {
                if n < 0.0 {
                    (1, false)
                } else {
                    (0, true)
                }
            }
            _ => {
                if n > 0.0 {
                    (0, true)
                } else if n < 0.0 {
                    (1, false)
                } else {
                    (2, true)
                }
            }
        };

        Some(SelectedSection {
            pattern: &numeric[idx].pattern,
            auto_negative_sign,
        })
    }

    /// The section that renders text values: the fourth section, or any section containing an
    /// unquoted `@`.
    pub fn select_section_for_text(&self) -> Option<&str> {
        if let Some(section) = self.sections.get(3) {
            return Some(&section.pattern);
        }
        self.sections
            .iter()
            .find(|s| contains_unquoted(&s.pattern, '@'))
            .map(|s| s.pattern.as_str())
    }
}

fn split_sections(code: &str) -> Result<Vec<&str>, ParseError> {
    let mut sections = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut in_bracket = false;
    let mut escape = false;

    for (idx, ch) in code.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        if in_quotes {
            if ch == '"' {
                in_quotes = false;
            }
            continue;
        }
        if in_bracket {
            if ch == ']' {
                in_bracket = false;
            }
            continue;
        }
        match ch {
            '"' => in_quotes = true,
            '[' => in_bracket = true,
            '\\' => escape = true,
            ';' => {
                sections.push(&code[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }

    if in_quotes {
        return Err(ParseError::UnterminatedQuote);
    }
    if in_bracket {
        return Err(ParseError::UnterminatedBracket);
    }

    sections.push(&code[start..]);
    Ok(sections)
}

fn parse_section(raw: &str) -> Result<Section, ParseError> {
    let mut pattern = String::with_capacity(raw.len());
    let mut condition = None;
    let mut in_quotes = false;
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                in_quotes = false;
            }
            pattern.push(ch);
            continue;
        }
        match ch {
            '"' => {
                in_quotes = true;
                pattern.push(ch);
            }
            '\\' => {
                pattern.push(ch);
                if let Some(next) = chars.next() {
                    pattern.push(next);
                }
            }
            '[' => {
                let content: String = chars.by_ref().take_while(|c| *c != ']').collect();
                if content.starts_with(['<', '>', '=']) {
                    condition = Some(Condition::parse(&content)?);
                } else {
                    pattern.push('[');
                    pattern.push_str(&content);
                    pattern.push(']');
                }
            }
            _ => pattern.push(ch),
        }
    }

    Ok(Section { pattern, condition })
}

pub(crate) fn contains_unquoted(pattern: &str, needle: char) -> bool {
    let mut in_quotes = false;
    let mut escape = false;
    for ch in pattern.chars() {
        if escape {
            escape = false;
            continue;
        }
        match ch {
            '"' => in_quotes = !in_quotes,
            '\\' if !in_quotes => escape = true,
            _ if !in_quotes && ch == needle => return true,
            _ => {}
        }
    }
    false
}

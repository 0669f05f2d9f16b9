/// Consume a literal construct that starts with `ch`: a quoted string, a backslash escape,
/// an underscore spacer (`_x`, rendered as one space) or an asterisk fill (`*x`, dropped in
/// width-agnostic text).
///
/// Returns `None` when `ch` does not start a literal construct.
pub(crate) fn take_literal<I: Iterator<Item = char>>(ch: char, chars: &mut I) -> Option<String> {
    match ch {
        '"' => Some(chars.by_ref().take_while(|c| *c != '"').collect()),
        '\\' => Some(chars.next().map(String::from).unwrap_or_default()),
        '_' => {
            let _ = chars.next();
            Some(" ".to_string())
        }
        '*' => {
            let _ = chars.next();
            Some(String::new())
        }
        _ => None,
    }
}

/// Read the content of a bracket token; the opening `[` has already been consumed.
///
/// Returns `None` when the bracket is never closed.
pub(crate) fn take_bracket<I: Iterator<Item = char>>(chars: &mut I) -> Option<String> {
    let mut content = String::new();
    for c in chars.by_ref() {
        if c == ']' {
            return Some(content);
        }
        content.push(c);
    }
    None
}

/// Render the text section of a format code, substituting `text` for `@`.
pub(crate) fn render_text_section(section: &str, text: &str) -> String {
    let mut out = String::new();
    let mut chars = section.chars();

    while let Some(ch) = chars.next() {
        if let Some(literal) = take_literal(ch, &mut chars) {
            out.push_str(&literal);
            continue;
        }
        match ch {
            '[' => match take_bracket(&mut chars) {
                // Colors and locale tags are display hints; only currency tags print.
                Some(content) => {
                    if let Some(symbol) = currency_symbol_from_bracket(&content) {
                        out.push_str(symbol);
                    }
                }
                None => out.push('['),
            },
            '@' => out.push_str(text),
            _ => out.push(ch),
        }
    }

    out
}

/// `[$€-407]` prints `€`; locale-only tags such as `[$-409]` print nothing.
pub(crate) fn currency_symbol_from_bracket(content: &str) -> Option<&str> {
    let after = content.strip_prefix('$')?;
    let symbol = after.split_once('-').map(|(s, _)| s).unwrap_or(after);
    if symbol.is_empty() {
        None
    } else {
        Some(symbol)
    }
}

#![allow(dead_code)]

use formula_engine::display::format_value_for_display;
use formula_engine::{call_function, ErrorKind, EvalContext, Value, ValueLocaleConfig};
use formula_format::{FormatOptions, Locale};

/// Evaluates call text such as `=TIME(12,,)` against the function registry.
///
/// Arguments may be numbers, quoted text, `TRUE`/`FALSE`, error literals or nested calls; an
/// empty argument is passed as [`Value::Missing`].
pub struct TestEval {
    ctx: EvalContext,
    format_options: FormatOptions,
}

impl TestEval {
    pub fn new() -> Self {
        Self {
            ctx: EvalContext::default(),
            format_options: FormatOptions::default(),
        }
    }

    pub fn set_value_locale(&mut self, locale: ValueLocaleConfig) {
        self.ctx = EvalContext::new(locale);
    }

    /// Use `locale` for both display and text-to-number coercion.
    pub fn set_locale(&mut self, locale: Locale) {
        self.format_options.locale = locale;
        self.set_value_locale(ValueLocaleConfig::from_format_locale(locale));
    }

    pub fn eval(&self, formula: &str) -> Value {
        let expr = formula.trim();
        let expr = expr.strip_prefix('=').unwrap_or(expr);
        self.eval_expr(expr)
    }

    pub fn display(&self, value: &Value, format_code: &str) -> String {
        format_value_for_display(value, Some(format_code), &self.format_options).text
    }

    fn eval_expr(&self, expr: &str) -> Value {
        let expr = expr.trim();
        if expr.is_empty() {
            return Value::Missing;
        }
        if let Some(text) = expr.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
            return Value::Text(text.replace("\"\"", "\""));
        }
        if expr.eq_ignore_ascii_case("TRUE") {
            return Value::Bool(true);
        }
        if expr.eq_ignore_ascii_case("FALSE") {
            return Value::Bool(false);
        }
        if let Some(kind) = ErrorKind::from_code(expr) {
            return Value::Error(kind);
        }
        if let Some((name, rest)) = expr.split_once('(') {
            let inner = rest
                .strip_suffix(')')
                .unwrap_or_else(|| panic!("unbalanced call: {expr}"));
            let args: Vec<Value> = if inner.trim().is_empty() {
                Vec::new()
            } else {
                split_args(inner)
                    .into_iter()
                    .map(|arg| self.eval_expr(arg))
                    .collect()
            };
            return call_function(&self.ctx, name, &args);
        }
        match expr.parse::<f64>() {
            Ok(n) => Value::Number(n),
            Err(_) => panic!("unsupported test expression: {expr}"),
        }
    }
}

fn split_args(inner: &str) -> Vec<&str> {
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut start = 0;
    for (idx, ch) in inner.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '(' if !in_quotes => depth += 1,
            ')' if !in_quotes => depth -= 1,
            ',' if !in_quotes && depth == 0 => {
                args.push(&inner[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    args.push(&inner[start..]);
    args
}

pub fn assert_number(value: &Value, expected: f64) {
    match value {
        Value::Number(n) => {
            assert!((*n - expected).abs() < 1e-9, "expected {expected}, got {n}");
        }
        other => panic!("expected number {expected}, got {other:?}"),
    }
}

/// Assert that `formula` yields exactly `hh:mm:ss` as a fraction of a day and displays as it.
pub fn assert_time(eval: &TestEval, formula: &str, expected: &str) {
    let fields: Vec<u32> = expected
        .split(':')
        .map(|f| f.parse().expect("hh:mm:ss"))
        .collect();
    let &[h, m, s] = fields.as_slice() else {
        panic!("expected hh:mm:ss, got {expected}");
    };
    let seconds = h * 3600 + m * 60 + s;

    let value = eval.eval(formula);
    assert_eq!(value, Value::Number(f64::from(seconds) / 86_400.0), "{formula}");
    assert_eq!(eval.display(&value, "hh:mm:ss"), expected, "{formula}");
}

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::coercion::ValueLocaleConfig;
use crate::value::{ErrorKind, Value};

pub mod date_time;

// Built-in functions register themselves with the inventory-backed registry from their own
// modules.
mod builtins_date_time;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Any,
    Number,
    Text,
}

/// Host services available to function implementations.
pub trait FunctionContext {
    fn value_locale(&self) -> ValueLocaleConfig;
}

/// A stand-alone [`FunctionContext`] for hosts that evaluate calls outside a workbook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalContext {
    pub value_locale: ValueLocaleConfig,
}

impl EvalContext {
    pub fn new(value_locale: ValueLocaleConfig) -> Self {
        Self { value_locale }
    }
}

impl FunctionContext for EvalContext {
    fn value_locale(&self) -> ValueLocaleConfig {
        self.value_locale
    }
}

/// Function implementations receive already-evaluated arguments. The registry guarantees
/// `min_args <= args.len() <= max_args`; omitted arguments arrive as [`Value::Missing`].
pub type FunctionImpl = fn(&dyn FunctionContext, &[Value]) -> Value;

#[derive(Clone, Copy)]
pub struct FunctionSpec {
    pub name: &'static str,
    pub min_args: usize,
    pub max_args: usize,
    pub return_type: ValueType,
    pub arg_types: &'static [ValueType],
    pub implementation: FunctionImpl,
}

inventory::collect!(FunctionSpec);

/// Iterate all [`FunctionSpec`] registrations collected via [`inventory`].
pub fn iter_function_specs() -> impl Iterator<Item = &'static FunctionSpec> {
    inventory::iter::<FunctionSpec>.into_iter()
}

fn registry() -> &'static HashMap<String, &'static FunctionSpec> {
    static REGISTRY: OnceLock<HashMap<String, &'static FunctionSpec>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut map = HashMap::new();
        for spec in iter_function_specs() {
            let name = spec.name.to_ascii_uppercase();
            if map.insert(name.clone(), spec).is_some() {
                log::warn!(
                    "function {name} registered more than once; keeping the last registration"
                );
            }
        }
        map
    })
}

pub fn lookup_function(name: &str) -> Option<&'static FunctionSpec> {
    let upper = name.trim().to_ascii_uppercase();
    registry().get(&upper).copied()
}

/// Evaluate a registered function.
///
/// Unknown names produce `#NAME?`; an argument count outside the function's arity produces
/// `#VALUE!`.
pub fn call_function(ctx: &dyn FunctionContext, name: &str, args: &[Value]) -> Value {
    let spec = match lookup_function(name) {
        Some(spec) => spec,
        None => return Value::Error(ErrorKind::Name),
    };

    if args.len() < spec.min_args || args.len() > spec.max_args {
        log::debug!(
            "{} called with {} arguments; expected {}..={}",
            spec.name,
            args.len(),
            spec.min_args,
            spec.max_args
        );
        return Value::Error(ErrorKind::Value);
    }

    (spec.implementation)(ctx, args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_functions_are_registered() {
        for name in ["TIME", "HOUR", "MINUTE", "SECOND", "TIMEVALUE"] {
            let spec = lookup_function(name).unwrap_or_else(|| panic!("{name} not registered"));
            assert_eq!(spec.return_type, ValueType::Number);
        }
        assert!(lookup_function("time").is_some());

        let time = lookup_function("TIME").unwrap();
        assert_eq!((time.min_args, time.max_args), (3, 3));
        assert_eq!(time.arg_types, &[ValueType::Number; 3]);
        assert_eq!(lookup_function("TIMEVALUE").unwrap().arg_types, &[ValueType::Text]);
        assert_eq!(lookup_function("HOUR").unwrap().arg_types, &[ValueType::Any]);
    }

    #[test]
    fn unknown_function_is_name_error() {
        let ctx = EvalContext::default();
        assert_eq!(
            call_function(&ctx, "NOSUCHFUNC", &[]),
            Value::Error(ErrorKind::Name)
        );
    }

    #[test]
    fn arity_is_checked_before_dispatch() {
        let ctx = EvalContext::default();
        assert_eq!(
            call_function(&ctx, "TIME", &[Value::Number(1.0)]),
            Value::Error(ErrorKind::Value)
        );
        assert_eq!(
            call_function(&ctx, "HOUR", &[Value::Missing, Value::Missing]),
            Value::Error(ErrorKind::Value)
        );
    }
}

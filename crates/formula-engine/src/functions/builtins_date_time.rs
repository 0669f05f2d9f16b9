use chrono::{NaiveTime, Timelike};

use crate::coercion::coerce_to_number;
use crate::functions::date_time;
use crate::functions::{FunctionContext, FunctionSpec, ValueType};
use crate::value::{ErrorKind, Value};

inventory::submit! {
    FunctionSpec {
        name: "TIME",
        min_args: 3,
        max_args: 3,
        return_type: ValueType::Number,
        arg_types: &[ValueType::Number, ValueType::Number, ValueType::Number],
        implementation: time_fn,
    }
}

fn time_fn(ctx: &dyn FunctionContext, args: &[Value]) -> Value {
    match time_from_parts(ctx, &args[0], &args[1], &args[2]) {
        Ok(v) => Value::Number(v),
        Err(e) => Value::Error(e),
    }
}

inventory::submit! {
    FunctionSpec {
        name: "HOUR",
        min_args: 1,
        max_args: 1,
        return_type: ValueType::Number,
        arg_types: &[ValueType::Any],
        implementation: hour_fn,
    }
}

fn hour_fn(ctx: &dyn FunctionContext, args: &[Value]) -> Value {
    map_time_of_day(ctx, &args[0], |t| t.hour())
}

inventory::submit! {
    FunctionSpec {
        name: "MINUTE",
        min_args: 1,
        max_args: 1,
        return_type: ValueType::Number,
        arg_types: &[ValueType::Any],
        implementation: minute_fn,
    }
}

fn minute_fn(ctx: &dyn FunctionContext, args: &[Value]) -> Value {
    map_time_of_day(ctx, &args[0], |t| t.minute())
}

inventory::submit! {
    FunctionSpec {
        name: "SECOND",
        min_args: 1,
        max_args: 1,
        return_type: ValueType::Number,
        arg_types: &[ValueType::Any],
        implementation: second_fn,
    }
}

fn second_fn(ctx: &dyn FunctionContext, args: &[Value]) -> Value {
    map_time_of_day(ctx, &args[0], |t| t.second())
}

inventory::submit! {
    FunctionSpec {
        name: "TIMEVALUE",
        min_args: 1,
        max_args: 1,
        return_type: ValueType::Number,
        arg_types: &[ValueType::Text],
        implementation: timevalue_fn,
    }
}

fn timevalue_fn(ctx: &dyn FunctionContext, args: &[Value]) -> Value {
    match &args[0] {
        Value::Text(s) => match date_time::timevalue(s, ctx.value_locale()) {
            Ok(v) => Value::Number(v),
            Err(e) => Value::Error(e.into()),
        },
        Value::Error(e) => Value::Error(*e),
        _ => Value::Error(ErrorKind::Value),
    }
}

fn time_from_parts(
    ctx: &dyn FunctionContext,
    hour: &Value,
    minute: &Value,
    second: &Value,
) -> Result<f64, ErrorKind> {
    let hour = coerce_to_i64_trunc(ctx, hour)?;
    let minute = coerce_to_i64_trunc(ctx, minute)?;
    let second = coerce_to_i64_trunc(ctx, second)?;
    Ok(date_time::time(hour, minute, second))
}

fn map_time_of_day(
    ctx: &dyn FunctionContext,
    value: &Value,
    f: impl FnOnce(NaiveTime) -> u32,
) -> Value {
    let time = coerce_to_finite_number(ctx, value)
        .and_then(|serial| date_time::time_of_day(serial).map_err(ErrorKind::from));
    match time {
        Ok(t) => Value::Number(f64::from(f(t))),
        Err(e) => Value::Error(e),
    }
}

fn coerce_to_finite_number(ctx: &dyn FunctionContext, v: &Value) -> Result<f64, ErrorKind> {
    let n = coerce_to_number(v, ctx.value_locale())?;
    if !n.is_finite() {
        return Err(ErrorKind::Num);
    }
    Ok(n)
}

fn coerce_to_i64_trunc(ctx: &dyn FunctionContext, v: &Value) -> Result<i64, ErrorKind> {
    let n = coerce_to_finite_number(ctx, v)?;
    let t = n.trunc();
    if t < (i64::MIN as f64) || t >= (i64::MAX as f64) {
        return Err(ErrorKind::Num);
    }
    Ok(t as i64)
}

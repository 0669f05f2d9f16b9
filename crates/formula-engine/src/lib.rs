#![forbid(unsafe_code)]
#![deny(unreachable_patterns)]

//! Spreadsheet time functions and their display.
//!
//! The crate evaluates the Excel time built-ins (`TIME`, `HOUR`, `MINUTE`, `SECOND`,
//! `TIMEVALUE`) over already-evaluated argument [`Value`]s. Functions are registered at link
//! time with [`inventory`] and dispatched by name through [`call_function`]; an omitted
//! argument such as the hour in `TIME(,0,0)` is passed as [`Value::Missing`].
//!
//! Results are fractions of a day. [`display::format_value_for_display`] renders them through
//! an Excel number format code such as `hh:mm:ss` using [`formula_format`].
//!
//! ```
//! use formula_engine::{call_function, display, EvalContext, Value};
//!
//! let ctx = EvalContext::default();
//! let args = [Value::Number(18.0), Value::Number(49.0), Value::Number(61.0)];
//! let v = call_function(&ctx, "TIME", &args);
//! let shown = display::format_value_for_display(&v, Some("hh:mm:ss"), &Default::default());
//! assert_eq!(shown.text, "18:50:01");
//! ```

pub mod coercion;
pub mod display;
pub mod error;
pub mod functions;
pub mod value;

pub use crate::error::{ExcelError, ExcelResult};
pub use coercion::ValueLocaleConfig;
pub use functions::{call_function, lookup_function, EvalContext, FunctionContext, FunctionSpec};
pub use value::{ErrorKind, Value};

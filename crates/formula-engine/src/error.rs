use thiserror::Error;

use crate::value::ErrorKind;

/// Failures of the numeric/text helpers behind the built-in functions.
///
/// Helpers return [`ExcelResult`]; function implementations convert the error into an
/// [`ErrorKind`] so it surfaces as a spreadsheet error value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExcelError {
    /// The input has the wrong type or cannot be parsed (`#VALUE!`).
    #[error("#VALUE!")]
    Value,
    /// The input is a number outside the function's domain (`#NUM!`).
    #[error("#NUM!")]
    Num,
}

pub type ExcelResult<T> = Result<T, ExcelError>;

impl From<ExcelError> for ErrorKind {
    fn from(err: ExcelError) -> Self {
        match err {
            ExcelError::Value => ErrorKind::Value,
            ExcelError::Num => ErrorKind::Num,
        }
    }
}

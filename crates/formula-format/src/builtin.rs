use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder prefix used by importers for built-in number formats whose code is implied by
/// the id (`__builtin_numFmtId:21`).
pub const BUILTIN_NUM_FMT_ID_PLACEHOLDER_PREFIX: &str = "__builtin_numFmtId:";

/// First id available to workbook-defined (custom) number formats.
pub const FIRST_CUSTOM_NUM_FMT_ID: u16 = 164;

/// Built-in format ids relevant to time display. Calendar formats (14-17, 22) are not listed.
const BUILTIN_FORMATS: &[(u16, &str)] = &[
    (0, "General"),
    (18, "h:mm AM/PM"),
    (19, "h:mm:ss AM/PM"),
    (20, "h:mm"),
    (21, "h:mm:ss"),
    (45, "mm:ss"),
    (46, "[h]:mm:ss"),
    (47, "mmss.0"),
];

pub fn builtin_format_code(id: u16) -> Option<&'static str> {
    BUILTIN_FORMATS
        .iter()
        .find(|(builtin_id, _)| *builtin_id == id)
        .map(|(_, code)| *code)
}

pub fn builtin_format_id(code: &str) -> Option<u16> {
    BUILTIN_FORMATS
        .iter()
        .find(|(_, builtin)| builtin.eq_ignore_ascii_case(code))
        .map(|(id, _)| *id)
}

/// Resolve a `__builtin_numFmtId:<id>` placeholder.
///
/// Returns `None` when `code` is not a placeholder. Placeholders for ids without a known code
/// resolve to `General` so the placeholder text never reaches the rendered output.
pub fn resolve_builtin_placeholder(code: &str) -> Option<&'static str> {
    let id = code.strip_prefix(BUILTIN_NUM_FMT_ID_PLACEHOLDER_PREFIX)?;
    let code = id
        .trim()
        .parse::<u16>()
        .ok()
        .and_then(builtin_format_code)
        .unwrap_or("General");
    Some(code)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataFormatError {
    #[error("no custom number format ids left (last id is {})", u16::MAX)]
    TableFull,
}

/// A workbook's number format table: built-in ids plus custom codes registered on demand.
///
/// Asking for a code that is already known returns its existing id, so a style can call
/// [`DataFormatTable::get_or_insert`] with the same code repeatedly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFormatTable {
    /// Custom codes; the code at index `i` has id `FIRST_CUSTOM_NUM_FMT_ID + i`.
    custom: Vec<String>,
}

impl DataFormatTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, code: &str) -> Option<u16> {
        if let Some(id) = builtin_format_id(code) {
            return Some(id);
        }
        self.custom
            .iter()
            .position(|existing| existing == code)
            .and_then(custom_id)
    }

    pub fn get_or_insert(&mut self, code: &str) -> Result<u16, DataFormatError> {
        if let Some(id) = self.lookup(code) {
            return Ok(id);
        }
        let id = custom_id(self.custom.len()).ok_or(DataFormatError::TableFull)?;
        self.custom.push(code.to_string());
        log::debug!("registered custom number format {id}: {code:?}");
        Ok(id)
    }

    pub fn format_code(&self, id: u16) -> Option<&str> {
        if id < FIRST_CUSTOM_NUM_FMT_ID {
            return builtin_format_code(id);
        }
        self.custom
            .get(usize::from(id - FIRST_CUSTOM_NUM_FMT_ID))
            .map(String::as_str)
    }

    pub fn custom_formats(&self) -> impl Iterator<Item = (u16, &str)> {
        self.custom
            .iter()
            .enumerate()
            .filter_map(|(idx, code)| custom_id(idx).map(|id| (id, code.as_str())))
    }
}

fn custom_id(index: usize) -> Option<u16> {
    u16::try_from(index)
        .ok()
        .and_then(|idx| FIRST_CUSTOM_NUM_FMT_ID.checked_add(idx))
}

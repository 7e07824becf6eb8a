//! Header lookups for the two columns every localization table must carry.
//!
//! Column names are compared after trimming surrounding whitespace and
//! lowercasing, so `" Russian "` in a header matches the expected `russian`.
//! The key and value columns are located independently per file; the
//! reference and target tables may order their columns differently.

use std::path::Path;

use crate::error::PatchError;

/// Header of the column holding the text key shared by both tables.
pub const TEXT_KEY_COLUMN: &str = "Text Key (internal use only)";
/// Header of the column whose values are merged into the target.
pub const RUSSIAN_COLUMN: &str = "russian";

pub fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Zero-based index of the first header matching `expected` after normalization.
pub fn find_column_index(headers: &[String], expected: &str) -> Option<usize> {
    let expected = normalize_header(expected);
    headers
        .iter()
        .position(|column| normalize_header(column) == expected)
}

pub fn require_column(headers: &[String], expected: &str, path: &Path) -> Result<usize, PatchError> {
    find_column_index(headers, expected).ok_or_else(|| PatchError::ColumnNotFound {
        expected: expected.to_string(),
        path: path.to_path_buf(),
    })
}

/// Positions of the key and value columns within one file's header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredColumns {
    pub key: usize,
    pub value: usize,
}

impl RequiredColumns {
    pub fn locate(headers: &[String], path: &Path) -> Result<Self, PatchError> {
        let key = require_column(headers, TEXT_KEY_COLUMN, path)?;
        let value = require_column(headers, RUSSIAN_COLUMN, path)?;
        Ok(Self { key, value })
    }
}

//! Loads the reference table into a key → replacement lookup.

use std::{collections::HashMap, path::Path};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::{columns::RequiredColumns, error::PatchError, io_utils};

/// Trimmed text key → replacement value. Later rows overwrite earlier ones.
pub type ReferenceMap = HashMap<String, String>;

pub fn load_reference(path: &Path) -> Result<ReferenceMap> {
    if !path.is_file() {
        return Err(PatchError::FileNotFound {
            role: "Reference",
            path: path.to_path_buf(),
        }
        .into());
    }

    let mut reader = io_utils::open_csv_reader_from_path(path)?;
    let headers = io_utils::reader_headers(&mut reader)
        .with_context(|| format!("Reading headers from {path:?}"))?;
    let columns = RequiredColumns::locate(&headers, path)?;
    debug!(
        "Reference columns in {:?}: key={} value={}",
        path, columns.key, columns.value
    );

    let mut map = ReferenceMap::new();
    let mut duplicates = 0usize;
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Reading row {} in {path:?}", idx + 2))?;
        let row = io_utils::record_to_row(&record);
        let key = io_utils::safe_get(&row, columns.key).trim();
        if key.is_empty() {
            continue;
        }
        let value = io_utils::safe_get(&row, columns.value).to_string();
        if map.insert(key.to_string(), value).is_some() {
            duplicates += 1;
        }
    }

    if duplicates > 0 {
        debug!(
            "{} duplicate key(s) in {:?}; last occurrence kept",
            duplicates, path
        );
    }
    info!("Loaded {} reference key(s) from {:?}", map.len(), path);
    Ok(map)
}

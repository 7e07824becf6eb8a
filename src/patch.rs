//! Streams the target table, rewriting its `russian` column from the reference map.
//!
//! The target is never edited in place: rows are written to a temporary
//! sibling file which replaces the target by rename only after every row has
//! been written and synced. Any failure before that rename leaves the target
//! exactly as it was (the temporary file is removed on drop). Empty lines in
//! the target survive the rewrite as empty rows.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use csv::StringRecord;
use log::{debug, info};
use tempfile::NamedTempFile;

use crate::{
    backup,
    columns::RequiredColumns,
    error::PatchError,
    io_utils,
    reference::{self, ReferenceMap},
};

/// A blank line as the csv writer terminates records.
const EMPTY_ROW: &[u8] = b"\r\n";

#[derive(Debug, Clone)]
pub struct PatchConfig {
    pub target: PathBuf,
    pub reference: PathBuf,
    /// Let an empty reference value blank a non-empty target cell.
    pub allow_empty_replacement: bool,
}

impl PatchConfig {
    pub fn new(target: impl Into<PathBuf>, reference: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            reference: reference.into(),
            allow_empty_replacement: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchSummary {
    pub backup_path: PathBuf,
    pub changed_rows: usize,
    pub missing_keys: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Changed,
    Unchanged,
    /// Non-empty key with no reference entry.
    MissingKey,
}

pub fn patch_row(
    row: &mut Vec<String>,
    columns: RequiredColumns,
    reference: &ReferenceMap,
    allow_empty_replacement: bool,
) -> RowOutcome {
    let key = io_utils::safe_get(row, columns.key).trim();
    if key.is_empty() {
        return RowOutcome::Unchanged;
    }
    let Some(replacement) = reference.get(key) else {
        return RowOutcome::MissingKey;
    };
    if replacement.is_empty() && !allow_empty_replacement {
        return RowOutcome::Unchanged;
    }

    io_utils::ensure_row_length(row, columns.value + 1);
    if row[columns.value] == *replacement {
        return RowOutcome::Unchanged;
    }
    row[columns.value] = replacement.clone();
    RowOutcome::Changed
}

pub fn patch_target(config: &PatchConfig) -> Result<PatchSummary> {
    let target = config.target.as_path();
    if !target.is_file() {
        return Err(PatchError::FileNotFound {
            role: "Target",
            path: target.to_path_buf(),
        }
        .into());
    }
    let reference = reference::load_reference(&config.reference)?;

    let with_bom = io_utils::has_utf8_bom(target)?;
    let mut reader = io_utils::open_csv_reader_from_path(target)?;
    let headers = io_utils::reader_headers(&mut reader)
        .with_context(|| format!("Reading headers from {target:?}"))?;
    let columns = RequiredColumns::locate(&headers, target)?;
    debug!(
        "Target columns in {:?}: key={} value={} (bom={})",
        target, columns.key, columns.value, with_bom
    );
    let mut blank_lines = io_utils::BlankLineTracker::open(target)?;
    blank_lines.skipped_before(reader.position().byte())?;

    let backup_path = backup::create_backup(target)?;

    let mut temp = NamedTempFile::new_in(parent_dir(target))
        .with_context(|| format!("Creating temporary file next to {target:?}"))?;
    let mut changed_rows = 0usize;
    let mut missing_keys = 0usize;
    let mut total_rows = 0usize;
    let mut empty_rows = 0usize;
    {
        let file = temp.as_file_mut();
        if with_bom {
            file.write_all(io_utils::UTF8_BOM)
                .context("Writing byte-order mark")?;
        }
        let mut writer = io_utils::open_csv_writer(file);
        writer
            .write_record(&headers)
            .context("Writing output headers")?;

        let mut record = StringRecord::new();
        let mut line = 1usize;
        loop {
            let more = reader
                .read_record(&mut record)
                .with_context(|| format!("Reading row after line {line} in {target:?}"))?;

            // empty lines the parser skipped are rows too; write them back bare
            let skipped = blank_lines.skipped_before(reader.position().byte())?;
            if skipped > 0 {
                writer.flush().context("Flushing output writer")?;
                for _ in 0..skipped {
                    (&**writer.get_ref())
                        .write_all(EMPTY_ROW)
                        .context("Writing empty row")?;
                }
                empty_rows += skipped;
                line += skipped;
            }
            if !more {
                break;
            }
            line += 1;

            let mut row = io_utils::record_to_row(&record);
            match patch_row(
                &mut row,
                columns,
                &reference,
                config.allow_empty_replacement,
            ) {
                RowOutcome::Changed => changed_rows += 1,
                RowOutcome::MissingKey => missing_keys += 1,
                RowOutcome::Unchanged => {}
            }
            writer
                .write_record(&row)
                .with_context(|| format!("Writing output row {line}"))?;
            total_rows += 1;
        }
        writer.flush().context("Flushing output writer")?;
    }
    drop(reader);

    temp.as_file()
        .sync_all()
        .context("Syncing temporary output file")?;
    let permissions = fs::metadata(target)
        .with_context(|| format!("Reading metadata of {target:?}"))?
        .permissions();
    fs::set_permissions(temp.path(), permissions)
        .context("Copying permissions to temporary output file")?;
    temp.persist(target)
        .map_err(|err| err.error)
        .with_context(|| format!("Replacing {target:?}"))?;

    info!(
        "Patched {} of {} row(s) in {:?}; {} key(s) missing from reference, {} empty row(s) kept",
        changed_rows, total_rows, target, missing_keys, empty_rows
    );
    Ok(PatchSummary {
        backup_path,
        changed_rows,
        missing_keys,
    })
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

//! Timestamped backup copies taken before the target file is rewritten.
//!
//! `localization.csv` is copied to `localization.bak_20240115_153045.csv` in
//! the same directory. The copy keeps the source permissions and timestamps
//! and is verified by SHA-256 digest before the caller proceeds.

use std::{
    ffi::OsString,
    fs::{self, File, FileTimes},
    io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use log::{debug, info};
use sha2::{Digest, Sha256};

use crate::error::PatchError;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `<stem>.bak_<timestamp><.ext>` next to `path`.
pub fn backup_path_for(path: &Path, timestamp: NaiveDateTime) -> PathBuf {
    let mut name = OsString::from(path.file_stem().unwrap_or_default());
    name.push(format!(".bak_{}", timestamp.format(TIMESTAMP_FORMAT)));
    if let Some(extension) = path.extension() {
        name.push(".");
        name.push(extension);
    }
    path.with_file_name(name)
}

pub fn create_backup(path: &Path) -> Result<PathBuf> {
    let backup = backup_path_for(path, Local::now().naive_local());
    copy_with_metadata(path, &backup)
        .with_context(|| format!("Creating backup {backup:?} of {path:?}"))?;

    let expected = file_digest(path)?;
    let actual = file_digest(&backup)?;
    if expected != actual {
        return Err(PatchError::BackupMismatch { path: backup }.into());
    }
    debug!("Backup digest sha256:{}", expected);
    info!("Backed up {:?} to {:?}", path, backup);
    Ok(backup)
}

fn copy_with_metadata(source: &Path, destination: &Path) -> Result<()> {
    fs::copy(source, destination)?;
    let metadata = fs::metadata(source)?;
    let times = FileTimes::new()
        .set_accessed(metadata.accessed()?)
        .set_modified(metadata.modified()?);
    // fs::copy leaves a read-only source's copy read-only as well
    let file = File::options()
        .write(true)
        .open(destination)
        .or_else(|_| File::open(destination))?;
    file.set_times(times)?;
    Ok(())
}

pub fn file_digest(path: &Path) -> Result<String> {
    let mut file = File::open(path).with_context(|| format!("Opening {path:?} for hashing"))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).with_context(|| format!("Hashing {path:?}"))?;
    let digest = hasher.finalize();
    Ok(digest.iter().map(|byte| format!("{byte:02x}")).collect())
}

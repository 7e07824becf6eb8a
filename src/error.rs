use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a patch run before the target file is replaced.
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("{role} file not found: {path:?}")]
    FileNotFound { role: &'static str, path: PathBuf },
    #[error("Required column not found: '{expected}' in {path:?}")]
    ColumnNotFound { expected: String, path: PathBuf },
    #[error("Backup {path:?} does not match the target contents")]
    BackupMismatch { path: PathBuf },
}

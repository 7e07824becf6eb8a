#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use ru_locfix::io_utils;
use tempfile::{TempDir, tempdir};

pub const KEY_HEADER: &str = "Text Key (internal use only)";

/// Scratch directory holding one reference table and one target table.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` verbatim under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Writes `rows` as properly quoted CSV and returns the path.
    pub fn write_rows(&self, name: &str, rows: &[Vec<String>]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let file = File::create(&path).expect("create temp file");
        let mut writer = io_utils::open_csv_writer(file);
        for row in rows {
            writer.write_record(row).expect("write row");
        }
        writer.flush().expect("flush rows");
        path
    }

    /// Every file name currently in the workspace, sorted.
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path())
            .expect("read workspace")
            .map(|entry| {
                entry
                    .expect("dir entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }
}

/// Header plus data rows, as read back through the crate's own reader.
pub fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = io_utils::open_csv_reader_from_path(path).expect("open csv");
    let mut rows = vec![io_utils::reader_headers(&mut reader).expect("headers")];
    for record in reader.records() {
        rows.push(io_utils::record_to_row(&record.expect("record")));
    }
    rows
}

pub fn backup_files(workspace: &TestWorkspace) -> Vec<String> {
    workspace
        .file_names()
        .into_iter()
        .filter(|name| name.contains(".bak_"))
        .collect()
}

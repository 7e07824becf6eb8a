//! CSV reader/writer construction and row helpers shared by the loader and patcher.
//!
//! - **Input**: UTF-8 with an optional byte-order mark. The BOM is stripped
//!   through `encoding_rs_io` so it never leaks into the first header name.
//! - **Shape**: rows may be shorter or longer than the header; readers and
//!   writers are built `flexible` and helpers pad or default missing fields.
//! - **Output**: minimal quoting with CRLF record terminators. The BOM is
//!   re-emitted only when the source file carried one.
//! - **Blank lines**: the `csv` parser skips empty lines. [`BlankLineTracker`]
//!   follows the same byte stream so callers can write them back.

use std::{
    fs::File,
    io::{BufReader, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow, bail};
use csv::{QuoteStyle, StringRecord, Terminator};
use encoding_rs_io::{DecodeReaderBytes, DecodeReaderBytesBuilder};

pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub type LocalizationReader = csv::Reader<DecodeReaderBytes<File, Vec<u8>>>;

pub fn open_csv_reader<R>(reader: R) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(b',')
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

pub fn open_csv_reader_from_path(path: &Path) -> Result<LocalizationReader> {
    let file = File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
    Ok(open_csv_reader(decode_input(file)))
}

fn decode_input(file: File) -> DecodeReaderBytes<File, Vec<u8>> {
    DecodeReaderBytesBuilder::new()
        .bom_sniffing(true)
        .utf8_passthru(true)
        .strip_bom(true)
        .build(file)
}

/// Walks the decoded input in step with a [`LocalizationReader`], counting the
/// empty lines the parser discarded ahead of each record.
pub struct BlankLineTracker {
    raw: BufReader<DecodeReaderBytes<File, Vec<u8>>>,
    offset: u64,
    pending_lf: bool,
    span: Vec<u8>,
}

impl BlankLineTracker {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
        Ok(Self {
            raw: BufReader::new(decode_input(file)),
            offset: 0,
            pending_lf: false,
            span: Vec::new(),
        })
    }

    /// Consumes input up to the reader position `end` and returns how many
    /// empty lines precede the record (or end of input) found there.
    pub fn skipped_before(&mut self, end: u64) -> Result<usize> {
        let len = end
            .checked_sub(self.offset)
            .ok_or_else(|| anyhow!("Reader position {end} is behind byte {}", self.offset))?;
        self.span.clear();
        (&mut self.raw)
            .take(len)
            .read_to_end(&mut self.span)
            .context("Reading raw input")?;
        if self.span.len() as u64 != len {
            bail!("Input ended before byte {end}");
        }
        self.offset = end;

        let skip_lf = self.pending_lf;
        if let Some(&last) = self.span.last() {
            self.pending_lf = last == b'\r';
        }
        Ok(count_leading_blank_lines(&self.span, skip_lf))
    }
}

/// Line terminators (CRLF, LF or lone CR) before the first content byte.
/// `skip_lf` drops a leading `\n` that completes the previous record's CRLF.
pub fn count_leading_blank_lines(span: &[u8], skip_lf: bool) -> usize {
    let span = match span {
        [b'\n', rest @ ..] if skip_lf => rest,
        _ => span,
    };
    let mut bytes = span.iter().peekable();
    let mut count = 0;
    while let Some(&byte) = bytes.next() {
        match byte {
            b'\n' => count += 1,
            b'\r' => {
                count += 1;
                bytes.next_if_eq(&&b'\n');
            }
            _ => break,
        }
    }
    count
}

pub fn open_csv_writer<W>(writer: W) -> csv::Writer<W>
where
    W: Write,
{
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(b',')
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true)
        .terminator(Terminator::CRLF)
        .flexible(true);
    builder.from_writer(writer)
}

pub fn has_utf8_bom(path: &Path) -> Result<bool> {
    let file = File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
    let mut prefix = Vec::with_capacity(UTF8_BOM.len());
    file.take(UTF8_BOM.len() as u64)
        .read_to_end(&mut prefix)
        .with_context(|| format!("Reading {path:?}"))?;
    Ok(prefix == UTF8_BOM)
}

pub fn reader_headers<R>(reader: &mut csv::Reader<R>) -> Result<Vec<String>>
where
    R: Read,
{
    let headers = reader.headers().context("Reading header row")?;
    Ok(record_to_row(headers))
}

pub fn record_to_row(record: &StringRecord) -> Vec<String> {
    record.iter().map(str::to_string).collect()
}

/// Field at `idx`, or the empty string when the row is too short.
pub fn safe_get(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

pub fn ensure_row_length(row: &mut Vec<String>, len: usize) {
    if row.len() < len {
        row.resize(len, String::new());
    }
}

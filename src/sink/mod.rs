use crate::harvest::Record;
use crate::{Error, Result};
use csv::{QuoteStyle, WriterBuilder};
use serde_json::Value;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Entity kinds persisted by a harvest, one destination each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Account,
    Repository,
}

impl EntityKind {
    /// Base name of the destination file
    pub fn file_stem(&self) -> &'static str {
        match self {
            EntityKind::Account => "users",
            EntityKind::Repository => "repositories",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.csv", self.file_stem())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// Append-only destination for shaped records
pub trait RecordSink {
    fn write(&mut self, record: &Record) -> Result<()>;
}

/// Collects records in memory
impl RecordSink for Vec<Record> {
    fn write(&mut self, record: &Record) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// CSV file for one entity kind.
///
/// The first record written fixes the header. Later records are projected
/// onto it: missing keys become empty cells, extra keys are not written.
/// Every cell is quoted.
pub struct CsvSink {
    kind: EntityKind,
    path: PathBuf,
    writer: Option<csv::Writer<File>>,
    header: Option<Vec<String>>,
    rows: usize,
}

impl CsvSink {
    /// Create (or truncate) `<dir>/<kind>.csv`
    pub fn create(kind: EntityKind, dir: &Path) -> Result<Self> {
        let path = dir.join(kind.file_name());
        let file = File::create(&path)?;
        let writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .from_writer(file);

        debug!("Opened {} sink at {}", kind, path.display());

        Ok(Self {
            kind,
            path,
            writer: Some(writer),
            header: None,
            rows: 0,
        })
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows written so far, header excluded
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and sync the file. Consumes the sink, so it runs once.
    pub fn finish(mut self) -> Result<usize> {
        if let Some(writer) = self.writer.take() {
            let file = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
            file.sync_all()?;
        }
        debug!("Closed {} sink after {} rows", self.kind, self.rows);
        Ok(self.rows)
    }
}

impl RecordSink for CsvSink {
    fn write(&mut self, record: &Record) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| Error::Internal(format!("{} sink already closed", self.kind)))?;

        if self.header.is_none() {
            let header: Vec<String> = record.keys().cloned().collect();
            writer.write_record(&header)?;
            self.header = Some(header);
        }
        let header = self.header.as_deref().unwrap_or_default();

        writer.write_record(header.iter().map(|key| cell(record.get(key))))?;
        self.rows += 1;
        Ok(())
    }
}

impl Drop for CsvSink {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            if let Err(e) = writer.flush() {
                warn!("Failed to flush {} sink on drop: {}", self.kind, e);
            }
        }
    }
}

/// Render one JSON value as a CSV cell
fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

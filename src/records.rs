//! Per-sample increment logs and the run-wide failure ledger.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{LogError, RunError};
use crate::geometry::Point;
use crate::loads::LoadPair;

/// Column header of a sample log.
pub const LOG_HEADER: &str = "Incre\tTip_x\tTip_y\tKI\tKII\tTensile\tShear";

/// One completed increment.
///
/// `tip` is where the increment started, i.e. the tip before advancing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncrementRecord {
    /// Increment index within the sample.
    pub increment: u32,
    /// Tip before this increment advanced it.
    pub tip: Point,
    /// Mode-I stress-intensity factor.
    pub k1: f64,
    /// Mode-II stress-intensity factor.
    pub k2: f64,
    /// Stage loads in force during the increment.
    pub loads: LoadPair,
}

impl IncrementRecord {
    /// Tab-separated row in [`LOG_HEADER`] column order.
    #[must_use]
    pub fn to_row(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.increment,
            self.tip.x,
            self.tip.y,
            self.k1,
            self.k2,
            self.loads.tensile,
            self.loads.shear
        )
    }
}

/// Append-only text log for one sample.
///
/// Rows are flushed as they are written so an abandoned sample keeps every
/// increment it completed.
#[derive(Debug)]
pub struct SampleLog {
    /// Location of the log.
    path: PathBuf,
    /// Buffered handle.
    writer: BufWriter<File>,
    /// Number of data rows written.
    rows: usize,
}

impl SampleLog {
    /// Create the log and write its title and header lines.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Io`] when the file cannot be created.
    pub fn create(path: impl Into<PathBuf>, sample: u32) -> Result<Self, RunError> {
        let path = path.into();
        let file = File::create(&path).map_err(|error| RunError::io(&path, error))?;
        let mut log = Self {
            path,
            writer: BufWriter::new(file),
            rows: 0,
        };
        log.write_line(&format!("sample{sample}"))?;
        log.write_line(LOG_HEADER)?;
        Ok(log)
    }

    /// Append one increment.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Io`] when the row cannot be written.
    pub fn append(&mut self, record: &IncrementRecord) -> Result<(), RunError> {
        self.write_line(&record.to_row())?;
        self.rows += 1;
        Ok(())
    }

    /// Number of data rows written so far.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Location of the log.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write and flush one line so the file survives an abandoned sample.
    fn write_line(&mut self, line: &str) -> Result<(), RunError> {
        writeln!(self.writer, "{line}")
            .and_then(|()| self.writer.flush())
            .map_err(|error| RunError::io(&self.path, error))
    }
}

/// Read the data rows of a sample log.
///
/// The title and header lines are skipped; blank lines are ignored.
///
/// # Errors
///
/// Returns [`LogError`] when the file cannot be read or a row is malformed.
pub fn read_log(path: &Path) -> Result<Vec<IncrementRecord>, LogError> {
    let contents = fs::read_to_string(path).map_err(|source| LogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_log(&contents)
}

/// Parse the text of a sample log.
///
/// # Errors
///
/// Returns [`LogError::MalformedRow`] for any row without seven numeric columns.
pub fn parse_log(contents: &str) -> Result<Vec<IncrementRecord>, LogError> {
    let mut records = Vec::new();
    for (index, line) in contents.lines().enumerate().skip(2) {
        if line.trim().is_empty() {
            continue;
        }
        let malformed = |reason: String| LogError::MalformedRow {
            line: index + 1,
            reason,
        };
        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.len() != 7 {
            return Err(malformed(format!("expected 7 columns, found {}", columns.len())));
        }
        let increment = columns[0]
            .parse::<u32>()
            .map_err(|error| malformed(format!("increment: {error}")))?;
        let mut values = [0.0; 6];
        for (slot, column) in values.iter_mut().zip(&columns[1..]) {
            *slot = column
                .parse::<f64>()
                .map_err(|error| malformed(format!("`{column}`: {error}")))?;
        }
        records.push(IncrementRecord {
            increment,
            tip: Point::new(values[0], values[1]),
            k1: values[2],
            k2: values[3],
            loads: LoadPair::new(values[4], values[5]),
        });
    }
    Ok(records)
}

/// Append-only list of abandoned samples shared by the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureLedger {
    /// Location of the ledger.
    path: PathBuf,
}

impl FailureLedger {
    /// Point at a ledger file; nothing is created until the first entry.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the ledger.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record an abandoned sample.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Io`] when the ledger cannot be appended to.
    pub fn record(&self, sample: u32) -> Result<(), RunError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|error| RunError::io(&self.path, error))?;
        writeln!(file, "sample{sample}").map_err(|error| RunError::io(&self.path, error))
    }

    /// Identifiers recorded so far, in order.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Io`] when an existing ledger cannot be read.
    pub fn entries(&self) -> Result<Vec<u32>, RunError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents =
            fs::read_to_string(&self.path).map_err(|error| RunError::io(&self.path, error))?;
        Ok(contents
            .lines()
            .filter_map(|line| line.trim().strip_prefix("sample"))
            .filter_map(|id| id.parse().ok())
            .collect())
    }
}

//! Error types produced while configuring runs and growing cracks.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error that ends the current sample but never the whole run.
///
/// Each variant indicates the crack geometry reached a state the analysis
/// cannot resolve, so the sample is abandoned rather than retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StepError {
    /// Returned when the analysis engine aborted before producing a usable artifact.
    #[error("analysis job {job} did not complete: {reason}")]
    EngineFailure {
        /// Name of the job that failed.
        job: String,
        /// Description reported by the engine adapter.
        reason: String,
    },
    /// Returned when the artifact exists but lacks the required tagged records.
    #[error("result artifact {path:?} is malformed: {reason}")]
    MalformedResult {
        /// Location of the offending artifact.
        path: PathBuf,
        /// Which record was missing or unreadable.
        reason: String,
    },
    /// Returned when the stress-intensity factors do not define a propagation angle.
    #[error("propagation angle is undefined for KI = {k1}, KII = {k2}")]
    DegenerateAngle {
        /// Mode-I stress-intensity factor.
        k1: f64,
        /// Mode-II stress-intensity factor.
        k2: f64,
    },
}

/// Error returned when a generation config is unreadable or not physically meaningful.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Returned when the config file cannot be read.
    #[error("cannot read config {path:?}: {source}")]
    Read {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Returned when the document is not valid TOML for this schema.
    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// Returned when a length, size or count must be strictly positive.
    #[error("{field} must be positive (received {value})")]
    NonPositive {
        /// Dotted name of the offending key.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// Returned when a coordinate or limit is NaN or infinite.
    #[error("{field} must be finite (received {value})")]
    NotFinite {
        /// Dotted name of the offending key.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// Returned when a partition plane does not lie strictly inside the plate.
    #[error("partition fraction {0} is outside (0, 1)")]
    PartitionOutOfRange(f64),
    /// Returned when the last sample identifier does not fit in a `u32`.
    #[error("samples {first_id} + {count} overflow the identifier range")]
    SampleRangeOverflow {
        /// Identifier of the first sample.
        first_id: u32,
        /// Number of samples.
        count: u32,
    },
    /// Returned when the seed crack holds fewer than two points.
    #[error("seed path needs at least two points (received {0})")]
    SeedPathTooShort(usize),
    /// Returned when the vertical band of the domain is empty or inverted.
    #[error("y bounds are inverted: min {min} >= max {max}")]
    InvalidBounds {
        /// Lower y bound.
        min: f64,
        /// Upper y bound.
        max: f64,
    },
    /// Returned when a load distribution cannot be sampled.
    #[error("invalid {which} load distribution: {reason}")]
    InvalidDistribution {
        /// Either `tensile` or `shear`.
        which: &'static str,
        /// Description from the distribution constructor.
        reason: String,
    },
}

/// Error that aborts the whole run because the setup itself is defective.
#[derive(Debug, Error)]
pub enum RunError {
    /// Returned when a sample directory, log or request file cannot be written.
    #[error("i/o failure at {path:?}: {source}")]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Returned when the configuration is rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RunError {
    /// Attach a path to an I/O failure.
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure of a single increment, split by how far it propagates.
#[derive(Debug, Error)]
pub enum IncrementError {
    /// Ends the current sample.
    #[error(transparent)]
    Sample(#[from] StepError),
    /// Ends the run.
    #[error(transparent)]
    Fatal(#[from] RunError),
}

/// Error returned when reading a sample log back from disk.
#[derive(Debug, Error)]
pub enum LogError {
    /// Returned when the log cannot be read.
    #[error("cannot read log {path:?}: {source}")]
    Io {
        /// Path of the log.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Returned when a data row does not hold seven numeric columns.
    #[error("line {line}: {reason}")]
    MalformedRow {
        /// One-based line number within the file.
        line: usize,
        /// What was wrong with the row.
        reason: String,
    },
}

/// Error returned by fatigue-life integration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LifeError {
    /// Returned when the log holds too few rows to interpolate.
    #[error("need at least two logged increments (received {0})")]
    TooFewRows(usize),
    /// Returned when fewer than two resampling stations are requested.
    #[error("need at least two stations (received {0})")]
    TooFewStations(usize),
    /// Returned when a resampling station lies outside the logged x range.
    #[error("x = {x} lies outside the logged path [{min}, {max}]")]
    OutOfRange {
        /// Requested station.
        x: f64,
        /// Smallest logged x.
        min: f64,
        /// Largest logged x.
        max: f64,
    },
    /// Returned when the effective stress-intensity factor vanishes on a segment.
    #[error("effective stress intensity is not positive on segment {index}")]
    NonPositiveIntensity {
        /// Zero-based segment index.
        index: usize,
    },
}

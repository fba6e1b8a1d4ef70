//! Parse fracture-mechanics quantities out of the engine's text report.
//!
//! The report holds a stress-intensity table per crack. The `K1:` row lists
//! mode-I values for each contour ring and the row right below it lists mode-II
//! values. The first ring sits too close to the tip to be trusted, so both
//! factors average rings two through five. The local propagation direction is
//! the last three numbers on the first row tagged
//! `LOCAL DIRECTION OF VIRTUAL CRACK PROPAGATION`.

use std::fs;
use std::path::Path;

use nalgebra::Vector2;

use crate::errors::StepError;

/// Tag of the mode-I stress-intensity row.
pub const K1_TAG: &str = "K1:";

/// Tag of the local propagation direction row.
pub const DIRECTION_TAG: &str = "LOCAL DIRECTION OF VIRTUAL CRACK PROPAGATION";

/// Stress-intensity factors and local direction read from one analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisResult {
    /// Mode-I stress-intensity factor.
    pub k1: f64,
    /// Mode-II stress-intensity factor.
    pub k2: f64,
    /// In-plane local propagation direction.
    pub direction: Vector2<f64>,
}

/// Read and parse a report from disk.
///
/// # Errors
///
/// Returns [`StepError::MalformedResult`] when the file cannot be read or lacks
/// either tagged record.
pub fn extract(artifact: &Path) -> Result<AnalysisResult, StepError> {
    let contents = fs::read_to_string(artifact).map_err(|error| StepError::MalformedResult {
        path: artifact.to_path_buf(),
        reason: error.to_string(),
    })?;
    parse_report(&contents).map_err(|reason| StepError::MalformedResult {
        path: artifact.to_path_buf(),
        reason,
    })
}

/// Parse report text.
///
/// When several `K1:` records are present the last one wins, matching the
/// final solver increment.
///
/// # Errors
///
/// Returns a description of the missing or unreadable record.
///
/// # Examples
/// ```
/// use crackx::parse_report;
///
/// let report = "\
///  XFEM_1       K1:   9.0   10.0   10.0   10.0   10.0
///               K2:   0.5    1.0    1.0    1.0    1.0
///  XFEM_1  LOCAL DIRECTION OF VIRTUAL CRACK PROPAGATION   1.0   0.0   0.0
/// ";
/// let result = parse_report(report).unwrap();
/// assert_eq!(result.k1, 10.0);
/// assert_eq!(result.k2, 1.0);
/// ```
pub fn parse_report(contents: &str) -> Result<AnalysisResult, String> {
    let lines: Vec<&str> = contents.lines().map(str::trim).collect();

    let k1_row = lines
        .iter()
        .rposition(|line| line.split_whitespace().any(|token| token == K1_TAG))
        .ok_or_else(|| format!("no `{K1_TAG}` record"))?;
    let k1_tokens: Vec<&str> = lines[k1_row].split_whitespace().collect();
    let tag_at = k1_tokens
        .iter()
        .position(|token| *token == K1_TAG)
        .ok_or_else(|| format!("no `{K1_TAG}` record"))?;
    // skip the tag and the first contour
    let k1 = mean_of(&k1_tokens, tag_at + 2, "K1")?;

    let k2_line = lines
        .get(k1_row + 1)
        .ok_or_else(|| "no mode-II record after `K1:`".to_owned())?;
    let k2_tokens: Vec<&str> = k2_line.split_whitespace().collect();
    let k2 = mean_of(&k2_tokens, 2, "K2")?;

    let direction_line = lines
        .iter()
        .find(|line| line.contains(DIRECTION_TAG))
        .ok_or_else(|| format!("no `{DIRECTION_TAG}` record"))?;
    let direction_tokens: Vec<&str> = direction_line.split_whitespace().collect();
    if direction_tokens.len() < 3 {
        return Err("direction record holds fewer than three components".to_owned());
    }
    let components = &direction_tokens[direction_tokens.len() - 3..];
    let x = parse_number(components[0], "direction")?;
    let y = parse_number(components[1], "direction")?;

    Ok(AnalysisResult {
        k1,
        k2,
        direction: Vector2::new(x, y),
    })
}

/// Average four consecutive contour values starting at `start`.
fn mean_of(tokens: &[&str], start: usize, label: &str) -> Result<f64, String> {
    let values = tokens
        .get(start..start + 4)
        .ok_or_else(|| format!("{label} record holds fewer than five contours"))?;
    let mut sum = 0.0;
    for value in values {
        sum += parse_number(value, label)?;
    }
    Ok(sum / 4.0)
}

/// Parse one numeric token, naming `label` on failure.
fn parse_number(token: &str, label: &str) -> Result<f64, String> {
    token
        .parse::<f64>()
        .map_err(|_| format!("{label} value `{token}` is not a number"))
}

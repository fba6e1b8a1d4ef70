//! Fatigue life of a finished crack path by Paris-law integration.
//!
//! The logged path is resampled at equally spaced x stations. Each segment
//! between stations then gets cycles `N = Δa / (C · K_eff^m)`, where K_eff is
//! the effective stress-intensity factor `sqrt(KI² + KII²)` interpolated at the
//! middle of the segment along the logged crack length.

use serde::{Deserialize, Serialize};

use crate::errors::LifeError;
use crate::geometry::Point;
use crate::records::IncrementRecord;

/// Paris-law constants, `da/dN = C · ΔK^m`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParisLaw {
    /// Coefficient.
    pub c: f64,
    /// Exponent.
    pub m: f64,
}

impl Default for ParisLaw {
    fn default() -> Self {
        Self { c: 9.7e-12, m: 3.0 }
    }
}

/// Resampling stations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stations {
    /// First station x.
    pub x_start: f64,
    /// Last station x.
    pub x_end: f64,
    /// Number of stations, both ends included.
    pub count: usize,
}

impl Default for Stations {
    fn default() -> Self {
        Self {
            x_start: 1.0,
            x_end: 8.6,
            count: 41,
        }
    }
}

/// Life of one segment between consecutive stations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentLife {
    /// Segment length.
    pub increment: f64,
    /// Crack length at the segment midpoint.
    pub crack_length: f64,
    /// Effective stress-intensity factor at the midpoint.
    pub k_eff: f64,
    /// Cycles spent growing across the segment, truncated.
    pub cycles: u64,
}

/// Integrate cycles over a logged path.
///
/// # Errors
///
/// Returns [`LifeError`] when the log is too short, a station falls outside
/// the logged range or the effective stress intensity vanishes.
pub fn integrate_life(
    records: &[IncrementRecord],
    law: ParisLaw,
    stations: Stations,
) -> Result<Vec<SegmentLife>, LifeError> {
    if records.len() < 2 {
        return Err(LifeError::TooFewRows(records.len()));
    }
    if stations.count < 2 {
        return Err(LifeError::TooFewStations(stations.count));
    }

    let mut by_x: Vec<(f64, f64)> = records.iter().map(|r| (r.tip.x, r.tip.y)).collect();
    by_x.sort_by(|a, b| a.0.total_cmp(&b.0));
    let (xs, ys): (Vec<f64>, Vec<f64>) = by_x.into_iter().unzip();

    let spacing = (stations.x_end - stations.x_start) / (stations.count - 1) as f64;
    let resampled = (0..stations.count)
        .map(|j| {
            let x = stations.x_start + spacing * j as f64;
            interpolate(&xs, &ys, x).map(|y| Point::new(x, y))
        })
        .collect::<Result<Vec<_>, _>>()?;

    // logged crack length at every row
    let mut logged_length = Vec::with_capacity(records.len());
    let mut total = 0.0;
    for (index, record) in records.iter().enumerate() {
        if index > 0 {
            total += records[index - 1].tip.distance_to(record.tip);
        }
        logged_length.push(total);
    }
    let logged_k_eff: Vec<f64> = records.iter().map(|r| r.k1.hypot(r.k2)).collect();

    let mut segments = Vec::with_capacity(resampled.len() - 1);
    let mut length = 0.0;
    for (index, pair) in resampled.windows(2).enumerate() {
        let increment = pair[0].distance_to(pair[1]);
        length += increment;
        let crack_length = length - increment / 2.0;
        let k_eff = interpolate(&logged_length, &logged_k_eff, crack_length)?;
        if k_eff.is_nan() || k_eff <= 0.0 {
            return Err(LifeError::NonPositiveIntensity { index });
        }
        let cycles = (increment / (law.c * k_eff.powf(law.m))) as u64;
        segments.push(SegmentLife {
            increment,
            crack_length,
            k_eff,
            cycles,
        });
    }
    Ok(segments)
}

/// Piecewise-linear interpolation over ascending `xs`.
fn interpolate(xs: &[f64], ys: &[f64], x: f64) -> Result<f64, LifeError> {
    let min = xs[0];
    let max = xs[xs.len() - 1];
    if !(min..=max).contains(&x) {
        return Err(LifeError::OutOfRange { x, min, max });
    }
    let upper = xs.partition_point(|&v| v < x).max(1);
    let (x0, x1) = (xs[upper - 1], xs[upper]);
    let (y0, y1) = (ys[upper - 1], ys[upper]);
    if x1 == x0 {
        return Ok(y0);
    }
    Ok(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::point;
    use crate::loads::LoadPair;

    /// Horizontal path from x = 1 to x = 9.1 under constant KI.
    fn straight_log(k1: f64) -> Vec<IncrementRecord> {
        (0..28)
            .map(|i| IncrementRecord {
                increment: i,
                tip: point(1.0 + 0.3 * f64::from(i), 10.0),
                k1,
                k2: 0.0,
                loads: LoadPair::new(200.0, 0.0),
            })
            .collect()
    }

    #[test]
    fn constant_intensity_gives_uniform_cycles() {
        let segments =
            integrate_life(&straight_log(10.0), ParisLaw::default(), Stations::default())
                .expect("integrable");
        assert_eq!(segments.len(), 40);
        for segment in &segments {
            assert_relative_eq!(segment.increment, 0.19, epsilon = 1.0e-9);
            assert_relative_eq!(segment.k_eff, 10.0, epsilon = 1.0e-9);
            // 0.19 / (9.7e-12 * 1000)
            assert!((19_587_627..=19_587_629).contains(&segment.cycles));
        }
        assert_relative_eq!(segments[0].crack_length, 0.095, epsilon = 1.0e-9);
    }

    #[test]
    fn higher_intensity_shortens_life() {
        let low = integrate_life(&straight_log(10.0), ParisLaw::default(), Stations::default())
            .expect("integrable");
        let high = integrate_life(&straight_log(20.0), ParisLaw::default(), Stations::default())
            .expect("integrable");
        // cubic law
        let ratio = low[0].cycles as f64 / high[0].cycles as f64;
        assert_relative_eq!(ratio, 8.0, epsilon = 1.0e-4);
    }

    #[test]
    fn stations_beyond_log_are_rejected() {
        let stations = Stations {
            x_end: 12.0,
            ..Stations::default()
        };
        let error = integrate_life(&straight_log(10.0), ParisLaw::default(), stations)
            .expect_err("station past the tip");
        assert!(matches!(error, LifeError::OutOfRange { .. }));
    }

    #[test]
    fn short_log_is_rejected() {
        let log = &straight_log(10.0)[..1];
        assert_eq!(
            integrate_life(log, ParisLaw::default(), Stations::default()),
            Err(LifeError::TooFewRows(1))
        );
    }

    #[test]
    fn interpolation_is_linear_between_nodes() {
        let value = interpolate(&[0.0, 1.0, 3.0], &[0.0, 2.0, 6.0], 2.0).expect("in range");
        assert_relative_eq!(value, 4.0, epsilon = 1.0e-12);
        let value = interpolate(&[0.0, 1.0, 3.0], &[0.0, 2.0, 6.0], 0.0).expect("in range");
        assert_relative_eq!(value, 0.0, epsilon = 1.0e-12);
    }
}

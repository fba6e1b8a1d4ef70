//! Mixed-mode propagation direction and tip advance.
//!
//! The deflection follows the maximum tangential stress criterion of Erdogan
//! and Sih:
//!
//! ```text
//! deflect = acos((3 KII² + sqrt(KI⁴ + 8 KI² KII²)) / (KI² + 9 KII²))
//! ```
//!
//! Counter-clockwise is positive. The deflection takes the sign of KII, so a
//! positive mode-II factor turns the crack counter-clockwise. That is the
//! opposite of the engine's own convention.

use nalgebra::Vector2;

use crate::errors::StepError;
use crate::geometry::Point;

/// Global propagation angle in degrees from the positive X axis.
///
/// # Errors
///
/// Returns [`StepError::DegenerateAngle`] when both factors are zero or any input
/// is not finite.
///
/// # Examples
/// ```
/// use crackx::propagation_angle;
/// use nalgebra::Vector2;
///
/// let angle = propagation_angle(1.0, 1.0, Vector2::new(1.0, 0.0)).unwrap();
/// assert!((angle - 53.130_102_354_155_98).abs() < 1.0e-9);
/// ```
pub fn propagation_angle(k1: f64, k2: f64, direction: Vector2<f64>) -> Result<f64, StepError> {
    let degenerate = || StepError::DegenerateAngle { k1, k2 };
    if (k1 == 0.0 && k2 == 0.0) || !k1.is_finite() || !k2.is_finite() {
        return Err(degenerate());
    }
    let current = direction.y.atan2(direction.x).to_degrees();

    let k1_sq = k1 * k1;
    let k2_sq = k2 * k2;
    let ratio =
        (3.0 * k2_sq + (k1_sq * k1_sq + 8.0 * k1_sq * k2_sq).sqrt()) / (k1_sq + 9.0 * k2_sq);
    // round-off can push the ratio just past one
    let magnitude = ratio.clamp(-1.0, 1.0).acos().to_degrees();
    let deflection = if k2 >= 0.0 { magnitude } else { -magnitude };

    let angle = current + deflection;
    if angle.is_finite() {
        Ok(angle)
    } else {
        Err(degenerate())
    }
}

/// Move `tip` by `step_length` along `angle_degrees`.
///
/// # Examples
/// ```
/// use crackx::{advance, point};
///
/// let next = advance(point(1.0, 10.0), 90.0, 0.3);
/// assert!((next.x - 1.0).abs() < 1.0e-12);
/// assert!((next.y - 10.3).abs() < 1.0e-12);
/// ```
#[must_use]
pub fn advance(tip: Point, angle_degrees: f64, step_length: f64) -> Point {
    let radians = angle_degrees.to_radians();
    let offset = step_length * Vector2::new(radians.cos(), radians.sin());
    Point::from(tip.to_vector() + offset)
}

//! Interior joint angle from three keypoints.

use crate::{constants::EPSILON, skeleton::Point, Error, Result};

/// Angle at `vertex` between the rays towards `a` and `c`, in degrees.
///
/// The result is always within `[0, 180]`.
///
/// # Errors
///
/// Returns `Error::DegenerateGeometry` if either ray has zero length or
/// non-finite components, which happens when keypoints collapse onto each
/// other or were not detected.
pub fn joint_angle(a: Point, vertex: Point, c: Point) -> Result<f64> {
    let ray_a = a - vertex;
    let ray_c = c - vertex;

    let norm_a = ray_a.norm();
    let norm_c = ray_c.norm();

    if !(norm_a.is_finite() && norm_c.is_finite()) {
        return Err(Error::DegenerateGeometry(format!(
            "non-finite ray at vertex ({:.1}, {:.1})",
            vertex.x, vertex.y
        )));
    }
    if norm_a < EPSILON || norm_c < EPSILON {
        return Err(Error::DegenerateGeometry(format!(
            "zero-length ray at vertex ({:.1}, {:.1})",
            vertex.x, vertex.y
        )));
    }

    let cos = (ray_a.dot(&ray_c) / (norm_a * norm_c)).clamp(-1.0, 1.0);
    let degrees = cos.acos().to_degrees();

    // acos already stays in [0, 180]; reduce anything reflex from rounding
    Ok(if degrees > 180.0 { 360.0 - degrees } else { degrees })
}

//! Planar angle computation over detected landmarks.

use crate::constants::GEOMETRY_EPSILON;
use crate::{Error, Result};

/// Compute the included angle at `vertex` between `p1` and `p3`, in degrees.
///
/// The angle is the inverse cosine of the normalized dot product of the
/// vectors vertex→p1 and vertex→p3, so the result lies in [0, 180]. The
/// cosine is clamped to [-1, 1] first; floating-point rounding can push it
/// slightly outside that range for collinear points, which would otherwise
/// make `acos` return NaN. Swapping `p1` and `p3` leaves the result
/// unchanged.
///
/// # Errors
///
/// Returns [`Error::DegenerateGeometry`] if either neighbor coincides with
/// the vertex (zero-length vector).
pub fn angle_at_vertex(p1: (f64, f64), vertex: (f64, f64), p3: (f64, f64)) -> Result<f64> {
    let a = (p1.0 - vertex.0, p1.1 - vertex.1);
    let b = (p3.0 - vertex.0, p3.1 - vertex.1);

    let norm_a = (a.0 * a.0 + a.1 * a.1).sqrt();
    let norm_b = (b.0 * b.0 + b.1 * b.1).sqrt();
    if norm_a < GEOMETRY_EPSILON || norm_b < GEOMETRY_EPSILON {
        return Err(Error::DegenerateGeometry(
            "angle neighbor coincides with the vertex".to_string(),
        ));
    }

    let cosine = ((a.0 * b.0 + a.1 * b.1) / (norm_a * norm_b)).clamp(-1.0, 1.0);
    Ok(cosine.acos().to_degrees())
}

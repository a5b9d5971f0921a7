use nalgebra::{Rotation3, Unit};

use super::{Vector3, TOLERANCE};

/// Removes the component of `v` along the unit vector `normal`.
#[must_use]
pub fn slide(v: &Vector3, normal: &Vector3) -> Vector3 {
    v - normal * v.dot(normal)
}

/// Rotates `v` about `axis` by `angle` radians (right-handed).
///
/// A zero-length axis leaves `v` unchanged.
#[must_use]
pub fn rotated(v: &Vector3, axis: &Vector3, angle: f64) -> Vector3 {
    if angle == 0.0 {
        return *v;
    }
    match Unit::try_new(*axis, TOLERANCE) {
        Some(axis) => Rotation3::from_axis_angle(&axis, angle) * v,
        None => *v,
    }
}

/// Normalizes `v`, returning `fallback` when `v` is (nearly) zero.
#[must_use]
pub fn normalize_or(v: &Vector3, fallback: Vector3) -> Vector3 {
    v.try_normalize(TOLERANCE).unwrap_or(fallback)
}

/// Returns some unit vector perpendicular to `v`.
///
/// Crosses `v` with the coordinate axis it is least aligned with. A zero
/// input yields +X.
#[must_use]
pub fn any_perpendicular(v: &Vector3) -> Vector3 {
    let abs = v.abs();
    let axis = if abs.x <= abs.y && abs.x <= abs.z {
        Vector3::x()
    } else if abs.y <= abs.z {
        Vector3::y()
    } else {
        Vector3::z()
    };
    normalize_or(&v.cross(&axis), Vector3::x())
}

mod bezier;
mod polyline;

pub use bezier::{BezierPath, BezierPoint};
pub use polyline::PolylineCurve;

use crate::math::Point3;

/// Strategy used to turn a centerline into discrete samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TessellationMode {
    /// Samples pre-baked at a fixed arc-length interval.
    Baked,
    /// Samples placed wherever the curve turns by more than a tolerance angle.
    #[default]
    Adaptive,
    /// The raw control points, no tessellation.
    Disabled,
}

/// One sampled point of a centerline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterlineSample {
    /// Position on the curve.
    pub position: Point3,
    /// Roll angle about the curve tangent, in radians.
    pub tilt: f64,
}

impl CenterlineSample {
    /// Creates a new sample.
    #[must_use]
    pub fn new(position: Point3, tilt: f64) -> Self {
        Self { position, tilt }
    }
}

/// Source of the path a sweep follows.
///
/// Implementations own all curve math (evaluation, arc-length tables); the
/// sweep only consumes the sampled sequence.
pub trait Centerline {
    /// Samples the curve in order from start to end.
    ///
    /// For closed curves the sequence does not repeat the first sample at the
    /// end. `tolerance` is the adaptive angle tolerance in degrees and is
    /// ignored by the other modes.
    fn sample_centerline(&self, mode: TessellationMode, tolerance: f64) -> Vec<CenterlineSample>;

    /// Returns whether the curve loops back to its first point.
    fn is_closed(&self) -> bool;

    /// Returns the total arc length of the baked curve.
    fn baked_length(&self) -> f64;
}

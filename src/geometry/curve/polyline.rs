use crate::math::Point3;

use super::{Centerline, CenterlineSample, TessellationMode};

/// A centerline given directly by its control points.
///
/// Every tessellation mode returns the control points unchanged.
#[derive(Debug, Clone, Default)]
pub struct PolylineCurve {
    points: Vec<Point3>,
    tilts: Vec<f64>,
    closed: bool,
}

impl PolylineCurve {
    /// Creates a polyline with zero tilt at every point.
    #[must_use]
    pub fn new(points: Vec<Point3>, closed: bool) -> Self {
        let tilts = vec![0.0; points.len()];
        Self {
            points,
            tilts,
            closed,
        }
    }

    /// Sets per-point tilt angles (radians).
    ///
    /// Missing entries are treated as zero and extra entries are ignored.
    #[must_use]
    pub fn with_tilts(mut self, mut tilts: Vec<f64>) -> Self {
        tilts.resize(self.points.len(), 0.0);
        self.tilts = tilts;
        self
    }

    /// Returns the control points.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }
}

impl Centerline for PolylineCurve {
    fn sample_centerline(&self, _mode: TessellationMode, _tolerance: f64) -> Vec<CenterlineSample> {
        self.points
            .iter()
            .zip(&self.tilts)
            .map(|(p, t)| CenterlineSample::new(*p, *t))
            .collect()
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn baked_length(&self) -> f64 {
        let open: f64 = self.points.windows(2).map(|w| (w[1] - w[0]).norm()).sum();
        match (self.closed, self.points.first(), self.points.last()) {
            (true, Some(first), Some(last)) => open + (first - last).norm(),
            _ => open,
        }
    }
}

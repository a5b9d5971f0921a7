use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Centerline, CenterlineSample, TessellationMode};

/// Default spacing between baked samples.
const DEFAULT_BAKE_INTERVAL: f64 = 0.2;

/// Smallest accepted bake interval.
const MIN_BAKE_INTERVAL: f64 = 0.001;

/// Maximum recursion depth of adaptive tessellation.
const MAX_ADAPTIVE_STAGES: u32 = 5;

/// Dense samples per bake interval used to build the arc-length table.
const DENSE_SAMPLES_PER_INTERVAL: f64 = 4.0;

/// Upper bound on dense samples per segment.
const MAX_DENSE_SAMPLES_PER_SEGMENT: f64 = 4096.0;

/// A control point of a [`BezierPath`].
///
/// Handles are relative to `position`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierPoint {
    pub position: Point3,
    pub handle_in: Vector3,
    pub handle_out: Vector3,
    /// Roll angle about the tangent, in radians.
    pub tilt: f64,
}

impl BezierPoint {
    /// Creates a control point without handles or tilt.
    #[must_use]
    pub fn new(position: Point3) -> Self {
        Self {
            position,
            handle_in: Vector3::zeros(),
            handle_out: Vector3::zeros(),
            tilt: 0.0,
        }
    }

    /// Sets the incoming and outgoing handles.
    #[must_use]
    pub fn with_handles(mut self, handle_in: Vector3, handle_out: Vector3) -> Self {
        self.handle_in = handle_in;
        self.handle_out = handle_out;
        self
    }

    /// Sets the tilt angle.
    #[must_use]
    pub fn with_tilt(mut self, tilt: f64) -> Self {
        self.tilt = tilt;
        self
    }
}

/// One cubic span between two consecutive control points.
#[derive(Debug, Clone, Copy)]
struct CubicSegment {
    p0: Point3,
    p1: Point3,
    p2: Point3,
    p3: Point3,
    tilt0: f64,
    tilt1: f64,
}

impl CubicSegment {
    fn between(a: &BezierPoint, b: &BezierPoint) -> Self {
        Self {
            p0: a.position,
            p1: a.position + a.handle_out,
            p2: b.position + b.handle_in,
            p3: b.position,
            tilt0: a.tilt,
            tilt1: b.tilt,
        }
    }

    fn point_at(&self, t: f64) -> Point3 {
        let mt = 1.0 - t;
        let coords = self.p0.coords * (mt * mt * mt)
            + self.p1.coords * (3.0 * mt * mt * t)
            + self.p2.coords * (3.0 * mt * t * t)
            + self.p3.coords * (t * t * t);
        Point3::from(coords)
    }

    fn tilt_at(&self, t: f64) -> f64 {
        self.tilt0 + (self.tilt1 - self.tilt0) * t
    }

    fn sample_at(&self, t: f64) -> CenterlineSample {
        CenterlineSample::new(self.point_at(t), self.tilt_at(t))
    }

    fn control_polygon_length(&self) -> f64 {
        (self.p1 - self.p0).norm() + (self.p2 - self.p1).norm() + (self.p3 - self.p2).norm()
    }

    /// Collects, in increasing order, the parameters inside `(begin, end)` at
    /// which the curve turns by more than the tolerance.
    fn subdivide(&self, begin: f64, end: f64, depth: u32, min_dot: f64, out: &mut Vec<f64>) {
        let mid = 0.5 * (begin + end);
        let start = self.point_at(begin);
        let middle = self.point_at(mid);
        let finish = self.point_at(end);

        let turns = match (
            (middle - start).try_normalize(TOLERANCE),
            (finish - middle).try_normalize(TOLERANCE),
        ) {
            (Some(a), Some(b)) => a.dot(&b) < min_dot,
            _ => false,
        };

        if depth < MAX_ADAPTIVE_STAGES {
            self.subdivide(begin, mid, depth + 1, min_dot, out);
        }
        if turns {
            out.push(mid);
        }
        if depth < MAX_ADAPTIVE_STAGES {
            self.subdivide(mid, end, depth + 1, min_dot, out);
        }
    }
}

/// A piecewise cubic Bezier centerline with per-point tilt.
#[derive(Debug, Clone)]
pub struct BezierPath {
    points: Vec<BezierPoint>,
    closed: bool,
    bake_interval: f64,
}

impl Default for BezierPath {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            closed: false,
            bake_interval: DEFAULT_BAKE_INTERVAL,
        }
    }
}

impl BezierPath {
    /// Creates an empty path.
    #[must_use]
    pub fn new(closed: bool) -> Self {
        Self {
            closed,
            ..Self::default()
        }
    }

    /// Appends a control point.
    #[must_use]
    pub fn with_point(mut self, point: BezierPoint) -> Self {
        self.points.push(point);
        self
    }

    /// Appends a control point in place.
    pub fn add_point(&mut self, point: BezierPoint) {
        self.points.push(point);
    }

    /// Returns the control points.
    #[must_use]
    pub fn points(&self) -> &[BezierPoint] {
        &self.points
    }

    /// Returns the spacing between baked samples.
    #[must_use]
    pub fn bake_interval(&self) -> f64 {
        self.bake_interval
    }

    /// Sets the spacing between baked samples, clamped to a small positive minimum.
    pub fn set_bake_interval(&mut self, interval: f64) {
        self.bake_interval = if interval.is_finite() {
            interval.max(MIN_BAKE_INTERVAL)
        } else {
            DEFAULT_BAKE_INTERVAL
        };
    }

    fn segments(&self) -> Vec<CubicSegment> {
        let n = self.points.len();
        if n < 2 {
            return Vec::new();
        }
        let count = if self.closed { n } else { n - 1 };
        (0..count)
            .map(|i| CubicSegment::between(&self.points[i], &self.points[(i + 1) % n]))
            .collect()
    }

    fn control_samples(&self) -> Vec<CenterlineSample> {
        self.points
            .iter()
            .map(|p| CenterlineSample::new(p.position, p.tilt))
            .collect()
    }

    /// Densely samples every segment, ending with the path's final point
    /// (the first point again when closed).
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn dense_samples(&self) -> Vec<CenterlineSample> {
        let segments = self.segments();
        let mut dense = Vec::new();
        for seg in &segments {
            let steps = (seg.control_polygon_length() / self.bake_interval
                * DENSE_SAMPLES_PER_INTERVAL)
                .ceil()
                .clamp(1.0, MAX_DENSE_SAMPLES_PER_SEGMENT) as u32;
            for k in 0..steps {
                dense.push(seg.sample_at(f64::from(k) / f64::from(steps)));
            }
        }
        if let Some(last) = segments.last() {
            dense.push(last.sample_at(1.0));
        }
        dense
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn baked_samples(&self) -> Vec<CenterlineSample> {
        let dense = self.dense_samples();
        let lengths = cumulative_lengths(&dense);
        let total = lengths.last().copied().unwrap_or(0.0);
        if dense.len() < 2 || total < TOLERANCE {
            return self.control_samples();
        }

        let count = (total / self.bake_interval).round().max(1.0) as usize;
        let step = total / count as f64;
        let last_k = if self.closed { count - 1 } else { count };

        let mut baked = Vec::with_capacity(last_k + 1);
        let mut span = 0;
        for k in 0..=last_k {
            let target = step * k as f64;
            while span + 2 < dense.len() && lengths[span + 1] < target {
                span += 1;
            }
            let a = &dense[span];
            let b = &dense[span + 1];
            let span_len = lengths[span + 1] - lengths[span];
            let f = if span_len > TOLERANCE {
                ((target - lengths[span]) / span_len).clamp(0.0, 1.0)
            } else {
                0.0
            };
            baked.push(CenterlineSample::new(
                a.position + (b.position - a.position) * f,
                a.tilt + (b.tilt - a.tilt) * f,
            ));
        }
        baked
    }

    fn adaptive_samples(&self, tolerance_degrees: f64) -> Vec<CenterlineSample> {
        let segments = self.segments();
        if segments.is_empty() {
            return self.control_samples();
        }
        let min_dot = tolerance_degrees.to_radians().cos();
        let mut samples = Vec::new();
        let mut params = Vec::new();
        for seg in &segments {
            samples.push(seg.sample_at(0.0));
            params.clear();
            seg.subdivide(0.0, 1.0, 0, min_dot, &mut params);
            samples.extend(params.iter().map(|&t| seg.sample_at(t)));
        }
        if !self.closed {
            if let Some(last) = segments.last() {
                samples.push(last.sample_at(1.0));
            }
        }
        samples
    }
}

impl Centerline for BezierPath {
    fn sample_centerline(&self, mode: TessellationMode, tolerance: f64) -> Vec<CenterlineSample> {
        match mode {
            TessellationMode::Baked => self.baked_samples(),
            TessellationMode::Adaptive => self.adaptive_samples(tolerance),
            TessellationMode::Disabled => self.control_samples(),
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn baked_length(&self) -> f64 {
        cumulative_lengths(&self.dense_samples())
            .last()
            .copied()
            .unwrap_or(0.0)
    }
}

/// Returns the running arc length at each sample.
fn cumulative_lengths(samples: &[CenterlineSample]) -> Vec<f64> {
    let mut lengths = Vec::with_capacity(samples.len());
    let mut total = 0.0;
    for (i, s) in samples.iter().enumerate() {
        if i > 0 {
            total += (s.position - samples[i - 1].position).norm();
        }
        lengths.push(total);
    }
    lengths
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn straight() -> BezierPath {
        BezierPath::new(false)
            .with_point(BezierPoint::new(Point3::new(0.0, 0.0, 0.0)))
            .with_point(BezierPoint::new(Point3::new(4.0, 0.0, 0.0)).with_tilt(1.0))
    }

    /// Quarter-circle-like arc from +X to +Z built from tangent handles.
    fn arc() -> BezierPath {
        let k = 0.552_284_75 * 5.0;
        BezierPath::new(false)
            .with_point(
                BezierPoint::new(Point3::new(5.0, 0.0, 0.0))
                    .with_handles(Vector3::zeros(), Vector3::new(0.0, 0.0, k)),
            )
            .with_point(
                BezierPoint::new(Point3::new(0.0, 0.0, 5.0))
                    .with_handles(Vector3::new(k, 0.0, 0.0), Vector3::zeros()),
            )
    }

    #[test]
    fn straight_length() {
        assert_relative_eq!(straight().baked_length(), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn baked_samples_follow_interval() {
        let samples = straight().sample_centerline(TessellationMode::Baked, 4.0);
        // 4.0 / 0.2 = 20 intervals -> 21 samples.
        assert_eq!(samples.len(), 21);
        assert_relative_eq!(samples[10].position.x, 2.0, epsilon = 1e-9);
        assert_relative_eq!(samples[10].tilt, 0.5, epsilon = 1e-9);
        assert_relative_eq!(samples[20].position.x, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn straight_adaptive_has_only_endpoints() {
        let samples = straight().sample_centerline(TessellationMode::Adaptive, 4.0);
        assert_eq!(samples.len(), 2);
    }

    #[test]
    fn curved_adaptive_adds_points() {
        let coarse = arc().sample_centerline(TessellationMode::Adaptive, 20.0);
        let fine = arc().sample_centerline(TessellationMode::Adaptive, 2.0);
        assert!(coarse.len() > 2);
        assert!(fine.len() > coarse.len());
        for s in &fine {
            let r = (s.position.x * s.position.x + s.position.z * s.position.z).sqrt();
            assert!((r - 5.0).abs() < 0.01, "radius {r}");
        }
    }

    #[test]
    fn closed_baked_does_not_repeat_first_point() {
        let path = BezierPath::new(true)
            .with_point(BezierPoint::new(Point3::new(0.0, 0.0, 0.0)))
            .with_point(BezierPoint::new(Point3::new(1.0, 0.0, 0.0)))
            .with_point(BezierPoint::new(Point3::new(1.0, 0.0, 1.0)))
            .with_point(BezierPoint::new(Point3::new(0.0, 0.0, 1.0)));
        assert_relative_eq!(path.baked_length(), 4.0, epsilon = 1e-9);
        let samples = path.sample_centerline(TessellationMode::Baked, 4.0);
        assert_eq!(samples.len(), 20);
        let last = samples[samples.len() - 1].position;
        assert!((last - Point3::origin()).norm() > 0.1);
    }

    #[test]
    fn disabled_returns_control_points() {
        let samples = arc().sample_centerline(TessellationMode::Disabled, 4.0);
        assert_eq!(samples.len(), 2);
    }

    #[test]
    fn bake_interval_is_clamped() {
        let mut path = straight();
        path.set_bake_interval(-1.0);
        assert_relative_eq!(path.bake_interval(), MIN_BAKE_INTERVAL);
    }
}

use crate::geometry::{Centerline, CenterlineSample, WidthProfile};
use crate::math::vector_3d::{any_perpendicular, normalize_or, slide};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::tessellation::SweepStyle;

/// One sample along the centerline, with its local frame data.
#[derive(Debug, Clone, Copy)]
pub(super) struct CenterPoint {
    pub position: Point3,
    /// Direction arriving from the previous sample.
    pub tangent_prev: Vector3,
    /// Direction leaving towards the next sample.
    pub tangent_next: Vector3,
    /// Global up with its `tangent_next` component removed.
    pub local_up: Vector3,
    /// Arc length from the first sample.
    pub arc_length: f64,
    /// Stretch applied along the corner bisector so the section keeps its width.
    pub width_correction: f64,
    pub tilt: f64,
    /// Hard corner (or open end): never merged, never filtered.
    pub no_interleave: bool,
}

/// The sampled centerline of one rebuild.
#[derive(Debug, Clone)]
pub(super) struct SampledCenterline {
    pub points: Vec<CenterPoint>,
    /// Arc length of the whole path, including the closing span of closed curves.
    pub total_length: f64,
    pub closed: bool,
}

/// Samples `curve` and computes tangents, local up vectors, arc lengths and
/// corner data for every usable sample.
///
/// Returns `None` when fewer than two distinct samples remain.
pub(super) fn build(
    curve: &dyn Centerline,
    width: Option<&dyn WidthProfile>,
    style: &SweepStyle,
) -> Option<SampledCenterline> {
    let closed = curve.is_closed();
    let raw = curve.sample_centerline(style.tessellation_mode(), style.tessellation_tolerance());
    let mut samples = usable_samples(raw, closed);
    let n = samples.len();
    if n < 2 {
        return None;
    }

    // Direction of the span starting at each sample; the last entry is the
    // closing span for closed curves and a copy of the previous one otherwise.
    let mut span_dirs: Vec<Vector3> = samples
        .windows(2)
        .map(|w| normalize_or(&(w[1].position - w[0].position), Vector3::x()))
        .collect();
    let closing = samples[0].position - samples[n - 1].position;
    span_dirs.push(if closed {
        normalize_or(&closing, span_dirs[n - 2])
    } else {
        span_dirs[n - 2]
    });

    if style.extend_edges() && !closed {
        let sample_width = |u: f64| width.map_or(1.0, |w| w.sample(u));
        samples[0].position -= span_dirs[0] * (style.half_width() * sample_width(0.0));
        samples[n - 1].position += span_dirs[n - 2] * (style.half_width() * sample_width(1.0));
    }

    let corner_cos = style.corner_threshold().cos();
    let up = style.up_vector();
    let mut points: Vec<CenterPoint> = Vec::with_capacity(n);
    let mut arc_length = 0.0;

    for (i, sample) in samples.iter().enumerate() {
        if i > 0 {
            arc_length += (sample.position - samples[i - 1].position).norm();
        }

        let tangent_next = span_dirs[i];
        let tangent_prev = if i > 0 {
            span_dirs[i - 1]
        } else if closed {
            span_dirs[n - 1]
        } else {
            tangent_next
        };

        let previous_up = points.last().map(|p| p.local_up);
        let local_up = local_up_vector(&up, &tangent_next, previous_up);

        let cos_angle = tangent_prev.dot(&tangent_next).clamp(-1.0, 1.0);
        let width_correction = miter_scale(cos_angle, style.miter_limit());

        points.push(CenterPoint {
            position: sample.position,
            tangent_prev,
            tangent_next,
            local_up,
            arc_length,
            width_correction,
            tilt: sample.tilt,
            no_interleave: cos_angle < corner_cos,
        });
    }

    let mut total_length = arc_length;
    if closed {
        total_length += closing.norm();
    } else {
        points[0].no_interleave = true;
        points[n - 1].no_interleave = true;
    }

    Some(SampledCenterline {
        points,
        total_length,
        closed,
    })
}

/// Drops samples that coincide with their predecessor, and for closed curves
/// a trailing sample that repeats the first one.
fn usable_samples(raw: Vec<CenterlineSample>, closed: bool) -> Vec<CenterlineSample> {
    let mut samples: Vec<CenterlineSample> = Vec::with_capacity(raw.len());
    for sample in raw {
        if !sample.position.coords.iter().all(|c| c.is_finite()) {
            continue;
        }
        let distinct = samples
            .last()
            .is_none_or(|last| (sample.position - last.position).norm() > TOLERANCE);
        if distinct {
            samples.push(sample);
        }
    }
    if closed {
        while samples.len() > 1
            && (samples[samples.len() - 1].position - samples[0].position).norm() <= TOLERANCE
        {
            samples.pop();
        }
    }
    samples
}

/// Projects `up` onto the plane perpendicular to `tangent`.
///
/// When `up` is parallel to the tangent, the previous point's up vector is
/// projected instead, and failing that any perpendicular is used.
fn local_up_vector(up: &Vector3, tangent: &Vector3, previous: Option<Vector3>) -> Vector3 {
    if let Some(v) = slide(up, tangent).try_normalize(TOLERANCE) {
        return v;
    }
    previous
        .and_then(|p| slide(&p, tangent).try_normalize(TOLERANCE))
        .unwrap_or_else(|| any_perpendicular(tangent))
}

/// Spoke stretch `sqrt(2 / (1 + cos))` that keeps a mitered section at full
/// width, clamped to `limit`.
///
/// An exact reversal has no bisector to stretch along, so it gets no stretch.
fn miter_scale(cos_angle: f64, limit: f64) -> f64 {
    let denom = 1.0 + cos_angle;
    if denom <= TOLERANCE {
        return 1.0;
    }
    (2.0 / denom).sqrt().min(limit)
}

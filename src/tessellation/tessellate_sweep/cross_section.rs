use super::centerline::{CenterPoint, SampledCenterline};
use crate::geometry::WidthProfile;
use crate::math::vector_3d::{any_perpendicular, normalize_or, rotated};
use crate::math::{Point2, Point3, Vector3, TOLERANCE};
use crate::tessellation::{Profile, SweepStyle};

/// One candidate vertex of the swept surface.
///
/// Points live in a flat arena. Each radial slot threads its points into a
/// cyclic chain through `prev_point` / `next_point`; removal splices a point
/// out of its chain without moving anything in the arena.
#[derive(Debug, Clone, Copy)]
pub(super) struct EdgePoint {
    pub position: Point3,
    pub normal: Vector3,
    pub tangent: Vector3,
    pub uv: Point2,
    pub uv2: Point2,
    /// Index of the center point this point was emitted from.
    pub source_index: usize,
    /// Ribbon side: 0 or 1 for flat and cross profiles, always 0 for tubes.
    pub edge: usize,
    pub prev_point: usize,
    pub next_point: usize,
    /// Whether the surface continues to `prev_point`.
    pub prev_connected: bool,
    /// Whether the surface continues to `next_point`.
    pub next_connected: bool,
    pub removed: bool,
    /// Marked by the overlap filter for removal.
    pub filter: bool,
}

/// Lightmap layout shared by every ring of one rebuild.
#[derive(Debug, Clone, Copy)]
struct Uv2Layout {
    padding_h: f64,
    length_h: f64,
    length_v: f64,
    edge_padding: f64,
}

impl Uv2Layout {
    #[allow(clippy::cast_precision_loss)]
    fn new(total_length: f64, width: Option<&dyn WidthProfile>, style: &SweepStyle) -> Self {
        let padding = style.uv2_padding_world();
        let horizontal_total = total_length + 2.0 * padding;
        let (padding_h, length_h) = if horizontal_total > TOLERANCE {
            (padding / horizontal_total, total_length / horizontal_total)
        } else {
            (0.0, 1.0)
        };

        let length_v = 1.0 / style.radial_slots() as f64;
        let edge_padding = match style.profile() {
            Profile::Tube => length_v,
            Profile::Flat | Profile::Cross => {
                let max_width = style.width()
                    * width.map_or(1.0, |w| w.max_value().max(w.min_value()));
                let span = max_width + padding;
                if span > TOLERANCE {
                    length_v * max_width / span
                } else {
                    length_v
                }
            }
        };

        Self {
            padding_h,
            length_h,
            length_v,
            edge_padding,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn coordinate(&self, u: f64, edge: usize, slot: usize) -> Point2 {
        Point2::new(
            self.padding_h + u * self.length_h,
            edge as f64 * self.edge_padding + slot as f64 * self.length_v,
        )
    }
}

/// Emits the cross-section rings of every center point into one arena.
///
/// Each ring holds `edge_count * radial_slots` points, ordered by edge and
/// then by slot, so point `i` belongs to slot `i % radial_slots`. A hard
/// corner under hard shading gets a second ring right after the first with
/// the same positions and normals built from the outgoing tangent. Chain
/// links are left for [`super::link`]; only the seam between a ring and its
/// duplicate is marked here.
#[allow(clippy::cast_precision_loss)]
pub(super) fn emit(
    centerline: &SampledCenterline,
    curve_length: f64,
    width: Option<&dyn WidthProfile>,
    style: &SweepStyle,
) -> Vec<EdgePoint> {
    let profile = style.profile();
    let radial = style.radial_slots();
    let ring_size = radial * profile.edge_count();
    let uv2 = Uv2Layout::new(centerline.total_length, width, style);

    let mut points: Vec<EdgePoint> = Vec::with_capacity(centerline.points.len() * ring_size);
    for (source_index, center) in centerline.points.iter().enumerate() {
        let u = if centerline.total_length > TOLERANCE {
            center.arc_length / centerline.total_length
        } else {
            0.0
        };
        let local_width = width.map_or(1.0, |w| w.sample(u));
        let section = Section::new(center, style.half_width() * local_width);

        let hard_corner = !style.smooth_shaded_corners() && center.no_interleave;
        let shading_tangent = if hard_corner {
            center.tangent_prev
        } else {
            section.tangent
        };

        let uv_u = if style.scale_uv_by_length() {
            u * curve_length
        } else {
            u
        };
        let v_offset = if style.scale_uv_by_width() {
            0.5 * local_width
        } else {
            0.5
        };

        let ring_start = points.len();
        for edge in 0..profile.edge_count() {
            let side = if edge == 0 { 1.0 } else { -1.0 };
            for slot in 0..radial {
                let angle = slot as f64 * style.slot_angle();
                let uv_v = match profile {
                    Profile::Tube => slot as f64 / radial as f64,
                    Profile::Flat | Profile::Cross => 0.5 - side * v_offset,
                };
                points.push(EdgePoint {
                    position: center.position + section.spoke(angle) * side,
                    normal: section_normal(profile, &shading_tangent, &section.binormal, angle),
                    tangent: shading_tangent,
                    uv: Point2::new(uv_u, uv_v),
                    uv2: uv2.coordinate(u, edge, slot),
                    source_index,
                    edge,
                    prev_point: 0,
                    next_point: 0,
                    prev_connected: true,
                    next_connected: true,
                    removed: false,
                    filter: false,
                });
            }
        }

        if hard_corner {
            let ring_end = points.len();
            for index in ring_start..ring_end {
                let mut copy = points[index];
                let slot = index % radial;
                copy.tangent = center.tangent_next;
                copy.normal = section_normal(
                    profile,
                    &center.tangent_next,
                    &section.binormal,
                    slot as f64 * style.slot_angle(),
                );
                copy.prev_connected = false;
                points[index].next_connected = false;
                points.push(copy);
            }
        }
    }
    points
}

/// Local frame of one cross-section.
struct Section {
    /// Average of the incoming and outgoing tangents.
    tangent: Vector3,
    /// Sideways unit vector, already rolled by the point's tilt.
    binormal: Vector3,
    /// Half-width spoke along the binormal.
    base_spoke: Vector3,
    /// Corner bisector and its stretch, if the point is a corner.
    miter: Option<(Vector3, f64)>,
}

impl Section {
    fn new(center: &CenterPoint, half_width: f64) -> Self {
        let tangent = normalize_or(
            &(center.tangent_prev + center.tangent_next),
            center.tangent_prev,
        );
        let binormal = normalize_or(
            &tangent.cross(&center.local_up),
            any_perpendicular(&tangent),
        );
        let binormal = rotated(&binormal, &tangent, center.tilt);
        let miter = (center.tangent_prev - center.tangent_next)
            .try_normalize(TOLERANCE)
            .map(|dir| (dir, center.width_correction));
        Self {
            tangent,
            binormal,
            base_spoke: binormal * half_width,
            miter,
        }
    }

    /// The spoke rotated by `angle` about the tangent, stretched along the
    /// corner bisector.
    fn spoke(&self, angle: f64) -> Vector3 {
        let spoke = rotated(&self.base_spoke, &self.tangent, angle);
        match self.miter {
            Some((dir, scale)) => {
                let along = dir * spoke.dot(&dir);
                spoke - along + along * scale
            }
            None => spoke,
        }
    }
}

/// Vertex normal of the slot at `angle`.
///
/// Ribbons face `binormal × tangent`; tube normals point outward along the
/// spoke direction.
fn section_normal(profile: Profile, tangent: &Vector3, binormal: &Vector3, angle: f64) -> Vector3 {
    let face = normalize_or(&binormal.cross(tangent), any_perpendicular(tangent));
    let base = match profile {
        Profile::Tube => normalize_or(&tangent.cross(&face), *binormal),
        Profile::Flat | Profile::Cross => face,
    };
    rotated(&base, tangent, angle)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::super::centerline;
    use super::*;
    use crate::geometry::{PolylineCurve, WidthCurve};

    fn straight() -> PolylineCurve {
        PolylineCurve::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(5.0, 0.0, 0.0),
                Point3::new(10.0, 0.0, 0.0),
            ],
            false,
        )
    }

    fn emit_for(
        curve: &PolylineCurve,
        width: Option<&dyn WidthProfile>,
        style: &SweepStyle,
    ) -> Vec<EdgePoint> {
        let line = centerline::build(curve, width, style).unwrap();
        emit(&line, 10.0, width, style)
    }

    #[test]
    fn flat_ring_layout() {
        let mut style = SweepStyle::new(Profile::Flat);
        style.set_width(2.0);
        let points = emit_for(&straight(), None, &style);
        assert_eq!(points.len(), 6);

        // Side 0 sits at +Z (binormal of +X tangent and +Y up), side 1 at -Z.
        assert_relative_eq!(points[0].position, Point3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(points[1].position, Point3::new(0.0, 0.0, -1.0));
        assert_eq!(points[0].edge, 0);
        assert_eq!(points[1].edge, 1);
        for p in &points {
            assert_relative_eq!(p.normal, Vector3::y(), epsilon = 1e-12);
            assert_relative_eq!(p.tangent, Vector3::x(), epsilon = 1e-12);
        }
    }

    #[test]
    fn flat_uvs() {
        let mut style = SweepStyle::new(Profile::Flat);
        style.set_scale_uv_by_length(true);
        let points = emit_for(&straight(), None, &style);
        assert_relative_eq!(points[0].uv, Point2::new(0.0, 0.0));
        assert_relative_eq!(points[1].uv, Point2::new(0.0, 1.0));
        assert_relative_eq!(points[3].uv, Point2::new(5.0, 1.0));
        assert_relative_eq!(points[4].uv, Point2::new(10.0, 0.0));
    }

    #[test]
    fn width_scaled_v() {
        let mut style = SweepStyle::new(Profile::Flat);
        style.set_scale_uv_by_width(true);
        let widths = WidthCurve::constant(2.0);
        let points = emit_for(&straight(), Some(&widths), &style);
        assert_relative_eq!(points[0].uv.y, -0.5);
        assert_relative_eq!(points[1].uv.y, 1.5);
    }

    #[test]
    fn tube_ring_is_round() {
        let mut style = SweepStyle::new(Profile::Tube);
        style.set_segments(6);
        let points = emit_for(&straight(), None, &style);
        assert_eq!(points.len(), 18);
        for (i, p) in points.iter().enumerate() {
            assert_eq!(p.edge, 0);
            let radial = Vector3::new(0.0, p.position.y, p.position.z);
            assert_relative_eq!(radial.norm(), 0.5, epsilon = 1e-12);
            // Outward normals.
            assert_relative_eq!(p.normal, radial.normalize(), epsilon = 1e-12);
            #[allow(clippy::cast_precision_loss)]
            let expected_v = (i % 6) as f64 / 6.0;
            assert_relative_eq!(p.uv.y, expected_v);
        }
    }

    #[test]
    fn cross_spokes_spread_over_half_turn() {
        let mut style = SweepStyle::new(Profile::Cross);
        style.set_segments(2);
        let points = emit_for(&straight(), None, &style);
        assert_eq!(points.len(), 12);
        // Slot 0 spans Z, slot 1 spans Y.
        assert_relative_eq!(points[0].position, Point3::new(0.0, 0.0, 0.5), epsilon = 1e-12);
        assert_relative_eq!(points[1].position, Point3::new(0.0, -0.5, 0.0), epsilon = 1e-12);
        assert_relative_eq!(points[2].position, Point3::new(0.0, 0.0, -0.5), epsilon = 1e-12);
        assert_relative_eq!(points[3].position, Point3::new(0.0, 0.5, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn corner_spoke_is_mitered() {
        let curve = PolylineCurve::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(4.0, 0.0, 0.0),
                Point3::new(4.0, 0.0, 4.0),
            ],
            false,
        );
        let mut style = SweepStyle::new(Profile::Flat);
        style.set_width(2.0);
        let points = emit_for(&curve, None, &style);
        // The corner ring lies on the miter line through (4, 0, 0) at 45 degrees.
        let inner = points[2].position;
        let outer = points[3].position;
        assert_relative_eq!(inner, Point3::new(3.0, 0.0, 1.0), epsilon = 1e-12);
        assert_relative_eq!(outer, Point3::new(5.0, 0.0, -1.0), epsilon = 1e-12);
    }

    #[test]
    fn sharp_turn_keeps_full_miter() {
        let turn = 170.0_f64.to_radians();
        let corner = Point3::new(4.0, 0.0, 0.0);
        let curve = PolylineCurve::new(
            vec![
                Point3::origin(),
                corner,
                corner + Vector3::new(turn.cos(), 0.0, turn.sin()) * 4.0,
            ],
            false,
        );
        let mut style = SweepStyle::new(Profile::Flat);
        style.set_filter_overlaps(false);
        let points = emit_for(&curve, None, &style);
        let expected = 0.5 * (2.0 / (1.0 + turn.cos())).sqrt();
        assert_relative_eq!(expected, 5.737, epsilon = 1e-3);
        for p in &points[2..4] {
            assert_eq!(p.source_index, 1);
            assert_relative_eq!((p.position - corner).norm(), expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn hard_corner_duplicates_ring() {
        let curve = PolylineCurve::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(4.0, 0.0, 0.0),
                Point3::new(4.0, 0.0, 4.0),
            ],
            false,
        );
        let mut style = SweepStyle::new(Profile::Tube);
        style.set_smooth_shaded_corners(false);
        let points = emit_for(&curve, None, &style);
        // Every point is a hard corner or an open end: three rings, each doubled.
        assert_eq!(points.len(), 3 * 3 * 2);

        let original = &points[6];
        let copy = &points[9];
        assert_relative_eq!(original.position, copy.position);
        assert!(!original.next_connected);
        assert!(!copy.prev_connected);
        assert_relative_eq!(original.tangent, Vector3::x());
        assert_relative_eq!(copy.tangent, Vector3::z());
        assert!((original.normal - copy.normal).norm() > 1e-3);
    }

    #[test]
    fn uv2_stays_in_unit_square() {
        let mut style = SweepStyle::new(Profile::Cross);
        style.set_segments(3);
        style.set_add_uv2(true);
        let widths = WidthCurve::linear(0.2, 1.5);
        let points = emit_for(&straight(), Some(&widths), &style);
        for p in &points {
            assert!((0.0..=1.0).contains(&p.uv2.x));
            assert!((0.0..=1.0).contains(&p.uv2.y));
        }
        assert!(points[0].uv2.x > 0.0);
        assert!(points[points.len() - 1].uv2.x < 1.0);
    }

    #[test]
    fn zero_width_collapses_to_centerline() {
        let mut style = SweepStyle::new(Profile::Tube);
        style.set_width(0.0);
        let points = emit_for(&straight(), None, &style);
        for p in &points {
            assert!(p.position.y.abs() < 1e-12 && p.position.z.abs() < 1e-12);
            assert!(p.normal.iter().all(|c| c.is_finite()));
        }
    }
}

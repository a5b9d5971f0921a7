use super::cross_section::EdgePoint;
use super::overlap::first_live;
use crate::tessellation::SweepMesh;

/// Copies every live point into the output buffers in arena order.
///
/// Returns the mesh without indices and the arena-to-output index map.
#[allow(clippy::cast_possible_truncation)]
pub(super) fn materialize(points: &[EdgePoint], with_uv2: bool) -> (SweepMesh, Vec<Option<u32>>) {
    let live = points.iter().filter(|p| !p.removed).count();
    let mut mesh = SweepMesh {
        positions: Vec::with_capacity(live),
        normals: Vec::with_capacity(live),
        tangents: Vec::with_capacity(live),
        uvs: Vec::with_capacity(live),
        uv2s: with_uv2.then(|| Vec::with_capacity(live)),
        indices: Vec::new(),
    };

    let mut map = vec![None; points.len()];
    for (index, point) in points.iter().enumerate() {
        if point.removed {
            continue;
        }
        map[index] = Some(mesh.positions.len() as u32);
        mesh.positions.push(point.position);
        mesh.normals.push(point.normal);
        mesh.tangents
            .push([point.tangent.x, point.tangent.y, point.tangent.z, 1.0]);
        mesh.uvs.push(point.uv);
        if let Some(uv2s) = mesh.uv2s.as_mut() {
            uv2s.push(point.uv2);
        }
    }
    (mesh, map)
}

/// Triangles of one sweep, in output indices.
#[derive(Debug, Clone, Default)]
pub(super) struct Triangulation {
    pub indices: Vec<[u32; 3]>,
    /// Triangles dropped because they faced against their vertex normals.
    pub folded: usize,
}

/// Collects triangles in output indices.
///
/// A triangle is dropped when it repeats a vertex, or when its winding faces
/// away from the summed normals of its corners. The latter happens where a
/// ribbon side folds back over itself at a sharp reversal.
struct TriangleSink<'a> {
    points: &'a [EdgePoint],
    map: &'a [Option<u32>],
    triangulation: Triangulation,
}

impl<'a> TriangleSink<'a> {
    fn new(points: &'a [EdgePoint], map: &'a [Option<u32>]) -> Self {
        Self {
            points,
            map,
            triangulation: Triangulation::default(),
        }
    }

    fn push(&mut self, a: usize, b: usize, c: usize) {
        let (Some(ia), Some(ib), Some(ic)) = (self.map[a], self.map[b], self.map[c]) else {
            return;
        };
        if ia == ib || ib == ic || ia == ic {
            return;
        }
        let (pa, pb, pc) = (&self.points[a], &self.points[b], &self.points[c]);
        let face = (pb.position - pa.position).cross(&(pc.position - pa.position));
        if face.dot(&(pa.normal + pb.normal + pc.normal)) < 0.0 {
            self.triangulation.folded += 1;
            return;
        }
        self.triangulation.indices.push([ia, ib, ic]);
    }

    fn finish(self) -> Triangulation {
        self.triangulation
    }
}

/// Triangulates flat and cross profiles.
///
/// Each slot chain alternates between the two ribbon sides. Walking it once,
/// every point forms a triangle with the most recent point of each side, so
/// a side with removed points fans from its surviving neighbor.
pub(super) fn ribbon_triangles(
    points: &[EdgePoint],
    radial: usize,
    map: &[Option<u32>],
) -> Triangulation {
    let mut sink = TriangleSink::new(points, map);
    for slot in 0..radial {
        let Some(start) = first_live(points, slot, radial) else {
            continue;
        };

        // Advance to the first change of side.
        let mut point = start;
        let mut stop = points[point].next_point;
        while points[stop].edge == points[point].edge && stop != start {
            point = stop;
            stop = points[point].next_point;
        }
        if points[stop].edge == points[point].edge {
            continue;
        }

        let mut last = [0_usize; 2];
        last[points[point].edge] = point;
        last[points[stop].edge] = stop;

        let mut current = stop;
        for _ in 0..points.len() {
            let index = points[current].next_point;
            let candidate = &points[index];
            let side = candidate.edge;

            let leaving_gap =
                !points[last[0]].next_connected && !points[last[1]].next_connected;
            let entering_gap =
                !candidate.prev_connected && !points[last[1 - side]].prev_connected;
            if !leaving_gap && !entering_gap {
                sink.push(last[1], last[0], index);
            }

            last[side] = index;
            current = index;
            if index == stop {
                break;
            }
        }
    }
    sink.finish()
}

/// Triangulates tube profiles.
///
/// Every live point spans a quad towards its chain successor and the
/// neighboring slots, split into two counter-clockwise triangles. Removed
/// neighbors are replaced by the nearest live point of their chain.
pub(super) fn tube_triangles(
    points: &[EdgePoint],
    radial: usize,
    map: &[Option<u32>],
) -> Triangulation {
    let mut sink = TriangleSink::new(points, map);
    if radial == 0 {
        return sink.finish();
    }

    for (index, point) in points.iter().enumerate() {
        if point.removed {
            continue;
        }
        let next = point.next_point;
        if next == index {
            continue;
        }
        let ring = index - index % radial;
        let slot = index % radial;
        let next_ring = next - next % radial;

        let top = live_backwards(points, ring + (slot + 1) % radial);
        let bottom = live_forwards(points, next_ring + (slot + radial - 1) % radial);

        if let Some(top) = top {
            if points[next].prev_connected || points[top].next_connected {
                sink.push(index, top, next);
            }
        }
        if let Some(bottom) = bottom {
            if point.next_connected || points[bottom].prev_connected {
                sink.push(index, next, bottom);
            }
        }
    }
    sink.finish()
}

/// Nearest live point at or before `index` in its chain.
fn live_backwards(points: &[EdgePoint], mut index: usize) -> Option<usize> {
    for _ in 0..points.len() {
        if !points[index].removed {
            return Some(index);
        }
        index = points[index].prev_point;
    }
    None
}

/// Nearest live point at or after `index` in its chain.
fn live_forwards(points: &[EdgePoint], mut index: usize) -> Option<usize> {
    for _ in 0..points.len() {
        if !points[index].removed {
            return Some(index);
        }
        index = points[index].next_point;
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::{centerline, cross_section, link};
    use super::*;
    use crate::geometry::PolylineCurve;
    use crate::math::{Point3, Vector3};
    use crate::tessellation::{Profile, SweepStyle};

    fn arena(curve: &PolylineCurve, style: &SweepStyle) -> Vec<EdgePoint> {
        let line = centerline::build(curve, None, style).unwrap();
        let mut points = cross_section::emit(&line, 1.0, None, style);
        link::link(
            &mut points,
            style.radial_slots(),
            style.profile().edge_count(),
            line.closed,
        );
        points
    }

    fn face_normal(mesh: &SweepMesh, tri: [u32; 3]) -> Vector3 {
        let a = mesh.positions[tri[0] as usize];
        let b = mesh.positions[tri[1] as usize];
        let c = mesh.positions[tri[2] as usize];
        (b - a).cross(&(c - a))
    }

    #[test]
    fn two_point_ribbon() {
        let curve = PolylineCurve::new(
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0)],
            false,
        );
        let points = arena(&curve, &SweepStyle::new(Profile::Flat));
        let (mut mesh, map) = materialize(&points, false);
        mesh.indices = ribbon_triangles(&points, 1, &map).indices;

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![[1, 0, 2], [1, 2, 3]]);
        for tri in &mesh.indices {
            assert!(face_normal(&mesh, *tri).dot(&Vector3::y()) > 0.0);
        }
    }

    #[test]
    fn folded_ribbon_faces_are_dropped() {
        let curve = PolylineCurve::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(5.0, 0.0, 0.0),
                Point3::new(10.0, 0.0, 0.0),
            ],
            false,
        );
        let mut points = arena(&curve, &SweepStyle::new(Profile::Flat));
        // Pull the middle ring's first side back behind the start.
        points[2].position = Point3::new(-3.0, 0.0, 0.5);

        let (mut mesh, map) = materialize(&points, false);
        let triangulation = ribbon_triangles(&points, 1, &map);
        assert_eq!(triangulation.folded, 1);
        mesh.indices = triangulation.indices;
        assert_eq!(mesh.triangle_count(), 3);
        for tri in &mesh.indices {
            assert!(face_normal(&mesh, *tri).y > 0.0);
        }
    }

    #[test]
    fn closed_tube_is_watertight_ring() {
        let curve = PolylineCurve::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(4.0, 0.0, 0.0),
                Point3::new(4.0, 0.0, 4.0),
                Point3::new(0.0, 0.0, 4.0),
            ],
            true,
        );
        let mut style = SweepStyle::new(Profile::Tube);
        style.set_segments(4);
        let points = arena(&curve, &style);
        let (mut mesh, map) = materialize(&points, true);
        mesh.indices = tube_triangles(&points, 4, &map).indices;

        assert_eq!(mesh.vertex_count(), 16);
        assert_eq!(mesh.triangle_count(), 32);
        assert!(mesh.validate().is_ok());
        assert!(mesh.tangents.iter().all(|t| (t[3] - 1.0).abs() < f64::EPSILON));
    }

    #[test]
    fn tube_faces_point_outward() {
        let curve = PolylineCurve::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(5.0, 0.0, 0.0),
                Point3::new(10.0, 0.0, 0.0),
            ],
            false,
        );
        let mut style = SweepStyle::new(Profile::Tube);
        style.set_segments(6);
        let points = arena(&curve, &style);
        let (mut mesh, map) = materialize(&points, false);
        mesh.indices = tube_triangles(&points, 6, &map).indices;

        // Two spans of six quads, no faces across the open ends.
        assert_eq!(mesh.triangle_count(), 24);
        for tri in &mesh.indices {
            let a = mesh.positions[tri[0] as usize];
            let b = mesh.positions[tri[1] as usize];
            let c = mesh.positions[tri[2] as usize];
            let centroid = (a.coords + b.coords + c.coords) / 3.0;
            let outward = Vector3::new(0.0, centroid.y, centroid.z);
            assert!(face_normal(&mesh, *tri).dot(&outward) > 0.0);
        }
    }

    #[test]
    fn open_tube_has_no_cap_faces() {
        let curve = PolylineCurve::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
                Point3::new(4.0, 0.0, 1.0),
                Point3::new(6.0, 0.0, 1.0),
            ],
            false,
        );
        let mut style = SweepStyle::new(Profile::Tube);
        style.set_segments(3);
        let points = arena(&curve, &style);
        let (mut mesh, map) = materialize(&points, false);
        mesh.indices = tube_triangles(&points, 3, &map).indices;

        let first_ring = 0..3_u32;
        let last_ring = 9..12_u32;
        for tri in &mesh.indices {
            let touches_first = tri.iter().any(|i| first_ring.contains(i));
            let touches_last = tri.iter().any(|i| last_ring.contains(i));
            assert!(!(touches_first && touches_last));
        }
        assert_eq!(mesh.triangle_count(), 18);
    }

    #[test]
    fn removed_points_are_skipped() {
        let curve = PolylineCurve::new(
            (0_i32..6)
                .map(|i| Point3::new(f64::from(i), 0.0, 0.0))
                .collect(),
            false,
        );
        let mut points = arena(&curve, &SweepStyle::new(Profile::Flat));
        // Splice out the side-1 point of the third ring.
        let prev = points[5].prev_point;
        let next = points[5].next_point;
        points[prev].next_point = next;
        points[next].prev_point = prev;
        points[5].removed = true;

        let (mut mesh, map) = materialize(&points, false);
        assert_eq!(map[5], None);
        assert_eq!(map[6], Some(5));
        mesh.indices = ribbon_triangles(&points, 1, &map).indices;
        assert_eq!(mesh.vertex_count(), 11);
        // One vertex fewer means one triangle fewer.
        assert_eq!(mesh.triangle_count(), 9);
        assert!(mesh.validate().is_ok());
    }
}

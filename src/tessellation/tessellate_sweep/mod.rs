mod centerline;
mod cross_section;
mod link;
mod overlap;
mod triangles;

use tracing::debug;

use crate::geometry::{Centerline, WidthProfile};
use crate::tessellation::{Profile, SweepMesh, SweepStyle};

/// Counters gathered during one rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Usable centerline samples.
    pub center_points: usize,
    /// Candidate vertices emitted before any removal.
    pub edge_points: usize,
    /// Vertices removed by interleaving.
    pub interleaved: usize,
    /// Vertices removed by the overlap filter.
    pub filtered: usize,
    /// Overlap filter passes, including the final pass that removed nothing.
    pub filter_iterations: usize,
    /// Triangles dropped because they faced against their vertex normals.
    pub folded: usize,
    /// Whether the placeholder mesh was returned.
    pub placeholder: bool,
}

/// Sweeps a cross-section along a centerline into a triangle mesh.
///
/// A rebuild runs five stages: centerline sampling, cross-section emission,
/// chain linking, overlap reduction and triangle emission. Input too small to
/// sweep yields [`SweepMesh::placeholder`] instead of an error.
pub struct TessellateSweep<'a> {
    curve: &'a dyn Centerline,
    width_profile: Option<&'a dyn WidthProfile>,
    style: SweepStyle,
}

impl<'a> TessellateSweep<'a> {
    /// Creates a new sweep operation.
    #[must_use]
    pub fn new(curve: &'a dyn Centerline, style: SweepStyle) -> Self {
        Self {
            curve,
            width_profile: None,
            style,
        }
    }

    /// Scales the sweep width along the curve by `profile`.
    #[must_use]
    pub fn with_width_profile(mut self, profile: &'a dyn WidthProfile) -> Self {
        self.width_profile = Some(profile);
        self
    }

    /// Executes the sweep.
    #[must_use]
    pub fn execute(&self) -> SweepMesh {
        self.execute_with_stats().0
    }

    /// Executes the sweep and reports what each stage did.
    #[must_use]
    pub fn execute_with_stats(&self) -> (SweepMesh, SweepStats) {
        let style = &self.style;
        let mut stats = SweepStats::default();

        let Some(line) = centerline::build(self.curve, self.width_profile, style) else {
            debug!("centerline has fewer than two usable samples, emitting placeholder");
            stats.placeholder = true;
            return (SweepMesh::placeholder(style.add_uv2()), stats);
        };
        stats.center_points = line.points.len();

        let radial = style.radial_slots();
        let mut points = cross_section::emit(
            &line,
            self.curve.baked_length(),
            self.width_profile,
            style,
        );
        stats.edge_points = points.len();
        link::link(&mut points, radial, style.profile().edge_count(), line.closed);

        if style.interleave_vertices() {
            stats.interleaved = overlap::interleave(&mut points, &line.points, radial);
        }
        if style.filter_overlaps() {
            let outcome = overlap::filter(&mut points, &line.points, radial, line.closed);
            stats.filtered = outcome.removed;
            stats.filter_iterations = outcome.iterations;
        }

        let (mut mesh, map) = triangles::materialize(&points, style.add_uv2());
        let triangulation = match style.profile() {
            Profile::Tube => triangles::tube_triangles(&points, radial, &map),
            Profile::Flat | Profile::Cross => triangles::ribbon_triangles(&points, radial, &map),
        };
        mesh.indices = triangulation.indices;
        stats.folded = triangulation.folded;

        if mesh.indices.is_empty() {
            debug!("sweep produced no triangles, emitting placeholder");
            stats.placeholder = true;
            return (SweepMesh::placeholder(style.add_uv2()), stats);
        }

        debug!(
            profile = ?style.profile(),
            center_points = stats.center_points,
            edge_points = stats.edge_points,
            interleaved = stats.interleaved,
            filtered = stats.filtered,
            folded = stats.folded,
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "sweep rebuilt"
        );
        (mesh, stats)
    }
}

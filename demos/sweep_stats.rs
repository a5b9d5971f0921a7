//! Sweep statistics demo: sweeps a few profiles along a Bezier path and logs
//! what each rebuild produced.
//!
//! Usage:
//! ```text
//! cargo run --example sweep_stats
//! RUST_LOG=sweepmesh=trace cargo run --example sweep_stats   # per-pass filter output
//! ```

use sweepmesh::geometry::{BezierPath, BezierPoint, WidthCurve};
use sweepmesh::math::{Point3, Vector3};
use sweepmesh::tessellation::{lightmap_size_hint, Profile, SweepStyle, TessellateSweep};
use tracing::{info, warn};

fn main() {
    // Default: WARN for everything, INFO for the demo and DEBUG for sweepmesh.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("sweep_stats=info".parse().unwrap_or_default())
        .add_directive("sweepmesh=debug".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // An S-bend followed by a tight hairpin.
    let path = BezierPath::new(false)
        .with_point(
            BezierPoint::new(Point3::new(0.0, 0.0, 0.0))
                .with_handles(Vector3::zeros(), Vector3::new(3.0, 0.0, 0.0)),
        )
        .with_point(
            BezierPoint::new(Point3::new(6.0, 1.0, 4.0))
                .with_handles(Vector3::new(-3.0, 0.0, 0.0), Vector3::new(3.0, 0.0, 0.0)),
        )
        .with_point(
            BezierPoint::new(Point3::new(9.0, 1.0, 4.5))
                .with_handles(Vector3::new(-1.0, 0.0, -1.0), Vector3::zeros())
                .with_tilt(0.4),
        );
    let widths = WidthCurve::linear(0.6, 1.4);

    for profile in [Profile::Flat, Profile::Cross, Profile::Tube] {
        let mut style = SweepStyle::new(profile);
        style.set_segments(6);
        style.set_width(0.8);
        style.set_interleave_vertices(profile != Profile::Tube);
        style.set_add_uv2(true);

        let (mesh, stats) = TessellateSweep::new(&path, style)
            .with_width_profile(&widths)
            .execute_with_stats();
        if let Err(e) = mesh.validate() {
            warn!(?profile, error = %e, "invalid mesh");
            continue;
        }

        info!(
            ?profile,
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            interleaved = stats.interleaved,
            filtered = stats.filtered,
            filter_passes = stats.filter_iterations,
            folded = stats.folded,
            lightmap = ?lightmap_size_hint(&path, Some(&widths), &style),
            "swept"
        );
    }
}

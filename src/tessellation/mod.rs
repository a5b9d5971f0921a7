mod lightmap;
mod sweep_style;
mod tessellate_sweep;

pub use lightmap::lightmap_size_hint;
pub use sweep_style::{Profile, SweepStyle};
pub use tessellate_sweep::{SweepStats, TessellateSweep};

use crate::error::{Result, TessellationError};
use crate::math::{Point2, Point3, Vector3};

/// Parallel attribute buffers of a swept surface, ready for upload.
///
/// Triangles are counter-clockwise when seen from the front.
#[derive(Debug, Clone, Default)]
pub struct SweepMesh {
    /// Vertex positions.
    pub positions: Vec<Point3>,
    /// Unit vertex normals.
    pub normals: Vec<Vector3>,
    /// Vertex tangents; `w` is the bitangent handedness (always `1.0`).
    pub tangents: Vec<[f64; 4]>,
    /// Primary texture coordinates.
    pub uvs: Vec<Point2>,
    /// Lightmap coordinates in `[0, 1]²`, present when requested.
    pub uv2s: Option<Vec<Point2>>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
}

impl SweepMesh {
    /// The mesh produced for missing or degenerate input: one triangle whose
    /// three vertices all sit at the origin.
    #[must_use]
    pub fn placeholder(with_uv2: bool) -> Self {
        Self {
            positions: vec![Point3::origin(); 3],
            normals: vec![Vector3::y(); 3],
            tangents: vec![[1.0, 0.0, 0.0, 1.0]; 3],
            uvs: vec![Point2::origin(); 3],
            uv2s: with_uv2.then(|| vec![Point2::origin(); 3]),
            indices: vec![[0, 1, 2]],
        }
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Checks that all attribute buffers match the vertex count and that every
    /// triangle references three distinct, existing vertices.
    ///
    /// # Errors
    ///
    /// Returns [`TessellationError`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let expected = self.positions.len();
        let lengths = [
            ("normals", self.normals.len()),
            ("tangents", self.tangents.len()),
            ("uvs", self.uvs.len()),
            ("uv2s", self.uv2s.as_ref().map_or(expected, Vec::len)),
        ];
        for (name, actual) in lengths {
            if actual != expected {
                return Err(TessellationError::BufferLength {
                    name,
                    expected,
                    actual,
                }
                .into());
            }
        }

        for (triangle, tri) in self.indices.iter().enumerate() {
            for &index in tri {
                if index as usize >= expected {
                    return Err(TessellationError::IndexOutOfRange {
                        triangle,
                        index,
                        vertex_count: expected,
                    }
                    .into());
                }
            }
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                return Err(TessellationError::DegenerateTriangle(triangle).into());
            }
        }
        Ok(())
    }
}

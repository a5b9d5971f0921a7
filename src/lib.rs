pub mod error;
pub mod geometry;
pub mod math;
pub mod tessellation;

pub use error::{Result, SweepError};
pub use geometry::{Centerline, TessellationMode, WidthProfile};
pub use tessellation::{Profile, SweepMesh, SweepStats, SweepStyle, TessellateSweep};

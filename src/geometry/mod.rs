pub mod curve;
pub mod width;

pub use curve::{
    BezierPath, BezierPoint, Centerline, CenterlineSample, PolylineCurve, TessellationMode,
};
pub use width::{WidthCurve, WidthProfile};

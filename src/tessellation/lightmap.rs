use std::f64::consts::PI;

use crate::geometry::{Centerline, TessellationMode, WidthProfile};
use crate::tessellation::{Profile, SweepStyle};

/// Suggests a lightmap resolution, in texels, for the sweep of `curve`.
///
/// The horizontal extent follows the baked curve length (plus the end
/// extensions of open curves), the vertical extent the widest section. Both
/// include the configured padding. Returns `None` when the secondary UV
/// channel is disabled or the curve has fewer than two points.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn lightmap_size_hint(
    curve: &dyn Centerline,
    width: Option<&dyn WidthProfile>,
    style: &SweepStyle,
) -> Option<[u32; 2]> {
    if !style.add_uv2() {
        return None;
    }
    if curve
        .sample_centerline(TessellationMode::Disabled, style.tessellation_tolerance())
        .len()
        < 2
    {
        return None;
    }

    let texel = style.texel_size();
    let padding = style.uv2_padding();
    let sample_width = |u: f64| width.map_or(1.0, |w| w.sample(u));

    let mut length = curve.baked_length();
    if style.extend_edges() && !curve.is_closed() {
        length += style.half_width() * (sample_width(0.0) + sample_width(1.0));
    }
    let horizontal = (length / texel).max(1.0) + 2.0 * padding;

    let mut section_width =
        style.width() * width.map_or(1.0, |w| w.max_value().max(w.min_value()));
    let width_padding = match style.profile() {
        Profile::Flat => 1.0,
        Profile::Cross => {
            section_width *= style.segments() as f64;
            style.segments() as f64
        }
        Profile::Tube => {
            section_width *= PI;
            0.0
        }
    };
    let vertical = (section_width / texel).max(1.0) + width_padding * padding;

    Some([horizontal.ceil() as u32, vertical.ceil() as u32])
}

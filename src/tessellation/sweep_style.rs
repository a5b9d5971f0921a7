use std::f64::consts::{FRAC_PI_3, PI};

use crate::geometry::TessellationMode;
use crate::math::{Vector3, TOLERANCE};

/// Smallest adaptive tessellation tolerance (degrees).
const MIN_TESSELLATION_TOLERANCE: f64 = 0.001;

/// Smallest lightmap texel size.
const MIN_TEXEL_SIZE: f64 = 1e-4;

/// Cross-section shape swept along the centerline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// A single two-sided ribbon.
    #[default]
    Flat,
    /// `segments` ribbons crossing at the centerline, spread over a half turn.
    Cross,
    /// A closed polygonal ring with `segments` sides.
    Tube,
}

impl Profile {
    /// Smallest segment count the profile supports.
    #[must_use]
    pub fn min_segments(self) -> usize {
        match self {
            Self::Flat => 1,
            Self::Cross => 2,
            Self::Tube => 3,
        }
    }

    /// Clamps a requested segment count to what the profile supports.
    #[must_use]
    pub fn clamp_segments(self, segments: usize) -> usize {
        match self {
            Self::Flat => 1,
            Self::Cross | Self::Tube => segments.max(self.min_segments()),
        }
    }

    /// Number of ribbon sides per radial slot (1 for tubes).
    #[must_use]
    pub fn edge_count(self) -> usize {
        match self {
            Self::Tube => 1,
            Self::Flat | Self::Cross => 2,
        }
    }
}

/// Style parameters for sweeping a cross-section along a centerline.
///
/// Setters clamp out-of-range values instead of failing.
#[derive(Debug, Clone, Copy)]
pub struct SweepStyle {
    profile: Profile,
    segments: usize,
    width: f64,
    up_vector: Vector3,
    tessellation_mode: TessellationMode,
    tessellation_tolerance: f64,
    corner_threshold: f64,
    miter_limit: f64,
    smooth_shaded_corners: bool,
    interleave_vertices: bool,
    filter_overlaps: bool,
    extend_edges: bool,
    scale_uv_by_length: bool,
    scale_uv_by_width: bool,
    add_uv2: bool,
    uv2_padding: f64,
    texel_size: f64,
}

impl Default for SweepStyle {
    fn default() -> Self {
        Self {
            profile: Profile::Flat,
            segments: 1,
            width: 1.0,
            up_vector: Vector3::y(),
            tessellation_mode: TessellationMode::Adaptive,
            tessellation_tolerance: 4.0,
            corner_threshold: FRAC_PI_3,
            miter_limit: f64::INFINITY,
            smooth_shaded_corners: true,
            interleave_vertices: false,
            filter_overlaps: true,
            extend_edges: false,
            scale_uv_by_length: false,
            scale_uv_by_width: false,
            add_uv2: false,
            uv2_padding: 2.0,
            texel_size: 0.2,
        }
    }
}

impl SweepStyle {
    /// Creates a style with the given profile and its minimum segment count.
    #[must_use]
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            segments: profile.min_segments(),
            ..Self::default()
        }
    }

    /// Returns the cross-section profile.
    #[must_use]
    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Sets the profile, re-clamping the segment count to the new minimum.
    pub fn set_profile(&mut self, profile: Profile) {
        self.profile = profile;
        self.segments = profile.clamp_segments(self.segments);
    }

    /// Returns the radial segment count (already clamped for the profile).
    #[must_use]
    pub fn segments(&self) -> usize {
        self.segments
    }

    /// Sets the radial segment count: 1 for flat, at least 2 for cross, at least 3 for tube.
    pub fn set_segments(&mut self, segments: usize) {
        self.segments = self.profile.clamp_segments(segments);
    }

    /// Returns the sweep width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns half the sweep width.
    #[must_use]
    pub fn half_width(&self) -> f64 {
        self.width * 0.5
    }

    /// Sets the sweep width; negative or non-finite widths become zero.
    pub fn set_width(&mut self, width: f64) {
        self.width = if width.is_finite() { width.max(0.0) } else { 0.0 };
    }

    /// Returns the normalized global up vector.
    #[must_use]
    pub fn up_vector(&self) -> Vector3 {
        self.up_vector
    }

    /// Sets the global up vector; a zero vector falls back to +Y.
    pub fn set_up_vector(&mut self, up: Vector3) {
        self.up_vector = up.try_normalize(TOLERANCE).unwrap_or_else(Vector3::y);
    }

    /// Returns the tessellation mode requested from the centerline.
    #[must_use]
    pub fn tessellation_mode(&self) -> TessellationMode {
        self.tessellation_mode
    }

    /// Sets how the centerline is sampled.
    pub fn set_tessellation_mode(&mut self, mode: TessellationMode) {
        self.tessellation_mode = mode;
    }

    /// Returns the adaptive tessellation tolerance in degrees.
    #[must_use]
    pub fn tessellation_tolerance(&self) -> f64 {
        self.tessellation_tolerance
    }

    /// Sets the adaptive tolerance in degrees, clamped to at least 0.001.
    pub fn set_tessellation_tolerance(&mut self, tolerance: f64) {
        self.tessellation_tolerance = if tolerance.is_finite() {
            tolerance.max(MIN_TESSELLATION_TOLERANCE)
        } else {
            MIN_TESSELLATION_TOLERANCE
        };
    }

    /// Returns the turning angle (radians) above which a point is a hard corner.
    #[must_use]
    pub fn corner_threshold(&self) -> f64 {
        self.corner_threshold
    }

    /// Sets the corner threshold in radians, clamped to `[0, π]`.
    pub fn set_corner_threshold(&mut self, threshold: f64) {
        self.corner_threshold = if threshold.is_finite() {
            threshold.clamp(0.0, PI)
        } else {
            FRAC_PI_3
        };
    }

    /// Returns the largest allowed spoke stretch at a corner. Unlimited by default.
    #[must_use]
    pub fn miter_limit(&self) -> f64 {
        self.miter_limit
    }

    /// Caps the corner spoke stretch, clamped to at least 1. Pass
    /// `f64::INFINITY` to restore the exact miter.
    pub fn set_miter_limit(&mut self, limit: f64) {
        self.miter_limit = if limit.is_nan() { 1.0 } else { limit.max(1.0) };
    }

    /// Whether corners share one ring of averaged normals.
    #[must_use]
    pub fn smooth_shaded_corners(&self) -> bool {
        self.smooth_shaded_corners
    }

    /// When disabled, hard corners get a duplicated ring with their own normals.
    pub fn set_smooth_shaded_corners(&mut self, enable: bool) {
        self.smooth_shaded_corners = enable;
    }

    /// Whether long straight runs drop every other vertex pair.
    #[must_use]
    pub fn interleave_vertices(&self) -> bool {
        self.interleave_vertices
    }

    /// Enables staggered vertex removal away from corners.
    pub fn set_interleave_vertices(&mut self, enable: bool) {
        self.interleave_vertices = enable;
    }

    /// Whether points folding back against the centerline are removed.
    #[must_use]
    pub fn filter_overlaps(&self) -> bool {
        self.filter_overlaps
    }

    /// Enables the overlap filter.
    pub fn set_filter_overlaps(&mut self, enable: bool) {
        self.filter_overlaps = enable;
    }

    /// Whether open ends are lengthened.
    #[must_use]
    pub fn extend_edges(&self) -> bool {
        self.extend_edges
    }

    /// When enabled, open curves are lengthened by half the local width at each end.
    pub fn set_extend_edges(&mut self, enable: bool) {
        self.extend_edges = enable;
    }

    /// Whether `u` runs in world units instead of `[0, 1]`.
    #[must_use]
    pub fn scale_uv_by_length(&self) -> bool {
        self.scale_uv_by_length
    }

    /// Measures `u` along the arc length in world units.
    pub fn set_scale_uv_by_length(&mut self, enable: bool) {
        self.scale_uv_by_length = enable;
    }

    /// Whether `v` widens with the width profile.
    #[must_use]
    pub fn scale_uv_by_width(&self) -> bool {
        self.scale_uv_by_width
    }

    /// Spreads ribbon `v` by the local width multiplier around the center line.
    pub fn set_scale_uv_by_width(&mut self, enable: bool) {
        self.scale_uv_by_width = enable;
    }

    /// Whether a lightmap UV channel is emitted.
    #[must_use]
    pub fn add_uv2(&self) -> bool {
        self.add_uv2
    }

    /// Enables the secondary (lightmap) UV channel.
    pub fn set_add_uv2(&mut self, enable: bool) {
        self.add_uv2 = enable;
    }

    /// Returns the lightmap padding in texels.
    #[must_use]
    pub fn uv2_padding(&self) -> f64 {
        self.uv2_padding
    }

    /// Sets the lightmap padding in texels, clamped to be non-negative.
    pub fn set_uv2_padding(&mut self, padding: f64) {
        self.uv2_padding = if padding.is_finite() { padding.max(0.0) } else { 0.0 };
    }

    /// Returns the world-space size of one lightmap texel.
    #[must_use]
    pub fn texel_size(&self) -> f64 {
        self.texel_size
    }

    /// Sets the lightmap texel size, clamped to a small positive minimum.
    pub fn set_texel_size(&mut self, size: f64) {
        self.texel_size = if size.is_finite() {
            size.max(MIN_TEXEL_SIZE)
        } else {
            MIN_TEXEL_SIZE
        };
    }

    /// Lightmap padding converted to world units.
    #[must_use]
    pub fn uv2_padding_world(&self) -> f64 {
        self.uv2_padding * self.texel_size
    }

    /// Number of radial slots per ring: 1 for flat, `segments` otherwise.
    #[must_use]
    pub fn radial_slots(&self) -> usize {
        match self.profile {
            Profile::Flat => 1,
            Profile::Cross | Profile::Tube => self.segments,
        }
    }

    /// Angle between consecutive radial slots.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn slot_angle(&self) -> f64 {
        match self.profile {
            Profile::Flat => PI,
            Profile::Cross => PI / self.segments as f64,
            Profile::Tube => 2.0 * PI / self.segments as f64,
        }
    }
}

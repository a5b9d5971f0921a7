use crate::error::{CurveError, Result};

/// Scalar profile that scales the sweep width along the normalized arc length.
pub trait WidthProfile {
    /// Samples the profile at `offset` in `[0, 1]`.
    fn sample(&self, offset: f64) -> f64;

    /// Smallest value the profile takes.
    fn min_value(&self) -> f64;

    /// Largest value the profile takes.
    fn max_value(&self) -> f64;
}

/// Piecewise-linear width profile defined by `(offset, value)` points.
///
/// Offsets lie in `[0, 1]` and are sorted. Samples before the first point or
/// after the last are clamped to the end values.
#[derive(Debug, Clone)]
pub struct WidthCurve {
    points: Vec<(f64, f64)>,
}

impl WidthCurve {
    /// Creates a width curve from sorted `(offset, value)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError`] if `points` is empty, contains non-finite
    /// values, has an offset outside `[0, 1]`, or is not sorted by offset.
    pub fn new(points: Vec<(f64, f64)>) -> Result<Self> {
        if points.is_empty() {
            return Err(CurveError::EmptyWidthCurve.into());
        }
        for (index, &(offset, value)) in points.iter().enumerate() {
            if !offset.is_finite() || !value.is_finite() {
                return Err(CurveError::NonFinite("width curve").into());
            }
            if !(0.0..=1.0).contains(&offset) {
                return Err(CurveError::OffsetOutOfRange { index, offset }.into());
            }
            if index > 0 {
                let previous = points[index - 1].0;
                if offset < previous {
                    return Err(CurveError::UnsortedOffsets {
                        index,
                        offset,
                        previous,
                    }
                    .into());
                }
            }
        }
        Ok(Self { points })
    }

    /// A profile with the same value everywhere.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self {
            points: vec![(0.0, value)],
        }
    }

    /// A profile going linearly from `start` at offset 0 to `end` at offset 1.
    #[must_use]
    pub fn linear(start: f64, end: f64) -> Self {
        Self {
            points: vec![(0.0, start), (1.0, end)],
        }
    }

    /// Returns the defining points.
    #[must_use]
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }
}

impl WidthProfile for WidthCurve {
    fn sample(&self, offset: f64) -> f64 {
        let Some(&(first_offset, first_value)) = self.points.first() else {
            return 1.0;
        };
        if offset <= first_offset {
            return first_value;
        }
        for pair in self.points.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            if offset <= x1 {
                let span = x1 - x0;
                if span <= f64::EPSILON {
                    return y1;
                }
                return y0 + (y1 - y0) * (offset - x0) / span;
            }
        }
        self.points.last().map_or(first_value, |p| p.1)
    }

    fn min_value(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.1)
            .fold(f64::INFINITY, f64::min)
    }

    fn max_value(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.1)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

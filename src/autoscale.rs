//! Vertical auto-scaling
//!
//! Bounds are taken from the min and max of the window, padded outward by
//! [`MARGIN_FRACTION`] of the range on each side. A near-flat signal would
//! otherwise collapse the axis, so any result narrower than [`MIN_SPAN`] is
//! re-centred on its midpoint with a span of exactly `MIN_SPAN`.
//!
//! Turning autoscale off returns to the fixed default bounds instead of
//! freezing the last computed ones.

use crate::types::DisplayBounds;

/// Fraction of the data range added above the max and below the min
pub const MARGIN_FRACTION: f64 = 0.1;

/// Smallest vertical span autoscale will produce
pub const MIN_SPAN: f64 = 1.0;

/// Compute display bounds for `samples`.
///
/// Returns `None` when there is nothing to scale to; the caller keeps its
/// current bounds in that case. Non-finite values are skipped.
pub fn compute_bounds(samples: &[f64]) -> Option<DisplayBounds> {
    let mut finite = samples.iter().copied().filter(|v| v.is_finite());
    let first = finite.next()?;
    let (min, max) = finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));

    let range = max - min;
    let mut bounds = DisplayBounds::new(min - range * MARGIN_FRACTION, max + range * MARGIN_FRACTION);

    if bounds.span() < MIN_SPAN {
        let center = bounds.center();
        bounds = DisplayBounds::new(center - MIN_SPAN / 2.0, center + MIN_SPAN / 2.0);
    }

    Some(bounds)
}

/// Autoscale on/off switch together with the bounds it currently yields
#[derive(Debug, Clone)]
pub struct Autoscaler {
    enabled: bool,
    bounds: DisplayBounds,
    default_bounds: DisplayBounds,
}

impl Default for Autoscaler {
    fn default() -> Self {
        Self::new(DisplayBounds::default(), false)
    }
}

impl Autoscaler {
    pub fn new(default_bounds: DisplayBounds, enabled: bool) -> Self {
        Self {
            enabled,
            bounds: default_bounds,
            default_bounds,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn bounds(&self) -> DisplayBounds {
        self.bounds
    }

    /// Recompute from `samples` if enabled. Empty input keeps the bounds.
    pub fn refresh(&mut self, samples: &[f64]) {
        if !self.enabled {
            return;
        }
        if let Some(bounds) = compute_bounds(samples) {
            self.bounds = bounds;
        }
    }

    /// Switch autoscale on (recomputing right away) or off (restoring defaults)
    pub fn set_enabled(&mut self, enabled: bool, samples: &[f64]) {
        self.enabled = enabled;
        if enabled {
            self.refresh(samples);
        } else {
            self.bounds = self.default_bounds;
        }
    }

    /// Flip the switch. Returns the new state.
    pub fn toggle(&mut self, samples: &[f64]) -> bool {
        self.set_enabled(!self.enabled, samples);
        self.enabled
    }
}

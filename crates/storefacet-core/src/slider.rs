#![forbid(unsafe_code)]

//! Price slider drag math.
//!
//! Pure pixel-to-value translation plus the handle separation rules. The
//! host reports pointer positions and the measured track rectangle; the
//! engine feeds the results into [`crate::store::FilterStore::stage_price`].
//! Nothing here touches state.

use crate::state::PriceBounds;

/// Which slider handle a drag or track click addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    /// The minimum-price handle.
    Low,
    /// The maximum-price handle.
    High,
}

impl Handle {
    /// The handle numerically closer to `value`. Ties go to `Low`.
    #[must_use]
    pub fn nearest(value: u32, low: u32, high: u32) -> Self {
        if value.abs_diff(low) <= value.abs_diff(high) {
            Handle::Low
        } else {
            Handle::High
        }
    }
}

/// The slider track's horizontal extent in host pixels, as measured at
/// the time of the pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackRect {
    /// Left edge of the track.
    pub left: f64,
    /// Track width. Zero or negative widths map every position to the floor.
    pub width: f64,
}

impl TrackRect {
    /// Create a track rectangle.
    #[must_use]
    pub const fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }
}

/// Translates pointer positions into snapped price values and keeps the
/// two handles at least one step apart.
#[derive(Debug, Clone, Copy)]
pub struct PriceSlider {
    bounds: PriceBounds,
}

impl PriceSlider {
    /// Create a slider over `bounds`.
    #[must_use]
    pub fn new(bounds: PriceBounds) -> Self {
        Self { bounds }
    }

    /// The price value under pixel `x`, snapped to the step grid.
    #[must_use]
    pub fn value_at(&self, x: f64, track: TrackRect) -> u32 {
        if track.width <= 0.0 || !x.is_finite() {
            return self.bounds.floor();
        }
        let ratio = ((x - track.left) / track.width).clamp(0.0, 1.0);
        let span = f64::from(self.bounds.ceil() - self.bounds.floor());
        let raw = f64::from(self.bounds.floor()) + ratio * span;
        self.bounds.snap(raw.round() as u32)
    }

    /// Constrain a proposed minimum so it stays a full step below
    /// `current_high` and inside bounds.
    #[must_use]
    pub fn clamp_low(&self, proposed: u32, current_high: u32) -> u32 {
        let limit = current_high
            .saturating_sub(self.bounds.step())
            .max(self.bounds.floor());
        proposed.clamp(self.bounds.floor(), limit)
    }

    /// Constrain a proposed maximum so it stays a full step above
    /// `current_low` and inside bounds.
    #[must_use]
    pub fn clamp_high(&self, proposed: u32, current_low: u32) -> u32 {
        let limit = current_low
            .saturating_add(self.bounds.step())
            .min(self.bounds.ceil());
        proposed.clamp(limit, self.bounds.ceil())
    }

    /// Fraction of the track at which `value` sits, in `[0, 1]`.
    #[must_use]
    pub fn ratio(&self, value: u32) -> f64 {
        let span = self.bounds.ceil() - self.bounds.floor();
        if span == 0 {
            return 0.0;
        }
        f64::from(self.bounds.clamp(value) - self.bounds.floor()) / f64::from(span)
    }
}

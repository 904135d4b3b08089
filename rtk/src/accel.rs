//! Velocity-sensitive acceleration curve.
//!
//! Ported from the mouse/scroll acceleration algorithm in Apple's
//! IOHIPointing driver: the recent samples in an [`EventWindow`] are
//! averaged into a rate estimate, a quadratic curve maps the averaged
//! timing onto a multiplier, and the multiplier is applied to the most
//! recent raw sample so emitted motion tracks the latest physical input
//! without perceptible lag.
//!
//! The evaluator is stateless; move and scroll axes share it and differ
//! only in configuration.

use crate::window::EventWindow;

/// Quadratic curve constants: `m = a*dt^2 - b*dt + c`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CurveConstants {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl CurveConstants {
    /// Constants ported from the IOHIPointing fixed-point originals
    /// (0x00000002, 0x000003bb, 0x00018041 over 2^16). Approximations of
    /// the fixed-point values, treated as configuration.
    pub const IOHID: Self = Self {
        a: 2.0 / 65536.0,      // ~0.00003052
        b: 955.0 / 65536.0,    // ~0.01458
        c: 98305.0 / 65536.0,  // ~1.50002
    };
}

impl Default for CurveConstants {
    fn default() -> Self {
        Self::IOHID
    }
}

/// Minimum multiplier of the wheel profile, `kIOFixedOne >> 4`.
pub const WHEEL_MIN_MULTIPLIER: f64 = 4096.0 / 65536.0;

/// Per-axis acceleration tuning. Immutable after construction; hot-reload
/// replaces the whole config.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelConfig {
    /// Scales both the averaged timing and the resulting multiplier.
    pub rate_multiplier: f64,
    /// Floor for the per-axis multiplier, `None` disables the bound.
    pub min_multiplier: Option<f64>,
    /// Ceiling for the per-axis multiplier, `None` disables the bound.
    pub max_multiplier: Option<f64>,
    /// Samples with a gap at or above this are treated as group boundaries.
    pub group_threshold_ms: f64,
    /// A gap at or above this resets the window.
    pub clear_threshold_ms: f64,
    pub curve: CurveConstants,
}

impl AccelConfig {
    /// Cursor-movement profile, the values the trackball ships with.
    pub fn pointer() -> Self {
        Self {
            rate_multiplier: 1.0,
            min_multiplier: Some(0.1),
            max_multiplier: Some(1.0),
            group_threshold_ms: 150.0,
            clear_threshold_ms: 500.0,
            curve: CurveConstants::IOHID,
        }
    }

    /// Wheel profile: floor only, no ceiling.
    pub fn wheel() -> Self {
        Self {
            rate_multiplier: 1.0,
            min_multiplier: Some(WHEEL_MIN_MULTIPLIER),
            max_multiplier: None,
            group_threshold_ms: 150.0,
            clear_threshold_ms: 500.0,
            curve: CurveConstants::IOHID,
        }
    }
}

impl Default for AccelConfig {
    fn default() -> Self {
        Self::pointer()
    }
}

/// Accelerated output offsets for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Offsets {
    pub dx: f64,
    pub dy: f64,
}

impl Offsets {
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };
}

struct MoveAverage {
    dx_avg: f64,
    dy_avg: f64,
    dt_avg_ms: f64,
}

/// Walk samples newest to oldest, averaging magnitude and timing of the
/// current event group. A sample whose gap is zero or at the group
/// threshold closes the group: its timing is counted as one full group
/// threshold and its magnitude is ignored.
fn averages<const CAP: usize>(window: &EventWindow<CAP>, config: &AccelConfig) -> Option<MoveAverage> {
    let mut dx_sum = 0.0;
    let mut dy_sum = 0.0;
    let mut dt_sum_ms = 0.0;
    let mut count = 0u32;

    for sample in window.iter_newest_first() {
        if sample.time_delta_ms <= 0.0 || sample.time_delta_ms >= config.group_threshold_ms {
            dt_sum_ms += config.group_threshold_ms;
            count += 1;
            break;
        }

        dx_sum += sample.dx.abs();
        dy_sum += sample.dy.abs();
        dt_sum_ms += sample.time_delta_ms;
        count += 1;

        if dt_sum_ms >= config.clear_threshold_ms {
            break;
        }
    }

    if count == 0 {
        return None;
    }

    Some(MoveAverage {
        dx_avg: dx_sum / count as f64,
        dy_avg: dy_sum / count as f64,
        dt_avg_ms: dt_sum_ms / count as f64,
    })
}

/// Evaluate the acceleration curve over the window.
///
/// The averaged rate picks the multiplier; the multiplier is applied to the
/// newest raw sample. Returns zero offsets for an empty window. All clamps
/// are total: non-finite intermediate values collapse to zero effect.
pub fn evaluate<const CAP: usize>(window: &EventWindow<CAP>, config: &AccelConfig) -> Offsets {
    let Some(latest) = window.latest() else {
        return Offsets::ZERO;
    };
    let Some(avg) = averages(window, config) else {
        return Offsets::ZERO;
    };

    let dt_ms = (avg.dt_avg_ms * config.rate_multiplier)
        .min(config.group_threshold_ms)
        .max(1.0);

    let curve = &config.curve;
    let m = (curve.a * dt_ms * dt_ms - curve.b * dt_ms + curve.c) * config.rate_multiplier;

    let mut x_mult = m * avg.dx_avg;
    let mut y_mult = m * avg.dy_avg;

    if let Some(max) = config.max_multiplier {
        x_mult = x_mult.min(max);
        y_mult = y_mult.min(max);
    }
    if let Some(min) = config.min_multiplier {
        x_mult = x_mult.max(min);
        y_mult = y_mult.max(min);
    }
    if !x_mult.is_finite() {
        x_mult = 0.0;
    }
    if !y_mult.is_finite() {
        y_mult = 0.0;
    }

    Offsets {
        dx: latest.dx * x_mult,
        dy: latest.dy * y_mult,
    }
}

//! Aggregate pipeline configuration.
//!
//! All tunables are plain data, validated once at construction or on a
//! whole-config swap. Individual setters on [`crate::trackball::Trackball`]
//! re-validate the field they touch.

use rtk_types::mouse_button::{MouseButton, MouseButtons};

use crate::accel::AccelConfig;

/// Wire width of the wheel and pan fields in the input report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScrollFieldWidth {
    /// One signed byte per scroll axis, 7-byte report.
    I8,
    /// Two bytes little-endian per scroll axis, 9-byte report.
    #[default]
    I16,
}

/// Wire-format knobs that vary between product revisions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportLayout {
    pub scroll_field_width: ScrollFieldWidth,
    /// Negate the wheel axis before serialization. Some hosts expect the
    /// opposite wheel polarity for the same ball direction.
    pub negate_wheel: bool,
}

/// Validation failure for a config value or setter argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Button map index outside `0..MouseButton::COUNT`.
    MapIndexOutOfRange(u8),
    /// A scale must be finite and non-zero.
    InvalidScale,
    /// A threshold or radius must be finite and positive.
    InvalidThreshold,
    /// A multiplier bound must be finite and positive, and min must not
    /// exceed max when both are set.
    InvalidMultiplier,
}

/// Complete configuration of one [`crate::trackball::Trackball`] instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackballConfig {
    /// Logical button index to physical output button. `MouseButton::None`
    /// disables the entry.
    pub button_map: [MouseButton; MouseButton::COUNT],
    /// Chord that switches ball motion to scrolling while held.
    pub scroll_trigger: MouseButtons,
    /// Radius of accumulated motion a held trigger tolerates before the
    /// chord commits to scroll mode.
    pub dead_zone: f64,
    /// Acceleration profile of the move axis.
    pub pointer: AccelConfig,
    /// Acceleration profile of the scroll axis.
    pub wheel: AccelConfig,
    /// Output scale applied to accelerated move deltas.
    pub move_scale: f64,
    /// Output scale applied to accelerated scroll deltas.
    pub scroll_scale: f64,
    /// Resolution multiplier announced for the wheel axis.
    pub wheel_multiplier: u8,
    /// Resolution multiplier announced for the pan axis.
    pub pan_multiplier: u8,
    pub layout: ReportLayout,
}

impl Default for TrackballConfig {
    fn default() -> Self {
        Self {
            button_map: identity_map(),
            scroll_trigger: MouseButtons::from_bits(
                MouseButtons::BACK.into_bits() | MouseButtons::FORWARD.into_bits(),
            ),
            dead_zone: 25.0,
            pointer: AccelConfig::pointer(),
            wheel: AccelConfig::wheel(),
            move_scale: 1.0,
            scroll_scale: 1.0,
            wheel_multiplier: 1,
            pan_multiplier: 1,
            layout: ReportLayout::default(),
        }
    }
}

/// The identity button map: every logical button emits itself.
pub const fn identity_map() -> [MouseButton; MouseButton::COUNT] {
    [
        MouseButton::Left,
        MouseButton::Right,
        MouseButton::Back,
        MouseButton::Middle,
        MouseButton::Forward,
        MouseButton::Extra1,
        MouseButton::Extra2,
        MouseButton::None,
    ]
}

pub(crate) fn validate_scale(scale: f64) -> Result<(), ConfigError> {
    if scale.is_finite() && scale != 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidScale)
    }
}

fn validate_threshold(value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold)
    }
}

fn validate_accel(accel: &AccelConfig) -> Result<(), ConfigError> {
    validate_threshold(accel.rate_multiplier)?;
    validate_threshold(accel.group_threshold_ms)?;
    validate_threshold(accel.clear_threshold_ms)?;
    for bound in [accel.min_multiplier, accel.max_multiplier].into_iter().flatten() {
        if !bound.is_finite() || bound <= 0.0 {
            return Err(ConfigError::InvalidMultiplier);
        }
    }
    if let (Some(min), Some(max)) = (accel.min_multiplier, accel.max_multiplier) {
        if min > max {
            return Err(ConfigError::InvalidMultiplier);
        }
    }
    Ok(())
}

impl TrackballConfig {
    /// Check every field. A config that passes here never causes a panic or
    /// a non-finite report downstream.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.dead_zone.is_finite() || self.dead_zone < 0.0 {
            return Err(ConfigError::InvalidThreshold);
        }
        validate_accel(&self.pointer)?;
        validate_accel(&self.wheel)?;
        validate_scale(self.move_scale)?;
        validate_scale(self.scroll_scale)?;
        Ok(())
    }
}

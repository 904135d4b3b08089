//! Report assembly: button remap, fractional carry, change detection and
//! wire serialization.
//!
//! The assembler is the last pipeline stage. It receives accelerated f64
//! deltas and the arbitrated button mask, quantizes deltas to the integer
//! wire fields while carrying the remainder, and decides whether anything
//! report-worthy changed since the last emission.

use heapless::Vec;
use rtk_types::mouse_button::{MouseButton, MouseButtons};

use crate::config::{ConfigError, ReportLayout, ScrollFieldWidth, TrackballConfig, validate_scale};

/// Largest serialized input report, two-byte scroll fields included.
pub const INPUT_REPORT_MAX_LEN: usize = 9;

/// A quantized pointer/scroll report ready for serialization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputReport {
    pub buttons: u8,
    pub x: i16,
    pub y: i16,
    pub wheel: i16,
    pub pan: i16,
}

impl InputReport {
    /// Serialize little-endian in fixed field order. The scroll fields are
    /// one or two bytes each depending on the layout.
    pub fn serialize(&self, layout: &ReportLayout) -> Vec<u8, INPUT_REPORT_MAX_LEN> {
        let mut buf = Vec::new();
        let _ = buf.push(self.buttons);
        let _ = buf.extend_from_slice(&self.x.to_le_bytes());
        let _ = buf.extend_from_slice(&self.y.to_le_bytes());
        match layout.scroll_field_width {
            ScrollFieldWidth::I8 => {
                let _ = buf.push(self.wheel as i8 as u8);
                let _ = buf.push(self.pan as i8 as u8);
            }
            ScrollFieldWidth::I16 => {
                let _ = buf.extend_from_slice(&self.wheel.to_le_bytes());
                let _ = buf.extend_from_slice(&self.pan.to_le_bytes());
            }
        }
        buf
    }
}

/// Resolution-multiplier feature report, one field per scroll axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FeatureReport {
    pub wheel_multiplier: u8,
    pub pan_multiplier: u8,
}

impl FeatureReport {
    pub fn serialize(&self) -> [u8; 2] {
        [self.wheel_multiplier, self.pan_multiplier]
    }
}

/// Accumulates accelerated deltas and button state between emissions.
#[derive(Debug)]
pub struct ReportAssembler {
    button_map: [MouseButton; MouseButton::COUNT],
    move_scale: f64,
    scroll_scale: f64,
    layout: ReportLayout,
    wheel_multiplier: u8,
    pan_multiplier: u8,
    /// Remapped mask waiting for the next report.
    buttons: u8,
    /// Mask as of the last emitted report.
    last_buttons: u8,
    acc_x: f64,
    acc_y: f64,
    acc_wheel: f64,
    acc_pan: f64,
    state_modified: bool,
    /// Armed at construction and on reset so the multiplier is announced
    /// before the first motion report.
    resolution_modified: bool,
}

impl ReportAssembler {
    pub fn new(config: &TrackballConfig) -> Self {
        Self {
            button_map: config.button_map,
            move_scale: config.move_scale,
            scroll_scale: config.scroll_scale,
            layout: config.layout,
            wheel_multiplier: config.wheel_multiplier,
            pan_multiplier: config.pan_multiplier,
            buttons: 0,
            last_buttons: 0,
            acc_x: 0.0,
            acc_y: 0.0,
            acc_wheel: 0.0,
            acc_pan: 0.0,
            state_modified: false,
            resolution_modified: true,
        }
    }

    /// Drop all pending state and re-arm the feature report.
    pub fn reset(&mut self) {
        self.buttons = 0;
        self.last_buttons = 0;
        self.acc_x = 0.0;
        self.acc_y = 0.0;
        self.acc_wheel = 0.0;
        self.acc_pan = 0.0;
        self.state_modified = false;
        self.resolution_modified = true;
    }

    /// Remap one logical button. Raw `u8` indices so a host-side setting
    /// can be applied directly; out-of-range values are rejected.
    pub fn set_mapping(&mut self, source: u8, target: u8) -> Result<(), ConfigError> {
        let source =
            MouseButton::from_repr(source).ok_or(ConfigError::MapIndexOutOfRange(source))?;
        let target =
            MouseButton::from_repr(target).ok_or(ConfigError::MapIndexOutOfRange(target))?;
        self.button_map[source as usize] = target;
        Ok(())
    }

    /// Replace the whole remap table.
    pub fn set_mappings(&mut self, map: [MouseButton; MouseButton::COUNT]) {
        self.button_map = map;
    }

    pub fn set_move_scale(&mut self, scale: f64) -> Result<(), ConfigError> {
        validate_scale(scale)?;
        self.move_scale = scale;
        Ok(())
    }

    pub fn set_scroll_scale(&mut self, scale: f64) -> Result<(), ConfigError> {
        validate_scale(scale)?;
        self.scroll_scale = scale;
        Ok(())
    }

    /// Update the announced resolution multipliers. Arms the feature
    /// report when the value actually changes.
    pub fn set_resolution_multipliers(&mut self, wheel: u8, pan: u8) {
        if wheel != self.wheel_multiplier || pan != self.pan_multiplier {
            self.wheel_multiplier = wheel;
            self.pan_multiplier = pan;
            self.resolution_modified = true;
        }
    }

    /// Apply the arbitrated chord through the remap table.
    pub fn set_buttons(&mut self, mask: MouseButtons) {
        let mut out = 0u8;
        for (index, target) in self.button_map.iter().enumerate() {
            if mask.into_bits() & (1 << index) != 0 && *target != MouseButton::None {
                out |= target.mask().into_bits();
            }
        }
        if out != self.buttons {
            self.buttons = out;
            self.state_modified = true;
        }
    }

    /// Add an accelerated move delta to the carry accumulators.
    pub fn add_move(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dx != 0.0 {
            self.acc_x += dx;
            self.state_modified = true;
        }
        if dy.is_finite() && dy != 0.0 {
            self.acc_y += dy;
            self.state_modified = true;
        }
    }

    /// Add an accelerated scroll delta. `dy` drives the wheel, `dx` pans.
    pub fn add_scroll(&mut self, dx: f64, dy: f64) {
        if dy.is_finite() && dy != 0.0 {
            self.acc_wheel += dy;
            self.state_modified = true;
        }
        if dx.is_finite() && dx != 0.0 {
            self.acc_pan += dx;
            self.state_modified = true;
        }
    }

    /// The pending feature report, if the multipliers changed since the
    /// last take. Must be drained before the first input report.
    pub fn take_feature(&mut self) -> Option<FeatureReport> {
        if self.resolution_modified {
            self.resolution_modified = false;
            Some(FeatureReport {
                wheel_multiplier: self.wheel_multiplier,
                pan_multiplier: self.pan_multiplier,
            })
        } else {
            None
        }
    }

    /// Quantize pending state into a report.
    ///
    /// Returns `None` when nothing changed since the last emission, unless
    /// `force` is set. The fractional remainder of each axis stays in the
    /// accumulator; field overflow also carries over instead of being lost.
    pub fn assemble(&mut self, force: bool) -> Option<InputReport> {
        if !self.state_modified && !force {
            return None;
        }
        self.state_modified = false;

        let (wheel_min, wheel_max) = match self.layout.scroll_field_width {
            ScrollFieldWidth::I8 => (i8::MIN as i64 + 1, i8::MAX as i64),
            ScrollFieldWidth::I16 => (i16::MIN as i64 + 1, i16::MAX as i64),
        };
        let x = quantize(&mut self.acc_x, self.move_scale, i16::MIN as i64 + 1, i16::MAX as i64);
        let y = quantize(&mut self.acc_y, self.move_scale, i16::MIN as i64 + 1, i16::MAX as i64);
        let mut wheel = quantize(&mut self.acc_wheel, self.scroll_scale, wheel_min, wheel_max);
        let pan = quantize(&mut self.acc_pan, self.scroll_scale, wheel_min, wheel_max);
        if self.layout.negate_wheel {
            wheel = -wheel;
        }

        let unchanged =
            x == 0 && y == 0 && wheel == 0 && pan == 0 && self.buttons == self.last_buttons;
        if unchanged && !force {
            return None;
        }
        self.last_buttons = self.buttons;
        Some(InputReport {
            buttons: self.buttons,
            x,
            y,
            wheel,
            pan,
        })
    }
}

/// Scale, truncate toward zero, clamp to the field range and store the
/// remainder back in output units divided by the scale.
fn quantize(accumulator: &mut f64, scale: f64, min: i64, max: i64) -> i16 {
    let scaled = *accumulator * scale;
    if !scaled.is_finite() {
        *accumulator = 0.0;
        return 0;
    }
    let emitted = (scaled as i64).clamp(min, max);
    *accumulator = (scaled - emitted as f64) / scale;
    emitted as i16
}

#[cfg(test)]
mod test {
    use super::*;

    fn assembler() -> ReportAssembler {
        let mut asm = ReportAssembler::new(&TrackballConfig::default());
        // Drain the construction-armed feature report
        asm.take_feature();
        asm
    }

    // -- change detection --------------------------------------------------

    #[test]
    fn idle_assembler_emits_nothing() {
        let mut asm = assembler();
        assert_eq!(asm.assemble(false), None);
    }

    #[test]
    fn force_emits_even_when_idle() {
        let mut asm = assembler();
        let report = asm.assemble(true).unwrap();
        assert_eq!(report, InputReport::default());
    }

    #[test]
    fn subinteger_motion_stays_pending() {
        let mut asm = assembler();
        asm.add_move(0.4, 0.0);
        assert_eq!(asm.assemble(false), None);
        // The carry survives and completes on the next tick
        asm.add_move(0.7, 0.0);
        let report = asm.assemble(false).unwrap();
        assert_eq!(report.x, 1);
    }

    #[test]
    fn button_change_alone_emits() {
        let mut asm = assembler();
        asm.set_buttons(MouseButtons::LEFT);
        let report = asm.assemble(false).unwrap();
        assert_eq!(report.buttons, MouseButtons::LEFT.into_bits());
        assert_eq!(report.x, 0);
        // Same mask again is not a change
        asm.set_buttons(MouseButtons::LEFT);
        assert_eq!(asm.assemble(false), None);
    }

    // -- fractional carry --------------------------------------------------

    #[test]
    fn carry_across_reports_loses_nothing() {
        let mut asm = assembler();
        let scale = 1.0 / 3.0;
        asm.set_move_scale(scale).unwrap();
        let mut total = 0i64;
        for _ in 0..9 {
            asm.add_move(1.0, 0.0);
            if let Some(report) = asm.assemble(false) {
                total += report.x as i64;
            }
        }
        // 9 counts at scale 1/3 quantize to exactly 3 on-wire units
        assert_eq!(total, 3);
    }

    #[test]
    fn truncation_is_toward_zero_for_negatives() {
        let mut asm = assembler();
        asm.add_move(-1.7, 0.0);
        let report = asm.assemble(false).unwrap();
        assert_eq!(report.x, -1);
        asm.add_move(-0.3, 0.0);
        let report = asm.assemble(false).unwrap();
        assert_eq!(report.x, -1);
    }

    #[test]
    fn overflow_carries_instead_of_saturating_away() {
        let mut asm = assembler();
        asm.add_move(40000.0, 0.0);
        let report = asm.assemble(false).unwrap();
        assert_eq!(report.x, i16::MAX);
        let report = asm.assemble(true).unwrap();
        assert_eq!(report.x as i32, 40000 - i16::MAX as i32);
    }

    // -- remapping ---------------------------------------------------------

    #[test]
    fn identity_map_passes_buttons_through() {
        let mut asm = assembler();
        asm.set_buttons(MouseButtons::RIGHT | MouseButtons::MIDDLE);
        let report = asm.assemble(false).unwrap();
        assert_eq!(
            report.buttons,
            (MouseButtons::RIGHT | MouseButtons::MIDDLE).into_bits()
        );
    }

    #[test]
    fn remapped_button_emits_target_bit() {
        let mut asm = assembler();
        asm.set_mapping(MouseButton::Left as u8, MouseButton::Middle as u8)
            .unwrap();
        asm.set_buttons(MouseButtons::LEFT);
        let report = asm.assemble(false).unwrap();
        assert_eq!(report.buttons, MouseButtons::MIDDLE.into_bits());
    }

    #[test]
    fn mapping_to_none_disables_button() {
        let mut asm = assembler();
        asm.set_mapping(MouseButton::Left as u8, MouseButton::None as u8)
            .unwrap();
        asm.set_buttons(MouseButtons::LEFT);
        assert_eq!(asm.assemble(false), None);
    }

    #[test]
    fn out_of_range_mapping_is_rejected() {
        let mut asm = assembler();
        assert_eq!(
            asm.set_mapping(8, 0),
            Err(ConfigError::MapIndexOutOfRange(8))
        );
        assert_eq!(
            asm.set_mapping(0, 200),
            Err(ConfigError::MapIndexOutOfRange(200))
        );
    }

    // -- feature report ----------------------------------------------------

    #[test]
    fn feature_report_armed_at_construction() {
        let mut asm = ReportAssembler::new(&TrackballConfig::default());
        let feature = asm.take_feature().unwrap();
        assert_eq!(feature.wheel_multiplier, 1);
        assert_eq!(feature.pan_multiplier, 1);
        assert_eq!(asm.take_feature(), None);
    }

    #[test]
    fn multiplier_change_rearms_feature_report() {
        let mut asm = assembler();
        asm.set_resolution_multipliers(4, 1);
        assert_eq!(
            asm.take_feature(),
            Some(FeatureReport {
                wheel_multiplier: 4,
                pan_multiplier: 1
            })
        );
        // Setting the same values again does not re-arm
        asm.set_resolution_multipliers(4, 1);
        assert_eq!(asm.take_feature(), None);
    }

    #[test]
    fn reset_rearms_feature_and_clears_carry() {
        let mut asm = assembler();
        asm.add_move(0.9, 0.9);
        asm.reset();
        assert!(asm.take_feature().is_some());
        asm.add_move(0.2, 0.2);
        assert_eq!(asm.assemble(false), None);
    }

    // -- serialization -----------------------------------------------------

    #[test]
    fn wide_layout_serializes_nine_bytes_little_endian() {
        let report = InputReport {
            buttons: 0b101,
            x: -2,
            y: 260,
            wheel: 1,
            pan: -1,
        };
        let bytes = report.serialize(&ReportLayout::default());
        assert_eq!(
            bytes.as_slice(),
            &[0b101, 0xFE, 0xFF, 0x04, 0x01, 0x01, 0x00, 0xFF, 0xFF]
        );
    }

    #[test]
    fn narrow_layout_serializes_seven_bytes() {
        let report = InputReport {
            buttons: 1,
            x: 1,
            y: 1,
            wheel: -3,
            pan: 2,
        };
        let layout = ReportLayout {
            scroll_field_width: ScrollFieldWidth::I8,
            negate_wheel: false,
        };
        let bytes = report.serialize(&layout);
        assert_eq!(bytes.as_slice(), &[1, 0x01, 0x00, 0x01, 0x00, 0xFD, 0x02]);
    }

    #[test]
    fn negate_wheel_flips_wheel_only() {
        let mut asm = ReportAssembler::new(&TrackballConfig {
            layout: ReportLayout {
                scroll_field_width: ScrollFieldWidth::I16,
                negate_wheel: true,
            },
            ..Default::default()
        });
        asm.take_feature();
        asm.add_scroll(2.0, 3.0);
        let report = asm.assemble(false).unwrap();
        assert_eq!(report.wheel, -3);
        assert_eq!(report.pan, 2);
    }

    #[test]
    fn narrow_layout_clamps_scroll_to_i8() {
        let mut asm = ReportAssembler::new(&TrackballConfig {
            layout: ReportLayout {
                scroll_field_width: ScrollFieldWidth::I8,
                negate_wheel: false,
            },
            ..Default::default()
        });
        asm.take_feature();
        asm.add_scroll(0.0, 300.0);
        let report = asm.assemble(false).unwrap();
        assert_eq!(report.wheel, i8::MAX as i16);
        // The clamped remainder carries into the next report
        let report = asm.assemble(true).unwrap();
        assert_eq!(report.wheel, 300 - i8::MAX as i16);
    }

    #[test]
    fn feature_report_serializes_two_fields() {
        let feature = FeatureReport {
            wheel_multiplier: 4,
            pan_multiplier: 2,
        };
        assert_eq!(feature.serialize(), [4, 2]);
    }
}

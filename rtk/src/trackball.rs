//! The owned trackball pipeline instance.
//!
//! A [`Trackball`] glues the pipeline stages together: producers feed it
//! raw deltas and button edges between ticks, and each [`Trackball::tick`]
//! arbitrates, accelerates, accumulates and assembles at most one feature
//! report and one input report.
//!
//! Instances are explicitly constructed and owned by their driver, exactly
//! one per transport.

use rtk_types::mouse_button::{MouseButton, MouseButtons};

use crate::accel::{self, AccelConfig};
use crate::arbiter::ScrollModeArbiter;
use crate::config::{ConfigError, TrackballConfig};
use crate::event::MotionAxis;
use crate::report::{FeatureReport, InputReport, ReportAssembler};
use crate::window::EventWindow;
use crate::{MOVE_WINDOW_CAPACITY, SCROLL_WINDOW_CAPACITY};

/// Reports produced by one tick, feature report first on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutput {
    pub feature: Option<FeatureReport>,
    pub report: Option<InputReport>,
}

/// Raw deltas gathered between two ticks, per axis pair.
#[derive(Clone, Copy, Debug, Default)]
struct PendingMotion {
    dx: f64,
    dy: f64,
}

impl PendingMotion {
    fn add(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() {
            self.dx += dx;
        }
        if dy.is_finite() {
            self.dy += dy;
        }
    }

    fn take(&mut self) -> (f64, f64) {
        let taken = (self.dx, self.dy);
        self.dx = 0.0;
        self.dy = 0.0;
        taken
    }

    fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

/// The complete motion pipeline.
pub struct Trackball {
    arbiter: ScrollModeArbiter,
    assembler: ReportAssembler,
    move_window: EventWindow<MOVE_WINDOW_CAPACITY>,
    scroll_window: EventWindow<SCROLL_WINDOW_CAPACITY>,
    pointer: AccelConfig,
    wheel: AccelConfig,
    raw_buttons: MouseButtons,
    pending_move: PendingMotion,
    pending_scroll: PendingMotion,
}

impl Trackball {
    pub fn new(config: TrackballConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            arbiter: ScrollModeArbiter::new(config.scroll_trigger, config.dead_zone),
            assembler: ReportAssembler::new(&config),
            move_window: EventWindow::new(),
            scroll_window: EventWindow::new(),
            pointer: config.pointer,
            wheel: config.wheel,
            raw_buttons: MouseButtons::empty(),
            pending_move: PendingMotion::default(),
            pending_scroll: PendingMotion::default(),
        })
    }

    /// Start (or restart) the pipeline from a clean state. The resolution
    /// multiplier is re-announced on the next tick.
    pub fn begin(&mut self) {
        info!("Trackball pipeline started");
        self.reset();
    }

    /// Drop all in-flight state: windows, arbitration, carry, pending
    /// deltas and held buttons.
    pub fn reset(&mut self) {
        self.move_window.clear();
        self.scroll_window.clear();
        self.arbiter.reset();
        self.assembler.reset();
        self.raw_buttons = MouseButtons::empty();
        self.pending_move = PendingMotion::default();
        self.pending_scroll = PendingMotion::default();
    }

    /// Swap in a whole new configuration. Validation happens before any
    /// field is touched, so a rejected config leaves the pipeline as-is.
    /// In-flight state is reset.
    pub fn replace_config(&mut self, config: TrackballConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.arbiter = ScrollModeArbiter::new(config.scroll_trigger, config.dead_zone);
        self.assembler = ReportAssembler::new(&config);
        self.pointer = config.pointer;
        self.wheel = config.wheel;
        self.move_window.clear();
        self.scroll_window.clear();
        self.raw_buttons = MouseButtons::empty();
        self.pending_move = PendingMotion::default();
        self.pending_scroll = PendingMotion::default();
        Ok(())
    }

    /// Record a raw motion delta. Deltas accumulate until the next tick;
    /// the event timestamp is observability only, the tick timestamp is
    /// what enters the event windows.
    pub fn push_motion(&mut self, axis: MotionAxis, dx: f64, dy: f64, timestamp_ms: u64) {
        debug!(
            "motion {:?} ({}, {}) at {} ms",
            axis, dx, dy, timestamp_ms
        );
        match axis {
            MotionAxis::Move => self.pending_move.add(dx, dy),
            MotionAxis::Scroll => self.pending_scroll.add(dx, dy),
        }
    }

    /// Record a physical button edge. `MouseButton::None` edges are
    /// ignored.
    pub fn set_button(&mut self, button: MouseButton, is_down: bool) {
        if button == MouseButton::None {
            return;
        }
        self.raw_buttons = self.raw_buttons.with_button(button, is_down);
    }

    /// Buttons currently held, before arbitration and remapping.
    pub fn raw_buttons(&self) -> MouseButtons {
        self.raw_buttons
    }

    // Configuration passthroughs. Each one validates its argument and
    // leaves the pipeline untouched on error.

    pub fn set_mapping(&mut self, source: u8, target: u8) -> Result<(), ConfigError> {
        self.assembler.set_mapping(source, target)
    }

    pub fn set_mappings(&mut self, map: [MouseButton; MouseButton::COUNT]) {
        self.assembler.set_mappings(map);
    }

    pub fn set_move_scale(&mut self, scale: f64) -> Result<(), ConfigError> {
        self.assembler.set_move_scale(scale)
    }

    pub fn set_scroll_scale(&mut self, scale: f64) -> Result<(), ConfigError> {
        self.assembler.set_scroll_scale(scale)
    }

    pub fn set_resolution_multipliers(&mut self, wheel: u8, pan: u8) {
        self.assembler.set_resolution_multipliers(wheel, pan);
    }

    /// Replace the scroll trigger chord and dead zone. Resets arbitration
    /// so a live hold cannot straddle two configurations.
    pub fn set_scroll_trigger(
        &mut self,
        trigger: MouseButtons,
        dead_zone: f64,
    ) -> Result<(), ConfigError> {
        if !dead_zone.is_finite() || dead_zone < 0.0 {
            return Err(ConfigError::InvalidThreshold);
        }
        self.arbiter.reconfigure(trigger, dead_zone);
        Ok(())
    }

    /// Run one pipeline step at `timestamp_ms`.
    ///
    /// Drains the deltas gathered since the previous tick, arbitrates them
    /// against the held buttons, feeds the event windows, evaluates the
    /// acceleration curves and asks the assembler for reports. When both a
    /// feature and an input report come out, the feature report must reach
    /// the host first.
    pub fn tick(&mut self, timestamp_ms: u64) -> TickOutput {
        let had_move = !self.pending_move.is_zero();
        let (move_dx, move_dy) = self.pending_move.take();
        let (scroll_dx, scroll_dy) = self.pending_scroll.take();

        let arbitration = self.arbiter.arbitrate(self.raw_buttons, move_dx, move_dy);
        self.assembler.set_buttons(arbitration.buttons);

        // Windows only see ticks that carried motion for their axis, so
        // idle ticks never dilute the velocity estimate.
        if had_move && (arbitration.move_dx != 0.0 || arbitration.move_dy != 0.0) {
            self.move_window.push(
                arbitration.move_dx,
                arbitration.move_dy,
                timestamp_ms,
                false,
                self.pointer.clear_threshold_ms,
            );
            let out = accel::evaluate(&self.move_window, &self.pointer);
            self.assembler.add_move(out.dx, out.dy);
        }

        let total_scroll_dx = arbitration.scroll_dx + scroll_dx;
        let total_scroll_dy = arbitration.scroll_dy + scroll_dy;
        if total_scroll_dx != 0.0 || total_scroll_dy != 0.0 {
            self.scroll_window.push(
                total_scroll_dx,
                total_scroll_dy,
                timestamp_ms,
                false,
                self.wheel.clear_threshold_ms,
            );
            let out = accel::evaluate(&self.scroll_window, &self.wheel);
            self.assembler.add_scroll(out.dx, out.dy);
        }

        TickOutput {
            feature: self.assembler.take_feature(),
            report: self.assembler.assemble(false),
        }
    }
}

//! Scroll-mode arbitration.
//!
//! While a scroll-trigger chord is held, ball motion accumulates inside a
//! dead zone instead of moving the cursor. Crossing the dead zone commits
//! the chord to scroll mode: from then on ball motion is routed to the
//! scroll axis and the trigger buttons stay invisible to the host.
//! Releasing the chord before the dead zone is crossed synthesizes a press
//! edge so a plain click still registers; the natural release follows on
//! the next tick.

use rtk_types::mouse_button::MouseButtons;

/// Where this tick's ball delta was routed.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Arbitration {
    /// Delta left on the move axis.
    pub move_dx: f64,
    pub move_dy: f64,
    /// Delta redirected to the scroll axis (includes residual accumulation
    /// released on the commit tick).
    pub scroll_dx: f64,
    pub scroll_dy: f64,
    /// Button mask to expose to the host: raw mask with held trigger bits
    /// cleared, OR'd with any synthesized press edges.
    pub buttons: MouseButtons,
}

/// Per-chord progress while the trigger is held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ChordState {
    Idle,
    /// Chord held, motion accumulating, not yet committed.
    DeadZone,
    /// Committed: motion goes to the scroll axis.
    ScrollMode,
}

/// Hysteresis state machine deciding between cursor movement and scrolling.
#[derive(Debug)]
pub struct ScrollModeArbiter {
    trigger_mask: MouseButtons,
    dead_zone: f64,
    accumulated_x: f64,
    accumulated_y: f64,
    /// Trigger bits currently committed to scroll mode.
    active_mask: MouseButtons,
    /// Trigger bits held on the previous tick.
    prev_held: MouseButtons,
}

impl ScrollModeArbiter {
    pub fn new(trigger_mask: MouseButtons, dead_zone: f64) -> Self {
        Self {
            trigger_mask,
            dead_zone,
            accumulated_x: 0.0,
            accumulated_y: 0.0,
            active_mask: MouseButtons::empty(),
            prev_held: MouseButtons::empty(),
        }
    }

    /// Replace the trigger chord and dead-zone radius. Resets in-flight
    /// accumulation so a live hold cannot leak into the new configuration.
    pub fn reconfigure(&mut self, trigger_mask: MouseButtons, dead_zone: f64) {
        self.trigger_mask = trigger_mask;
        self.dead_zone = dead_zone;
        self.reset();
    }

    /// Drop all arbitration state.
    pub fn reset(&mut self) {
        self.accumulated_x = 0.0;
        self.accumulated_y = 0.0;
        self.active_mask = MouseButtons::empty();
        self.prev_held = MouseButtons::empty();
    }

    pub fn state(&self) -> &'static str {
        match self.chord_state() {
            ChordState::Idle => "idle",
            ChordState::DeadZone => "dead-zone",
            ChordState::ScrollMode => "scroll",
        }
    }

    fn chord_state(&self) -> ChordState {
        if !self.active_mask.is_empty() {
            ChordState::ScrollMode
        } else if !self.prev_held.is_empty() {
            ChordState::DeadZone
        } else {
            ChordState::Idle
        }
    }

    /// Classify one tick's ball delta against the raw button mask.
    pub fn arbitrate(&mut self, raw_buttons: MouseButtons, dx: f64, dy: f64) -> Arbitration {
        let dx = if dx.is_finite() { dx } else { 0.0 };
        let dy = if dy.is_finite() { dy } else { 0.0 };

        let held = raw_buttons & self.trigger_mask;
        let released = self.prev_held & !held;

        let mut synthesized = MouseButtons::empty();
        if !released.is_empty() {
            if released.intersects(self.active_mask) {
                // The host never saw these buttons, nothing to synthesize.
                debug!("Scroll chord released, leaving scroll mode");
                self.active_mask &= !released;
            } else {
                // Released inside the dead zone: replay the click. The
                // natural release goes out on the next tick.
                debug!("Trigger released inside dead zone, synthesizing click");
                synthesized |= released;
            }
            self.accumulated_x = 0.0;
            self.accumulated_y = 0.0;
        }

        let mut out = Arbitration {
            move_dx: dx,
            move_dy: dy,
            scroll_dx: 0.0,
            scroll_dy: 0.0,
            buttons: raw_buttons,
        };

        if held.is_empty() {
            // Idle: nothing accumulates while no trigger is held.
            self.accumulated_x = 0.0;
            self.accumulated_y = 0.0;
        } else if held.intersects(self.active_mask) {
            // Scroll mode: route delta plus any residual accumulation.
            // Trigger bits joining an already-committed chord are absorbed
            // so their release stays invisible too.
            self.active_mask |= held;
            out.scroll_dx = dx + self.accumulated_x;
            out.scroll_dy = dy + self.accumulated_y;
            out.move_dx = 0.0;
            out.move_dy = 0.0;
            self.accumulated_x = 0.0;
            self.accumulated_y = 0.0;
        } else {
            // Dead zone: the move delta is consumed by accumulation.
            self.accumulated_x += dx;
            self.accumulated_y += dy;
            out.move_dx = 0.0;
            out.move_dy = 0.0;

            if self.accumulated_x.abs() > self.dead_zone || self.accumulated_y.abs() > self.dead_zone
            {
                debug!("Dead zone crossed, committing chord to scroll mode");
                self.active_mask |= held;
                out.scroll_dx = self.accumulated_x;
                out.scroll_dy = self.accumulated_y;
                self.accumulated_x = 0.0;
                self.accumulated_y = 0.0;
            }
        }

        // Trigger buttons stay invisible to the host for the whole hold.
        out.buttons = (raw_buttons & !self.trigger_mask) | synthesized;

        self.prev_held = held;
        out
    }
}

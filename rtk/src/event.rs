//! Input boundary events.
//!
//! Input devices (sensor pollers, button matrices) produce [`TrackballEvent`]s
//! and publish them to [`crate::channel::EVENT_CHANNEL`]; the
//! [`crate::processor::TrackballProcessor`] is the single consumer.

use postcard::experimental::max_size::MaxSize;
use rtk_types::mouse_button::MouseButton;
use serde::{Deserialize, Serialize};

/// Target axis pair of a motion sample.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, MaxSize, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionAxis {
    /// Cursor movement. Ball motion defaults to this axis; the arbiter may
    /// redirect it to [`MotionAxis::Scroll`] while a trigger chord is held.
    Move,
    /// Wheel/pan scrolling, for deltas that are born as scroll motion
    /// (e.g. a dedicated scroll ring).
    Scroll,
}

/// A relative motion sample from a sensor.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, MaxSize, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionEvent {
    pub axis: MotionAxis,
    pub dx: f64,
    pub dy: f64,
    /// Time the sample was taken, in milliseconds.
    pub timestamp_ms: u64,
}

/// A physical button edge.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, MaxSize, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEvent {
    pub button: MouseButton,
    pub pressed: bool,
}

/// Event type produced by all input devices.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, MaxSize, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrackballEvent {
    Motion(MotionEvent),
    Button(ButtonEvent),
}

impl TrackballEvent {
    pub fn motion(axis: MotionAxis, dx: f64, dy: f64, timestamp_ms: u64) -> Self {
        Self::Motion(MotionEvent {
            axis,
            dx,
            dy,
            timestamp_ms,
        })
    }

    pub fn button(button: MouseButton, pressed: bool) -> Self {
        Self::Button(ButtonEvent { button, pressed })
    }
}

//! RTK - trackball firmware core written in Rust.
//!
//! RTK turns raw relative-motion samples from a trackball sensor plus
//! physical button edges into outgoing pointer/scroll HID reports. The core
//! pipeline is:
//!
//! - [`window::EventWindow`] - bounded, time-windowed motion sample buffer
//! - [`accel`] - velocity-sensitive acceleration curve evaluator
//! - [`arbiter::ScrollModeArbiter`] - dead-zone based move/scroll arbitration
//! - [`report::ReportAssembler`] - remap, fractional carry, change detection
//!   and report serialization
//!
//! [`trackball::Trackball`] owns the whole pipeline and is driven by
//! [`processor::TrackballProcessor`], which consumes input events from
//! [`channel::EVENT_CHANNEL`] and pushes finished reports to
//! [`channel::REPORT_CHANNEL`] for the transport to drain.
//!
//! Exactly one `Trackball` instance must drive a given transport; the
//! instance is explicitly constructed and owned, never a process-wide
//! singleton.

#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

// This crate uses defmt or log for logging. The exact logger is chosen by
// the `defmt`/`log` features, which are mutually exclusive.
#[cfg(feature = "defmt")]
#[macro_use(debug, error, info, warn)]
extern crate defmt;
#[cfg(feature = "log")]
#[macro_use(debug, error, info, warn)]
extern crate log;

pub mod accel;
pub mod arbiter;
pub mod channel;
pub mod config;
pub mod event;
pub mod hid;
#[macro_use]
pub mod input_device;
pub mod processor;
pub mod report;
pub mod trackball;
pub mod window;

pub use embassy_futures;
pub use futures;

/// Raw mutex type used by all static channels in this crate.
pub type RawMutex = embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

/// Size of the input event channel.
pub const EVENT_CHANNEL_SIZE: usize = 16;
/// Size of the outgoing report channel.
pub const REPORT_CHANNEL_SIZE: usize = 16;

/// Capacity of the move-axis event window.
pub const MOVE_WINDOW_CAPACITY: usize = 16;
/// Capacity of the scroll-axis event window.
pub const SCROLL_WINDOW_CAPACITY: usize = 8;

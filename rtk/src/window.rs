//! Bounded, time-windowed buffer of motion samples.
//!
//! One [`EventWindow`] exists per axis pair (move and scroll). The window
//! never allocates after construction and never blocks a producer: when
//! full, the oldest sample is evicted silently.

use heapless::Deque;

/// A retained motion sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionSample {
    pub dx: f64,
    pub dy: f64,
    pub timestamp_ms: u64,
    /// Gap to the previous retained sample in milliseconds. 0 for the first
    /// sample of an empty window; pinned to the clear threshold on the
    /// sample that survives an auto-clear.
    pub time_delta_ms: f64,
}

/// Fixed-capacity, oldest-first window of [`MotionSample`]s.
#[derive(Debug, Default)]
pub struct EventWindow<const CAP: usize> {
    samples: Deque<MotionSample, CAP>,
}

impl<const CAP: usize> EventWindow<CAP> {
    pub const fn new() -> Self {
        Self {
            samples: Deque::new(),
        }
    }

    /// Append a sample.
    ///
    /// The stored `time_delta_ms` is the gap to the newest retained sample.
    /// If that gap reaches `clear_threshold_ms`, or `force_clear` is set,
    /// all prior samples are discarded first and the new sample's delta is
    /// pinned to `clear_threshold_ms` — not the true gap — so downstream
    /// averaging treats it as a full-weight oldest boundary.
    pub fn push(
        &mut self,
        dx: f64,
        dy: f64,
        timestamp_ms: u64,
        force_clear: bool,
        clear_threshold_ms: f64,
    ) {
        // Non-finite deltas are stored as zero effect, never propagated.
        let dx = if dx.is_finite() { dx } else { 0.0 };
        let dy = if dy.is_finite() { dy } else { 0.0 };

        let mut time_delta_ms = match self.samples.back() {
            Some(last) => timestamp_ms.saturating_sub(last.timestamp_ms) as f64,
            None => 0.0,
        };
        if time_delta_ms >= clear_threshold_ms || force_clear {
            self.samples.clear();
            time_delta_ms = clear_threshold_ms;
        }

        if self.samples.is_full() {
            self.samples.pop_front();
        }
        let _ = self.samples.push_back(MotionSample {
            dx,
            dy,
            timestamp_ms,
            time_delta_ms,
        });
    }

    /// Drop all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        CAP
    }

    /// The most recent sample.
    pub fn latest(&self) -> Option<&MotionSample> {
        self.samples.back()
    }

    /// Iterate samples oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &MotionSample> {
        let (front, back) = self.samples.as_slices();
        front.iter().chain(back.iter())
    }

    /// Iterate samples newest to oldest, the order the curve evaluator
    /// walks them in.
    pub fn iter_newest_first(&self) -> impl Iterator<Item = &MotionSample> {
        let (front, back) = self.samples.as_slices();
        back.iter().rev().chain(front.iter().rev())
    }
}

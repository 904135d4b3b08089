//! Event consumption and the polling pipeline driver.
//!
//! [`TrackballProcessor`] is the single consumer of
//! [`crate::channel::EVENT_CHANNEL`]. It folds incoming events into the
//! owned [`Trackball`] and runs [`Trackball::tick`] at a fixed interval,
//! pushing finished reports to [`crate::channel::REPORT_CHANNEL`].

use embassy_futures::select::{Either, select};
use embassy_time::{Duration, Instant, Timer};

use crate::channel::{EVENT_CHANNEL, REPORT_CHANNEL};
use crate::event::TrackballEvent;
use crate::hid::Report;
use crate::trackball::{TickOutput, Trackball};

/// The trait for input processors.
///
/// An input processor consumes [`TrackballEvent`]s and eventually produces
/// HID [`Report`]s. One event may yield zero or several reports, so report
/// sending happens inside the processor rather than per event.
pub trait InputProcessor {
    /// Fold one incoming event into the processor state.
    fn process(&mut self, event: TrackballEvent);

    /// Send a processed report towards the transport.
    async fn send_report(&self, report: Report) {
        REPORT_CHANNEL.send(report).await;
    }
}

/// Default tick cadence, matches a 125 Hz report rate.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(8);

/// Polling consumer driving one [`Trackball`].
pub struct TrackballProcessor {
    trackball: Trackball,
    poll_interval: Duration,
}

impl InputProcessor for TrackballProcessor {
    fn process(&mut self, event: TrackballEvent) {
        match event {
            TrackballEvent::Motion(motion) => {
                self.trackball
                    .push_motion(motion.axis, motion.dx, motion.dy, motion.timestamp_ms);
            }
            TrackballEvent::Button(button) => {
                self.trackball.set_button(button.button, button.pressed);
            }
        }
    }
}

impl TrackballProcessor {
    pub fn new(trackball: Trackball, poll_interval: Duration) -> Self {
        Self {
            trackball,
            poll_interval,
        }
    }

    /// The owned pipeline, for configuration at runtime.
    pub fn trackball_mut(&mut self) -> &mut Trackball {
        &mut self.trackball
    }

    /// Run one pipeline tick at `timestamp_ms` without touching channels.
    pub fn tick(&mut self, timestamp_ms: u64) -> TickOutput {
        self.trackball.tick(timestamp_ms)
    }

    /// Tick and publish the results. The feature report goes out before
    /// the input report.
    pub async fn flush(&mut self, timestamp_ms: u64) {
        let output = self.tick(timestamp_ms);
        if let Some(feature) = output.feature {
            self.send_report(Report::Feature(feature)).await;
        }
        if let Some(report) = output.report {
            self.send_report(Report::Input(report)).await;
        }
    }

    /// Main loop: alternate between event receipt and timer-driven ticks.
    pub async fn run(&mut self) -> ! {
        self.trackball.begin();
        let mut last = Instant::now();
        loop {
            let elapsed = last.elapsed();
            match select(
                Timer::after(
                    self.poll_interval
                        .checked_sub(elapsed)
                        .unwrap_or(Duration::MIN),
                ),
                EVENT_CHANNEL.receive(),
            )
            .await
            {
                Either::First(_) => {
                    last = Instant::now();
                    self.flush(last.as_millis()).await;
                }
                Either::Second(event) => self.process(event),
            }
        }
    }
}

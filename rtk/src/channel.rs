//! Exposed channels which can be used to share data across devices & processors

use embassy_sync::channel::Channel;
pub use embassy_sync::{blocking_mutex, channel};

use crate::event::TrackballEvent;
use crate::hid::Report;
use crate::{EVENT_CHANNEL_SIZE, RawMutex, REPORT_CHANNEL_SIZE};

/// Channel for input events from devices to the trackball processor
pub static EVENT_CHANNEL: Channel<RawMutex, TrackballEvent, EVENT_CHANNEL_SIZE> = Channel::new();
/// Channel for finished reports from the processor to the hid writer
pub static REPORT_CHANNEL: Channel<RawMutex, Report, REPORT_CHANNEL_SIZE> = Channel::new();

/// Send the specified `event` to `EVENT_CHANNEL`, dropping it when the
/// channel is full. Producers must never block on a slow consumer.
pub fn publish_event(event: TrackballEvent) {
    if EVENT_CHANNEL.try_send(event).is_err() {
        warn!("Event channel full, dropping event");
    }
}

/// Async variant of [`publish_event`], waits for free space instead of
/// dropping.
pub async fn publish_event_async(event: TrackballEvent) {
    EVENT_CHANNEL.send(event).await;
}

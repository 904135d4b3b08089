//! Channel plumbing tests: devices publish events, the processor consumes
//! them and reports come out the other side in order.

mod common;

use std::collections::VecDeque;

use embassy_futures::block_on;
use embassy_futures::select::select;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use rtk::channel::{EVENT_CHANNEL, REPORT_CHANNEL, publish_event, publish_event_async};
use rtk::config::TrackballConfig;
use rtk::event::{MotionAxis, TrackballEvent};
use rtk::hid::Report;
use rtk::input_device::InputDevice;
use rtk::processor::{DEFAULT_POLL_INTERVAL, InputProcessor, TrackballProcessor};
use rtk::run_devices;
use rtk::trackball::Trackball;
use rtk_types::mouse_button::MouseButton;

/// Replays a fixed list of events, then never resolves again.
struct ScriptedDevice {
    events: VecDeque<TrackballEvent>,
}

impl ScriptedDevice {
    fn new(events: impl IntoIterator<Item = TrackballEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

impl InputDevice for ScriptedDevice {
    async fn read_event(&mut self) -> TrackballEvent {
        match self.events.pop_front() {
            Some(event) => event,
            None => core::future::pending().await,
        }
    }
}

#[test]
fn run_devices_routes_all_devices_into_one_channel() {
    let local_channel: Channel<CriticalSectionRawMutex, TrackballEvent, 16> = Channel::new();
    let mut ball = ScriptedDevice::new([
        TrackballEvent::motion(MotionAxis::Move, 3.0, 0.0, 1000),
        TrackballEvent::motion(MotionAxis::Move, 0.0, 2.0, 1008),
    ]);
    let mut buttons = ScriptedDevice::new([TrackballEvent::button(MouseButton::Left, true)]);

    let mut received = Vec::new();
    block_on(select(
        run_devices!((ball, buttons) => local_channel),
        async {
            while received.len() < 3 {
                received.push(local_channel.receive().await);
            }
        },
    ));

    assert_eq!(received.len(), 3);
    assert!(
        received
            .iter()
            .any(|e| matches!(e, TrackballEvent::Button(_)))
    );
    assert_eq!(
        received
            .iter()
            .filter(|e| matches!(e, TrackballEvent::Motion(_)))
            .count(),
        2
    );
}

#[test]
fn events_flow_from_publish_to_report_channel() {
    let trackball = Trackball::new(TrackballConfig::default()).unwrap();
    let mut proc = TrackballProcessor::new(trackball, DEFAULT_POLL_INTERVAL);

    publish_event(TrackballEvent::motion(MotionAxis::Move, 40.0, 0.0, 1000));
    block_on(publish_event_async(TrackballEvent::button(
        MouseButton::Right,
        true,
    )));
    while let Ok(event) = EVENT_CHANNEL.try_receive() {
        proc.process(event);
    }
    block_on(proc.flush(1000));

    // The resolution multiplier is announced first, then the input report
    let Ok(Report::Feature(feature)) = REPORT_CHANNEL.try_receive() else {
        panic!("expected a feature report first");
    };
    assert_eq!(feature.wheel_multiplier, 1);
    let Ok(Report::Input(report)) = REPORT_CHANNEL.try_receive() else {
        panic!("expected an input report");
    };
    assert_eq!(report.buttons, 0b10);
    assert!(report.x > 0);
    assert!(REPORT_CHANNEL.try_receive().is_err());
}

//! Input device trait and device-running macros.
//!
//! An input device is anything that produces [`TrackballEvent`]s: a sensor
//! poller translating ball counts, a debounced button scanner, a scroll
//! ring. Devices run concurrently via [`run_devices!`] and publish into an
//! event channel drained by the processor.

use crate::event::TrackballEvent;

/// The trait for input devices.
///
/// Implementors only produce events; routing to a channel is handled by
/// [`run_devices!`].
///
/// # Example
/// ```ignore
/// struct BallSensor { /* ... */ }
///
/// impl InputDevice for BallSensor {
///     async fn read_event(&mut self) -> TrackballEvent {
///         // Wait for motion and translate it
///     }
/// }
/// ```
pub trait InputDevice {
    /// Read the next raw input event.
    async fn read_event(&mut self) -> TrackballEvent;
}

/// Helper macro for joining all futures.
#[macro_export]
macro_rules! join_all {
    ($fut:expr) => {
        $fut
    };
    ($f1:expr, $f2:expr) => {
        $crate::embassy_futures::join::join($f1, $f2)
    };
    ($f1:expr, $f2:expr, $f3:expr) => {
        $crate::embassy_futures::join::join3($f1, $f2, $f3)
    };
    ($f1:expr, $f2:expr, $f3:expr, $f4:expr) => {
        $crate::embassy_futures::join::join4($f1, $f2, $f3, $f4)
    };
    ($f1:expr, $f2:expr, $f3:expr, $f4:expr, $($rest:expr),+) => {{
        let head = $crate::embassy_futures::join::join4($f1, $f2, $f3, $f4);
        let tail = $crate::join_all!($($rest),+);
        $crate::embassy_futures::join::join(head, tail)
    }};
}

/// Macro to bind input devices to event channels and run all of them.
///
/// Each group of devices feeds one channel; all groups run concurrently.
///
/// # Example
/// ```ignore
/// let device_future = run_devices! {
///     (ball, buttons) => rtk::channel::EVENT_CHANNEL,
/// };
/// device_future.await;
/// ```
#[macro_export]
macro_rules! run_devices {
    ( $( ( $( $dev:ident ),* ) => $channel:path ),+ $(,)? ) => {{
        use $crate::futures::{self, future::FutureExt, select_biased};
        $crate::join_all!(
            $(
                async {
                    loop {
                        let e = select_biased! {
                            $(
                                e = $dev.read_event().fuse() => e,
                            )*
                        };
                        $channel.send(e).await;
                    }
                }
            ),+
        )
    }};
}

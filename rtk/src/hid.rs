//! Traits and types for HID message reporting at the transport boundary.
//!
//! The pipeline stops at serialized report bytes. The actual transport
//! (USB endpoint, BLE characteristic, RF dongle link) implements
//! [`HidReporter`] and drains [`crate::channel::REPORT_CHANNEL`].

use core::future::Future;

use heapless::Vec;

use crate::config::ReportLayout;
use crate::report::{FeatureReport, INPUT_REPORT_MAX_LEN, InputReport};

/// Report type sent from the processor to the transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Report {
    /// Pointer/scroll input report.
    Input(InputReport),
    /// Resolution-multiplier feature report.
    Feature(FeatureReport),
}

impl Report {
    /// Serialize to wire bytes per the configured layout.
    pub fn serialize(&self, layout: &ReportLayout) -> Vec<u8, INPUT_REPORT_MAX_LEN> {
        match self {
            Report::Input(report) => report.serialize(layout),
            Report::Feature(feature) => {
                let mut buf = Vec::new();
                let _ = buf.extend_from_slice(&feature.serialize());
                buf
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidError {
    /// The transport link is down.
    Disconnected,
    /// The report does not fit the transport buffer.
    BufferOverflow,
    /// Serialization failed on the transport side.
    ReportSerializeError,
}

/// HidReporter trait is used for reporting HID messages to the host, via
/// USB, BLE, etc.
pub trait HidReporter {
    /// The report type that the reporter receives from the processor.
    type ReportType;

    /// Get the report to be sent to the host.
    fn get_report(&mut self) -> impl Future<Output = Self::ReportType>;

    /// Run the reporter task.
    fn run_reporter(&mut self) -> impl Future<Output = ()> {
        async {
            loop {
                let report = self.get_report().await;
                if let Err(e) = self.write_report(report).await {
                    error!("Failed to write report to the host: {:?}", e);
                }
            }
        }
    }

    /// Write report to the host, return the number of bytes written if
    /// success.
    fn write_report(
        &mut self,
        report: Self::ReportType,
    ) -> impl Future<Output = Result<usize, HidError>>;
}

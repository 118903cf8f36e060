//! TinyG Controller
//!
//! The controller owns the machine snapshot for one device session and is
//! the only entry point for received lines. It is single-threaded by
//! construction: `ingest` takes `&mut self`, so concurrent sessions use one
//! controller each.

use std::io::BufRead;
use tinygkit_core::{AxisPosition, EventDispatcher, FooterPolicy};

use super::events::Notification;
use super::modal::MachineState;
use super::response_parser::{classify, decode_frame, parse_footer};
use super::settings::{Overrides, TinyGSettings};
use super::state::{Footer, LiveStatus, MachineSnapshot, ModalGroup, StatusReport};
use crate::firmware::ControllerType;

/// TinyG/g2core telemetry controller
#[derive(Debug, Default)]
pub struct TinyGController {
    /// Tracked machine state
    snapshot: MachineSnapshot,
    /// Footer notification policy
    footer_policy: FooterPolicy,
    /// Optional fan-out for notifications
    dispatcher: Option<EventDispatcher<Notification>>,
}

impl TinyGController {
    /// Create a controller with default state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a controller with a specific footer policy
    pub fn with_footer_policy(footer_policy: FooterPolicy) -> Self {
        Self {
            footer_policy,
            ..Self::default()
        }
    }

    /// Publish every notification to `dispatcher` in addition to returning it
    pub fn with_dispatcher(mut self, dispatcher: EventDispatcher<Notification>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Footer notification policy in effect
    pub fn footer_policy(&self) -> FooterPolicy {
        self.footer_policy
    }

    /// Ingest one line received from the device
    ///
    /// Returns the notifications in emission order: the raw line, then the
    /// changed region (if any), then the footer (if any). Blank lines
    /// produce nothing. Lines that are not JSON objects produce only the
    /// raw notification and leave the snapshot untouched.
    pub fn ingest(&mut self, line: &str) -> Vec<Notification> {
        let line = line.trim_end();
        if line.is_empty() {
            return Vec::new();
        }

        tracing::trace!("< {}", line);
        let mut notifications = vec![Notification::Raw(line.to_string())];

        match decode_frame(line) {
            Ok(frame) => {
                let footer = parse_footer(&frame);
                let status_code = footer.as_ref().and_then(|f| f.get(1).copied().flatten());

                let report = classify(&frame);
                if !report.is_recognized() {
                    tracing::trace!("Unrecognized frame: {}", line);
                }
                notifications.extend(self.snapshot.merge(&report, status_code));

                if let Some(footer) = footer {
                    notifications.extend(self.snapshot.merge_footer(&footer, self.footer_policy));
                }
            }
            Err(e) if e.is_corrupted() => {
                tracing::warn!("Discarding malformed frame: {} ({})", line, e);
            }
            Err(e) => {
                tracing::debug!("Ignoring non-frame line: {}", e);
            }
        }

        if let Some(dispatcher) = &self.dispatcher {
            for notification in &notifications {
                dispatcher.publish(notification.clone());
            }
        }

        notifications
    }

    /// Ingest every line from `reader`, handing each notification to `on_notification`
    ///
    /// Returns the number of lines read.
    pub fn replay<R, F>(&mut self, reader: R, mut on_notification: F) -> tinygkit_core::Result<usize>
    where
        R: BufRead,
        F: FnMut(&Notification),
    {
        let mut count = 0;
        for line in reader.lines() {
            let line = line?;
            count += 1;
            for notification in self.ingest(&line) {
                on_notification(&notification);
            }
        }
        tracing::debug!("Replayed {} lines", count);
        Ok(count)
    }

    /// Full machine snapshot
    pub fn snapshot(&self) -> &MachineSnapshot {
        &self.snapshot
    }

    /// Live status region
    pub fn live_status(&self) -> &LiveStatus {
        &self.snapshot.live
    }

    /// Status block
    pub fn status_report(&self) -> &StatusReport {
        &self.snapshot.live.status
    }

    /// Settings region
    pub fn settings(&self) -> &TinyGSettings {
        &self.snapshot.settings
    }

    /// Last footer received
    pub fn footer(&self) -> Footer {
        self.snapshot.footer
    }

    /// Machine position
    pub fn machine_position(&self) -> AxisPosition {
        self.snapshot.live.status.machine_position
    }

    /// Work position
    pub fn work_position(&self) -> AxisPosition {
        self.snapshot.live.status.work_position
    }

    /// Active modal groups
    pub fn modal_group(&self) -> &ModalGroup {
        &self.snapshot.live.status.modal
    }

    /// Last reported machine state
    pub fn machine_state(&self) -> Option<MachineState> {
        self.snapshot.live.status.machine_state
    }

    /// Check if the machine is in alarm
    pub fn is_alarm(&self) -> bool {
        self.machine_state().is_some_and(|s| s.is_alarm())
    }

    /// Check if the machine can accept new work
    pub fn is_idle(&self) -> bool {
        self.machine_state().is_some_and(|s| s.is_idle())
    }

    /// Current override factors
    pub fn overrides(&self) -> Overrides {
        self.snapshot.settings.overrides()
    }

    /// Highest planner buffer availability reported this session
    pub fn planner_buffer_pool_size(&self) -> u32 {
        self.snapshot.live.planner_buffer_pool_size
    }

    /// Controller family, derived from the reported hardware platform
    pub fn controller_type(&self) -> ControllerType {
        ControllerType::from_hardware_platform(self.snapshot.settings.hp)
    }
}

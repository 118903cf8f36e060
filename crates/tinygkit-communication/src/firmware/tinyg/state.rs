//! TinyG machine state
//!
//! The snapshot has three regions: live status, device settings, and the
//! protocol footer. Each classified report targets exactly one of the
//! first two; the footer piggybacks on any frame that carries one.
//!
//! Merging builds a candidate from the current value with only the
//! reported fields overlaid, then replaces the region only when the
//! candidate differs. Equal candidates produce no notification.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tinygkit_core::{AxisPosition, FooterPolicy};

use super::events::Notification;
use super::modal::{self, CoolantChannel, MachineState};
use super::response_parser::{OverrideFields, QueueReport, StatusFields, TinyGReport};
use super::settings::{TinyGSettings, OVERRIDE_KEYS};
use super::STATUS_OK;

/// Active modal groups, as G-code and M-code mnemonics
///
/// Empty strings mean the device has not reported the group yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalGroup {
    /// G0, G1, G2, G3, G80
    pub motion: String,
    /// G53 .. G59
    pub wcs: String,
    /// G17, G18, G19
    pub plane: String,
    /// G20, G21
    pub units: String,
    /// G90, G91
    pub distance: String,
    /// G93, G94, G95
    pub feedrate: String,
    /// G61, G61.1, G64
    pub path: String,
    /// M3, M4, M5
    pub spindle: String,
    /// [M7], [M8], [M7, M8] or [M9]
    pub coolant: Vec<String>,
}

/// Status block built from status reports
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Line number
    pub line: Option<u64>,
    /// Velocity
    pub velocity: Option<f64>,
    /// Feed rate
    pub feedrate: Option<f64>,
    /// Machine state
    pub machine_state: Option<MachineState>,
    /// Cycle state code
    pub cycle_state: Option<i64>,
    /// Motion state code
    pub motion_state: Option<i64>,
    /// Feedhold state code
    pub feedhold_state: Option<i64>,
    /// Machine position: canonical machine coordinates, always mm, no offsets
    pub machine_position: AxisPosition,
    /// Work position: active units with all offsets applied
    pub work_position: AxisPosition,
    /// Spindle enable
    pub spindle_enable: i64,
    /// Spindle direction
    pub spindle_direction: i64,
    /// Spindle speed
    pub spindle_speed: f64,
    /// Active modal groups
    pub modal: ModalGroup,
}

impl StatusReport {
    /// Overlay the fields present in a status report, leaving the rest untouched
    pub fn apply(&mut self, fields: &StatusFields) {
        if let Some(line) = fields.line {
            self.line = Some(line);
        }
        if let Some(velocity) = fields.velocity {
            self.velocity = Some(velocity);
        }
        if let Some(feedrate) = fields.feedrate {
            self.feedrate = Some(feedrate);
        }
        if let Some(code) = fields.machine_state {
            self.machine_state = Some(MachineState::from_code(code));
        }
        if let Some(code) = fields.cycle_state {
            self.cycle_state = Some(code);
        }
        if let Some(code) = fields.motion_state {
            self.motion_state = Some(code);
        }
        if let Some(code) = fields.feedhold_state {
            self.feedhold_state = Some(code);
        }

        let translate = |code: Option<i64>, table: fn(i64) -> &'static str, target: &mut String| {
            if let Some(code) = code {
                *target = table(code).to_string();
            }
        };
        translate(fields.motion_mode, modal::motion_mode, &mut self.modal.motion);
        translate(fields.coordinate_system, modal::coordinate_system, &mut self.modal.wcs);
        translate(fields.plane, modal::plane, &mut self.modal.plane);
        translate(fields.units, modal::units, &mut self.modal.units);
        translate(fields.distance_mode, modal::distance_mode, &mut self.modal.distance);
        translate(fields.feedrate_mode, modal::feedrate_mode, &mut self.modal.feedrate);
        translate(fields.path_control, modal::path_control, &mut self.modal.path);

        if let Some(enable) = fields.spindle_enable {
            self.spindle_enable = enable;
        }
        if let Some(direction) = fields.spindle_direction {
            self.spindle_direction = direction;
        }
        if fields.spindle_enable.is_some() || fields.spindle_direction.is_some() {
            self.modal.spindle =
                modal::spindle(self.spindle_enable, self.spindle_direction).to_string();
        }
        if let Some(speed) = fields.spindle_speed {
            self.spindle_speed = speed;
        }

        if let Some(mist) = fields.mist_coolant {
            self.modal.coolant = modal::coolant(&self.modal.coolant, CoolantChannel::Mist, mist != 0);
        }
        if let Some(flood) = fields.flood_coolant {
            self.modal.coolant =
                modal::coolant(&self.modal.coolant, CoolantChannel::Flood, flood != 0);
        }

        for (axis, value) in &fields.work_position {
            self.work_position.set(*axis, *value);
        }
        for (axis, value) in &fields.machine_position {
            self.machine_position.set(*axis, *value);
        }
    }
}

/// Live status region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveStatus {
    /// Motor timeout
    pub motor_timeout: f64,
    /// Power state per motor channel
    pub power: BTreeMap<String, f64>,
    /// Last queue report
    pub queue: QueueReport,
    /// Highest planner buffer availability seen this session
    pub planner_buffer_pool_size: u32,
    /// Status block
    pub status: StatusReport,
}

/// Protocol footer region
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footer {
    /// Protocol revision
    pub revision: i64,
    /// Status code of the command this frame answers
    pub status_code: i64,
    /// Receive buffer availability
    pub rx_buffer_info: i64,
}

impl Footer {
    /// Check if the footer reports success
    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }
}

/// Machine state tracked for one controller session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    /// Live status region
    pub live: LiveStatus,
    /// Settings region
    pub settings: TinyGSettings,
    /// Footer region
    pub footer: Footer,
}

impl MachineSnapshot {
    /// Create a snapshot with schema defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a classified report into the snapshot
    ///
    /// `status_code` is the footer status of the same frame; motor timeout,
    /// power and override values are only trusted when it is `Some(0)`.
    /// Returns the notification for the changed region, or `None` when
    /// the report changed nothing.
    pub fn merge(&mut self, report: &TinyGReport, status_code: Option<i64>) -> Option<Notification> {
        let trusted = status_code == Some(STATUS_OK);

        match report {
            TinyGReport::MotorTimeout(mt) => self.merge_motor_timeout(*mt, trusted),
            TinyGReport::PowerManagement(pwr) => self.merge_power(pwr, trusted),
            TinyGReport::QueueDepth(qr) => self.merge_queue(*qr),
            TinyGReport::StatusReport(fields) => self.merge_status(fields),
            TinyGReport::SystemSettings(values) => {
                self.merge_settings(values, trusted).map(Notification::SystemSettings)
            }
            TinyGReport::Overrides(fields) => self.merge_overrides(fields, trusted),
            TinyGReport::ReceiveEcho(values) => {
                self.merge_settings(values, trusted).map(Notification::ReceiveEcho)
            }
            TinyGReport::Unrecognized(_) => None,
        }
    }

    /// Record a footer
    ///
    /// Elements missing from a short footer, or not readable as integers,
    /// keep their previous value. With [`FooterPolicy::EveryFrame`] every
    /// non-empty footer is reported.
    pub fn merge_footer(&mut self, values: &[Option<i64>], policy: FooterPolicy) -> Option<Notification> {
        if values.is_empty() {
            return None;
        }

        let mut candidate = self.footer;
        let fields = [
            &mut candidate.revision,
            &mut candidate.status_code,
            &mut candidate.rx_buffer_info,
        ];
        for (target, value) in fields.into_iter().zip(values) {
            if let Some(value) = value {
                *target = *value;
            }
        }

        let changed = candidate != self.footer;
        self.footer = candidate;

        match policy {
            FooterPolicy::EveryFrame => Some(Notification::Footer(candidate)),
            FooterPolicy::OnChange if changed => Some(Notification::Footer(candidate)),
            FooterPolicy::OnChange => None,
        }
    }

    fn merge_motor_timeout(&mut self, mt: Option<f64>, trusted: bool) -> Option<Notification> {
        let Some(mt) = mt.filter(|_| trusted) else {
            tracing::debug!("Motor timeout report not applied (trusted: {})", trusted);
            return None;
        };

        if self.live.motor_timeout == mt {
            return None;
        }
        self.live.motor_timeout = mt;
        Some(Notification::MotorTimeout(mt))
    }

    fn merge_power(&mut self, pwr: &BTreeMap<String, f64>, trusted: bool) -> Option<Notification> {
        if !trusted {
            tracing::debug!("Power management report not applied, untrusted status");
            return None;
        }

        let mut candidate = self.live.power.clone();
        candidate.extend(pwr.iter().map(|(channel, state)| (channel.clone(), *state)));

        if candidate == self.live.power {
            return None;
        }
        self.live.power = candidate.clone();
        Some(Notification::PowerManagement(candidate))
    }

    fn merge_queue(&mut self, qr: QueueReport) -> Option<Notification> {
        if qr.qr > self.live.planner_buffer_pool_size {
            tracing::debug!(
                "Planner buffer pool size raised from {} to {}",
                self.live.planner_buffer_pool_size,
                qr.qr
            );
            self.live.planner_buffer_pool_size = qr.qr;
        }

        if self.live.queue == qr {
            return None;
        }
        self.live.queue = qr;
        Some(Notification::QueueReport(qr))
    }

    fn merge_status(&mut self, fields: &StatusFields) -> Option<Notification> {
        let mut candidate = self.live.status.clone();
        candidate.apply(fields);

        if candidate == self.live.status {
            return None;
        }

        let previous = self.live.status.machine_state;
        if previous != candidate.machine_state {
            match candidate.machine_state {
                Some(MachineState::Alarm) => tracing::warn!("Machine entered alarm state"),
                Some(state) => tracing::info!(
                    "Machine state {} -> {}",
                    previous.map(|s| s.to_string()).unwrap_or_default(),
                    state
                ),
                None => {}
            }
        }

        self.live.status = candidate.clone();
        Some(Notification::StatusReport(Box::new(candidate)))
    }

    /// Overlay schema keys; returns the accepted subset when anything changed
    ///
    /// Override factors are skipped unless the frame status is trusted.
    fn merge_settings(&mut self, values: &Map<String, Value>, trusted: bool) -> Option<Map<String, Value>> {
        let mut candidate = self.settings.clone();
        let mut accepted = Map::new();

        for (key, value) in values {
            if !trusted && OVERRIDE_KEYS.contains(&key.as_str()) {
                tracing::debug!("Override {} not applied, untrusted status", key);
                continue;
            }
            if candidate.apply(key, value) {
                accepted.insert(key.clone(), value.clone());
            } else {
                tracing::trace!("Ignoring setting {} = {}", key, value);
            }
        }

        if candidate == self.settings {
            return None;
        }
        self.settings = candidate;
        Some(accepted)
    }

    fn merge_overrides(&mut self, fields: &OverrideFields, trusted: bool) -> Option<Notification> {
        if !trusted {
            tracing::debug!("Override report not applied, untrusted status");
            return None;
        }

        let mut candidate = self.settings.clone();
        if let Some(mfo) = fields.mfo {
            candidate.mfo = mfo;
        }
        if let Some(mto) = fields.mto {
            candidate.mto = mto;
        }
        if let Some(sso) = fields.sso {
            candidate.sso = sso;
        }

        if candidate == self.settings {
            return None;
        }
        self.settings = candidate;
        Some(Notification::Overrides(self.settings.overrides()))
    }
}

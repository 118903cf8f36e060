//! TinyG Response Parser
//!
//! This module decodes TinyG/g2core JSON frames and classifies them into
//! report kinds.
//!
//! The device multiplexes several report kinds on one channel. A frame is
//! tried against each matcher in a fixed priority order and the first
//! matcher whose key is present wins. Keys are looked up nested under `r`
//! first and at the top level second, since the device uses both encodings
//! interchangeably.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tinygkit_core::{Axis, FrameError};

use super::events::ReportKind;

/// Queue report (`qr`, `qi`, `qo`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueueReport {
    /// Free slots in the planner buffer
    pub qr: u32,
    /// Blocks queued since the previous report
    pub qi: u32,
    /// Blocks removed since the previous report
    pub qo: u32,
}

/// Fields carried by a status report (`sr`)
///
/// Only the keys present in the frame are `Some`; the merger overlays
/// exactly these onto the tracked status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusFields {
    /// Line number (`line`)
    pub line: Option<u64>,
    /// Velocity (`vel`)
    pub velocity: Option<f64>,
    /// Feed rate (`feed`)
    pub feedrate: Option<f64>,
    /// Machine state code (`stat`)
    pub machine_state: Option<i64>,
    /// Cycle state code (`cycs`)
    pub cycle_state: Option<i64>,
    /// Motion state code (`mots`)
    pub motion_state: Option<i64>,
    /// Feedhold state code (`hold`)
    pub feedhold_state: Option<i64>,
    /// Motion mode code (`momo`)
    pub motion_mode: Option<i64>,
    /// Coordinate system code (`coor`)
    pub coordinate_system: Option<i64>,
    /// Plane code (`plan`)
    pub plane: Option<i64>,
    /// Units code (`unit`)
    pub units: Option<i64>,
    /// Distance mode code (`dist`)
    pub distance_mode: Option<i64>,
    /// Feed rate mode code (`frmo`)
    pub feedrate_mode: Option<i64>,
    /// Path control code (`path`)
    pub path_control: Option<i64>,
    /// Spindle enable (`spe`)
    pub spindle_enable: Option<i64>,
    /// Spindle direction (`spd`)
    pub spindle_direction: Option<i64>,
    /// Spindle speed (`sps`)
    pub spindle_speed: Option<f64>,
    /// Mist coolant (`com`)
    pub mist_coolant: Option<i64>,
    /// Flood coolant (`cof`)
    pub flood_coolant: Option<i64>,
    /// Work position axes present in the frame (`posx`..`posc`)
    pub work_position: Vec<(Axis, f64)>,
    /// Machine position axes present in the frame (`mpox`..`mpoc`)
    pub machine_position: Vec<(Axis, f64)>,
}

impl StatusFields {
    /// Extract the known status keys from an `sr` object
    pub fn from_map(sr: &Map<String, Value>) -> Self {
        let int = |key: &str| sr.get(key).and_then(integer);
        let num = |key: &str| sr.get(key).and_then(number);

        let mut fields = Self {
            line: int("line").and_then(|n| u64::try_from(n).ok()),
            velocity: num("vel"),
            feedrate: num("feed"),
            machine_state: int("stat"),
            cycle_state: int("cycs"),
            motion_state: int("mots"),
            feedhold_state: int("hold"),
            motion_mode: int("momo"),
            coordinate_system: int("coor"),
            plane: int("plan"),
            units: int("unit"),
            distance_mode: int("dist"),
            feedrate_mode: int("frmo"),
            path_control: int("path"),
            spindle_enable: int("spe"),
            spindle_direction: int("spd"),
            spindle_speed: num("sps"),
            mist_coolant: int("com"),
            flood_coolant: int("cof"),
            work_position: Vec::new(),
            machine_position: Vec::new(),
        };

        for axis in Axis::ALL {
            if let Some(value) = num(&format!("pos{}", axis.letter())) {
                fields.work_position.push((axis, value));
            }
            if let Some(value) = num(&format!("mpo{}", axis.letter())) {
                fields.machine_position.push((axis, value));
            }
        }

        fields
    }
}

/// Override percentages carried by an overrides frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OverrideFields {
    /// Manual feedrate override (`mfo`)
    pub mfo: Option<f64>,
    /// Manual traverse override (`mto`)
    pub mto: Option<f64>,
    /// Spindle speed override (`sso`)
    pub sso: Option<f64>,
}

/// A classified TinyG report
#[derive(Debug, Clone, PartialEq)]
pub enum TinyGReport {
    /// Motor timeout (`mt`)
    MotorTimeout(Option<f64>),
    /// Per-channel power management state (`pwr`)
    PowerManagement(BTreeMap<String, f64>),
    /// Planner queue depth (`qr`)
    QueueDepth(QueueReport),
    /// Status report (`sr`)
    StatusReport(Box<StatusFields>),
    /// System settings group (`sys`)
    SystemSettings(Map<String, Value>),
    /// Override percentages (`mfo`, `mto`, `sso`)
    Overrides(OverrideFields),
    /// Generic acknowledgement echoing accepted values (`r`)
    ReceiveEcho(Map<String, Value>),
    /// Nothing matched; carries the frame verbatim
    Unrecognized(Value),
}

impl TinyGReport {
    /// Notification kind targeted by this report
    pub fn kind(&self) -> Option<ReportKind> {
        match self {
            Self::MotorTimeout(_) => Some(ReportKind::MotorTimeout),
            Self::PowerManagement(_) => Some(ReportKind::PowerManagement),
            Self::QueueDepth(_) => Some(ReportKind::QueueReport),
            Self::StatusReport(_) => Some(ReportKind::StatusReport),
            Self::SystemSettings(_) => Some(ReportKind::SystemSettings),
            Self::Overrides(_) => Some(ReportKind::Overrides),
            Self::ReceiveEcho(_) => Some(ReportKind::ReceiveEcho),
            Self::Unrecognized(_) => None,
        }
    }

    /// Check if the frame matched a known report kind
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

type Matcher = fn(&Map<String, Value>) -> Option<TinyGReport>;

/// Report matchers in priority order
const MATCHERS: [Matcher; 7] = [
    match_motor_timeout,
    match_power_management,
    match_queue_report,
    match_status_report,
    match_system_settings,
    match_overrides,
    match_receive_echo,
];

/// Classify a decoded frame
///
/// Pure function: the first matching report kind wins, and frames that
/// match nothing (including non-object values) come back as
/// [`TinyGReport::Unrecognized`].
pub fn classify(frame: &Value) -> TinyGReport {
    let Some(obj) = frame.as_object() else {
        return TinyGReport::Unrecognized(frame.clone());
    };

    MATCHERS
        .iter()
        .find_map(|matcher| matcher(obj))
        .unwrap_or_else(|| TinyGReport::Unrecognized(frame.clone()))
}

/// Decode one received line into a JSON object
///
/// Trailing whitespace is ignored. Only lines starting with `{` are
/// considered frames.
pub fn decode_frame(line: &str) -> Result<Value, FrameError> {
    let trimmed = line.trim_end();

    if trimmed.is_empty() {
        return Err(FrameError::Empty);
    }

    if !trimmed.starts_with('{') {
        return Err(FrameError::NotJson {
            line: trimmed.to_string(),
        });
    }

    let value: Value = serde_json::from_str(trimmed)?;
    Ok(value)
}

/// Extract the footer array (`f`) of a frame
///
/// Returns `None` when the frame has no footer array. Elements are
/// `[revision, status code, rx buffer, ...]`; an element that is not an
/// integer comes back as `None` so only that value is distrusted.
pub fn parse_footer(frame: &Value) -> Option<Vec<Option<i64>>> {
    let values = frame.get("f")?.as_array()?;
    let footer: Vec<Option<i64>> = values.iter().map(integer).collect();
    if footer.iter().any(Option::is_none) {
        tracing::debug!("Footer has non-numeric values: {:?}", values);
    }
    Some(footer)
}

/// Look up a key under `r` first, then at the top level. `null` counts as absent.
fn lookup<'a>(frame: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    frame
        .get("r")
        .and_then(|r| r.get(key))
        .filter(|v| !v.is_null())
        .or_else(|| frame.get(key).filter(|v| !v.is_null()))
}

fn object_of(value: &Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

fn match_motor_timeout(frame: &Map<String, Value>) -> Option<TinyGReport> {
    let mt = lookup(frame, "mt")?;
    Some(TinyGReport::MotorTimeout(number(mt)))
}

fn match_power_management(frame: &Map<String, Value>) -> Option<TinyGReport> {
    let pwr = lookup(frame, "pwr")?;
    let channels = pwr
        .as_object()
        .map(|channels| {
            channels
                .iter()
                .filter_map(|(channel, state)| number(state).map(|s| (channel.clone(), s)))
                .collect()
        })
        .unwrap_or_default();
    Some(TinyGReport::PowerManagement(channels))
}

fn match_queue_report(frame: &Map<String, Value>) -> Option<TinyGReport> {
    let qr = lookup(frame, "qr")?;
    let count = |value: Option<&Value>| {
        value
            .and_then(integer)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0)
    };

    Some(TinyGReport::QueueDepth(QueueReport {
        qr: count(Some(qr)),
        qi: count(lookup(frame, "qi")),
        qo: count(lookup(frame, "qo")),
    }))
}

fn match_status_report(frame: &Map<String, Value>) -> Option<TinyGReport> {
    let sr = lookup(frame, "sr")?;
    Some(TinyGReport::StatusReport(Box::new(StatusFields::from_map(
        &object_of(sr),
    ))))
}

fn match_system_settings(frame: &Map<String, Value>) -> Option<TinyGReport> {
    let sys = lookup(frame, "sys")?;
    Some(TinyGReport::SystemSettings(object_of(sys)))
}

fn match_overrides(frame: &Map<String, Value>) -> Option<TinyGReport> {
    let mfo = lookup(frame, "mfo");
    let mto = lookup(frame, "mto");
    let sso = lookup(frame, "sso");

    if mfo.is_none() && mto.is_none() && sso.is_none() {
        return None;
    }

    Some(TinyGReport::Overrides(OverrideFields {
        mfo: mfo.and_then(number),
        mto: mto.and_then(number),
        sso: sso.and_then(number),
    }))
}

fn match_receive_echo(frame: &Map<String, Value>) -> Option<TinyGReport> {
    let r = lookup(frame, "r")?;
    Some(TinyGReport::ReceiveEcho(object_of(r)))
}

/// Read a number, accepting numeric strings and booleans
pub(crate) fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Read an integral number
pub(crate) fn integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    number(value)
        .filter(|n| n.is_finite() && n.fract() == 0.0)
        .map(|n| n as i64)
}

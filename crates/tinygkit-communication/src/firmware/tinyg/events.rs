//! Notification types produced by the TinyG controller
//!
//! Every call to `ingest` yields an ordered list of notifications: the raw
//! line first, at most one region change, and the footer tick last.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use super::response_parser::QueueReport;
use super::settings::Overrides;
use super::state::{Footer, StatusReport};

/// Notification kind, named after the wire key it tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportKind {
    /// Raw line, before any parsing
    Raw,
    /// Motor timeout (`mt`)
    MotorTimeout,
    /// Power management (`pwr`)
    PowerManagement,
    /// Queue report (`qr`)
    QueueReport,
    /// Status report (`sr`)
    StatusReport,
    /// System settings (`sys`)
    SystemSettings,
    /// Overrides (`ov`)
    Overrides,
    /// Receive echo (`r`)
    ReceiveEcho,
    /// Footer (`f`)
    Footer,
}

impl ReportKind {
    /// Wire name of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::MotorTimeout => "mt",
            Self::PowerManagement => "pwr",
            Self::QueueReport => "qr",
            Self::StatusReport => "sr",
            Self::SystemSettings => "sys",
            Self::Overrides => "ov",
            Self::ReceiveEcho => "r",
            Self::Footer => "f",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A notification emitted while ingesting a line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Notification {
    /// The verbatim line, emitted for every non-empty line
    Raw(String),
    /// Motor timeout changed
    MotorTimeout(f64),
    /// Power management state changed
    PowerManagement(BTreeMap<String, f64>),
    /// Queue report changed
    QueueReport(QueueReport),
    /// Status report changed; carries the merged status
    StatusReport(Box<StatusReport>),
    /// Settings changed through a `sys` report; carries the accepted keys
    SystemSettings(Map<String, Value>),
    /// Override factors changed
    Overrides(Overrides),
    /// Settings changed through a receive echo; carries the accepted keys
    ReceiveEcho(Map<String, Value>),
    /// Footer received
    Footer(Footer),
}

impl Notification {
    /// Kind of this notification
    pub fn kind(&self) -> ReportKind {
        match self {
            Self::Raw(_) => ReportKind::Raw,
            Self::MotorTimeout(_) => ReportKind::MotorTimeout,
            Self::PowerManagement(_) => ReportKind::PowerManagement,
            Self::QueueReport(_) => ReportKind::QueueReport,
            Self::StatusReport(_) => ReportKind::StatusReport,
            Self::SystemSettings(_) => ReportKind::SystemSettings,
            Self::Overrides(_) => ReportKind::Overrides,
            Self::ReceiveEcho(_) => ReportKind::ReceiveEcho,
            Self::Footer(_) => ReportKind::Footer,
        }
    }

    /// Check if this notification reports a state region change
    pub fn is_state_change(&self) -> bool {
        !matches!(self, Self::Raw(_) | Self::Footer(_))
    }

    /// Payload as JSON, for logging collaborators
    pub fn payload(&self) -> Value {
        let payload = match self {
            Self::Raw(line) => serde_json::to_value(line),
            Self::MotorTimeout(mt) => serde_json::to_value(mt),
            Self::PowerManagement(pwr) => serde_json::to_value(pwr),
            Self::QueueReport(qr) => serde_json::to_value(qr),
            Self::StatusReport(sr) => serde_json::to_value(sr),
            Self::SystemSettings(values) | Self::ReceiveEcho(values) => {
                Ok(Value::Object(values.clone()))
            }
            Self::Overrides(ov) => serde_json::to_value(ov),
            Self::Footer(f) => serde_json::to_value(f),
        };
        payload.unwrap_or(Value::Null)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.payload())
    }
}

/// Notification filter for subscribers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NotificationFilter {
    /// Receive all notifications.
    #[default]
    All,
    /// Receive notifications of any of these kinds.
    Kinds(Vec<ReportKind>),
}

impl NotificationFilter {
    /// Check if a notification matches this filter
    pub fn matches(&self, notification: &Notification) -> bool {
        match self {
            Self::All => true,
            Self::Kinds(kinds) => kinds.contains(&notification.kind()),
        }
    }
}

//! TinyG / g2core JSON protocol support
//!
//! Lines received from the device flow one way through this module:
//! raw line -> [`response_parser`] (classify) -> [`modal`] (translate)
//! -> [`state`] (merge) -> [`controller`] (notify).
//!
//! - `response_parser`: frame decoding, report classification, footer extraction
//! - `modal`: device code to G/M-code mnemonic tables, machine states
//! - `settings`: the schema-checked device settings snapshot
//! - `state`: the long-lived machine snapshot and its equality-gated merge
//! - `events`: notification kinds and payloads
//! - `controller`: the public facade

pub mod controller;
pub mod events;
pub mod modal;
pub mod response_parser;
pub mod settings;
pub mod state;

pub use controller::TinyGController;
pub use events::{Notification, NotificationFilter, ReportKind};
pub use modal::{CoolantChannel, MachineState};
pub use response_parser::{
    classify, decode_frame, parse_footer, OverrideFields, QueueReport, StatusFields, TinyGReport,
};
pub use settings::{Overrides, TinyGSettings};
pub use state::{Footer, LiveStatus, MachineSnapshot, ModalGroup, StatusReport};

/// Footer status code reported for a successful command
pub const STATUS_OK: i64 = 0;

//! # TinyGKit Communication
//!
//! Firmware protocol support for TinyGKit.
//! Decodes the single-line JSON frames streamed by TinyG and g2core
//! motion controllers and tracks the resulting machine state.

pub mod firmware;

pub use firmware::tinyg::{
    MachineSnapshot, Notification, NotificationFilter, ReportKind, TinyGController, TinyGReport,
};
pub use firmware::ControllerType;

//! # TinyGKit Core
//!
//! Core types shared by the TinyGKit crates.
//! Provides the error taxonomy, axis position data, tracker policies,
//! and the broadcast dispatcher used to fan notifications out to subscribers.

pub mod data;
pub mod error;
pub mod event;

pub use data::{Axis, AxisPosition, FooterPolicy};
pub use error::{Error, FrameError, Result};
pub use event::EventDispatcher;

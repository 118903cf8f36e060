//! Data models shared across the workspace
//!
//! This module provides:
//! - Axis identifiers for the six axes a TinyG/g2core device can report
//! - Axis position maps with optional rotary axes
//! - Tracker policies that are selectable from configuration

use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Axis {
    /// X-axis (typically left-right).
    X,
    /// Y-axis (typically front-back).
    Y,
    /// Z-axis (typically up-down).
    Z,
    /// A-axis (rotational around X).
    A,
    /// B-axis (rotational around Y).
    B,
    /// C-axis (rotational around Z).
    C,
}

impl Axis {
    /// All axes in reporting order
    pub const ALL: [Axis; 6] = [Axis::X, Axis::Y, Axis::Z, Axis::A, Axis::B, Axis::C];

    /// Lowercase letter used in device keys
    pub fn letter(&self) -> char {
        match self {
            Axis::X => 'x',
            Axis::Y => 'y',
            Axis::Z => 'z',
            Axis::A => 'a',
            Axis::B => 'b',
            Axis::C => 'c',
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter().to_ascii_uppercase())
    }
}

/// Position of up to six axes
///
/// X, Y and Z are always present. Rotary axes stay `None` until the
/// device reports them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisPosition {
    /// X position
    pub x: f64,
    /// Y position
    pub y: f64,
    /// Z position
    pub z: f64,
    /// A axis (4th axis) position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
    /// B axis (5th axis) position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b: Option<f64>,
    /// C axis (6th axis) position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c: Option<f64>,
}

impl AxisPosition {
    /// Overwrite a single axis, leaving the others untouched
    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
            Axis::A => self.a = Some(value),
            Axis::B => self.b = Some(value),
            Axis::C => self.c = Some(value),
        }
    }
}

/// How footer updates are reported to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FooterPolicy {
    /// Every footer-bearing frame is a tick, even when nothing changed
    #[default]
    EveryFrame,
    /// Footer notifications only fire when a footer value changed
    OnChange,
}

impl fmt::Display for FooterPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EveryFrame => write!(f, "every_frame"),
            Self::OnChange => write!(f, "on_change"),
        }
    }
}

//! TinyG modal code translation
//!
//! Converts the small integers reported in TinyG status reports into
//! G-code and M-code mnemonics. Unmapped codes translate to an empty
//! mnemonic rather than failing.
//!
//! Spindle and coolant are combinational: the spindle mnemonic depends on
//! both enable and direction, and coolant is a set where mist and flood can
//! be active at the same time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Spindle clockwise
pub const SPINDLE_CW: &str = "M3";
/// Spindle counter-clockwise
pub const SPINDLE_CCW: &str = "M4";
/// Spindle off
pub const SPINDLE_OFF: &str = "M5";
/// Mist coolant on
pub const COOLANT_MIST: &str = "M7";
/// Flood coolant on
pub const COOLANT_FLOOD: &str = "M8";
/// All coolant off
pub const COOLANT_OFF: &str = "M9";

/// Motion mode (`momo`)
pub fn motion_mode(code: i64) -> &'static str {
    match code {
        0 => "G0",
        1 => "G1",
        2 => "G2",
        3 => "G3",
        4 => "G80",
        _ => "",
    }
}

/// Coordinate system (`coor`)
pub fn coordinate_system(code: i64) -> &'static str {
    match code {
        0 => "G53",
        1 => "G54",
        2 => "G55",
        3 => "G56",
        4 => "G57",
        5 => "G58",
        6 => "G59",
        _ => "",
    }
}

/// Plane selection (`plan`)
pub fn plane(code: i64) -> &'static str {
    match code {
        0 => "G17",
        1 => "G18",
        2 => "G19",
        _ => "",
    }
}

/// Units mode (`unit`)
pub fn units(code: i64) -> &'static str {
    match code {
        0 => "G20",
        1 => "G21",
        _ => "",
    }
}

/// Distance mode (`dist`)
pub fn distance_mode(code: i64) -> &'static str {
    match code {
        0 => "G90",
        1 => "G91",
        _ => "",
    }
}

/// Feed rate mode (`frmo`)
pub fn feedrate_mode(code: i64) -> &'static str {
    match code {
        0 => "G93",
        1 => "G94",
        2 => "G95",
        _ => "",
    }
}

/// Path control mode (`path`)
pub fn path_control(code: i64) -> &'static str {
    match code {
        0 => "G61",
        1 => "G61.1",
        2 => "G64",
        _ => "",
    }
}

/// Spindle mnemonic from the enable and direction flags
pub fn spindle(enable: i64, direction: i64) -> &'static str {
    if enable == 0 {
        SPINDLE_OFF
    } else if direction == 0 {
        SPINDLE_CW
    } else {
        SPINDLE_CCW
    }
}

/// Coolant channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoolantChannel {
    /// Mist coolant (M7)
    Mist,
    /// Flood coolant (M8)
    Flood,
}

impl CoolantChannel {
    fn mnemonic(&self) -> &'static str {
        match self {
            Self::Mist => COOLANT_MIST,
            Self::Flood => COOLANT_FLOOD,
        }
    }
}

/// Apply a coolant channel change to the current coolant mnemonics
///
/// The other channel keeps whatever state `current` records for it.
/// The result is `[M7]`, `[M8]`, `[M7, M8]` or `[M9]` when nothing is on.
pub fn coolant(current: &[String], channel: CoolantChannel, on: bool) -> Vec<String> {
    let active = |c: CoolantChannel| current.iter().any(|m| m == c.mnemonic());

    let mut mist = active(CoolantChannel::Mist);
    let mut flood = active(CoolantChannel::Flood);
    match channel {
        CoolantChannel::Mist => mist = on,
        CoolantChannel::Flood => flood = on,
    }

    match (mist, flood) {
        (true, true) => vec![COOLANT_MIST.to_string(), COOLANT_FLOOD.to_string()],
        (true, false) => vec![COOLANT_MIST.to_string()],
        (false, true) => vec![COOLANT_FLOOD.to_string()],
        (false, false) => vec![COOLANT_OFF.to_string()],
    }
}

/// Machine state (`stat`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachineState {
    /// Machine is initializing
    Initializing,
    /// Ready for use
    Ready,
    /// Alarm; machine shut down
    Alarm,
    /// Program stop (M0/M1)
    Stop,
    /// Program end (M2/M30)
    End,
    /// Motion is running
    Run,
    /// Motion is holding
    Hold,
    /// Probing cycle active
    Probe,
    /// Machine is running a cycle
    Cycle,
    /// Homing cycle active
    Homing,
    /// Jogging cycle active
    Jog,
    /// Safety interlock active
    Interlock,
    /// Machine is shut down
    Shutdown,
    /// Panic; all motion stopped
    Panic,
    /// Code not known to this table
    Other(i64),
}

impl MachineState {
    /// Decode a `stat` code
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Initializing,
            1 => Self::Ready,
            2 => Self::Alarm,
            3 => Self::Stop,
            4 => Self::End,
            5 => Self::Run,
            6 => Self::Hold,
            7 => Self::Probe,
            8 => Self::Cycle,
            9 => Self::Homing,
            10 => Self::Jog,
            11 => Self::Interlock,
            12 => Self::Shutdown,
            13 => Self::Panic,
            other => Self::Other(other),
        }
    }

    /// Check if the machine can accept new work
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Ready | Self::Stop | Self::End)
    }

    /// Check if the machine is in alarm
    pub fn is_alarm(&self) -> bool {
        matches!(self, Self::Alarm)
    }
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initializing => write!(f, "Initializing"),
            Self::Ready => write!(f, "Ready"),
            Self::Alarm => write!(f, "Alarm"),
            Self::Stop => write!(f, "Stop"),
            Self::End => write!(f, "End"),
            Self::Run => write!(f, "Run"),
            Self::Hold => write!(f, "Hold"),
            Self::Probe => write!(f, "Probe"),
            Self::Cycle => write!(f, "Cycle"),
            Self::Homing => write!(f, "Homing"),
            Self::Jog => write!(f, "Jog"),
            Self::Interlock => write!(f, "Interlock"),
            Self::Shutdown => write!(f, "Shutdown"),
            Self::Panic => write!(f, "Panic"),
            Self::Other(code) => write!(f, "Unknown({})", code),
        }
    }
}

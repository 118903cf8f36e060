//! Firmware implementations for JSON-speaking motion controllers
//!
//! Supported controllers:
//! - TinyG: the original Synthetos JSON-mode controller
//! - g2core: next generation of TinyG, same report vocabulary

pub mod tinyg;

pub use tinyg::{TinyGController, TinyGReport};

/// Supported controller types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerType {
    /// TinyG
    #[default]
    TinyG,
    /// g2core (TinyG variant)
    G2Core,
}

impl ControllerType {
    /// Guess the controller family from the reported hardware platform (`hp`)
    ///
    /// Platform 1 is the Xmega TinyG board; 2 (Due) and 3 (v9 ARM) run g2core.
    pub fn from_hardware_platform(hp: f64) -> Self {
        if hp >= 2.0 {
            Self::G2Core
        } else {
            Self::TinyG
        }
    }
}

impl std::fmt::Display for ControllerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TinyG => write!(f, "TinyG"),
            Self::G2Core => write!(f, "g2core"),
        }
    }
}

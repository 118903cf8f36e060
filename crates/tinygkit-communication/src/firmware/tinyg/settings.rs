//! TinyG device settings
//!
//! The settings snapshot holds the configuration values echoed by the
//! device. Only keys with a field in [`TinyGSettings`] are ever stored;
//! anything else the device reports is ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::response_parser::number;

/// Keys holding override factors, which need a trusted status to apply
pub const OVERRIDE_KEYS: [&str; 3] = ["mfo", "mto", "sso"];

/// Settings snapshot reported by the device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TinyGSettings {
    /// Firmware build
    pub fb: f64,
    /// Firmware build string
    pub fbs: String,
    /// Firmware build configuration
    pub fbc: String,
    /// Firmware version
    pub fv: f64,
    /// Hardware platform: 1=Xmega, 2=Due, 3=v9 (ARM)
    pub hp: f64,
    /// Hardware version
    pub hv: f64,
    /// Board ID
    pub id: String,
    /// Manual feedrate override factor
    pub mfo: f64,
    /// Manual traverse override factor
    pub mto: f64,
    /// Spindle speed override factor
    pub sso: f64,
    /// Feedrate override enable
    pub mfoe: f64,
    /// Traverse override enable
    pub mtoe: f64,
    /// Spindle speed override enable
    pub ssoe: f64,
}

impl Default for TinyGSettings {
    fn default() -> Self {
        Self {
            fb: 0.0,
            fbs: String::new(),
            fbc: String::new(),
            fv: 0.0,
            hp: 0.0,
            hv: 0.0,
            id: String::new(),
            mfo: 1.0,
            mto: 1.0,
            sso: 1.0,
            mfoe: 0.0,
            mtoe: 0.0,
            ssoe: 0.0,
        }
    }
}

enum Slot<'a> {
    Number(&'a mut f64),
    Text(&'a mut String),
}

impl TinyGSettings {
    /// Overwrite one setting from a device value
    ///
    /// Returns `false` when the key is unknown or the value has the wrong
    /// shape; the settings are left untouched in that case.
    pub fn apply(&mut self, key: &str, value: &Value) -> bool {
        let Some(slot) = self.slot_mut(key) else {
            return false;
        };

        match slot {
            Slot::Number(target) => match number(value) {
                Some(v) => {
                    *target = v;
                    true
                }
                None => false,
            },
            Slot::Text(target) => match value {
                Value::String(s) => {
                    *target = s.clone();
                    true
                }
                Value::Number(n) => {
                    *target = n.to_string();
                    true
                }
                _ => false,
            },
        }
    }

    /// Current override factors
    pub fn overrides(&self) -> Overrides {
        Overrides {
            feed: self.mfo,
            traverse: self.mto,
            spindle: self.sso,
        }
    }

    fn slot_mut(&mut self, key: &str) -> Option<Slot<'_>> {
        let slot = match key {
            "fb" => Slot::Number(&mut self.fb),
            "fbs" => Slot::Text(&mut self.fbs),
            "fbc" => Slot::Text(&mut self.fbc),
            "fv" => Slot::Number(&mut self.fv),
            "hp" => Slot::Number(&mut self.hp),
            "hv" => Slot::Number(&mut self.hv),
            "id" => Slot::Text(&mut self.id),
            "mfo" => Slot::Number(&mut self.mfo),
            "mto" => Slot::Number(&mut self.mto),
            "sso" => Slot::Number(&mut self.sso),
            "mfoe" => Slot::Number(&mut self.mfoe),
            "mtoe" => Slot::Number(&mut self.mtoe),
            "ssoe" => Slot::Number(&mut self.ssoe),
            _ => return None,
        };
        Some(slot)
    }
}

/// Override factors (1.0 = 100%)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Overrides {
    /// Feed rate override (`mfo`)
    pub feed: f64,
    /// Traverse (rapid) override (`mto`)
    pub traverse: f64,
    /// Spindle speed override (`sso`)
    pub spindle: f64,
}

impl Default for Overrides {
    fn default() -> Self {
        TinyGSettings::default().overrides()
    }
}

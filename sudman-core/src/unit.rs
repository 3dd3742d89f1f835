//! Unit model for sudman
//!
//! A Unit is one snapshot of a systemd user unit as reported by the manager.
//! Units are never mutated after construction; a refresh builds a new list.

use serde::{Deserialize, Serialize};

/// Unique identifier for a unit, e.g. `foo.service`
pub type UnitName = String;

/// Value used when the manager omits a state property
pub const UNKNOWN_STATE: &str = "unknown";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub name: UnitName,
    /// Load state (`loaded`, `not-found`, `masked`, ...)
    pub load_state: String,
    /// Active state (`active`, `inactive`, `failed`, ...)
    pub active_state: String,
    /// Sub state (`running`, `dead`, `waiting`, ...)
    pub sub_state: String,
    #[serde(default)]
    pub description: String,
    pub enabled: bool,
}

/// Coarse classification of an active state, used for coloring only.
///
/// The manager owns the domain of state strings; anything unrecognized is
/// [`ActivityClass::Other`] rather than an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivityClass {
    Active,
    Failed,
    Inactive,
    Other,
}

impl Unit {
    pub fn activity(&self) -> ActivityClass {
        match self.active_state.as_str() {
            "active" => ActivityClass::Active,
            "failed" => ActivityClass::Failed,
            "inactive" => ActivityClass::Inactive,
            _ => ActivityClass::Other,
        }
    }

    pub fn enabled_label(&self) -> &'static str {
        if self.enabled { "enabled" } else { "disabled" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(active: &str) -> Unit {
        Unit {
            name: "foo.service".into(),
            load_state: "loaded".into(),
            active_state: active.into(),
            sub_state: "running".into(),
            description: String::new(),
            enabled: false,
        }
    }

    #[test]
    fn activity_accepts_unrecognized_states() {
        assert_eq!(unit("active").activity(), ActivityClass::Active);
        assert_eq!(unit("failed").activity(), ActivityClass::Failed);
        assert_eq!(unit("inactive").activity(), ActivityClass::Inactive);
        assert_eq!(unit("reloading").activity(), ActivityClass::Other);
    }
}

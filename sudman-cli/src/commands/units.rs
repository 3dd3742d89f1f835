//! One-shot subcommands: list, status, the unit actions, and logs.

use serde::Serialize;

use sudman_core::SudmanError;
use sudman_core::control::{Outcome, UnitAction, UnitControlService};
use sudman_core::query::UnitQueryService;

use crate::format;

/// Text a command produced and where it belongs
#[derive(Debug, PartialEq, Eq)]
pub struct Report {
    pub text: String,
    pub success: bool,
}

impl Report {
    fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
        }
    }

    fn fail(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: false,
        }
    }

    /// Print to stdout on success, stderr otherwise. Returns `success`.
    pub fn emit(self) -> bool {
        let text = self.text.trim_end_matches('\n');
        if self.success {
            println!("{text}");
        } else {
            eprintln!("{text}");
        }
        self.success
    }
}

impl From<Outcome> for Report {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success(m) => Report::ok(m),
            Outcome::Failure(m) => Report::fail(m),
        }
    }
}

fn json<T: Serialize + ?Sized>(value: &T) -> Report {
    match serde_json::to_string_pretty(value) {
        Ok(text) => Report::ok(text),
        Err(e) => Report::fail(format!("Error: {e}")),
    }
}

pub fn run_list(query: &UnitQueryService, unit_type: Option<&str>, as_json: bool) -> Report {
    let units = query.list_units(unit_type);
    if as_json {
        json(&units)
    } else {
        Report::ok(format::unit_list(&units))
    }
}

pub fn run_status(query: &UnitQueryService, name: &str, as_json: bool) -> Report {
    match query.get_unit_status(name) {
        Some(unit) if as_json => json(&unit),
        Some(unit) => Report::ok(format::unit_status(&unit)),
        None => Report::fail(
            SudmanError::UnitNotFound {
                name: name.to_string(),
            }
            .to_string(),
        ),
    }
}

pub fn run_action(control: &UnitControlService, action: UnitAction, name: &str) -> Report {
    control.apply(action, name).into()
}

pub fn run_logs(control: &UnitControlService, name: &str, lines: usize) -> Report {
    control.journal_logs(name, lines).into()
}

//! Console output for the non-interactive subcommands.

use std::io::IsTerminal;

use colored::{ColoredString, Colorize};

use sudman_core::unit::{ActivityClass, Unit};

const MIN_NAME_WIDTH: usize = 20;
const MIN_STATE_WIDTH: usize = 10;
const ENABLED_WIDTH: usize = 10;

/// Disable color when stdout is not a terminal or `NO_COLOR` is set.
pub fn configure_color() {
    let no_color = std::env::var_os("NO_COLOR").is_some();
    if no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
}

fn by_activity(text: &str, activity: ActivityClass) -> ColoredString {
    match activity {
        ActivityClass::Active => text.green(),
        ActivityClass::Failed => text.red(),
        ActivityClass::Inactive => text.yellow(),
        ActivityClass::Other => text.normal(),
    }
}

fn by_enabled(text: &str, enabled: bool) -> ColoredString {
    if enabled { text.green() } else { text.yellow() }
}

fn column_width<F>(units: &[Unit], min: usize, field: F) -> usize
where
    F: Fn(&Unit) -> &str,
{
    units
        .iter()
        .map(|u| field(u).chars().count())
        .max()
        .unwrap_or(0)
        .max(min)
}

/// Table of units with a bold header, one row per unit in input order
pub fn unit_list(units: &[Unit]) -> String {
    if units.is_empty() {
        return "No units found.".to_string();
    }

    let nw = column_width(units, MIN_NAME_WIDTH, |u| u.name.as_str());
    let lw = column_width(units, MIN_STATE_WIDTH, |u| u.load_state.as_str());
    let aw = column_width(units, MIN_STATE_WIDTH, |u| u.active_state.as_str());
    let sw = column_width(units, MIN_STATE_WIDTH, |u| u.sub_state.as_str());

    let mut out = Vec::with_capacity(units.len() + 2);
    out.push(format!(
        "{} {} {} {} {} {}",
        format!("{:<nw$}", "UNIT").bold(),
        format!("{:<lw$}", "LOAD").bold(),
        format!("{:<aw$}", "ACTIVE").bold(),
        format!("{:<sw$}", "SUB").bold(),
        format!("{:<ENABLED_WIDTH$}", "ENABLED").bold(),
        "DESCRIPTION".bold(),
    ));
    out.push("-".repeat(nw + lw + aw + sw + 50));

    for unit in units {
        let enabled = if unit.enabled { "yes" } else { "no" };
        out.push(format!(
            "{} {:<lw$} {:<aw$} {:<sw$} {} {}",
            by_activity(&format!("{:<nw$}", unit.name), unit.activity()),
            unit.load_state,
            unit.active_state,
            unit.sub_state,
            by_enabled(&format!("{enabled:<ENABLED_WIDTH$}"), unit.enabled),
            unit.description,
        ));
    }

    out.join("\n")
}

/// `systemctl status`-style summary of one unit
pub fn unit_status(unit: &Unit) -> String {
    [
        format!(
            "{} {} - {}",
            by_activity("●", unit.activity()),
            unit.name.bold(),
            unit.description
        ),
        String::new(),
        format!("     Loaded: {}", unit.load_state),
        format!("     Active: {} ({})", unit.active_state, unit.sub_state),
        format!(
            "     Status: {}",
            by_enabled(unit.enabled_label(), unit.enabled)
        ),
    ]
    .join("\n")
}

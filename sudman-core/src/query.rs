//! Read-only queries against the user manager.
//!
//! Every query degrades instead of failing: a non-zero exit or output without
//! the expected shape yields an empty list, `None`, or `false`.

use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::invoker::ProcessInvoker;
use crate::systemctl::{
    ENABLED_TOKEN, HEADER_MARKERS, NO_UNIT_FILES_SENTINEL, SystemctlCommand,
};
use crate::unit::{UNKNOWN_STATE, Unit};

/// Glyphs systemctl prefixes to failed or not-found rows
const STATUS_GLYPHS: [char; 2] = ['●', '*'];

/// One data row of `list-units` before enabled-state enrichment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitRow<'a> {
    pub name: &'a str,
    pub load_state: &'a str,
    pub active_state: &'a str,
    pub sub_state: &'a str,
    pub description: &'a str,
}

#[derive(Clone)]
pub struct UnitQueryService {
    invoker: Rc<dyn ProcessInvoker>,
    cmd: SystemctlCommand,
}

impl UnitQueryService {
    pub fn new(invoker: Rc<dyn ProcessInvoker>, cmd: SystemctlCommand) -> Self {
        Self { invoker, cmd }
    }

    pub fn command(&self) -> &SystemctlCommand {
        &self.cmd
    }

    /// List all units, optionally only those of one type (`service`, `timer`, ...).
    ///
    /// Order follows the manager's output.
    pub fn list_units(&self, unit_type: Option<&str>) -> Vec<Unit> {
        let result = self.invoker.invoke(&self.cmd.list_units(unit_type));
        if !result.success() {
            debug!(code = result.code, "list-units failed");
            return Vec::new();
        }

        parse_unit_table(&result.stdout)
            .into_iter()
            .map(|row| Unit {
                name: row.name.to_string(),
                load_state: row.load_state.to_string(),
                active_state: row.active_state.to_string(),
                sub_state: row.sub_state.to_string(),
                description: row.description.to_string(),
                enabled: self.is_enabled(row.name),
            })
            .collect()
    }

    /// Fetch one unit by name; `None` if it doesn't exist or `show` fails.
    pub fn get_unit_status(&self, name: &str) -> Option<Unit> {
        if !self.unit_exists(name) {
            return None;
        }

        let result = self.invoker.invoke(&self.cmd.show(name));
        if !result.success() {
            return None;
        }

        let mut props = parse_properties(&result.stdout);
        let mut take = |key: &str, default: &str| {
            props.remove(key).unwrap_or_else(|| default.to_string())
        };

        Some(Unit {
            name: name.to_string(),
            load_state: take("LoadState", UNKNOWN_STATE),
            active_state: take("ActiveState", UNKNOWN_STATE),
            sub_state: take("SubState", UNKNOWN_STATE),
            description: take("Description", ""),
            enabled: self.is_enabled(name),
        })
    }

    /// Exactly `enabled` on a zero exit; `static`, `indirect`, etc. are not.
    pub fn is_enabled(&self, name: &str) -> bool {
        let result = self.invoker.invoke(&self.cmd.is_enabled(name));
        result.success() && result.stdout.trim() == ENABLED_TOKEN
    }

    pub fn unit_exists(&self, name: &str) -> bool {
        let result = self.invoker.invoke(&self.cmd.list_unit_files(name));
        result.success() && !result.stdout.contains(NO_UNIT_FILES_SENTINEL)
    }
}

/// Parse the table printed by `systemctl list-units`.
///
/// Data starts after the first line carrying all header markers and ends at
/// the first blank line after it. Rows that don't split into five fields are
/// skipped. No header means no units.
pub fn parse_unit_table(output: &str) -> Vec<UnitRow<'_>> {
    let mut lines = output.lines();

    if !lines
        .by_ref()
        .any(|line| HEADER_MARKERS.iter().all(|m| line.contains(m)))
    {
        warn!("list-units output has no header row");
        return Vec::new();
    }

    lines
        .take_while(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let row = parse_row(line);
            if row.is_none() {
                warn!(line, "skipping malformed list-units row");
            }
            row
        })
        .collect()
}

fn parse_row(line: &str) -> Option<UnitRow<'_>> {
    let line = line.trim_start().trim_start_matches(STATUS_GLYPHS);
    let mut rest = line;
    let mut fields = [""; 4];
    for field in &mut fields {
        let (head, tail) = split_field(rest)?;
        *field = head;
        rest = tail;
    }
    let description = rest.trim_start();
    if description.is_empty() {
        return None;
    }
    let [name, load_state, active_state, sub_state] = fields;
    Some(UnitRow {
        name,
        load_state,
        active_state,
        sub_state,
        description,
    })
}

/// Split off one whitespace-delimited field, returning it and the remainder.
fn split_field(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(end) => Some((&s[..end], &s[end..])),
        None => Some((s, "")),
    }
}

/// Parse `key=value` lines; later keys win, lines without `=` are ignored.
pub fn parse_properties(output: &str) -> BTreeMap<String, String> {
    output
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .collect()
}

#![allow(dead_code)]

use std::rc::Rc;

use sudman_core::config::SudmanConfig;
use sudman_core::control::{UnitControlService, services};
use sudman_core::invoker::{Invocation, ScriptedInvoker};
use sudman_core::query::UnitQueryService;

pub const LIST_ALL: [&str; 4] = ["systemctl", "--user", "list-units", "--all"];

pub fn list_units_output(rows: &[(&str, &str, &str)]) -> String {
    let mut out = String::from(
        "  UNIT                 LOAD   ACTIVE   SUB     DESCRIPTION\n",
    );
    for (name, active, description) in rows {
        let sub = if *active == "active" { "running" } else { "dead" };
        out.push_str(&format!("  {name:<20} loaded {active:<8} {sub:<7} {description}\n"));
    }
    out.push_str(&format!("\n{} loaded units listed.\n", rows.len()));
    out
}

pub fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

/// A scripted user manager with a handful of known units.
pub struct FakeSystemd {
    pub invoker: Rc<ScriptedInvoker>,
    pub query: UnitQueryService,
    pub control: UnitControlService,
}

impl FakeSystemd {
    pub fn new() -> Self {
        let invoker = Rc::new(ScriptedInvoker::new());
        let (query, control) = services(invoker.clone(), &SudmanConfig::default());
        Self {
            invoker,
            query,
            control,
        }
    }

    pub fn listing(&self, filter: Option<&str>, rows: &[(&str, &str, &str)]) -> &Self {
        let mut cmd = argv(&LIST_ALL);
        if let Some(t) = filter {
            cmd.push(format!("*.{t}"));
        }
        self.invoker.set(cmd, Invocation::ok(list_units_output(rows)));
        for (name, _, _) in rows {
            self.unit_file(name);
        }
        self
    }

    pub fn unit_file(&self, name: &str) -> &Self {
        self.invoker.set(
            ["systemctl", "--user", "list-unit-files", name],
            Invocation::ok(format!("UNIT FILE STATE\n{name} enabled\n\n1 unit files listed.\n")),
        );
        self
    }

    pub fn enabled(&self, name: &str) -> &Self {
        self.invoker.set(
            ["systemctl", "--user", "is-enabled", name],
            Invocation::ok("enabled\n"),
        );
        self
    }

    pub fn show(&self, name: &str, active: &str, sub: &str) -> &Self {
        self.invoker.set(
            [
                "systemctl",
                "--user",
                "show",
                "--property=LoadState,ActiveState,SubState,Description",
                name,
            ],
            Invocation::ok(format!(
                "LoadState=loaded\nActiveState={active}\nSubState={sub}\nDescription={name} unit\n"
            )),
        );
        self
    }

    pub fn verb(&self, verb: &str, name: &str, result: Invocation) -> &Self {
        self.invoker.set(["systemctl", "--user", verb, name], result);
        self
    }

    pub fn calls_to(&self, parts: &[&str]) -> usize {
        self.invoker.call_count(parts)
    }
}

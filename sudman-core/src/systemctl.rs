//! Argv shapes and output literals for `systemctl --user` and `journalctl --user`.
//!
//! The literals here are part of sudman's contract with the manager's text
//! output; changing them breaks parsing against real systemd.

use crate::config::SudmanConfig;

/// Column markers that identify the header row of `list-units`
pub const HEADER_MARKERS: [&str; 3] = ["UNIT", "LOAD", "ACTIVE"];

/// Printed by `list-unit-files` when nothing matched
pub const NO_UNIT_FILES_SENTINEL: &str = "0 unit files listed.";

/// The only `is-enabled` answer that counts as enabled
pub const ENABLED_TOKEN: &str = "enabled";

/// Properties fetched for a single unit
pub const STATUS_PROPERTIES: [&str; 4] = ["LoadState", "ActiveState", "SubState", "Description"];

/// Builds argv vectors for the user-scope manager and journal.
#[derive(Clone, Debug)]
pub struct SystemctlCommand {
    systemctl: String,
    journalctl: String,
}

impl Default for SystemctlCommand {
    fn default() -> Self {
        Self::from_config(&SudmanConfig::default())
    }
}

impl SystemctlCommand {
    pub fn from_config(config: &SudmanConfig) -> Self {
        Self {
            systemctl: config.systemctl.clone(),
            journalctl: config.journalctl.clone(),
        }
    }

    fn user(&self, args: &[&str]) -> Vec<String> {
        let mut argv = Vec::with_capacity(args.len() + 2);
        argv.push(self.systemctl.clone());
        argv.push("--user".to_string());
        argv.extend(args.iter().map(|a| a.to_string()));
        argv
    }

    /// `systemctl --version`, run without `--user` to probe for systemd itself
    pub fn version(&self) -> Vec<String> {
        vec![self.systemctl.clone(), "--version".to_string()]
    }

    pub fn session_status(&self) -> Vec<String> {
        self.user(&["status"])
    }

    pub fn list_units(&self, unit_type: Option<&str>) -> Vec<String> {
        let mut argv = self.user(&["list-units", "--all"]);
        if let Some(t) = unit_type.filter(|t| !t.is_empty()) {
            argv.push(format!("*.{t}"));
        }
        argv
    }

    pub fn show(&self, unit: &str) -> Vec<String> {
        let property = format!("--property={}", STATUS_PROPERTIES.join(","));
        self.user(&["show", &property, unit])
    }

    pub fn is_enabled(&self, unit: &str) -> Vec<String> {
        self.user(&["is-enabled", unit])
    }

    pub fn list_unit_files(&self, unit: &str) -> Vec<String> {
        self.user(&["list-unit-files", unit])
    }

    pub fn verb(&self, verb: &str, unit: &str) -> Vec<String> {
        self.user(&[verb, unit])
    }

    pub fn journal_version(&self) -> Vec<String> {
        vec![self.journalctl.clone(), "--version".to_string()]
    }

    pub fn journal(&self, unit: &str, lines: usize) -> Vec<String> {
        vec![
            self.journalctl.clone(),
            "--user".to_string(),
            "-u".to_string(),
            unit.to_string(),
            "-n".to_string(),
            lines.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_units_appends_type_glob_only_when_set() {
        let cmd = SystemctlCommand::default();
        assert_eq!(
            cmd.list_units(None),
            ["systemctl", "--user", "list-units", "--all"]
        );
        assert_eq!(
            cmd.list_units(Some("timer")),
            ["systemctl", "--user", "list-units", "--all", "*.timer"]
        );
        assert_eq!(cmd.list_units(Some("")).len(), 4);
    }

    #[test]
    fn show_requests_exact_properties() {
        let cmd = SystemctlCommand::default();
        assert_eq!(
            cmd.show("foo.service"),
            [
                "systemctl",
                "--user",
                "show",
                "--property=LoadState,ActiveState,SubState,Description",
                "foo.service"
            ]
        );
    }

    #[test]
    fn journal_uses_configured_binary() {
        let config = SudmanConfig {
            journalctl: "/usr/bin/journalctl".into(),
            ..SudmanConfig::default()
        };
        let cmd = SystemctlCommand::from_config(&config);
        assert_eq!(
            cmd.journal("foo.service", 20),
            ["/usr/bin/journalctl", "--user", "-u", "foo.service", "-n", "20"]
        );
    }
}

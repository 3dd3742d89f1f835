use std::path::Path;

use colored::Colorize;

use sudman_core::config::{self, SudmanConfig};
use sudman_core::invoker::ProcessInvoker;
use sudman_core::preflight;
use sudman_core::systemctl::SystemctlCommand;

#[derive(Debug)]
pub struct Check {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub hint: Option<String>,
}

impl Check {
    fn ok(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            message: message.into(),
            hint: None,
        }
    }

    fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            message: message.into(),
            hint: None,
        }
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Run every check and print the report. Returns whether all passed.
pub fn run_doctor(
    invoker: &dyn ProcessInvoker,
    config_path: Option<&Path>,
    log_path: Option<&Path>,
) -> bool {
    let checks = collect_checks(invoker, config_path, log_path);
    println!("{}", report(&checks));
    checks.iter().all(|c| c.passed)
}

pub fn collect_checks(
    invoker: &dyn ProcessInvoker,
    config_path: Option<&Path>,
    log_path: Option<&Path>,
) -> Vec<Check> {
    let (config_check, config) = check_config(config_path);
    let cmd = SystemctlCommand::from_config(&config);

    vec![
        check_systemctl(invoker, &cmd),
        check_session(invoker, &cmd),
        check_journalctl(invoker, &cmd),
        config_check,
        check_log(log_path),
    ]
}

fn check_systemctl(invoker: &dyn ProcessInvoker, cmd: &SystemctlCommand) -> Check {
    let result = invoker.invoke(&cmd.version());
    if !result.success() {
        return Check::fail("systemctl", "not available")
            .with_hint("sudman needs a systemd-based system");
    }
    let version = result.stdout.lines().next().unwrap_or("").trim();
    Check::ok("systemctl", version)
}

fn check_session(invoker: &dyn ProcessInvoker, cmd: &SystemctlCommand) -> Check {
    if preflight::is_user_session_active(invoker, cmd) {
        Check::ok("user session", "active")
    } else {
        Check::fail("user session", "not active")
            .with_hint("Log in through a session that starts `systemd --user`")
    }
}

fn check_journalctl(invoker: &dyn ProcessInvoker, cmd: &SystemctlCommand) -> Check {
    let result = invoker.invoke(&cmd.journal_version());
    if result.success() {
        let version = result.stdout.lines().next().unwrap_or("").trim();
        Check::ok("journalctl", version)
    } else {
        Check::fail("journalctl", "not available").with_hint("`logs` will not work")
    }
}

/// Also yields the config the other checks should use.
fn check_config(explicit: Option<&Path>) -> (Check, SudmanConfig) {
    let Some(path) = config::resolve_path(explicit) else {
        return (Check::ok("config", "defaults"), SudmanConfig::default());
    };

    match SudmanConfig::load(&path) {
        Ok(config) => (Check::ok("config", path.display().to_string()), config),
        Err(e) => (
            Check::fail("config", e.to_string()).with_hint("Fix or remove the file"),
            SudmanConfig::default(),
        ),
    }
}

fn check_log(log_path: Option<&Path>) -> Check {
    match log_path {
        Some(path) => Check::ok("log file", path.display().to_string()),
        None => Check::fail("log file", "disabled").with_hint("Pass --log-file <path>"),
    }
}

fn format_check(check: &Check) -> String {
    let icon = if check.passed {
        "✓".green()
    } else {
        "✗".red()
    };
    let mut line = format!("  {icon} {}: {}", check.name, check.message);
    if let Some(hint) = &check.hint {
        line.push_str(&format!("\n    └─ {hint}"));
    }
    line
}

pub fn report(checks: &[Check]) -> String {
    let mut out = vec!["sudman doctor".to_string(), String::new()];
    out.extend(checks.iter().map(format_check));
    out.push(String::new());

    let failed: Vec<_> = checks.iter().filter(|c| !c.passed).collect();
    if failed.is_empty() {
        out.push("All checks passed!".to_string());
    } else {
        out.push("Issues found:".to_string());
        for check in failed {
            out.push(format!("  - {}: {}", check.name, check.message));
        }
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use sudman_core::invoker::{Invocation, ScriptedInvoker};

    fn healthy() -> ScriptedInvoker {
        ScriptedInvoker::new()
            .on(
                ["systemctl", "--version"],
                Invocation::ok("systemd 255 (255.4-1)\n+PAM +AUDIT\n"),
            )
            .on(["systemctl", "--user", "status"], Invocation::ok(""))
            .on(["journalctl", "--version"], Invocation::ok("systemd 255\n"))
    }

    fn missing_config() -> std::path::PathBuf {
        std::env::temp_dir().join("sudman-doctor-missing.yml")
    }

    #[test]
    fn healthy_system_passes_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"log_lines: 10\n")
            .unwrap();

        let checks = collect_checks(&healthy(), Some(&path), Some(Path::new("/tmp/sudman.log")));
        assert!(checks.iter().all(|c| c.passed), "{checks:?}");
        assert_eq!(checks[0].message, "systemd 255 (255.4-1)");

        colored::control::set_override(false);
        assert!(report(&checks).ends_with("All checks passed!"));
    }

    #[test]
    fn failures_are_listed_with_hints() {
        let invoker = ScriptedInvoker::new()
            .on(["systemctl", "--version"], Invocation::ok("systemd 255\n"))
            .on(
                ["systemctl", "--user", "status"],
                Invocation::failed(1, "Failed to connect to bus"),
            )
            .on(["journalctl", "--version"], Invocation::ok("systemd 255\n"));
        let missing = missing_config();
        let checks = collect_checks(&invoker, Some(&missing), None);

        let failed: Vec<_> = checks.iter().filter(|c| !c.passed).map(|c| c.name.as_str()).collect();
        assert_eq!(failed, ["user session", "config", "log file"]);

        colored::control::set_override(false);
        let text = report(&checks);
        assert!(text.contains("✗ user session: not active"));
        assert!(text.contains("Issues found:"));
    }

    #[test]
    fn broken_config_falls_back_to_default_binaries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "bogus_key: 1\n").unwrap();

        let invoker = healthy();
        let checks = collect_checks(&invoker, Some(&path), None);
        assert!(!checks[3].passed);
        assert_eq!(invoker.call_count(&["systemctl", "--version"]), 1);
    }
}

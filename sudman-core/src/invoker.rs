//! Process invocation boundary
//!
//! Everything sudman learns about units comes from running an external
//! command and reading its exit code and captured output. The
//! [`ProcessInvoker`] trait is that seam. It never fails: spawn errors are
//! folded into a synthetic non-zero [`Invocation`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::process::{Command, Stdio};

use tracing::debug;

/// Exit code reported when the process could not be run at all
pub const SPAWN_FAILURE_CODE: i32 = 1;

/// Captured result of one external command
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Invocation {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl Invocation {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }

    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Runs an external command to completion.
pub trait ProcessInvoker {
    fn invoke(&self, argv: &[String]) -> Invocation;
}

/// Invoker backed by real OS processes.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemInvoker;

impl ProcessInvoker for SystemInvoker {
    fn invoke(&self, argv: &[String]) -> Invocation {
        let Some((program, args)) = argv.split_first() else {
            return Invocation::failed(SPAWN_FAILURE_CODE, "empty command");
        };

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output();

        let invocation = match output {
            Ok(output) => Invocation {
                // Killed by a signal: no code, report as a plain failure
                code: output.status.code().unwrap_or(SPAWN_FAILURE_CODE),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            },
            Err(e) => Invocation::failed(SPAWN_FAILURE_CODE, e.to_string()),
        };

        debug!(argv = ?argv, code = invocation.code, "invoked");
        invocation
    }
}

/// In-memory invoker that replays canned results keyed by exact argv.
///
/// Every call is recorded so callers can assert on what would have been run.
#[derive(Debug)]
pub struct ScriptedInvoker {
    responses: RefCell<BTreeMap<Vec<String>, Invocation>>,
    fallback: Invocation,
    calls: RefCell<Vec<Vec<String>>>,
}

impl Default for ScriptedInvoker {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedInvoker {
    /// Unscripted commands fail with exit code 1.
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(BTreeMap::new()),
            fallback: Invocation::failed(1, "unscripted command"),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_fallback(mut self, fallback: Invocation) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn on<I, S>(self, argv: I, result: Invocation) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(argv, result);
        self
    }

    /// Replace the scripted result for `argv`, also through a shared handle.
    pub fn set<I, S>(&self, argv: I, result: Invocation)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key = argv.into_iter().map(Into::into).collect();
        self.responses.borrow_mut().insert(key, result);
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    pub fn call_count<S: AsRef<str>>(&self, argv: &[S]) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| {
                call.len() == argv.len() && call.iter().zip(argv).all(|(a, b)| a == b.as_ref())
            })
            .count()
    }
}

impl ProcessInvoker for ScriptedInvoker {
    fn invoke(&self, argv: &[String]) -> Invocation {
        self.calls.borrow_mut().push(argv.to_vec());
        self.responses
            .borrow()
            .get(argv)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn system_invoker_captures_both_streams_and_code() {
        let result = SystemInvoker.invoke(&argv(&["sh", "-c", "echo out; echo err >&2; exit 3"]));
        assert_eq!(result.code, 3);
        assert_eq!(result.stdout, "out\n");
        assert_eq!(result.stderr, "err\n");
    }

    #[test]
    fn missing_executable_becomes_synthetic_failure() {
        let result = SystemInvoker.invoke(&argv(&["sudman-definitely-not-a-binary"]));
        assert_eq!(result.code, SPAWN_FAILURE_CODE);
        assert!(result.stdout.is_empty());
        assert!(!result.stderr.is_empty());
    }

    #[test]
    fn empty_argv_is_a_failure() {
        let result = SystemInvoker.invoke(&[]);
        assert!(!result.success());
    }

    #[test]
    fn scripted_invoker_records_calls_and_falls_back() {
        let invoker = ScriptedInvoker::new().on(["a", "b"], Invocation::ok("hi"));

        assert_eq!(invoker.invoke(&argv(&["a", "b"])).stdout, "hi");
        assert_eq!(invoker.invoke(&argv(&["a"])).code, 1);
        assert_eq!(invoker.calls(), vec![argv(&["a", "b"]), argv(&["a"])]);
        assert_eq!(invoker.call_count(&["a", "b"]), 1);
        assert_eq!(invoker.call_count(&["c"]), 0);
    }
}

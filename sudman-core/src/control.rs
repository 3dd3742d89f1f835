//! State-changing operations on units.

use std::fmt;
use std::rc::Rc;

use tracing::info;

use crate::config::SudmanConfig;
use crate::invoker::ProcessInvoker;
use crate::query::UnitQueryService;
use crate::systemctl::SystemctlCommand;

/// Result of a control operation, always carrying a human-readable message
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    Failure(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Outcome::Success(m) | Outcome::Failure(m) => m,
        }
    }

    pub fn into_message(self) -> String {
        match self {
            Outcome::Success(m) | Outcome::Failure(m) => m,
        }
    }
}

/// The mutating `systemctl` verbs sudman exposes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitAction {
    Start,
    Stop,
    Restart,
    Enable,
    Disable,
    Mask,
    Unmask,
}

impl UnitAction {
    pub const ALL: [UnitAction; 7] = [
        UnitAction::Start,
        UnitAction::Stop,
        UnitAction::Restart,
        UnitAction::Enable,
        UnitAction::Disable,
        UnitAction::Mask,
        UnitAction::Unmask,
    ];

    /// The `systemctl` subcommand
    pub fn verb(&self) -> &'static str {
        match self {
            UnitAction::Start => "start",
            UnitAction::Stop => "stop",
            UnitAction::Restart => "restart",
            UnitAction::Enable => "enable",
            UnitAction::Disable => "disable",
            UnitAction::Mask => "mask",
            UnitAction::Unmask => "unmask",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            UnitAction::Start => "Started",
            UnitAction::Stop => "Stopped",
            UnitAction::Restart => "Restarted",
            UnitAction::Enable => "Enabled",
            UnitAction::Disable => "Disabled",
            UnitAction::Mask => "Masked",
            UnitAction::Unmask => "Unmasked",
        }
    }
}

impl fmt::Display for UnitAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

#[derive(Clone)]
pub struct UnitControlService {
    invoker: Rc<dyn ProcessInvoker>,
    query: UnitQueryService,
}

impl UnitControlService {
    pub fn new(invoker: Rc<dyn ProcessInvoker>, query: UnitQueryService) -> Self {
        Self { invoker, query }
    }

    /// Run `systemctl --user <verb> <name>` if the unit exists.
    pub fn apply(&self, action: UnitAction, name: &str) -> Outcome {
        if !self.query.unit_exists(name) {
            return missing(name);
        }

        let result = self.invoker.invoke(&self.query.command().verb(action.verb(), name));
        let outcome = if result.success() {
            Outcome::Success(format!("{} {name} successfully", action.past_tense()))
        } else {
            Outcome::Failure(format!("Failed to {action} {name}: {}", result.stderr))
        };
        info!(%action, unit = name, ok = outcome.is_success(), "unit action");
        outcome
    }

    pub fn start(&self, name: &str) -> Outcome {
        self.apply(UnitAction::Start, name)
    }

    pub fn stop(&self, name: &str) -> Outcome {
        self.apply(UnitAction::Stop, name)
    }

    pub fn restart(&self, name: &str) -> Outcome {
        self.apply(UnitAction::Restart, name)
    }

    pub fn enable(&self, name: &str) -> Outcome {
        self.apply(UnitAction::Enable, name)
    }

    pub fn disable(&self, name: &str) -> Outcome {
        self.apply(UnitAction::Disable, name)
    }

    pub fn mask(&self, name: &str) -> Outcome {
        self.apply(UnitAction::Mask, name)
    }

    pub fn unmask(&self, name: &str) -> Outcome {
        self.apply(UnitAction::Unmask, name)
    }

    /// Last `lines` journal entries for a unit. On success the message is the
    /// raw journal text.
    pub fn journal_logs(&self, name: &str, lines: usize) -> Outcome {
        if !self.query.unit_exists(name) {
            return missing(name);
        }

        let result = self.invoker.invoke(&self.query.command().journal(name, lines));
        if result.success() {
            Outcome::Success(result.stdout)
        } else {
            Outcome::Failure(format!(
                "Failed to retrieve logs for {name}: {}",
                result.stderr
            ))
        }
    }
}

/// Wire a query and a control service to one invoker.
pub fn services(
    invoker: Rc<dyn ProcessInvoker>,
    config: &SudmanConfig,
) -> (UnitQueryService, UnitControlService) {
    let query = UnitQueryService::new(invoker.clone(), SystemctlCommand::from_config(config));
    let control = UnitControlService::new(invoker, query.clone());
    (query, control)
}

fn missing(name: &str) -> Outcome {
    Outcome::Failure(format!("Unit {name} does not exist"))
}

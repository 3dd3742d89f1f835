mod commands;
mod format;
mod logging;
mod tui;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use clap::{CommandFactory, Parser, Subcommand};
use tracing::{error, info};

use sudman_core::config::SudmanConfig;
use sudman_core::control::{UnitAction, services};
use sudman_core::invoker::{ProcessInvoker, SystemInvoker};
use sudman_core::preflight::check_environment;
use sudman_core::systemctl::SystemctlCommand;
use sudman_core::{Result, SudmanError};

use crate::tui::TerminalSession;

#[derive(Parser, Debug)]
#[command(name = "sudman", version)]
#[command(about = "Manage systemd user units", long_about = None)]
struct Cli {
    /// Config file (defaults to $SUDMAN_CONFIG, then ~/.config/sudman/config.yml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs here instead of the state directory
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// List user units
    List {
        /// Only units of this type (service, timer, socket, ...)
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        unit_type: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Show the status of one unit
    Status {
        unit: String,
        #[arg(long)]
        json: bool,
    },
    Start {
        unit: String,
    },
    Stop {
        unit: String,
    },
    Restart {
        unit: String,
    },
    Enable {
        unit: String,
    },
    Disable {
        unit: String,
    },
    Mask {
        unit: String,
    },
    Unmask {
        unit: String,
    },
    /// Show recent journal entries for a unit
    Logs {
        unit: String,
        #[arg(short = 'n', long)]
        lines: Option<usize>,
    },
    /// Open the interactive dashboard
    Interactive,
    /// Check the environment sudman depends on
    Doctor,
}

impl Commands {
    fn action(&self) -> Option<(UnitAction, &str)> {
        let (action, unit) = match self {
            Commands::Start { unit } => (UnitAction::Start, unit),
            Commands::Stop { unit } => (UnitAction::Stop, unit),
            Commands::Restart { unit } => (UnitAction::Restart, unit),
            Commands::Enable { unit } => (UnitAction::Enable, unit),
            Commands::Disable { unit } => (UnitAction::Disable, unit),
            Commands::Mask { unit } => (UnitAction::Mask, unit),
            Commands::Unmask { unit } => (UnitAction::Unmask, unit),
            _ => return None,
        };
        Some((action, unit.as_str()))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_path = logging::init(cli.log_file.as_deref(), cli.verbose);
    format::configure_color();

    let Some(command) = cli.command else {
        // Nothing to do; help goes to stdout and that's a success
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    };

    if command == Commands::Doctor {
        let ok = commands::run_doctor(&SystemInvoker, cli.config.as_deref(), log_path.as_deref());
        return exit_code(ok);
    }

    match run(command, cli.config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %e, fatal = e.is_session_fatal(), "command aborted");
            for line in error_lines(&e) {
                eprintln!("{line}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Lines printed for an aborted command; environment failures get a pointer
/// to `doctor`.
fn error_lines(e: &SudmanError) -> Vec<String> {
    let mut lines = vec![format!("Error: {e}")];
    if e.is_session_fatal() {
        lines.push("Run `sudman doctor` for details.".to_string());
    }
    lines
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run(command: Commands, config_path: Option<PathBuf>) -> Result<bool> {
    let config = SudmanConfig::discover(config_path.as_deref())?;
    let invoker: Rc<dyn ProcessInvoker> = Rc::new(SystemInvoker);

    check_environment(invoker.as_ref(), &SystemctlCommand::from_config(&config))?;
    info!(?command, "running");

    let (query, control) = services(invoker, &config);

    if let Some((action, unit)) = command.action() {
        return Ok(commands::run_action(&control, action, unit).emit());
    }

    let report = match command {
        Commands::List { unit_type, json } => commands::run_list(&query, unit_type.as_deref(), json),
        Commands::Status { unit, json } => commands::run_status(&query, &unit, json),
        Commands::Logs { unit, lines } => {
            commands::run_logs(&control, &unit, lines.unwrap_or(config.log_lines))
        }
        Commands::Interactive => {
            let session = TerminalSession::enter().map_err(|source| SudmanError::Terminal { source })?;
            tui::run_dashboard(session, query, control, &config)?;
            return Ok(true);
        }
        // Verbs were dispatched above, doctor before preflight
        _ => return Ok(true),
    };
    Ok(report.emit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("sudman").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn no_subcommand_is_allowed() {
        assert_eq!(parse(&[]).command, None);
    }

    #[test]
    fn list_accepts_type_and_json() {
        assert_eq!(
            parse(&["list", "--type", "timer", "--json"]).command,
            Some(Commands::List {
                unit_type: Some("timer".into()),
                json: true
            })
        );
    }

    #[test]
    fn logs_line_count_is_optional() {
        assert_eq!(
            parse(&["logs", "foo.service"]).command,
            Some(Commands::Logs {
                unit: "foo.service".into(),
                lines: None
            })
        );
        assert_eq!(
            parse(&["logs", "foo.service", "-n", "5"]).command,
            Some(Commands::Logs {
                unit: "foo.service".into(),
                lines: Some(5)
            })
        );
    }

    #[test]
    fn verbs_map_to_actions() {
        let cli = parse(&["mask", "foo.service"]);
        assert_eq!(
            cli.command.as_ref().and_then(Commands::action),
            Some((UnitAction::Mask, "foo.service"))
        );
        assert_eq!(parse(&["interactive"]).command.unwrap().action(), None);
    }

    #[test]
    fn verbs_require_a_unit() {
        assert!(Cli::try_parse_from(["sudman", "start"]).is_err());
    }

    #[test]
    fn global_flags_work_after_the_subcommand() {
        let cli = parse(&["status", "foo.service", "-vv", "--config", "/tmp/c.yml"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.yml")));
    }

    #[test]
    fn environment_errors_point_at_doctor() {
        assert_eq!(
            error_lines(&SudmanError::SessionInactive),
            [
                "Error: systemd user session is not active.",
                "Run `sudman doctor` for details."
            ]
        );
        let not_found = SudmanError::UnitNotFound {
            name: "foo.service".into(),
        };
        assert_eq!(error_lines(&not_found), ["Error: Unit foo.service not found."]);
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}

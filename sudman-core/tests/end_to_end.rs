mod common;

use std::rc::Rc;

use sudman_core::config::SudmanConfig;
use sudman_core::control::{Outcome, UnitAction, services};
use sudman_core::invoker::{Invocation, ScriptedInvoker};
use sudman_core::unit::Unit;

use common::{FakeSystemd, LIST_ALL};

#[test]
fn single_row_listing_becomes_one_unit() {
    let invoker = Rc::new(
        ScriptedInvoker::new()
            .on(
                LIST_ALL,
                Invocation::ok(
                    "UNIT LOAD ACTIVE SUB DESCRIPTION\n\
                     foo.service loaded active running Foo Service\n\
                     \n\
                     1 loaded units listed.",
                ),
            )
            .on(
                ["systemctl", "--user", "is-enabled", "foo.service"],
                Invocation::ok("enabled\n"),
            ),
    );
    let (query, _) = services(invoker, &SudmanConfig::default());

    assert_eq!(
        query.list_units(None),
        vec![Unit {
            name: "foo.service".into(),
            load_state: "loaded".into(),
            active_state: "active".into(),
            sub_state: "running".into(),
            description: "Foo Service".into(),
            enabled: true,
        }]
    );
}

#[test]
fn start_reports_success_then_stderr_on_failure() {
    let fake = FakeSystemd::new();
    fake.unit_file("x")
        .verb("start", "x", Invocation::ok(""));
    assert_eq!(
        fake.control.start("x"),
        Outcome::Success("Started x successfully".into())
    );

    fake.verb("start", "x", Invocation::failed(1, "no such unit"));
    assert_eq!(
        fake.control.start("x"),
        Outcome::Failure("Failed to start x: no such unit".into())
    );
}

#[test]
fn nonexistent_unit_gets_no_mutating_calls() {
    let fake = FakeSystemd::new();
    fake.invoker.set(
        ["systemctl", "--user", "list-unit-files", "ghost.service"],
        Invocation::ok("UNIT FILE STATE\n\n0 unit files listed.\n"),
    );

    for action in UnitAction::ALL {
        let outcome = fake.control.apply(action, "ghost.service");
        assert!(!outcome.is_success());
        assert_eq!(fake.calls_to(&["systemctl", "--user", action.verb(), "ghost.service"]), 0);
    }
    assert!(!fake.control.journal_logs("ghost.service", 10).is_success());
    assert_eq!(fake.invoker.calls().len(), UnitAction::ALL.len() + 1);
}

#[test]
fn status_combines_show_and_is_enabled() {
    let fake = FakeSystemd::new();
    fake.unit_file("foo.service")
        .show("foo.service", "failed", "failed")
        .enabled("foo.service");

    let unit = fake.query.get_unit_status("foo.service").unwrap();
    assert_eq!(unit.active_state, "failed");
    assert_eq!(unit.description, "foo.service unit");
    assert!(unit.enabled);
}

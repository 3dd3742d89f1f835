//! Session-fatal environment checks run before any command.

use crate::error::{Result, SudmanError};
use crate::invoker::ProcessInvoker;
use crate::systemctl::SystemctlCommand;

/// `systemctl --user status` exits with this code when there is no user manager
const NO_USER_MANAGER: i32 = 1;

pub fn is_systemd_available(invoker: &dyn ProcessInvoker, cmd: &SystemctlCommand) -> bool {
    invoker.invoke(&cmd.version()).success()
}

pub fn is_user_session_active(invoker: &dyn ProcessInvoker, cmd: &SystemctlCommand) -> bool {
    invoker.invoke(&cmd.session_status()).code != NO_USER_MANAGER
}

pub fn check_environment(invoker: &dyn ProcessInvoker, cmd: &SystemctlCommand) -> Result<()> {
    if !is_systemd_available(invoker, cmd) {
        return Err(SudmanError::SystemdUnavailable);
    }
    if !is_user_session_active(invoker, cmd) {
        return Err(SudmanError::SessionInactive);
    }
    Ok(())
}

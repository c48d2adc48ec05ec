//! Presence checks for command-line tools.

use log::debug;

use crate::error::{InstallError, chain_message};
use crate::runtime::Runtime;

/// Run `command <version_arg>` and succeed only on a zero exit status.
#[tracing::instrument(skip(runtime))]
pub fn probe<R: Runtime>(runtime: &R, command: &str, version_arg: &str) -> Result<(), InstallError> {
    match runtime.probe_command(command, &[version_arg.to_string()]) {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(InstallError::CommandAbsent {
            command: command.to_string(),
            reason: status.to_string(),
        }),
        Err(e) => Err(InstallError::CommandAbsent {
            command: command.to_string(),
            reason: chain_message(&e),
        }),
    }
}

/// Whether `command` is usable. Every failure mode counts as "not installed".
pub fn is_installed<R: Runtime>(runtime: &R, command: &str, version_arg: &str) -> bool {
    match probe(runtime, command, version_arg) {
        Ok(()) => true,
        Err(e) => {
            debug!("{}", e);
            false
        }
    }
}

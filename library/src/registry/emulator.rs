//! Emulator process spawning.

use std::process::{Command, Stdio};

use tracing::{debug, info};

use super::launcher::{LaunchError, LaunchPlan};

/// Build the emulator command for a plan.
///
/// The emulator runs in its own directory so relative paths in its
/// configuration resolve the way they do when started by hand.
pub fn build_command(plan: &LaunchPlan) -> Command {
    let mut cmd = Command::new(&plan.executable);
    cmd.args(&plan.arguments);
    if !plan.working_dir.as_os_str().is_empty() {
        cmd.current_dir(&plan.working_dir);
    }
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    cmd
}

/// Start the emulator described by `plan`.
///
/// Spawns a new process and returns immediately; the library keeps running
/// while the game plays. The exit status is never collected.
pub fn execute(plan: &LaunchPlan) -> Result<(), LaunchError> {
    let mut cmd = build_command(plan);

    info!("Launching emulator: {:?}", cmd);

    match cmd.spawn() {
        Ok(child) => {
            debug!("Emulator started with pid {}", child.id());
            Ok(())
        }
        Err(source) => Err(LaunchError::ProcessLaunch {
            executable: plan.executable.clone(),
            source,
        }),
    }
}

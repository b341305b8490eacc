use crate::domain::ports::ProcessRestarter;
use std::io::Write;
use std::process::Command;
use tracing::{error, info};

/// Relaunches the current executable with the same arguments, then exits.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRestart;

impl ProcessRestart {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRestarter for ProcessRestart {
    fn restart(&self) {
        // Replies already written must reach the shell before we go away.
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();

        match std::env::current_exe() {
            Ok(exe) => match Command::new(&exe).args(std::env::args_os().skip(1)).spawn() {
                Ok(child) => info!(pid = child.id(), exe = %exe.display(), "spawned replacement process"),
                Err(e) => error!(error = %e, exe = %exe.display(), "failed to spawn replacement process"),
            },
            Err(e) => error!(error = %e, "cannot resolve current executable"),
        }

        std::process::exit(0);
    }
}

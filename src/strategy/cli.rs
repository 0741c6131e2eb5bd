use super::Strategy;
use crate::context::ResolutionContext;
use crate::error::{ResolutionError, Result};
use crate::secrets::SecretSet;
use std::io;
use std::process::{Command, Output};

/// The executable the CLI strategy invokes.
pub const CLI_PROGRAM: &str = "doppler";
/// Arguments requesting a direct-to-stdout JSON dump of the active config.
pub const CLI_ARGS: &[&str] = &["secrets", "download", "--no-file"];

/// Capability to run an external program and capture its output.
///
/// Injected so tests can substitute a fake instead of depending on what is
/// installed on the host.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<Output>;
}

/// [`CommandRunner`] that spawns real processes.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<Output> {
        Command::new(program).args(args).output()
    }
}

/// Resolves secrets by invoking the pre-configured Doppler CLI.
///
/// The CLI must have been installed and authenticated (`doppler setup`) by an
/// external step; this strategy only classifies what it finds. The subprocess
/// blocks until exit with no timeout of its own.
pub struct CliStrategy<'r> {
    runner: &'r dyn CommandRunner,
}

impl<'r> CliStrategy<'r> {
    pub fn new(runner: &'r dyn CommandRunner) -> Self {
        Self { runner }
    }
}

impl Strategy for CliStrategy<'_> {
    /// Runs `doppler secrets download --no-file` and parses its stdout.
    ///
    /// A missing executable and a non-zero exit are distinct outcomes
    /// (`ToolNotInstalled` vs `ToolExecutionFailed`); both leave the process
    /// running with zero secrets resolved.
    fn resolve(&self, _ctx: &ResolutionContext) -> Result<SecretSet> {
        let output = match self.runner.run(CLI_PROGRAM, CLI_ARGS) {
            Ok(output) => output,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ResolutionError::ToolNotInstalled);
            }
            Err(e) => return Err(e.into()),
        };

        if !output.status.success() {
            return Err(ResolutionError::ToolExecutionFailed);
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }

    fn name(&self) -> &'static str {
        "cli"
    }
}

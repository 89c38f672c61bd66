//! Stage executor - runs [`StageCommand`]s in order and stops at the first failure.
//!
//! The actual process spawning sits behind the [`StageRunner`] trait so the
//! ordering rules can be checked without touching the host.
//!
//! # Usage
//!
//! ```rust,ignore
//! use emacs_mac_builder::executor::{execute_stages, SystemRunner};
//!
//! let mut runner = SystemRunner::default();
//! execute_stages(&mut runner, Path::new("/src/emacs-mac-port"), &args)?;
//! ```

pub mod system;

pub use system::SystemRunner;

use crate::stage::{stage_commands, Stage, StageCommand};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// How a finished stage exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Success,
    /// Non-zero exit. `code` is `None` when the process was killed by a signal.
    Failed { code: Option<i32> },
}

/// The external-process invocation point.
pub trait StageRunner {
    /// Run `cmd` inside `dir`, blocking until it exits.
    fn run(&mut self, cmd: &StageCommand, dir: &Path) -> std::io::Result<StageOutcome>;
}

/// External-command failure.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{stage} stage failed: `{command}` exited with {}", describe_code(.code))]
    StageFailed {
        stage: Stage,
        command: String,
        code: Option<i32>,
    },

    #[error("{stage} stage could not start `{command}`")]
    Spawn {
        stage: Stage,
        command: String,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    /// Stage that failed.
    pub fn stage(&self) -> Stage {
        match self {
            BuildError::StageFailed { stage, .. } | BuildError::Spawn { stage, .. } => *stage,
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "a signal".to_string(),
    }
}

/// Run configure, compile and install in `source_dir`.
///
/// Stops at the first stage that does not succeed; the remaining stages are
/// never started and nothing is cleaned up.
pub fn execute_stages<R: StageRunner + ?Sized>(
    runner: &mut R,
    source_dir: &Path,
    configure_args: &[String],
) -> Result<(), BuildError> {
    for cmd in stage_commands(configure_args) {
        run_stage(runner, &cmd, source_dir)?;
    }
    Ok(())
}

/// Run one stage and map its outcome into a [`BuildError`].
pub fn run_stage<R: StageRunner + ?Sized>(
    runner: &mut R,
    cmd: &StageCommand,
    dir: &Path,
) -> Result<(), BuildError> {
    info!(stage = %cmd.stage, dir = %dir.display(), "starting stage");
    debug!(command = %cmd.command_line(), "stage command");

    let outcome = runner.run(cmd, dir).map_err(|source| BuildError::Spawn {
        stage: cmd.stage,
        command: cmd.command_line(),
        source,
    })?;

    match outcome {
        StageOutcome::Success => {
            info!(stage = %cmd.stage, "stage finished");
            Ok(())
        }
        StageOutcome::Failed { code } => Err(BuildError::StageFailed {
            stage: cmd.stage,
            command: cmd.command_line(),
            code,
        }),
    }
}

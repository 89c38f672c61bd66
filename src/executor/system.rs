//! Runs stages as real child processes with inherited stdio.

use super::{StageOutcome, StageRunner};
use crate::stage::StageCommand;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Spawns each stage on the host and waits for it.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    /// Extra environment for every stage (e.g. `MAKEFLAGS`).
    envs: Vec<(String, String)>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an environment variable passed to every stage.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Pass `MAKEFLAGS=-j<jobs>` to every stage.
    pub fn with_jobs(self, jobs: Option<usize>) -> Self {
        match jobs {
            Some(jobs) if jobs > 0 => self.env("MAKEFLAGS", format!("-j{jobs}")),
            _ => self,
        }
    }

    pub fn envs(&self) -> &[(String, String)] {
        &self.envs
    }
}

/// Anchor `./program` at `dir`; leave bare names for PATH lookup.
fn resolve_program(dir: &Path, program: &str) -> PathBuf {
    match program.strip_prefix("./") {
        Some(rest) => dir.join(rest),
        None => PathBuf::from(program),
    }
}

impl StageRunner for SystemRunner {
    fn run(&mut self, cmd: &StageCommand, dir: &Path) -> std::io::Result<StageOutcome> {
        let status = Command::new(resolve_program(dir, &cmd.program))
            .args(&cmd.args)
            .current_dir(dir)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;

        if status.success() {
            Ok(StageOutcome::Success)
        } else {
            Ok(StageOutcome::Failed {
                code: status.code(),
            })
        }
    }
}

//! The three build stages and the commands that run them.

use std::fmt;

/// Build stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Stage {
    /// `./configure`, writes the Makefiles.
    Configure = 1,
    /// `make`
    Compile = 2,
    /// `make install`
    Install = 3,
}

impl Stage {
    /// All stages in the order they run.
    pub const ALL: [Stage; 3] = [Stage::Configure, Stage::Compile, Stage::Install];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Configure => write!(f, "configure"),
            Stage::Compile => write!(f, "compile"),
            Stage::Install => write!(f, "install"),
        }
    }
}

/// A single external-process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCommand {
    pub stage: Stage,
    pub program: String,
    pub args: Vec<String>,
}

impl StageCommand {
    pub fn new(stage: Stage, program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            stage,
            program: program.into(),
            args,
        }
    }

    /// Shell-like rendering for dry runs and logs. Not meant to be re-parsed.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Commands for configure, compile and install, in order.
pub fn stage_commands(configure_args: &[String]) -> Vec<StageCommand> {
    Stage::ALL
        .iter()
        .map(|stage| match stage {
            Stage::Configure => {
                StageCommand::new(*stage, "./configure", configure_args.to_vec())
            }
            Stage::Compile => StageCommand::new(*stage, "make", Vec::new()),
            Stage::Install => StageCommand::new(*stage, "make", vec!["install".to_string()]),
        })
        .collect()
}

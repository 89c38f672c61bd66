//! Source build of YAMAMOTO Mitsuharu's Emacs Mac port.
//!
//! The crate turns a formula definition into three external build stages
//! and runs them against an existing source checkout:
//!
//! - **Formula** - configure flags and caveats for a set of install paths
//! - **Stages** - `./configure`, `make`, `make install`, in that order
//! - **Executor** - runs stages through a [`StageRunner`], stopping at the first failure
//! - **Preflight** - host tool and source tree checks
//! - **Config** - TOML file, `HOMEBREW_PREFIX` and CLI overrides
//! - **Receipt** - JSON record written into the prefix after install
//!
//! # Architecture
//!
//! ```text
//! config ──► FormulaEnv ──► Formula::configure_args ──► stage_commands
//!                  │                                          │
//!                  └──► Formula::caveats              execute_stages(StageRunner)
//!                                                             │
//!                                                       InstallReceipt
//! ```
//!
//! # Example
//!
//! ```rust
//! use emacs_mac_builder::formula::{EmacsMac, Formula, FormulaEnv};
//!
//! let env = FormulaEnv::new("/opt/tool", "/opt/homebrew");
//! print!("{}", EmacsMac.caveats(&env));
//! ```

pub mod config;
pub mod executor;
pub mod formula;
pub mod install;
pub mod preflight;
pub mod receipt;
pub mod stage;

pub use executor::{execute_stages, BuildError, StageOutcome, StageRunner, SystemRunner};
pub use formula::{EmacsMac, Formula, FormulaEnv};
pub use install::{install, plan, InstallOptions};
pub use stage::{Stage, StageCommand};

//! The install procedure: configure args, three stages, receipt.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::executor::{execute_stages, StageRunner};
use crate::formula::{Formula, FormulaEnv};
use crate::preflight;
use crate::receipt::{now_utc_compact, write_receipt, InstallReceipt};
use crate::stage::{stage_commands, StageCommand};

/// Options for a single install run.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    /// Skip host-tool and source-tree checks.
    pub skip_preflight: bool,
}

/// The commands an install would run, without running them.
pub fn plan(formula: &dyn Formula, env: &FormulaEnv) -> Vec<StageCommand> {
    stage_commands(&formula.configure_args(env))
}

/// Configure, build and install `formula` from `source_dir`.
///
/// The receipt is written only after `make install` succeeds.
pub fn install<R: StageRunner + ?Sized>(
    runner: &mut R,
    formula: &dyn Formula,
    env: &FormulaEnv,
    source_dir: &Path,
    options: InstallOptions,
) -> Result<InstallReceipt> {
    if options.skip_preflight {
        warn!("skipping preflight checks");
    } else {
        preflight::check_host_tools().context("preflight: host tools")?;
        preflight::check_source_tree(source_dir).context("preflight: source tree")?;
    }

    let args = formula.configure_args(env);
    debug!(?args, "configure arguments");
    info!(
        formula = formula.name(),
        prefix = %env.prefix,
        source = %source_dir.display(),
        "installing"
    );

    execute_stages(runner, source_dir, &args)
        .with_context(|| format!("building {} from '{}'", formula.name(), source_dir.display()))?;

    let receipt = InstallReceipt::new(formula, env, source_dir, args, now_utc_compact());
    let path = write_receipt(&receipt)?;
    info!(receipt = %path.display(), "install finished");

    Ok(receipt)
}

//! Preflight checks for build validation.
//!
//! Validates that the host has the build tools and that the source
//! checkout looks configurable before any stage is started.
//!
//! # Example
//!
//! ```rust
//! use emacs_mac_builder::preflight::{command_exists, check_required_tools};
//!
//! if !command_exists("make") {
//!     println!("make not installed");
//! }
//!
//! let tools = &[("make", "make")];
//! if let Err(e) = check_required_tools(tools) {
//!     eprintln!("{}", e);
//! }
//! ```

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Check if a command exists on the host system.
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

/// Host tools needed by the compile and install stages.
///
/// Each tuple is (command_name, package_name).
pub const REQUIRED_TOOLS: &[(&str, &str)] = &[("make", "make"), ("cc", "Xcode Command Line Tools")];

/// Check that specific tools are available.
///
/// # Returns
///
/// * `Ok(())` if all tools are found
/// * `Err` with list of missing tools and their packages
pub fn check_required_tools(tools: &[(&str, &str)]) -> Result<()> {
    let missing = tools
        .iter()
        .filter(|(tool, _)| !command_exists(tool))
        .collect::<Vec<_>>();

    if !missing.is_empty() {
        let msg = missing
            .iter()
            .map(|(t, p)| format!("  {} (install: {})", t, p))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("Missing required host tools:\n{}", msg);
    }

    Ok(())
}

/// Check that all standard build tools are available.
pub fn check_host_tools() -> Result<()> {
    check_required_tools(REQUIRED_TOOLS)
}

/// Check that `source_dir` is a checkout with an executable `configure`.
///
/// A bare git checkout of the port has no `configure` until `./autogen.sh`
/// has been run, so that is the hint given.
pub fn check_source_tree(source_dir: &Path) -> Result<()> {
    if !source_dir.is_dir() {
        bail!(
            "source directory not found: '{}'\n\
             Check out the port first, or pass --source-dir.",
            source_dir.display()
        );
    }

    let configure = source_dir.join("configure");
    if !configure.is_file() {
        bail!(
            "no configure script in '{}'\n\
             Run ./autogen.sh in the checkout to generate it.",
            source_dir.display()
        );
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&configure)
            .with_context(|| format!("reading metadata '{}'", configure.display()))?
            .permissions()
            .mode();
        if mode & 0o111 == 0 {
            bail!("configure script is not executable: '{}'", configure.display());
        }
    }

    Ok(())
}

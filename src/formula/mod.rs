//! Declarative formula definitions.
//!
//! A formula describes WHAT a source build needs, not HOW it runs:
//! the configure flags for a given set of install paths and the caveats
//! shown to the operator. The [`crate::executor`] module interprets it.
//!
//! # Example
//!
//! ```rust
//! use emacs_mac_builder::formula::{EmacsMac, Formula, FormulaEnv};
//!
//! let env = FormulaEnv::new("/opt/tool", "/opt/homebrew");
//! let args = EmacsMac.configure_args(&env);
//! assert_eq!(args[0], "--prefix=/opt/tool");
//! ```

pub mod emacs_mac;

pub use emacs_mac::EmacsMac;

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

/// Install paths a formula is evaluated against.
///
/// Everything the build needs from the host arrives through this struct;
/// formulas never read the process environment themselves. Paths are kept
/// as UTF-8 strings so they reach `./configure` byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaEnv {
    /// Root under which the build installs its files.
    pub prefix: String,
    /// Host-wide shared prefix (e.g. `/usr/local` or `/opt/homebrew`).
    pub shared_prefix: String,
    /// Base directory for info documentation.
    pub info_dir: String,
}

impl FormulaEnv {
    /// Create an environment with the info directory derived from the prefix.
    pub fn new(prefix: impl Into<String>, shared_prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let info_dir = default_info_dir(&prefix);
        Self {
            prefix,
            shared_prefix: shared_prefix.into(),
            info_dir,
        }
    }

    /// Build from filesystem paths, rejecting any that are not valid UTF-8.
    pub fn from_paths(prefix: PathBuf, shared_prefix: PathBuf, info_dir: PathBuf) -> Result<Self> {
        Ok(Self {
            prefix: utf8_path(prefix, "prefix")?,
            shared_prefix: utf8_path(shared_prefix, "homebrew_prefix")?,
            info_dir: utf8_path(info_dir, "info_dir")?,
        })
    }

    /// Replace the derived info directory.
    pub fn with_info_dir(mut self, info_dir: impl Into<String>) -> Self {
        self.info_dir = info_dir.into();
        self
    }

    pub fn prefix_path(&self) -> &Path {
        Path::new(&self.prefix)
    }
}

fn utf8_path(path: PathBuf, field: &str) -> Result<String> {
    path.into_os_string().into_string().map_err(|raw| {
        anyhow!(
            "{field} is not valid UTF-8: {:?}\n\
             configure flags are passed as text; choose a UTF-8 path",
            raw
        )
    })
}

/// `<prefix>/share/info`
pub fn default_info_dir(prefix: &str) -> String {
    format!("{}/share/info", prefix.trim_end_matches('/'))
}

/// A released tarball the formula once built from.
///
/// Kept as metadata only. Nothing in this crate downloads or verifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacySource {
    pub url: &'static str,
    pub md5: &'static str,
}

/// Anything that can be configured, built and installed from source.
pub trait Formula {
    /// Short name, used for logging and the default cellar path.
    fn name(&self) -> &str;

    /// Upstream project page.
    fn homepage(&self) -> &str;

    /// Version-controlled checkout the formula builds from.
    fn head(&self) -> &str;

    /// Tarball source, if the formula ever had one.
    fn legacy_source(&self) -> Option<LegacySource> {
        None
    }

    /// Arguments for the `./configure` stage, in order.
    fn configure_args(&self, env: &FormulaEnv) -> Vec<String>;

    /// Informational text for the operator. Must not fail.
    fn caveats(&self, env: &FormulaEnv) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_info_dir() {
        let env = FormulaEnv::new("/opt/tool", "/opt/homebrew");
        assert_eq!(env.info_dir, "/opt/tool/share/info");
        assert_eq!(env.shared_prefix, "/opt/homebrew");
    }

    #[test]
    fn test_with_info_dir_overrides() {
        let env = FormulaEnv::new("/opt/tool", "/opt/homebrew").with_info_dir("/srv/info");
        assert_eq!(env.info_dir, "/srv/info");
        assert_eq!(env.prefix, "/opt/tool");
    }

    #[test]
    fn test_default_info_dir_ignores_trailing_slash() {
        assert_eq!(default_info_dir("/opt/tool/"), "/opt/tool/share/info");
    }

    #[test]
    fn test_from_paths_keeps_utf8_bytes() {
        let env = FormulaEnv::from_paths(
            PathBuf::from("/opt/t\u{f6}\u{f6}l"),
            PathBuf::from("/opt/homebrew"),
            PathBuf::from("/opt/t\u{f6}\u{f6}l/share/info"),
        )
        .unwrap();
        assert_eq!(env.prefix.as_bytes(), "/opt/t\u{f6}\u{f6}l".as_bytes());
        assert_eq!(env.prefix_path(), Path::new("/opt/t\u{f6}\u{f6}l"));
    }

    #[test]
    fn test_from_paths_rejects_non_utf8_prefix() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let raw = PathBuf::from(OsStr::from_bytes(b"/opt/t\xffool"));
        let err = FormulaEnv::from_paths(raw, "/opt/homebrew".into(), "/info".into())
            .unwrap_err()
            .to_string();
        assert!(err.starts_with("prefix is not valid UTF-8"));
    }
}

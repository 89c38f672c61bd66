//! Builder configuration.
//!
//! Install paths are resolved here, once, from (highest wins):
//! command-line overrides, the `HOMEBREW_PREFIX` environment variable
//! (shared prefix only), the TOML config file, built-in defaults.
//! The result is handed to the formula as an explicit [`FormulaEnv`].

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::formula::FormulaEnv;

/// Shared prefix used when nothing else sets one.
pub const DEFAULT_HOMEBREW_PREFIX: &str = "/usr/local";

/// Environment variable consulted for the shared prefix.
pub const HOMEBREW_PREFIX_ENV: &str = "HOMEBREW_PREFIX";

/// Version directory under the cellar for checkout builds.
pub const HEAD_VERSION: &str = "HEAD";

const CONFIG_DIR_NAME: &str = "emacs-mac-builder";
const CONFIG_FILE_NAME: &str = "config.toml";

/// On-disk configuration. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub homebrew_prefix: Option<PathBuf>,
    pub prefix: Option<PathBuf>,
    pub info_dir: Option<PathBuf>,
    pub source_dir: Option<PathBuf>,
    pub jobs: Option<usize>,
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub homebrew_prefix: Option<PathBuf>,
    pub prefix: Option<PathBuf>,
    pub info_dir: Option<PathBuf>,
    pub source_dir: Option<PathBuf>,
    pub jobs: Option<usize>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderConfig {
    pub env: FormulaEnv,
    pub source_dir: Option<PathBuf>,
    pub jobs: Option<usize>,
}

/// `<config_dir>/emacs-mac-builder/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Parse a config file from a TOML string.
pub fn parse_config(text: &str, origin: &Path) -> Result<ConfigFile> {
    toml::from_str(text).with_context(|| format!("parsing config '{}'", origin.display()))
}

/// Load the config file.
///
/// An explicitly named file must exist. The default location is optional.
pub fn load_config_file(explicit: Option<&Path>) -> Result<ConfigFile> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.is_file() => path,
            _ => return Ok(ConfigFile::default()),
        },
    };

    let text = fs::read_to_string(&path)
        .with_context(|| format!("reading config '{}'", path.display()))?;
    parse_config(&text, &path)
}

/// `HOMEBREW_PREFIX` from the process environment, ignoring empty values.
pub fn homebrew_prefix_from_env() -> Option<PathBuf> {
    std::env::var_os(HOMEBREW_PREFIX_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// `<shared>/Cellar/<formula>/HEAD`
pub fn default_prefix(shared_prefix: &Path, formula_name: &str) -> PathBuf {
    shared_prefix
        .join("Cellar")
        .join(formula_name)
        .join(HEAD_VERSION)
}

/// Merge the layers into a [`BuilderConfig`].
///
/// Fails if a resolved install path is not valid UTF-8.
pub fn resolve(
    formula_name: &str,
    file: ConfigFile,
    env_prefix: Option<PathBuf>,
    overrides: Overrides,
) -> Result<BuilderConfig> {
    let shared_prefix = overrides
        .homebrew_prefix
        .or(env_prefix)
        .or(file.homebrew_prefix)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_HOMEBREW_PREFIX));

    let prefix = overrides
        .prefix
        .or(file.prefix)
        .unwrap_or_else(|| default_prefix(&shared_prefix, formula_name));

    let info_dir = overrides
        .info_dir
        .or(file.info_dir)
        .unwrap_or_else(|| prefix.join("share/info"));

    Ok(BuilderConfig {
        env: FormulaEnv::from_paths(prefix, shared_prefix, info_dir)
            .context("resolving install paths")?,
        source_dir: overrides.source_dir.or(file.source_dir),
        jobs: overrides.jobs.or(file.jobs),
    })
}

/// Pick the source checkout to build from.
///
/// A configured directory is made absolute against `cwd`. Without one,
/// `cwd` is used if it holds a `configure` script.
pub fn resolve_source_dir(configured: Option<&Path>, cwd: &Path) -> Result<PathBuf> {
    match configured {
        Some(dir) if dir.is_absolute() => Ok(dir.to_path_buf()),
        Some(dir) => Ok(cwd.join(dir)),
        None => {
            if !cwd.join("configure").is_file() {
                bail!(
                    "no source directory given and '{}' has no configure script\n\
                     pass --source-dir or set source_dir in the config file",
                    cwd.display()
                );
            }
            Ok(cwd.to_path_buf())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let cfg =
            resolve("emacs-mac", ConfigFile::default(), None, Overrides::default()).unwrap();
        assert_eq!(cfg.env.shared_prefix, "/usr/local");
        assert_eq!(cfg.env.prefix, "/usr/local/Cellar/emacs-mac/HEAD");
        assert_eq!(cfg.env.info_dir, "/usr/local/Cellar/emacs-mac/HEAD/share/info");
        assert_eq!(cfg.source_dir, None);
        assert_eq!(cfg.jobs, None);
    }

    #[test]
    fn test_env_beats_file_for_shared_prefix() {
        let file = ConfigFile {
            homebrew_prefix: Some("/from/file".into()),
            ..Default::default()
        };
        let cfg = resolve(
            "emacs-mac",
            file,
            Some("/opt/homebrew".into()),
            Overrides::default(),
        )
        .unwrap();
        assert_eq!(cfg.env.shared_prefix, "/opt/homebrew");
        assert_eq!(cfg.env.prefix, "/opt/homebrew/Cellar/emacs-mac/HEAD");
    }

    #[test]
    fn test_overrides_beat_everything() {
        let file = ConfigFile {
            homebrew_prefix: Some("/from/file".into()),
            prefix: Some("/file/prefix".into()),
            info_dir: Some("/file/info".into()),
            source_dir: Some("/file/src".into()),
            jobs: Some(2),
        };
        let overrides = Overrides {
            homebrew_prefix: Some("/cli/brew".into()),
            prefix: Some("/cli/prefix".into()),
            info_dir: None,
            source_dir: Some("/cli/src".into()),
            jobs: Some(8),
        };
        let cfg = resolve("emacs-mac", file, Some("/env/brew".into()), overrides).unwrap();

        assert_eq!(cfg.env.shared_prefix, "/cli/brew");
        assert_eq!(cfg.env.prefix, "/cli/prefix");
        assert_eq!(cfg.env.info_dir, "/file/info");
        assert_eq!(cfg.source_dir, Some(PathBuf::from("/cli/src")));
        assert_eq!(cfg.jobs, Some(8));
    }

    #[test]
    fn test_info_dir_follows_overridden_prefix() {
        let overrides = Overrides {
            prefix: Some("/opt/tool".into()),
            ..Default::default()
        };
        let cfg = resolve("emacs-mac", ConfigFile::default(), None, overrides).unwrap();
        assert_eq!(cfg.env.info_dir, "/opt/tool/share/info");
    }

    #[test]
    fn test_parse_config() {
        let text = r#"
homebrew_prefix = "/opt/homebrew"
source_dir = "/src/emacs-mac-port"
jobs = 4
"#;
        let file = parse_config(text, Path::new("config.toml")).unwrap();
        assert_eq!(file.homebrew_prefix, Some(PathBuf::from("/opt/homebrew")));
        assert_eq!(file.source_dir, Some(PathBuf::from("/src/emacs-mac-port")));
        assert_eq!(file.jobs, Some(4));
        assert_eq!(file.prefix, None);
    }

    #[test]
    fn test_parse_config_rejects_unknown_keys() {
        let err = parse_config("prefx = \"/typo\"\n", Path::new("bad.toml")).unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.toml");
        assert!(load_config_file(Some(&missing)).is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "prefix = \"/opt/tool\"\n").unwrap();

        let file = load_config_file(Some(&path)).unwrap();
        assert_eq!(file.prefix, Some(PathBuf::from("/opt/tool")));
    }

    #[test]
    fn test_non_utf8_prefix_is_rejected_before_configure() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let overrides = Overrides {
            prefix: Some(PathBuf::from(OsStr::from_bytes(b"/opt/t\xffool"))),
            ..Default::default()
        };
        let err = resolve("emacs-mac", ConfigFile::default(), None, overrides).unwrap_err();
        assert!(format!("{err:#}").contains("prefix is not valid UTF-8"));
    }

    #[test]
    fn test_non_utf8_env_prefix_is_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let env_prefix = PathBuf::from(OsStr::from_bytes(b"/opt/\xfehomebrew"));
        let overrides = Overrides {
            prefix: Some("/opt/tool".into()),
            ..Default::default()
        };
        let err = resolve("emacs-mac", ConfigFile::default(), Some(env_prefix), overrides)
            .unwrap_err();
        assert!(format!("{err:#}").contains("homebrew_prefix is not valid UTF-8"));
    }

    #[test]
    fn test_source_dir_absolute_is_kept() {
        let dir =
            resolve_source_dir(Some(Path::new("/src/emacs")), Path::new("/work")).unwrap();
        assert_eq!(dir, PathBuf::from("/src/emacs"));
    }

    #[test]
    fn test_source_dir_relative_joins_cwd() {
        let dir = resolve_source_dir(Some(Path::new("emacs-mac-port")), Path::new("/work"))
            .unwrap();
        assert_eq!(dir, PathBuf::from("/work/emacs-mac-port"));
    }

    #[test]
    fn test_source_dir_falls_back_to_cwd_with_configure() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("configure"), "#!/bin/sh\n").unwrap();

        let dir = resolve_source_dir(None, temp.path()).unwrap();
        assert_eq!(dir, temp.path());
    }

    #[test]
    fn test_source_dir_without_configure_in_cwd_fails() {
        let temp = TempDir::new().unwrap();
        let err = resolve_source_dir(None, temp.path()).unwrap_err();
        assert!(err.to_string().contains("pass --source-dir"));
    }
}

//! YAMAMOTO Mitsuharu's Mac port of GNU Emacs.

use super::{Formula, FormulaEnv, LegacySource};

/// Where `make install` ultimately places the application bundle.
pub const APP_INSTALL_DIR: &str = "/Applications";

/// Subdirectory of the info base that receives Emacs manuals.
pub const INFO_SUBDIR: &str = "emacs";

/// Flags that do not depend on any install path.
pub const WITHOUT_DBUS: &str = "--without-dbus";
pub const WITH_MAC: &str = "--with-mac";
pub const ENABLE_MAC_APP: &str = "--enable-mac-app";

/// The emacs-mac formula.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmacsMac;

impl EmacsMac {
    /// `<shared>/share/emacs/site-lisp`, the site-wide lisp search path.
    pub fn locallisppath(env: &FormulaEnv) -> String {
        format!("{}/share/emacs/site-lisp", env.shared_prefix)
    }
}

impl Formula for EmacsMac {
    fn name(&self) -> &str {
        "emacs-mac"
    }

    fn homepage(&self) -> &str {
        "http://www.gnu.org/software/emacs/"
    }

    fn head(&self) -> &str {
        "git://github.com/railwaycat/emacs-mac-port.git"
    }

    fn legacy_source(&self) -> Option<LegacySource> {
        Some(LegacySource {
            url: "http://ftp.gnu.org/pub/gnu/emacs/emacs-23.2.tar.bz2",
            md5: "057a0379f2f6b85fb114d8c723c79ce2",
        })
    }

    fn configure_args(&self, env: &FormulaEnv) -> Vec<String> {
        let mut args = vec![
            format!("--prefix={}", env.prefix),
            WITHOUT_DBUS.to_string(),
            format!("--enable-locallisppath={}", Self::locallisppath(env)),
            format!("--infodir={}/{}", env.info_dir, INFO_SUBDIR),
        ];

        // Mac GUI frontend and Emacs.app bundle
        args.push(WITH_MAC.to_string());
        args.push(ENABLE_MAC_APP.to_string());
        args
    }

    fn caveats(&self, env: &FormulaEnv) -> String {
        let mut s = String::new();
        s.push('\n');
        s.push_str("This is YAMAMOTO Mitsuharu's experimental Mac port, which adds\n");
        s.push_str("some of the functionality from the old Carbon and Carbon+AppKit\n");
        s.push_str("Emacs ports to Emacs 23. After installing, see README-mac and\n");
        s.push_str(&format!("NEWS-mac in {} for the port details.\n", env.prefix));
        s.push('\n');
        s.push_str(&format!("Emacs.app was installed to: {APP_INSTALL_DIR}\n"));
        s.push('\n');
        s
    }
}

//! Config file locations
//!
//! The system file lives at a path fixed at build time, the user file is
//! `$HOME/.perfconfig`, and `PERF_CONFIG` names a file that replaces both.
//! `PERF_CONFIG_NOSYSTEM` and `PERF_CONFIG_NOGLOBAL` drop a file from the
//! merged search path without hiding it from scoped reads.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::value;

/// The config files a [`ConfigSet`](crate::ConfigSet) may load
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub system: PathBuf,
    /// None when `$HOME` is not set
    pub user: Option<PathBuf>,
    /// When set, the merged scope reads this file and nothing else
    pub exclusive: Option<PathBuf>,
    /// System file participates in the merged scope
    pub use_system: bool,
    /// User file participates in the merged scope
    pub use_user: bool,
}

impl Default for ConfigPaths {
    fn default() -> Self {
        ConfigPaths {
            system: PathBuf::from(etc_perfconfig()),
            user: None,
            exclusive: None,
            use_system: true,
            use_user: true,
        }
    }
}

impl ConfigPaths {
    /// Discover paths and merge gates from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let user = env::var("HOME")
            .ok()
            .map(|home| Path::new(&home).join(".perfconfig"));
        Ok(ConfigPaths {
            system: PathBuf::from(etc_perfconfig()),
            user,
            exclusive: env::var_os("PERF_CONFIG").map(PathBuf::from),
            use_system: !env_opt_out("PERF_CONFIG_NOSYSTEM")?,
            use_user: !env_opt_out("PERF_CONFIG_NOGLOBAL")?,
        })
    }
}

/// Boolean environment switch. Unset means false; a value that does not
/// parse as a boolean is fatal and names the variable.
fn env_opt_out(name: &str) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(raw) => value::config_bool(name, Some(&raw)),
        Err(_) => Ok(false),
    }
}

/// System wide config file location, overridable at build time
pub fn etc_perfconfig() -> &'static str {
    option_env!("PERF_ETC_PERFCONFIG").unwrap_or("/etc/perfconfig")
}

/// Whether the user file should feed a merged load. A file that cannot
/// be stat'ed or is empty is skipped quietly; a file owned by neither
/// the current user nor root is skipped with a warning.
pub(crate) fn user_file_usable(path: &Path) -> bool {
    let md = match fs::metadata(path) {
        Ok(md) => md,
        Err(_) => return false,
    };

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;

        let euid = unsafe { libc::geteuid() };
        if md.uid() != 0 && md.uid() != euid {
            eprintln!(
                "File {} not owned by current user or root, ignoring it.",
                path.display()
            );
            return false;
        }
    }

    md.len() > 0
}

//! Build-id cache directory
//!
//! Resolves where the build-id cache lives: an explicit override, then
//! the `buildid.dir` config key, then `$HOME/.debug`. The resolved path
//! is exported through `PERF_BUILDID_DIR` for external tooling.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::store::{ConfigPaths, ConfigSet, Scope};

/// Cache directory name used under `$HOME` when nothing is configured
pub const DEBUG_CACHE_DIR: &str = ".debug";

/// Resolve the cache directory without touching the environment.
/// `explicit` wins outright; an empty `buildid.dir` value falls through
/// to the `$HOME` default.
pub fn resolve_buildid_dir(
    paths: &ConfigPaths,
    explicit: Option<&Path>,
    home: Option<&str>,
) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }

    let set = ConfigSet::load(paths, Scope::Merged)?;
    if let Some(value) = set.get("buildid", "dir") {
        if !value.is_empty() {
            return Ok(expand_home(value, home));
        }
    }

    Ok(match home {
        Some(home) => Path::new(home).join(DEBUG_CACHE_DIR),
        None => PathBuf::from(DEBUG_CACHE_DIR),
    })
}

/// Resolve the cache directory and export it as `PERF_BUILDID_DIR`
pub fn set_buildid_dir(paths: &ConfigPaths, explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let home = env::var("HOME").ok();
    let dir = resolve_buildid_dir(paths, explicit, home.as_deref())?;
    env::set_var("PERF_BUILDID_DIR", &dir);
    Ok(dir)
}

fn expand_home(value: &str, home: Option<&str>) -> PathBuf {
    if let Some(rest) = value.strip_prefix("~/") {
        if let Some(home) = home {
            return Path::new(home).join(rest);
        }
    }
    PathBuf::from(value)
}

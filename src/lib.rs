//! perf-config - perf configuration file handling
//!
//! Reads and writes the perfconfig INI dialect used by the perf tools:
//! layered system and user config files, a registry of known keys with
//! typed defaults, and resolution of the build-id cache directory from
//! the `buildid.dir` key.

pub mod buildid;
pub mod defaults;
pub mod error;
pub mod parser;
pub mod store;
pub mod value;
pub mod writer;

pub use buildid::{resolve_buildid_dir, set_buildid_dir, DEBUG_CACHE_DIR};
pub use defaults::{ConfigDefault, DEFAULT_CONFIGS};
pub use error::ConfigError;
pub use store::{
    split_key, ConfigItem, ConfigPaths, ConfigSection, ConfigSet, Entry, Resolved, Scope,
};
pub use value::{config_bool, config_double, config_int, config_u64, DefaultValue};

//! Exposer configuration.
//!
//! The file location comes from `TALLY_CONFIG`, falling back to
//! `tally.yaml` in the working directory. Parsing is strict: unknown keys,
//! bad values, and unsupported versions are all `BAD_CONFIG`, while an
//! unreadable file is `INTERNAL`. Errors name the file they came from.

pub mod schema;

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tally_core::error::{Result, TallyError};

pub use schema::{ExposerSection, Format, TallyConfig};

/// Environment variable holding the config file path.
pub const CONFIG_ENV: &str = "TALLY_CONFIG";

pub const DEFAULT_CONFIG_PATH: &str = "tally.yaml";

/// Config path for this process (`TALLY_CONFIG` or the default).
pub fn config_path() -> PathBuf {
    config_path_from(std::env::var_os(CONFIG_ENV))
}

/// Resolve the config path from an optional override. An empty override
/// counts as unset.
pub fn config_path_from(value: Option<OsString>) -> PathBuf {
    match value {
        Some(v) if !v.is_empty() => PathBuf::from(v),
        _ => PathBuf::from(DEFAULT_CONFIG_PATH),
    }
}

pub fn load_from_file(path: impl AsRef<Path>) -> Result<TallyConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).map_err(|e| {
        TallyError::Internal(format!("read config failed ({}): {e}", path.display()))
    })?;
    load_from_str(&s).map_err(|e| match e {
        TallyError::BadConfig(msg) => TallyError::BadConfig(format!("{}: {msg}", path.display())),
        other => other,
    })
}

pub fn load_from_str(s: &str) -> Result<TallyConfig> {
    let cfg: TallyConfig = serde_yaml::from_str(s)
        .map_err(|e| TallyError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

//! Configuration for the OS abstraction layer.
//!
//! Resolution order, later wins:
//!
//! 1. Built-in defaults ([`Policy::canonical`])
//! 2. The config file: `$OSAL_CONFIG`, else `~/.osal/config.toml`
//! 3. Environment overrides: `OSAL_ZERO_SIZE`, `OSAL_FATAL_REPORTING`, `OSAL_SLEEP`
//!
//! ```toml
//! [heap]
//! zero_size = "null"      # "null" | "non-null"
//!
//! [errors]
//! reporting = "logged"    # "logged" | "silent"
//!
//! [clock]
//! sleep = "passive"       # "passive" | "busy-poll"
//! ```
//!
//! Raw deserialization structs stay private here; callers only ever see the
//! resolved [`Policy`].

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use osal_types::{FatalReporting, ParsePolicyError, Policy, SleepStrategy, ZeroSizePolicy};

pub const CONFIG_PATH_ENV: &str = "OSAL_CONFIG";
pub const ZERO_SIZE_ENV: &str = "OSAL_ZERO_SIZE";
pub const FATAL_REPORTING_ENV: &str = "OSAL_FATAL_REPORTING";
pub const SLEEP_ENV: &str = "OSAL_SLEEP";

const INLINE_ORIGIN: &str = "<inline>";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid setting from {origin}: {source}")]
    Invalid {
        origin: String,
        #[source]
        source: ParsePolicyError,
    },
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    heap: Option<RawHeapConfig>,
    errors: Option<RawErrorConfig>,
    clock: Option<RawClockConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct RawHeapConfig {
    zero_size: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawErrorConfig {
    reporting: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawClockConfig {
    sleep: Option<String>,
}

/// Resolved configuration. Holding one means every setting parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OsalConfig {
    policy: Policy,
}

impl OsalConfig {
    #[must_use]
    pub const fn new(policy: Policy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub const fn policy(&self) -> Policy {
        self.policy
    }

    /// Defaults, then the config file if one exists, then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let base = match config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            Some(path) => {
                tracing::debug!(path = %path.display(), "No OSAL config file; using defaults");
                Self::default()
            }
            None => Self::default(),
        };
        base.with_env_overrides()
    }

    /// Parse the config file at `path`. A missing file is a read error here.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };
        Self::parse(&content, path)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, Path::new(INLINE_ORIGIN))
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = match toml::from_str(content) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                return Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };
        resolve(raw, path)
    }

    /// Apply `OSAL_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup. Empty values are ignored.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(raw) = lookup(ZERO_SIZE_ENV) {
            self.policy.zero_size = parse_setting(&raw, || format!("env {ZERO_SIZE_ENV}"))?;
        }
        if let Some(raw) = lookup(FATAL_REPORTING_ENV) {
            self.policy.reporting =
                parse_setting(&raw, || format!("env {FATAL_REPORTING_ENV}"))?;
        }
        if let Some(raw) = lookup(SLEEP_ENV) {
            self.policy.sleep = parse_setting(&raw, || format!("env {SLEEP_ENV}"))?;
        }
        Ok(self)
    }
}

fn resolve(raw: RawConfig, path: &Path) -> Result<OsalConfig, ConfigError> {
    let mut policy = Policy::canonical();
    let origin = |key: &str| format!("{} {key}", path.display());

    if let Some(value) = raw.heap.and_then(|heap| heap.zero_size) {
        policy.zero_size = parse_setting::<ZeroSizePolicy>(&value, || origin("[heap].zero_size"))?;
    }
    if let Some(value) = raw.errors.and_then(|errors| errors.reporting) {
        policy.reporting =
            parse_setting::<FatalReporting>(&value, || origin("[errors].reporting"))?;
    }
    if let Some(value) = raw.clock.and_then(|clock| clock.sleep) {
        policy.sleep = parse_setting::<SleepStrategy>(&value, || origin("[clock].sleep"))?;
    }

    Ok(OsalConfig { policy })
}

fn parse_setting<T>(raw: &str, origin: impl FnOnce() -> String) -> Result<T, ConfigError>
where
    T: FromStr<Err = ParsePolicyError>,
{
    raw.parse().map_err(|source| ConfigError::Invalid {
        origin: origin(),
        source,
    })
}

/// Where the config file is expected: `$OSAL_CONFIG`, else `~/.osal/config.toml`.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Ok(explicit) = env::var(CONFIG_PATH_ENV)
        && !explicit.trim().is_empty()
    {
        return Some(PathBuf::from(explicit));
    }
    dirs::home_dir().map(|home| home.join(".osal").join("config.toml"))
}

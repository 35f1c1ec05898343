//! Startup configuration
//!
//! Everything here is decided once in `main` and passed down by reference.

use std::ffi::OsString;
use std::path::PathBuf;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// System unit directory written by the installer
pub const SYSTEM_UNIT_DIR: &str = "/etc/systemd/system";

/// Init-system control program
pub const SYSTEMCTL: &str = "systemctl";

/// Which service manager the unit belongs to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    System,
    User,
}

impl Scope {
    /// Target the unit is attached to when enabled
    pub fn install_target(&self) -> &'static str {
        match self {
            Scope::System => "multi-user.target",
            Scope::User => "default.target",
        }
    }

    /// Default unit directory for this scope
    pub fn unit_dir(&self) -> Result<PathBuf, ConfigError> {
        match self {
            Scope::System => Ok(PathBuf::from(SYSTEM_UNIT_DIR)),
            Scope::User => dirs::config_dir()
                .map(|p| p.join("systemd/user"))
                .ok_or(ConfigError::NoConfigDir),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot determine the user configuration directory")]
    NoConfigDir,

    #[error("Error getting current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

/// Immutable settings for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub scope: Scope,
    pub unit_dir: PathBuf,
    pub systemctl: PathBuf,
}

impl Settings {
    /// Defaults for `scope`, with optional overrides from the command line
    pub fn new(
        scope: Scope,
        unit_dir: Option<PathBuf>,
        systemctl: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let unit_dir = match unit_dir {
            Some(dir) => dir,
            None => scope.unit_dir()?,
        };
        Ok(Self {
            scope,
            unit_dir,
            systemctl: systemctl.unwrap_or_else(|| PathBuf::from(SYSTEMCTL)),
        })
    }
}

/// Facts about the calling process, queried once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostContext {
    pub cwd: PathBuf,
    pub search_path: Option<OsString>,
}

impl HostContext {
    pub fn current() -> Result<Self, ConfigError> {
        Ok(Self {
            cwd: std::env::current_dir().map_err(ConfigError::CurrentDir)?,
            search_path: std::env::var_os("PATH"),
        })
    }
}

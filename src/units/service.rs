//! Typed service definition matching the .service files we generate
//!
//! Mirrors the section layout of a unit file: one struct per section.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Service type determines startup notification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ServiceType {
    #[default]
    Simple,       // Ready immediately after fork
    Exec,         // Ready after exec succeeded
    Forking,      // Ready when main process exits
    Oneshot,      // Run once, no main process
    Dbus,         // Ready when D-Bus name acquired
    Notify,       // Ready on sd_notify READY=1
    NotifyReload, // Like notify, plus SIGHUP reload protocol
    Idle,         // Delayed until active jobs are dispatched
}

impl ServiceType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "simple" => Some(Self::Simple),
            "exec" => Some(Self::Exec),
            "forking" => Some(Self::Forking),
            "oneshot" => Some(Self::Oneshot),
            "dbus" => Some(Self::Dbus),
            "notify" => Some(Self::Notify),
            "notify-reload" => Some(Self::NotifyReload),
            "idle" => Some(Self::Idle),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Exec => "exec",
            Self::Forking => "forking",
            Self::Oneshot => "oneshot",
            Self::Dbus => "dbus",
            Self::Notify => "notify",
            Self::NotifyReload => "notify-reload",
            Self::Idle => "idle",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Restart policy
///
/// Generated units always restart; the other variants exist so the value
/// renders through the same path as every other directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RestartPolicy {
    No,
    OnFailure,
    #[default]
    Always,
}

impl RestartPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::No => "no",
            Self::OnFailure => "on-failure",
            Self::Always => "always",
        }
    }
}

/// Backoff between restarts of a generated unit
pub const RESTART_SEC: Duration = Duration::from_secs(5);

/// [Unit] section
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSection {
    pub description: String,
    pub after: Vec<String>,
}

/// [Service] section
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSection {
    pub service_type: ServiceType,

    // Execution
    pub exec_start: ExecCommand,
    pub working_directory: PathBuf,

    // Restart
    pub restart: RestartPolicy,
    pub restart_sec: Duration,

    // Credentials
    pub user: Option<String>,
    pub group: Option<String>,

    // Environment, in the order given: later duplicates win at load time
    pub environment: Vec<String>,
    pub environment_files: Vec<PathBuf>,
}

/// [Install] section
#[derive(Debug, Clone, PartialEq)]
pub struct InstallSection {
    pub wanted_by: Vec<String>,
}

/// Complete service unit, built once per invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDefinition {
    pub name: String,
    pub unit: UnitSection,
    pub service: ServiceSection,
    pub install: InstallSection,
}

impl ServiceDefinition {
    /// File name of the unit inside the unit directory
    pub fn unit_name(&self) -> String {
        format!("{}.service", self.name)
    }
}

/// Resolved executable plus its arguments, as ExecStart= will run it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl fmt::Display for ExecCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

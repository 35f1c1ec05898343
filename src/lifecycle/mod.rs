//! Bring an installed unit up: reload, enable, start
//!
//! The unit moves through a fixed sequence of states:
//!
//! ```text
//! absent → written → reloaded → enabled → running
//! ```
//!
//! The installer performs the first transition; [`Lifecycle`] performs the
//! rest, one init-system call each. The first failing call stops the
//! sequence and nothing already done is undone.

mod systemctl;

pub use systemctl::Systemctl;

use std::fmt;
use std::process::ExitStatus;

/// Control interface of the init system
///
/// Each call succeeds or fails on the exit status alone; diagnostics go
/// straight to the user's terminal.
#[allow(async_fn_in_trait)]
pub trait InitSystem {
    /// Re-read unit files (daemon-reload)
    async fn reload(&self) -> Result<(), InitError>;

    /// Register the unit to start on boot
    async fn enable(&self, unit: &str) -> Result<(), InitError>;

    /// Start the unit now
    async fn start(&self, unit: &str) -> Result<(), InitError>;
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with {status}")]
    Failed { command: String, status: ExitStatus },
}

/// Unit state as seen by this tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    Absent,
    Written,
    Reloaded,
    Enabled,
    Running,
}

impl UnitState {
    /// Step that leaves this state, if any
    pub fn next_step(&self) -> Option<Step> {
        match self {
            UnitState::Written => Some(Step::Reload),
            UnitState::Reloaded => Some(Step::Enable),
            UnitState::Enabled => Some(Step::Start),
            // Absent → Written is the installer's job
            UnitState::Absent | UnitState::Running => None,
        }
    }
}

impl fmt::Display for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnitState::Absent => "absent",
            UnitState::Written => "written",
            UnitState::Reloaded => "reloaded",
            UnitState::Enabled => "enabled",
            UnitState::Running => "running",
        };
        f.write_str(s)
    }
}

/// One init-system call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Reload,
    Enable,
    Start,
}

impl Step {
    /// State reached when this step succeeds
    pub fn target(&self) -> UnitState {
        match self {
            Step::Reload => UnitState::Reloaded,
            Step::Enable => UnitState::Enabled,
            Step::Start => UnitState::Running,
        }
    }

    fn action(&self) -> &'static str {
        match self {
            Step::Reload => "reloading systemd daemon",
            Step::Enable => "enabling service",
            Step::Start => "starting service",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Error {}: {source}", .step.action())]
pub struct LifecycleError {
    pub unit: String,
    pub step: Step,
    /// Last state the unit reached before the failing step
    pub reached: UnitState,
    #[source]
    pub source: InitError,
}

/// Drives one unit from `written` to `running`
pub struct Lifecycle<'a, I: InitSystem> {
    init: &'a I,
    unit: String,
    state: UnitState,
}

impl<'a, I: InitSystem> Lifecycle<'a, I> {
    /// Start tracking `unit` (e.g. `sleep.service`) whose file was just written
    pub fn after_install(init: &'a I, unit: impl Into<String>) -> Self {
        Self {
            init,
            unit: unit.into(),
            state: UnitState::Written,
        }
    }

    pub fn state(&self) -> UnitState {
        self.state
    }

    /// Perform the next step. Returns `None` once the unit is running.
    pub async fn advance(&mut self) -> Result<Option<UnitState>, LifecycleError> {
        let Some(step) = self.state.next_step() else {
            return Ok(None);
        };

        let result = match step {
            Step::Reload => self.init.reload().await,
            Step::Enable => self.init.enable(&self.unit).await,
            Step::Start => self.init.start(&self.unit).await,
        };

        if let Err(source) = result {
            return Err(LifecycleError {
                unit: self.unit.clone(),
                step,
                reached: self.state,
                source,
            });
        }

        log::debug!("{}: {} → {}", self.unit, self.state, step.target());
        self.state = step.target();
        Ok(Some(self.state))
    }

    /// Run every remaining step in order
    pub async fn run(&mut self) -> Result<UnitState, LifecycleError> {
        while self.advance().await?.is_some() {}
        Ok(self.state)
    }
}

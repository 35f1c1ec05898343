//! InitSystem backed by the systemctl command

use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

use super::{InitError, InitSystem};
use crate::config::{Scope, Settings};

#[derive(Debug, Clone)]
pub struct Systemctl {
    program: PathBuf,
    scope: Scope,
}

impl Systemctl {
    pub fn new(program: impl Into<PathBuf>, scope: Scope) -> Self {
        Self {
            program: program.into(),
            scope,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.systemctl.clone(), settings.scope)
    }

    fn scope_args(&self) -> &'static [&'static str] {
        match self.scope {
            Scope::System => &[],
            Scope::User => &["--user"],
        }
    }

    /// Run one systemctl invocation with the user's terminal attached
    async fn run(&self, args: &[&str]) -> Result<(), InitError> {
        let mut all_args: Vec<&str> = self.scope_args().to_vec();
        all_args.extend_from_slice(args);
        let command = format!("{} {}", self.program.display(), all_args.join(" "));
        log::debug!("Running {}", command);

        let status = Command::new(&self.program)
            .args(&all_args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| InitError::Spawn {
                command: command.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(InitError::Failed { command, status })
        }
    }
}

impl InitSystem for Systemctl {
    async fn reload(&self) -> Result<(), InitError> {
        self.run(&["daemon-reload"]).await
    }

    async fn enable(&self, unit: &str) -> Result<(), InitError> {
        self.run(&["enable", unit]).await
    }

    async fn start(&self, unit: &str) -> Result<(), InitError> {
        self.run(&["start", unit]).await
    }
}

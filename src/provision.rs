//! One invocation end to end: build, render, then preview or install + start

use std::path::PathBuf;

use nix::unistd::{Group, User};

use crate::config::{HostContext, Settings};
use crate::install::{install, InstallError};
use crate::lifecycle::{InitSystem, Lifecycle, LifecycleError, UnitState};
use crate::resolve::ResolveError;
use crate::units::{build_definition, render, RenderError, ServiceDefinition, ServiceOptions};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Render only; no file is written and the init system is not touched
    Preview,
    #[default]
    Install,
}

/// Everything the user asked for
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub command: Vec<String>,
    pub options: ServiceOptions,
    pub mode: Mode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Preview { name: String, text: String },
    Created { name: String, path: PathBuf },
}

#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("Error resolving command: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Error rendering service file: {0}")]
    Render(#[from] RenderError),

    #[error("Error creating service: {0}")]
    Install(#[from] InstallError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// Run one request against `init`
///
/// Every failure is final. Steps already performed stay in place: a unit
/// that failed to start remains installed and enabled.
pub async fn provision<I: InitSystem>(
    request: &Request,
    host: &HostContext,
    settings: &Settings,
    init: &I,
) -> Result<Outcome, ProvisionError> {
    let def = build_definition(&request.command, &request.options, host, settings.scope)?;
    let text = render(&def)?;
    warn_unknown_identity(&def);

    if request.mode == Mode::Preview {
        return Ok(Outcome::Preview {
            name: def.name,
            text,
        });
    }

    let path = install(&settings.unit_dir, &def.name, &text).await?;
    log::debug!("{}: {} → {}", def.unit_name(), UnitState::Absent, UnitState::Written);

    Lifecycle::after_install(init, def.unit_name()).run().await?;
    log::info!("{} is enabled and running", def.unit_name());

    Ok(Outcome::Created {
        name: def.name,
        path,
    })
}

/// Warn about User=/Group= values this host cannot resolve
///
/// Not an error: the account may be created before the unit starts.
fn warn_unknown_identity(def: &ServiceDefinition) {
    if let Some(user) = def.service.user.as_deref() {
        if user.parse::<u32>().is_err() && !matches!(User::from_name(user), Ok(Some(_))) {
            log::warn!("User {} does not exist on this host", user);
        }
    }
    if let Some(group) = def.service.group.as_deref() {
        if group.parse::<u32>().is_err() && !matches!(Group::from_name(group), Ok(Some(_))) {
            log::warn!("Group {} does not exist on this host", group);
        }
    }
}

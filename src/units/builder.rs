//! Assemble a ServiceDefinition from command-line inputs

use std::path::{Component, Path, PathBuf};

use super::name::normalize_name;
use super::service::*;
use crate::config::{HostContext, Scope};
use crate::resolve::{resolve_command, ArgQuoting, ResolveError};

/// Unit ordering for every generated service
pub const AFTER_TARGET: &str = "network.target";

/// Optional settings; the defaults produce the minimal unit
#[derive(Debug, Clone, Default)]
pub struct ServiceOptions {
    pub name: Option<String>,
    pub description: Option<String>,
    pub service_type: ServiceType,
    pub user: Option<String>,
    pub group: Option<String>,
    pub environment: Vec<String>,
    pub environment_files: Vec<PathBuf>,
    pub working_directory: Option<PathBuf>,
    pub quoting: ArgQuoting,
}

/// Build the definition for `command`
///
/// Only the command lookup can fail; everything else is data assembly.
pub fn build_definition(
    command: &[String],
    options: &ServiceOptions,
    host: &HostContext,
    scope: Scope,
) -> Result<ServiceDefinition, ResolveError> {
    let name = normalize_name(options.name.as_deref(), command);
    let exec_start = resolve_command(
        command,
        host.search_path.as_deref(),
        &host.cwd,
        options.quoting,
    )?;

    let working_directory = match &options.working_directory {
        Some(dir) => anchor(dir, &host.cwd),
        None => host.cwd.clone(),
    };

    let description = options
        .description
        .clone()
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| name.clone());

    Ok(ServiceDefinition {
        unit: UnitSection {
            description,
            after: vec![AFTER_TARGET.to_string()],
        },
        service: ServiceSection {
            service_type: options.service_type,
            exec_start,
            working_directory,
            restart: RestartPolicy::Always,
            restart_sec: RESTART_SEC,
            user: non_empty(&options.user),
            group: non_empty(&options.group),
            environment: options.environment.clone(),
            environment_files: options
                .environment_files
                .iter()
                .map(|p| anchor_env_file(p, &host.cwd))
                .collect(),
        },
        install: InstallSection {
            wanted_by: vec![scope.install_target().to_string()],
        },
        name,
    })
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

/// Make `path` absolute relative to `cwd`, dropping `.` components
fn anchor(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    cwd.join(path)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Like `anchor`, but keeps systemd's leading `-` ("ignore if missing")
fn anchor_env_file(path: &Path, cwd: &Path) -> PathBuf {
    match path.to_str().and_then(|s| s.strip_prefix('-')) {
        Some(rest) => {
            let inner = anchor(Path::new(rest), cwd);
            PathBuf::from(format!("-{}", inner.display()))
        }
        None => anchor(path, cwd),
    }
}

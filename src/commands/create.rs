//! Create (or preview) a service for a command

use std::path::PathBuf;

use mksvc::provision::{provision, Outcome, Request};
use mksvc::{HostContext, Scope, Settings, Systemctl};

pub async fn create(
    request: &Request,
    scope: Scope,
    unit_dir: Option<PathBuf>,
    systemctl: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::new(scope, unit_dir, systemctl)?;
    let host = HostContext::current()?;
    let init = Systemctl::from_settings(&settings);

    match provision(request, &host, &settings, &init).await? {
        Outcome::Preview { text, .. } => {
            print!("{}", text);
        }
        Outcome::Created { name, .. } => {
            println!("Service {} created and started successfully!", name);
        }
    }

    Ok(())
}

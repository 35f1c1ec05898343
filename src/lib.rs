//! mksvc - Turn a command into a systemd service
//!
//! A Rust tool that:
//! - Derives a unit name and resolves the command to an absolute path
//! - Renders a .service unit with restart-on-failure semantics
//! - Installs it and runs daemon-reload, enable and start
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                     mksvc                        │
//! ├─────────────────────────────────────────────────┤
//! │  Name/Path   │  Definition + Render │  Preview  │
//! ├─────────────────────────────────────────────────┤
//! │  Installer   →   Lifecycle (reload/enable/start) │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod install;
pub mod lifecycle;
pub mod provision;
pub mod resolve;
pub mod units;

pub use config::{HostContext, Scope, Settings, VERSION};
pub use lifecycle::{InitError, InitSystem, Lifecycle, LifecycleError, Step, Systemctl, UnitState};
pub use provision::{provision, Mode, Outcome, ProvisionError, Request};
pub use units::{ServiceDefinition, ServiceOptions, ServiceType};

mod commands;

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use mksvc::provision::{Mode, Request};
use mksvc::units::{ServiceOptions, ServiceType};
use mksvc::resolve::ArgQuoting;
use mksvc::Scope;

#[derive(Parser)]
#[command(name = "mksvc")]
#[command(about = "Create a systemd service for a command")]
#[command(override_usage = "mksvc [OPTIONS] <COMMAND> [ARGS]...")]
#[command(disable_version_flag = true)]
struct Args {
    /// Manually specify the service name
    #[arg(short = 'n', value_name = "NAME")]
    name: Option<String>,

    /// Service description (defaults to the service name)
    #[arg(short = 'd', long, value_name = "DESC")]
    description: Option<String>,

    /// Service startup type (simple, exec, forking, oneshot, dbus, notify, notify-reload, idle)
    #[arg(short = 't', value_name = "TYPE", default_value = "simple", value_parser = parse_service_type)]
    service_type: ServiceType,

    /// Run the service as this user
    #[arg(short = 'u', value_name = "USER")]
    user: Option<String>,

    /// Run the service as this group
    #[arg(short = 'g', value_name = "GROUP")]
    group: Option<String>,

    /// Environment assignment (repeatable)
    #[arg(short = 'e', value_name = "KEY=VAL", value_parser = parse_assignment)]
    environment: Vec<String>,

    /// Environment file (repeatable)
    #[arg(short = 'E', value_name = "PATH")]
    environment_files: Vec<PathBuf>,

    /// Working directory (defaults to the current directory)
    #[arg(short = 'w', value_name = "DIR")]
    working_directory: Option<PathBuf>,

    /// Print the unit file instead of installing it
    #[arg(long = "dry-run", visible_alias = "dry")]
    dry_run: bool,

    /// Shell-quote command arguments in ExecStart=
    #[arg(long)]
    quote_args: bool,

    /// Install as a per-user unit (systemctl --user)
    #[arg(long = "user")]
    user_scope: bool,

    /// Directory to install the unit into
    #[arg(long, value_name = "DIR")]
    unit_dir: Option<PathBuf>,

    /// Init-system control program
    #[arg(long, value_name = "PROG")]
    systemctl: Option<PathBuf>,

    /// Print version
    #[arg(short = 'v', long = "version")]
    version: bool,

    /// Command to run as a service, followed by its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    command: Vec<String>,
}

impl Args {
    fn scope(&self) -> Scope {
        if self.user_scope {
            Scope::User
        } else {
            Scope::System
        }
    }

    fn request(&self) -> Request {
        Request {
            command: self.command.clone(),
            options: ServiceOptions {
                name: self.name.clone(),
                description: self.description.clone(),
                service_type: self.service_type,
                user: self.user.clone(),
                group: self.group.clone(),
                environment: self.environment.clone(),
                environment_files: self.environment_files.clone(),
                working_directory: self.working_directory.clone(),
                quoting: if self.quote_args {
                    ArgQuoting::Shell
                } else {
                    ArgQuoting::Verbatim
                },
            },
            mode: if self.dry_run { Mode::Preview } else { Mode::Install },
        }
    }
}

fn parse_service_type(s: &str) -> Result<ServiceType, String> {
    ServiceType::parse(s).ok_or_else(|| format!("unknown service type '{}'", s))
}

fn parse_assignment(s: &str) -> Result<String, String> {
    if s.contains(['\n', '\r']) {
        return Err(format!("line break in '{}'", s.escape_debug()));
    }
    match s.split_once('=') {
        Some((key, _)) if !key.is_empty() => Ok(s.to_string()),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

/// Options that take a value, so the value is not mistaken for the command
const VALUE_FLAGS: &[&str] = &[
    "-n", "-d", "-t", "-u", "-g", "-e", "-E", "-w", "--description", "--unit-dir", "--systemctl",
];

/// Rewrite the single-dash `-dry` spelling to `--dry-run`
///
/// Only tokens before the command are touched; the command's own
/// arguments pass through untouched.
fn legacy_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    let mut iter = args.into_iter();
    let mut out: Vec<OsString> = iter.next().into_iter().collect();
    let mut expect_value = false;
    let mut in_command = false;

    for arg in iter {
        if in_command || expect_value {
            expect_value = false;
            out.push(arg);
            continue;
        }
        match arg.to_str() {
            Some("-dry") => out.push(OsString::from("--dry-run")),
            Some("--") => {
                in_command = true;
                out.push(arg);
            }
            Some(flag) if VALUE_FLAGS.contains(&flag) => {
                expect_value = true;
                out.push(arg);
            }
            Some(flag) if flag.starts_with('-') => out.push(arg),
            _ => {
                in_command = true;
                out.push(arg);
            }
        }
    }

    out
}

/// Handle `-v` and the no-command case; returns true when nothing else
/// should run. Both exit successfully.
fn informational(args: &Args, out: &mut impl Write) -> io::Result<bool> {
    if args.version {
        writeln!(out, "Version: {}", mksvc::VERSION)?;
        return Ok(true);
    }

    if args.command.is_empty() {
        Args::command().write_help(out)?;
        return Ok(true);
    }

    Ok(false)
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let args = Args::parse_from(legacy_args(std::env::args_os()));

    match informational(&args, &mut std::io::stdout()) {
        Ok(true) => return,
        Ok(false) => {}
        Err(e) => {
            log::error!("{}", e);
            return;
        }
    }

    let request = args.request();
    let result = commands::create(
        &request,
        args.scope(),
        args.unit_dir.clone(),
        args.systemctl.clone(),
    )
    .await;

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

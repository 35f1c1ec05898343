//! Executable resolution for ExecStart=
//!
//! systemd wants an absolute program path, so bare command names are looked
//! up in the search path the same way a shell would.

use std::ffi::OsStr;
use std::path::Path;

use crate::units::ExecCommand;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no command given")]
    Empty,

    #[error("{command}: command not found ({source})")]
    NotFound {
        command: String,
        #[source]
        source: which::Error,
    },

    #[error("cannot quote argument {0:?}")]
    Quote(String),
}

/// How command arguments are written after the program path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArgQuoting {
    /// Arguments joined with single spaces, unescaped
    #[default]
    Verbatim,
    /// Each argument shell-quoted so spaces and metacharacters survive
    Shell,
}

/// Resolve the first token of `command` to an absolute program path
///
/// The program token always goes through `which`, so it must exist and be
/// executable. Absolute paths are kept as written; tokens with a separator
/// are resolved against `cwd`, bare names against `search_path`.
pub fn resolve_command(
    command: &[String],
    search_path: Option<&OsStr>,
    cwd: &Path,
    quoting: ArgQuoting,
) -> Result<ExecCommand, ResolveError> {
    let (first, rest) = command.split_first().ok_or(ResolveError::Empty)?;
    if first.is_empty() {
        return Err(ResolveError::Empty);
    }

    let found = which::which_in(first, search_path, cwd).map_err(|source| {
        ResolveError::NotFound {
            command: first.clone(),
            source,
        }
    })?;
    // Keep absolute paths exactly as written once they check out
    let program = if Path::new(first).is_absolute() {
        Path::new(first).to_path_buf()
    } else {
        found
    };
    log::debug!("Resolved {} to {}", first, program.display());

    let args = match quoting {
        ArgQuoting::Verbatim => rest.to_vec(),
        ArgQuoting::Shell => rest
            .iter()
            .map(|arg| {
                shlex::try_quote(arg)
                    .map(|q| q.into_owned())
                    .map_err(|_| ResolveError::Quote(arg.clone()))
            })
            .collect::<Result<_, _>>()?,
    };

    Ok(ExecCommand { program, args })
}

//! Write rendered units into the unit directory

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
#[error("failed to write {}: {source}", .path.display())]
pub struct InstallError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Path the unit `name` is installed at inside `unit_dir`
pub fn unit_path(unit_dir: &Path, name: &str) -> PathBuf {
    unit_dir.join(format!("{}.service", name))
}

/// Write `text` to `<unit_dir>/<name>.service`, replacing any existing file
///
/// No check is made that an existing file belongs to an earlier run: the
/// last write wins.
pub async fn install(unit_dir: &Path, name: &str, text: &str) -> Result<PathBuf, InstallError> {
    let path = unit_path(unit_dir, name);

    if tokio::fs::try_exists(&path).await.unwrap_or(false) {
        log::info!("Replacing existing unit file {}", path.display());
    }

    tokio::fs::write(&path, text)
        .await
        .map_err(|source| InstallError {
            path: path.clone(),
            source,
        })?;

    log::info!("Wrote {}", path.display());
    Ok(path)
}

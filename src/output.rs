#[cfg(unix)]
use std::fs::Permissions;
use std::{io::Write, path::Path};

use anyhow::{Context, Result};
use clap::ValueEnum;
use tempfile::NamedTempFile;
use tokio::task;
use tracing::{debug, info};

use crate::{
    aws::SessionCredentials,
    constants::{ACCESS_KEY_ID_VAR, SECRET_ACCESS_KEY_VAR, SESSION_TOKEN_VAR},
};

/// Syntax used for the variable assignments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ShellFormat {
    /// `set -g -x VAR value`
    #[default]
    Fish,
    /// `export VAR=value`
    Posix,
    /// `$Env:VAR = "value"`
    Powershell,
}

impl ShellFormat {
    pub fn assignment(self, name: &str, value: &str) -> String {
        match self {
            Self::Fish => format!("set -g -x {name} {value}"),
            Self::Posix => format!("export {name}={value}"),
            Self::Powershell => format!("$Env:{name} = \"{value}\""),
        }
    }

    /// One line per credential field: access key, secret key, session token
    pub fn render(self, credentials: &SessionCredentials) -> Vec<String> {
        [
            (ACCESS_KEY_ID_VAR, &credentials.access_key_id),
            (SECRET_ACCESS_KEY_VAR, &credentials.secret_access_key),
            (SESSION_TOKEN_VAR, &credentials.session_token),
        ]
        .into_iter()
        .map(|(name, value)| self.assignment(name, value))
        .collect()
    }
}

/// Replace `path` with `lines`, newline-terminated.
///
/// Content goes to a uniquely named temp file in the same directory and is
/// renamed into place, so a reader never sees a half-written session and
/// concurrent writers each replace the file whole.
pub async fn write_session_file(path: &Path, lines: &[String]) -> Result<()> {
    let mut contents = String::new();
    for line in lines {
        contents.push_str(line);
        contents.push('\n');
    }

    let target = path.to_path_buf();
    task::spawn_blocking(move || persist_atomically(&target, contents.as_bytes()))
        .await
        .context("Session writer task failed")??;

    info!("Session written to: {}", path.display());
    Ok(())
}

fn persist_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    debug!("Writing session to temp file: {}", tmp.path().display());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(Permissions::from_mode(0o600))
            .context("Failed to restrict session file permissions")?;
    }

    tmp.write_all(contents)
        .with_context(|| format!("Failed to write {}", tmp.path().display()))?;
    tmp.as_file().sync_all()?;

    // On failure the PersistError owns the temp file and removes it on drop
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to move session file into {}", path.display()))?;

    Ok(())
}

/*
[INPUT]:  Sidecar lock file on disk
[OUTPUT]: Parsed ServerLockInfo (port, pid, access token, version)
[POS]:    Server layer - lock file discovery
[UPDATE]: When the lock file location or schema changes
*/

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::http::{PmxtError, Result};
use crate::types::ServerLockInfo;

/// `~/.pmxt/server.lock`
pub fn default_lock_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PmxtError::Config("Could not determine home directory".to_string()))?;
    Ok(home.join(".pmxt").join("server.lock"))
}

/// Read the lock file. A missing or unreadable file means no sidecar is recorded.
pub async fn read_lock(path: &Path) -> Option<ServerLockInfo> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) => {
            if err.kind() != ErrorKind::NotFound {
                debug!(path = %path.display(), error = %err, "lock file unreadable");
            }
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(info) => Some(info),
        Err(err) => {
            debug!(path = %path.display(), error = %err, "lock file malformed");
            None
        }
    }
}

pub async fn remove_lock(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

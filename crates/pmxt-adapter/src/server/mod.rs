/*
[INPUT]:  Configured sidecar base URL, lock file, launcher binary
[OUTPUT]: A live sidecar and a SidecarClient bound to it
[POS]:    Server layer - sidecar lifecycle (probe, start, stop, connect)
[UPDATE]: When the launcher, health probe or lock handling changes
*/

pub mod lock;

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use reqwest::Url;
use tracing::{debug, info, warn};

use crate::http::{ClientConfig, DEFAULT_PORT, PmxtError, Result, SidecarClient};
use crate::types::ServerLockInfo;

pub use lock::{default_lock_path, read_lock, remove_lock};

/// Launcher installed alongside the sidecar package.
pub const LAUNCHER: &str = "pmxt-ensure-server";

const DEFAULT_MAX_RETRIES: u32 = 30;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Probes, starts and stops the local sidecar process
#[derive(Debug, Clone)]
pub struct ServerManager {
    base_url: Url,
    lock_path: PathBuf,
    launcher: String,
    max_retries: u32,
    retry_delay: Duration,
    client_config: ClientConfig,
}

impl ServerManager {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            lock_path: default_lock_path()?,
            launcher: LAUNCHER.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            client_config: ClientConfig::default(),
        })
    }

    pub fn with_lock_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.lock_path = path.into();
        self
    }

    pub fn with_launcher(mut self, launcher: impl Into<String>) -> Self {
        self.launcher = launcher.into();
        self
    }

    pub fn with_retries(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_client_config(mut self, config: ClientConfig) -> Self {
        self.client_config = config;
        self
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn server_info(&self) -> Option<ServerLockInfo> {
        read_lock(&self.lock_path).await
    }

    pub async fn access_token(&self) -> Option<String> {
        self.server_info().await.and_then(|info| info.access_token)
    }

    /// Port recorded in the lock file, else the configured one.
    pub async fn running_port(&self) -> u16 {
        match self.server_info().await {
            Some(info) => info.port,
            None => self.base_url.port_or_known_default().unwrap_or(DEFAULT_PORT),
        }
    }

    /// Configured URL with the port swapped for the running one.
    pub async fn live_base_url(&self) -> Result<Url> {
        let mut url = self.base_url.clone();
        let port = self.running_port().await;
        url.set_port(Some(port))
            .map_err(|_| PmxtError::Config(format!("cannot set port on {}", self.base_url)))?;
        Ok(url)
    }

    /// GET /health answers `{"status": "ok"}`. Any failure reads as not running.
    pub async fn is_running(&self) -> bool {
        let client = match SidecarClient::with_config_and_base_url(
            self.client_config.clone(),
            self.base_url.as_str(),
        ) {
            Ok(client) => client,
            Err(err) => {
                warn!(error = %err, "health probe client init failed");
                return false;
            }
        };

        match client.health().await {
            Ok(health) => health.is_ok(),
            Err(err) => {
                debug!(error = %err, "sidecar health probe failed");
                false
            }
        }
    }

    /// Start the sidecar through the launcher unless it already answers.
    pub async fn ensure_running(&self) -> Result<()> {
        if self.is_running().await {
            return Ok(());
        }

        info!(launcher = %self.launcher, "starting sidecar");
        let started = match self.spawn_launcher() {
            Ok(()) => self.wait_for_server().await,
            Err(err) => Err(err),
        };
        started.map_err(|err| self.startup_failure(err))
    }

    fn spawn_launcher(&self) -> Result<()> {
        let mut command = Command::new(&self.launcher);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let mut child = command.spawn()?;
        debug!(pid = child.id(), "launcher spawned");

        // The launcher exits once the sidecar is daemonized; reap it.
        tokio::task::spawn_blocking(move || match child.wait() {
            Ok(status) => debug!(%status, "launcher exited"),
            Err(err) => warn!(error = %err, "failed to wait on launcher"),
        });
        Ok(())
    }

    async fn wait_for_server(&self) -> Result<()> {
        for attempt in 0..self.max_retries {
            if self.is_running().await {
                info!(attempt, "sidecar is up");
                return Ok(());
            }
            tokio::time::sleep(self.retry_delay).await;
        }

        let waited = self.retry_delay.as_secs_f64() * f64::from(self.max_retries);
        Err(PmxtError::Sidecar(format!("Server did not start within {waited}s")))
    }

    fn startup_failure(&self, err: PmxtError) -> PmxtError {
        let cause = match err {
            PmxtError::Sidecar(message) => message,
            other => other.to_string(),
        };
        PmxtError::Sidecar(format!(
            "Failed to start pmxt sidecar via {}: {cause}. Install it with `npm install -g pmxtjs` or start it manually with `pmxt-server`",
            self.launcher
        ))
    }

    /// Terminate the recorded sidecar process and drop its lock file.
    pub async fn stop(&self) -> Result<()> {
        let Some(info) = self.server_info().await else {
            debug!("no lock file, nothing to stop");
            return Ok(());
        };

        terminate(info.pid)?;
        remove_lock(&self.lock_path).await?;
        info!(pid = info.pid, port = info.port, "sidecar stopped");
        Ok(())
    }

    pub async fn restart(&self) -> Result<()> {
        self.stop().await?;
        self.ensure_running().await
    }

    /// Client bound to the running sidecar and its access token.
    pub async fn connect(&self) -> Result<SidecarClient> {
        let url = self.live_base_url().await?;
        let client = SidecarClient::with_config_and_base_url(self.client_config.clone(), url.as_str())?;
        Ok(client.with_access_token(self.access_token().await))
    }
}

/// Refuses pid 0 (the caller's process group) and the caller's own pid.
#[cfg(unix)]
fn terminate(pid: u32) -> Result<()> {
    if pid == 0 || pid == std::process::id() {
        return Err(PmxtError::Sidecar(format!("invalid pid {pid} in lock file")));
    }
    let pid = libc::pid_t::try_from(pid)
        .map_err(|_| PmxtError::Sidecar(format!("invalid pid {pid} in lock file")))?;
    let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
    if rc == 0 {
        return Ok(());
    }

    let err = std::io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::ESRCH) {
        // Already gone; the lock is stale.
        return Ok(());
    }
    Err(err.into())
}

#[cfg(not(unix))]
fn terminate(pid: u32) -> Result<()> {
    Err(PmxtError::Sidecar(format!(
        "stopping sidecar pid {pid} is only supported on unix"
    )))
}

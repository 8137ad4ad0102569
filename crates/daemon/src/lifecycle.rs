// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, supervision, shutdown.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;
use tender_adapters::{
    ConfigLoader, CoordinatorFactory, NoOpCoordinatorFactory, ProcessResourceClient,
    ResourceClient, TomlConfigLoader, TracedConfigLoader, TracedCoordinatorFactory,
    TracedResourceClient,
};
use tender_core::{LifecycleSettings, ReadinessStatus, SettingsError};
use tender_engine::{LifecycleDeps, LifecycleManager};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Lifecycle manager with concrete adapter types (wrapped with tracing)
pub type DaemonManager = LifecycleManager<
    TracedCoordinatorFactory<NoOpCoordinatorFactory>,
    TracedConfigLoader<TomlConfigLoader>,
    TracedResourceClient<ProcessResourceClient>,
>;

/// Environment variable naming the settings file
pub const ENV_CONFIG: &str = "TENDER_CONFIG";
/// Environment variable overriding the state directory
pub const ENV_STATE_DIR: &str = "TENDER_STATE_DIR";

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Settings file the lifecycle settings were read from
    pub settings_path: PathBuf,
    pub settings: LifecycleSettings,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
}

impl Config {
    /// Load settings from `settings_path` and place state files in `state_dir`
    pub fn load(settings_path: &Path, state_dir: &Path) -> Result<Self, DaemonError> {
        let settings = LifecycleSettings::load(settings_path)?.apply_env()?;
        settings.validate()?;

        Ok(Self {
            settings_path: settings_path.to_path_buf(),
            settings,
            lock_path: state_dir.join("tenderd.pid"),
            log_path: state_dir.join("tenderd.log"),
        })
    }
}

/// Daemon state during operation
pub struct DaemonState {
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    pub manager: DaemonManager,
    /// When daemon started
    pub start_time: Instant,
}

impl DaemonState {
    /// Shut the daemon down gracefully
    pub async fn shutdown(&mut self) {
        info!(
            uptime_secs = self.start_time.elapsed().as_secs(),
            "Shutting down daemon..."
        );

        self.manager.tear_down().await;

        if self.config.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.lock_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }

        info!("Daemon shutdown complete");
    }
}

/// Daemon errors
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the daemon
pub async fn startup(config: &Config) -> Result<DaemonState, DaemonError> {
    match startup_inner(config).await {
        Ok(state) => Ok(state),
        // The lock file belongs to the daemon that holds it
        Err(e @ DaemonError::LockFailed(_)) => Err(e),
        Err(e) => {
            cleanup_on_failure(config);
            Err(e)
        }
    }
}

/// Inner startup logic - cleanup_on_failure called if this fails
async fn startup_inner(config: &Config) -> Result<DaemonState, DaemonError> {
    // 1. Acquire lock file FIRST - prevents two daemons sharing one coordinator
    if let Some(parent) = config.lock_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let lock_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(DaemonError::LockFailed)?;

    // Write PID to lock file
    use std::io::Write;
    lock_file.set_len(0)?;
    let mut lock_file = lock_file;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file;

    // 2. Transient artifacts land here
    std::fs::create_dir_all(&config.settings.transient_dir)?;

    // 3. Set up adapters (wrapped with tracing for observability)
    let manager = LifecycleManager::new(
        LifecycleDeps {
            factory: TracedCoordinatorFactory::new(NoOpCoordinatorFactory::new()),
            loader: TracedConfigLoader::new(TomlConfigLoader::from_env()),
            resources: TracedResourceClient::new(ProcessResourceClient::new()),
        },
        config.settings.clone(),
    );

    // 4. Construction runs in the background; readiness is supervised
    spawn_initialize(&manager);

    info!(
        settings = %config.settings_path.display(),
        base_config = %config.settings.base_config.display(),
        "Daemon started"
    );

    Ok(DaemonState {
        config: config.clone(),
        lock_file,
        manager,
        start_time: Instant::now(),
    })
}

/// Clean up resources on startup failure
fn cleanup_on_failure(config: &Config) {
    if config.lock_path.exists() {
        let _ = std::fs::remove_file(&config.lock_path);
    }
}

/// Run `initialize` in the background, logging failure
pub fn spawn_initialize<F, L, R>(manager: &LifecycleManager<F, L, R>) -> JoinHandle<()>
where
    F: CoordinatorFactory,
    L: ConfigLoader,
    R: ResourceClient,
{
    let manager = manager.clone();
    tokio::spawn(async move {
        if let Err(e) = manager.initialize().await {
            error!(error = %e, "coordinator initialization failed");
        }
    })
}

/// What one supervision pass did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Supervision {
    /// The coordinator is ready
    Healthy,
    /// Not ready yet, but not stuck long enough to intervene
    Waiting(ReadinessStatus),
    /// Nothing is initialized or running; initialization was retried
    Retried,
    /// A stuck initialization was reset and restarted
    Reset,
    /// The reset could not confirm cancellation
    ResetFailed(String),
}

/// Check readiness once and recover if initialization is stuck or absent
pub async fn supervise_once<F, L, R>(
    manager: &LifecycleManager<F, L, R>,
    budget: Duration,
    stuck_after: Duration,
) -> Supervision
where
    F: CoordinatorFactory,
    L: ConfigLoader,
    R: ResourceClient,
{
    let report = manager.wait_until_ready(Some(budget)).await;
    let warming = manager.warming_status();

    if report.ready {
        tracing::debug!(
            warmed = warming.succeeded_count(),
            failed = warming.failed_count(),
            warming = warming.running,
            "coordinator ready"
        );
        return Supervision::Healthy;
    }

    warn!(
        status = %report.status,
        elapsed_secs = report.elapsed_seconds(),
        phases = ?report.phases,
        error = ?report.error,
        "coordinator not ready"
    );

    if report.warrants_force_reset(stuck_after) {
        let outcome = manager.force_reset().await;
        if !outcome.success {
            error!(reason = %outcome.reason, "force reset failed");
            return Supervision::ResetFailed(outcome.reason);
        }
        spawn_initialize(manager);
        return Supervision::Reset;
    }

    if report.status == ReadinessStatus::NotInitialized && !manager.is_restart_in_progress() {
        spawn_initialize(manager);
        return Supervision::Retried;
    }

    Supervision::Waiting(report.status)
}

/// Supervise readiness every `interval` until aborted
pub fn spawn_supervisor(manager: DaemonManager, settings: &LifecycleSettings) -> JoinHandle<()> {
    let interval = settings.readiness_timeout;
    let stuck_after = settings.stuck_after;
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            let action = supervise_once(&manager, interval, stuck_after).await;
            if action != Supervision::Healthy {
                info!(?action, "supervision pass");
            }
        }
    })
}

/// Resolve the state directory for tenderd
pub fn state_dir() -> Result<PathBuf, DaemonError> {
    if let Ok(dir) = std::env::var(ENV_STATE_DIR) {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("tender"));
    }

    let home = std::env::var("HOME").map_err(|_| DaemonError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/tender"))
}

/// Resolve the settings file: first argument, then `TENDER_CONFIG`, then
/// `tender.toml` in the working directory
pub fn settings_path(args: &[String]) -> PathBuf {
    if let Some(path) = args.get(1) {
        return PathBuf::from(path);
    }
    match std::env::var(ENV_CONFIG) {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from("tender.toml"),
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;

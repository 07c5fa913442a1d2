//! Fault injection
//!
//! Scenarios that exercise relayer outages or stalled chains pause and
//! unpause parts of the environment through a `FaultController` handed to
//! them by the scenario context, never by shelling out directly.

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use neutron_harness_core::types::{FaultBackend, FaultConfig};
use serde::Serialize;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::{FaultError, WithPausedError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultAction {
    Pause,
    Unpause,
}

impl FaultAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultAction::Pause => "pause",
            FaultAction::Unpause => "unpause",
        }
    }
}

/// Pauses and resumes logical parts of the test environment
#[async_trait]
pub trait FaultController: Send + Sync {
    fn name(&self) -> &'static str;

    /// Freeze `target` (for example `relayer`) until `unpause` is called
    async fn pause(&self, target: &str) -> Result<(), FaultError>;

    async fn unpause(&self, target: &str) -> Result<(), FaultError>;

    /// Targets that are currently paused
    async fn paused(&self) -> Vec<String>;
}

/// Build the controller selected by the `faults` section of the config
pub fn controller_for(config: &FaultConfig) -> Arc<dyn FaultController> {
    match config.backend {
        FaultBackend::Docker => Arc::new(DockerFaultController::new(config.containers.clone())),
        FaultBackend::Disabled => Arc::new(DisabledFaultController),
    }
}

/// Pause `target`, run `fut`, then unpause `target` whatever `fut` returned
///
/// If the unpause fails the run's output is returned inside the error.
pub async fn with_paused<C, F>(
    controller: &C,
    target: &str,
    fut: F,
) -> Result<F::Output, WithPausedError<F::Output>>
where
    C: FaultController + ?Sized,
    F: Future,
{
    controller
        .pause(target)
        .await
        .map_err(WithPausedError::Pause)?;
    let output = fut.await;
    match controller.unpause(target).await {
        Ok(()) => Ok(output),
        Err(source) => {
            warn!(target_name = target, error = %source, "unpause failed after paused run");
            Err(WithPausedError::Unpause { output, source })
        }
    }
}

/// Fault controller backed by `docker pause` / `docker unpause`
pub struct DockerFaultController {
    program: String,
    containers: BTreeMap<String, String>,
    paused: Mutex<BTreeSet<String>>,
}

impl DockerFaultController {
    /// Controller resolving logical targets through `containers`
    pub fn new(containers: BTreeMap<String, String>) -> Self {
        Self::with_program("docker", containers)
    }

    /// Use a different docker-compatible CLI (`podman`, a wrapper script, ...)
    pub fn with_program(program: impl Into<String>, containers: BTreeMap<String, String>) -> Self {
        Self {
            program: program.into(),
            containers,
            paused: Mutex::new(BTreeSet::new()),
        }
    }

    fn container(&self, target: &str) -> Result<&str, FaultError> {
        self.containers
            .get(target)
            .map(String::as_str)
            .ok_or_else(|| FaultError::UnknownTarget(target.to_string()))
    }

    async fn run(&self, action: FaultAction, container: &str) -> Result<(), FaultError> {
        let output = Command::new(&self.program)
            .args([action.as_str(), container])
            .output()
            .await
            .map_err(|source| FaultError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FaultError::Command {
                program: self.program.clone(),
                action: action.as_str().to_string(),
                container: container.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl FaultController for DockerFaultController {
    fn name(&self) -> &'static str {
        "docker"
    }

    async fn pause(&self, target: &str) -> Result<(), FaultError> {
        let container = self.container(target)?;
        info!(target_name = target, container, "pausing");
        self.run(FaultAction::Pause, container).await?;
        self.paused.lock().await.insert(target.to_string());
        Ok(())
    }

    async fn unpause(&self, target: &str) -> Result<(), FaultError> {
        let container = self.container(target)?;
        info!(target_name = target, container, "unpausing");
        self.run(FaultAction::Unpause, container).await?;
        self.paused.lock().await.remove(target);
        Ok(())
    }

    async fn paused(&self) -> Vec<String> {
        self.paused.lock().await.iter().cloned().collect()
    }
}

/// Fault controller that only records what it was asked to do
#[derive(Default)]
pub struct RecordingFaultController {
    actions: Mutex<Vec<(FaultAction, String)>>,
    paused: Mutex<BTreeSet<String>>,
}

impl RecordingFaultController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every action received, in order
    pub async fn actions(&self) -> Vec<(FaultAction, String)> {
        self.actions.lock().await.clone()
    }
}

#[async_trait]
impl FaultController for RecordingFaultController {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn pause(&self, target: &str) -> Result<(), FaultError> {
        self.actions
            .lock()
            .await
            .push((FaultAction::Pause, target.to_string()));
        self.paused.lock().await.insert(target.to_string());
        Ok(())
    }

    async fn unpause(&self, target: &str) -> Result<(), FaultError> {
        self.actions
            .lock()
            .await
            .push((FaultAction::Unpause, target.to_string()));
        self.paused.lock().await.remove(target);
        Ok(())
    }

    async fn paused(&self) -> Vec<String> {
        self.paused.lock().await.iter().cloned().collect()
    }
}

/// Fault controller for environments without fault injection
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledFaultController;

#[async_trait]
impl FaultController for DisabledFaultController {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn pause(&self, _target: &str) -> Result<(), FaultError> {
        Err(FaultError::Disabled)
    }

    async fn unpause(&self, _target: &str) -> Result<(), FaultError> {
        Err(FaultError::Disabled)
    }

    async fn paused(&self) -> Vec<String> {
        Vec::new()
    }
}

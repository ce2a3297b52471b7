//! Docker CLI subprocess runtime

use crate::core::config::RuntimeConfig;
use crate::core::workspace::decode_log_bytes;
use crate::runtime::{CommandOutput, ContainerRuntime, RuntimeError};
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// Runs the docker (or compatible) CLI as a subprocess
#[derive(Debug, Clone)]
pub struct DockerCli {
    /// Path to the runtime executable
    binary: String,

    /// Timeout for a single command in seconds
    timeout_secs: u64,
}

impl DockerCli {
    /// # Arguments
    /// * `binary` - Path to the executable (e.g., "docker", "/usr/bin/podman")
    /// * `timeout_secs` - Timeout for a single command in seconds
    pub fn new(binary: String, timeout_secs: u64) -> Self {
        Self { binary, timeout_secs }
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(config.binary.clone(), config.timeout_secs)
    }
}

#[async_trait]
impl ContainerRuntime for DockerCli {
    /// # Errors
    /// Returns `RuntimeError` if:
    /// - The executable cannot be spawned
    /// - The command times out
    async fn run(&self, args: &[String]) -> Result<CommandOutput, RuntimeError> {
        debug!("Spawning {} {}", self.binary, args.join(" "));

        let result = timeout(
            Duration::from_secs(self.timeout_secs),
            Command::new(&self.binary)
                .args(args)
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| RuntimeError::Timeout(self.timeout_secs))?;

        let output = result.map_err(|source| RuntimeError::Spawn {
            binary: self.binary.clone(),
            source,
        })?;

        let output = CommandOutput {
            code: output.status.code(),
            stdout: decode_log_bytes(output.stdout),
            stderr: decode_log_bytes(output.stderr),
        };
        debug!(
            "{} exited with {:?} ({} bytes of output)",
            self.binary,
            output.code,
            output.stdout.len()
        );
        Ok(output)
    }

    fn binary(&self) -> &str {
        &self.binary
    }
}

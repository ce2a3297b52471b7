//! Container runtime access
//!
//! The orchestrator talks to the runtime only through [`ContainerRuntime`],
//! so deployments can be exercised against a recording mock.

pub mod docker;

pub use docker::DockerCli;

use async_trait::async_trait;
use thiserror::Error;

/// Error types for runtime invocations
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to spawn {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Timeout after {0} seconds")]
    Timeout(u64),
}

/// Captured result of one runtime command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Stdout followed by stderr, as a shell `2>&1` capture would read
    pub fn combined(&self) -> String {
        let mut text = self.stdout.clone();
        text.push_str(&self.stderr);
        text
    }
}

/// Result of asking the runtime whether a resource exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    Exists,
    Absent,
    /// The runtime could not answer (daemon down, binary missing, ...)
    Unreachable(String),
}

/// Runtime error messages meaning "no such object"
const ABSENT_MARKERS: [&str; 3] = ["No such", "not found", "no such"];

impl Presence {
    /// Classify the output of an `inspect` command
    pub fn from_inspect(output: &CommandOutput) -> Self {
        if output.success() {
            Presence::Exists
        } else if ABSENT_MARKERS.iter().any(|m| output.stderr.contains(m)) {
            Presence::Absent
        } else {
            Presence::Unreachable(output.stderr.trim().to_string())
        }
    }
}

/// Trait for container runtimes - allows swapping the CLI for a mock
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Run the runtime with `args`. A non-zero exit is not an error here;
    /// callers decide from [`CommandOutput::code`].
    async fn run(&self, args: &[String]) -> Result<CommandOutput, RuntimeError>;

    /// Name shown when echoing commands
    fn binary(&self) -> &str {
        "docker"
    }
}

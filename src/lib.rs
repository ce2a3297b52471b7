//! oai-ci - CI helpers for the OAI HSS/MME pipeline

pub mod analysis;
pub mod cli;
pub mod configgen;
pub mod core;
pub mod deploy;
pub mod report;
pub mod runtime;
pub mod verify;

// Re-export commonly used types
pub use configgen::{ConfigError, GeneratedFile, HssConfig, Kind, MmeConfig};
pub use core::{CiConfig, NetworkFunction, Workspace};
pub use deploy::{DeployAction, DeployError, SanityDeployer};
pub use report::{HtmlReport, ReportError};
pub use runtime::{CommandOutput, ContainerRuntime, DockerCli, Presence, RuntimeError};
pub use verify::{verify_deployment, DeploymentVerdict, VerifyError};

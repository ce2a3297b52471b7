//! Core building blocks shared by the CI tools
//!
//! Configuration, workspace layout, the network functions under test, and
//! the marker rules every log analysis is built from.

pub mod config;
pub mod marker;
pub mod nf;
pub mod workspace;

pub use config::CiConfig;
pub use marker::{MarkerCounts, MarkerPattern, MarkerRule};
pub use nf::{BuildVariant, NetworkFunction};
pub use workspace::Workspace;

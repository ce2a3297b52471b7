//! Log analyses behind the report and the deployment verifier
//!
//! Every analysis is a pure function from log text to a typed record. Reading
//! the files and rendering the results is left to the callers.

pub mod build_log;
pub mod check_run;
pub mod container;
pub mod formatting;
pub mod sca;

pub use build_log::{analyze_image_build, CompileCounts, ImageBuildAnalysis, InstallSteps};
pub use check_run::{analyze_check_run, CheckRun};
pub use container::{analyze_container_start, ContainerStart};
pub use formatting::{parse_formatting_result, FormattingCheck};
pub use sca::{analyze_cppcheck, ScaSummary};

use serde::Serialize;
use thiserror::Error;

/// Outcome of a single analysed stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ok,
    Warning,
    Failed,
    NotApplicable,
}

impl Status {
    pub fn from_ok(ok: bool) -> Self {
        if ok {
            Status::Ok
        } else {
            Status::Failed
        }
    }
}

/// Malformed analysis input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("missing {0} in formatting check result")]
    MissingKey(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

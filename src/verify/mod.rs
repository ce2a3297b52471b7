//! Deployment verification
//!
//! Re-reads the archived check-run logs of the HSS and MME and decides
//! whether the sanity check deployment reached an operational state.

use crate::analysis::{analyze_check_run, CheckRun};
use crate::core::{NetworkFunction, Workspace};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("Missing Parameter in job description")]
    MissingJob,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Verdict for one network function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NfVerdict {
    pub nf: NetworkFunction,
    pub log_found: bool,
    pub passed: bool,
    pub check_run: CheckRun,
}

/// Verdict for the whole deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentVerdict {
    pub job_name: String,
    pub job_id: String,
    pub hss: NfVerdict,
    pub mme: NfVerdict,
}

impl DeploymentVerdict {
    pub fn passed(&self) -> bool {
        self.hss.passed && self.mme.passed
    }

    /// Lines printed for the pipeline console, last one is the overall result
    pub fn messages(&self) -> Vec<&'static str> {
        let mut lines = Vec::new();
        if !self.hss.passed {
            lines.push("HSS did not deploy properly");
        }
        if !self.mme.passed {
            lines.push("MME did not deploy properly");
        }
        lines.push(if self.passed() {
            "Sanity Check Deployment is OK"
        } else {
            "Sanity Check Deployment went wrong"
        });
        lines
    }
}

fn verify_nf(workspace: &Workspace, nf: NetworkFunction) -> Result<NfVerdict, VerifyError> {
    let log_name = nf.check_run_log();
    let verdict = match workspace.read_archive(&log_name)? {
        Some(log) => {
            let check_run = analyze_check_run(&log);
            let passed = check_run.passed(nf);
            debug!("{}: {:?}", log_name, check_run.markers);
            NfVerdict { nf, log_found: true, passed, check_run }
        }
        None => {
            warn!("{} not found", workspace.archive(&log_name).display());
            NfVerdict { nf, log_found: false, passed: false, check_run: CheckRun::default() }
        }
    };
    Ok(verdict)
}

/// Check both check-run logs under `archives/`
pub fn verify_deployment(
    workspace: &Workspace,
    job_name: &str,
    job_id: &str,
) -> Result<DeploymentVerdict, VerifyError> {
    if job_name.is_empty() || job_id.is_empty() {
        return Err(VerifyError::MissingJob);
    }

    Ok(DeploymentVerdict {
        job_name: job_name.to_string(),
        job_id: job_id.to_string(),
        hss: verify_nf(workspace, NetworkFunction::Hss)?,
        mme: verify_nf(workspace, NetworkFunction::Mme)?,
    })
}

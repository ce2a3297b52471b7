//! HTML build report
//!
//! Collects the archived logs of a pipeline run into
//! `test_results_oai_hss.html`: formatting check, static analysis, image
//! build stages and the sanity check deployment.

pub mod html;
pub mod sections;
pub mod splice;

pub use html::{Alert, Color, HtmlWriter};

use crate::core::Workspace;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Output file name
pub const REPORT_FILE: &str = "test_results_oai_hss.html";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Missing Parameter in job description")]
    MissingJob,

    #[error("Missing Parameter in Git Repository description")]
    MissingGit,

    #[error("Missing Parameter in Git Pull Request Repository description")]
    MissingPullRequest,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Job and repository description shown in the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlReport {
    pub job_name: String,
    pub job_id: String,
    pub job_url: String,
    /// Replaced by the pipeline after generation
    pub job_start_time: String,
    pub git_url: String,
    pub git_src_branch: String,
    pub git_src_commit: String,
    pub git_src_commit_msg: Option<String>,
    pub pull_request: bool,
    pub git_target_branch: String,
    pub git_target_commit: String,
}

impl Default for HtmlReport {
    fn default() -> Self {
        Self {
            job_name: String::new(),
            job_id: String::new(),
            job_url: String::new(),
            job_start_time: "TEMPLATE_TIME".to_string(),
            git_url: String::new(),
            git_src_branch: String::new(),
            git_src_commit: String::new(),
            git_src_commit_msg: None,
            pull_request: false,
            git_target_branch: String::new(),
            git_target_commit: String::new(),
        }
    }
}

/// `--git_pull_request` is only set by the literal `true` / `True`
pub fn parse_pull_request_flag(value: &str) -> bool {
    value == "true" || value == "True"
}

impl HtmlReport {
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.job_name.is_empty() || self.job_id.is_empty() || self.job_url.is_empty() {
            return Err(ReportError::MissingJob);
        }
        if self.git_url.is_empty() || self.git_src_branch.is_empty() || self.git_src_commit.is_empty() {
            return Err(ReportError::MissingGit);
        }
        if self.pull_request && (self.git_target_branch.is_empty() || self.git_target_commit.is_empty()) {
            return Err(ReportError::MissingPullRequest);
        }
        Ok(())
    }

    /// Build summary table, as spliced into the EPC reports
    pub fn build_summary(&self) -> String {
        sections::build_summary(self)
    }

    /// Render the whole report from the workspace logs
    pub fn render(&self, workspace: &Workspace) -> Result<String, ReportError> {
        let mut html = HtmlWriter::new();
        sections::header(self, &mut html);
        html.raw(&self.build_summary());
        sections::formatting(self, workspace, &mut html)?;
        sections::static_analysis(workspace, &mut html)?;
        sections::image_build(self, workspace, &mut html)?;
        sections::sanity_check(workspace, &mut html)?;
        sections::test_summary(&mut html);
        sections::footer(&mut html);
        Ok(html.finish())
    }

    /// Validate, write the report and update the EPC reports
    pub fn generate(&self, workspace: &Workspace) -> Result<PathBuf, ReportError> {
        self.validate()?;
        let contents = self.render(workspace)?;
        let path = workspace.file(REPORT_FILE);
        std::fs::write(&path, contents)?;
        info!("Report written to {}", path.display());

        splice::splice_into_reports(workspace, &self.build_summary())?;
        Ok(path)
    }
}

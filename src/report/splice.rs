//! Insert the build summary into the EPC test reports

use crate::core::workspace::read_log;
use crate::core::Workspace;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info};

/// Reports that receive a copy of the build summary
pub const EPC_REPORTS: [&str; 2] = ["test_results_oai_epc.html", "test_results_magma_epc_rhel8.html"];

/// Line marker the summary is inserted before
pub const SPLICE_MARKER: &str = "Deployment Summary";

/// Insert `block` before the first line containing `marker`.
/// Text without the marker is returned unchanged.
pub fn splice_before_marker(text: &str, block: &str, marker: &str) -> String {
    let mut out = String::with_capacity(text.len() + block.len());
    let mut inserted = false;
    for line in text.split_inclusive('\n') {
        if !inserted && line.contains(marker) {
            out.push_str(block);
            inserted = true;
        }
        out.push_str(line);
    }
    out
}

/// Splice the summary into every EPC report present in the workspace.
/// Returns the updated files.
pub fn splice_into_reports(workspace: &Workspace, summary: &str) -> io::Result<Vec<PathBuf>> {
    let mut updated = Vec::new();
    for name in EPC_REPORTS {
        let path = workspace.file(name);
        let Some(text) = read_log(&path)? else {
            debug!("{} not present, skipping", name);
            continue;
        };

        let spliced = splice_before_marker(&text, summary, SPLICE_MARKER);
        let staging = workspace.file(&name.replace(".html", "_new.html"));
        std::fs::write(&staging, spliced)?;
        std::fs::rename(&staging, &path)?;
        info!("Build summary added to {}", path.display());
        updated.push(path);
    }
    Ok(updated)
}

//! Network functions and build variants known to the pipeline

use serde::Serialize;
use std::fmt;

/// Network function deployed by the sanity check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NetworkFunction {
    Hss,
    Mme,
    Cassandra,
}

impl NetworkFunction {
    /// Lowercase name used in log file names (`hss_check_run.log`)
    pub fn lower(&self) -> &'static str {
        match self {
            NetworkFunction::Hss => "hss",
            NetworkFunction::Mme => "mme",
            NetworkFunction::Cassandra => "cassandra",
        }
    }

    /// Uppercase name used in log markers (`OAI-HSS CONFIG:`)
    pub fn upper(&self) -> &'static str {
        match self {
            NetworkFunction::Hss => "HSS",
            NetworkFunction::Mme => "MME",
            NetworkFunction::Cassandra => "CASSANDRA",
        }
    }

    /// Name of the CI container
    pub fn container(&self) -> &'static str {
        match self {
            NetworkFunction::Hss => "ci-oai-hss",
            NetworkFunction::Mme => "ci-oai-mme",
            NetworkFunction::Cassandra => "ci-cassandra",
        }
    }

    /// Log written by the NF during the start/stop check
    pub fn check_run_log(&self) -> String {
        format!("{}_check_run.log", self.lower())
    }

    /// Log holding the configuration phase output
    pub fn config_log(&self) -> String {
        match self {
            NetworkFunction::Cassandra => "cassandra_status.log".to_string(),
            nf => format!("{}_config.log", nf.lower()),
        }
    }
}

impl fmt::Display for NetworkFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.upper())
    }
}

/// Container build tool the HSS image was built with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildVariant {
    Docker,
    Podman,
}

impl BuildVariant {
    /// Variants in report column order
    pub const ALL: [BuildVariant; 2] = [BuildVariant::Docker, BuildVariant::Podman];

    pub fn name(&self) -> &'static str {
        match self {
            BuildVariant::Docker => "docker",
            BuildVariant::Podman => "podman",
        }
    }

    /// Archived image build log for this variant
    pub fn build_log(&self) -> String {
        format!("hss_{}_image_build.log", self.name())
    }
}

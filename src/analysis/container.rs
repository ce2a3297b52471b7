//! Container start / configuration log analysis

use crate::core::marker::scan;
use crate::core::{MarkerCounts, MarkerRule, NetworkFunction};
use serde::Serialize;

const SUBSCRIPTIONS: &str = "subscriptions";
const MME_ISDN: &str = "mme_isdn";
const CERTIFICATES: &str = "certificates";
const RAC1: &str = "rac1";

/// Result of a container's configuration phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerStart {
    pub nf: NetworkFunction,
    /// `OAI-<NF> CONFIG:` / `CASSANDRA START:` line reported `OK`
    pub config_ok: bool,
    pub markers: MarkerCounts,
}

impl ContainerStart {
    /// Provisioned users (`Subscription-Data` lines)
    pub fn users(&self) -> usize {
        self.markers.count(SUBSCRIPTIONS)
    }

    /// Provisioned MME instances; each one logs `mme-isdn` twice
    pub fn mme_instances(&self) -> usize {
        self.markers.count(MME_ISDN) / 2
    }

    pub fn certificates_generated(&self) -> bool {
        self.markers.seen(CERTIFICATES)
    }

    /// Cassandra node status listed the rack
    pub fn rack_listed(&self) -> bool {
        self.markers.seen(RAC1)
    }
}

fn config_marker(nf: NetworkFunction) -> String {
    match nf {
        NetworkFunction::Cassandra => "CASSANDRA START:".to_string(),
        nf => format!("OAI-{} CONFIG:", nf.upper()),
    }
}

fn rules(nf: NetworkFunction) -> Vec<MarkerRule> {
    match nf {
        NetworkFunction::Hss => vec![
            MarkerRule::simple(SUBSCRIPTIONS, "Subscription-Data"),
            MarkerRule::simple(MME_ISDN, "mme-isdn"),
            MarkerRule::simple(CERTIFICATES, "Certificate is to be certified"),
        ],
        NetworkFunction::Mme => vec![MarkerRule::simple(CERTIFICATES, "Certificate is to be certified")],
        NetworkFunction::Cassandra => vec![MarkerRule::simple(RAC1, "RAC1")],
    }
}

/// Analyse a `<nf>_config.log` (or `cassandra_status.log`)
pub fn analyze_container_start(nf: NetworkFunction, log: &str) -> ContainerStart {
    let marker = config_marker(nf);
    let config_ok = log
        .lines()
        .any(|line| line.contains(&marker) && line.contains("OK"));

    ContainerStart { nf, config_ok, markers: scan(&rules(nf), log.lines()) }
}

//! Start/stop check log analysis
//!
//! Shared by the HTML report and the deployment verifier so both judge a
//! network function from the same markers.

use crate::core::marker::scan;
use crate::core::{MarkerCounts, MarkerRule, NetworkFunction};
use serde::Serialize;

pub const OPC_COMPUTED: &str = "opc_computed";
pub const FREE_DIAMETER_UP: &str = "free_diameter_up";
pub const CONNECTED_TO_MME: &str = "connected_to_mme";
pub const CONNECTED_TO_HSS: &str = "connected_to_hss";
pub const SCTP_INIT: &str = "sctp_init";

fn check_run_rules() -> Vec<MarkerRule> {
    vec![
        MarkerRule::simple(OPC_COMPUTED, "Compute opc"),
        MarkerRule::regex(
            FREE_DIAMETER_UP,
            "The freeDiameter engine has been started|Diameter identity of MME",
        ),
        MarkerRule::regex(CONNECTED_TO_MME, "STATE_OPEN.*mme"),
        MarkerRule::regex(CONNECTED_TO_HSS, "Peer hss.* is now connected"),
        MarkerRule::simple(SCTP_INIT, "Received SCTP_INIT_MSG"),
    ]
}

/// Markers found in a `<nf>_check_run.log`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckRun {
    pub markers: MarkerCounts,
}

impl CheckRun {
    pub fn opc_generations(&self) -> usize {
        self.markers.count(OPC_COMPUTED)
    }

    pub fn free_diameter_up(&self) -> bool {
        self.markers.seen(FREE_DIAMETER_UP)
    }

    pub fn connected_to_mme(&self) -> bool {
        self.markers.seen(CONNECTED_TO_MME)
    }

    pub fn connected_to_hss(&self) -> bool {
        self.markers.seen(CONNECTED_TO_HSS)
    }

    pub fn sctp_ok(&self) -> bool {
        self.markers.seen(SCTP_INIT)
    }

    /// Whether the log shows a healthy run of `nf`
    pub fn passed(&self, nf: NetworkFunction) -> bool {
        match nf {
            NetworkFunction::Hss => {
                self.opc_generations() > 0 && self.free_diameter_up() && self.connected_to_mme()
            }
            NetworkFunction::Mme => self.free_diameter_up() && self.connected_to_hss() && self.sctp_ok(),
            NetworkFunction::Cassandra => false,
        }
    }
}

pub fn analyze_check_run(log: &str) -> CheckRun {
    CheckRun { markers: scan(&check_run_rules(), log.lines()) }
}

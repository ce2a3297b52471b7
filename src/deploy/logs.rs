//! Splitting entrypoint container logs into configuration and run phases

use crate::core::NetworkFunction;

/// First line of the run phase in an entrypoint container's log
pub fn run_phase_marker(nf: NetworkFunction) -> Option<&'static str> {
    match nf {
        NetworkFunction::Hss => Some("jsonConfig"),
        NetworkFunction::Mme => Some("Initializing shared logging"),
        NetworkFunction::Cassandra => None,
    }
}

/// Lines before the first marker line, and lines from it onward.
/// Without a marker line everything belongs to the first part.
pub fn split_logs(log: &str, marker: &str) -> (String, String) {
    let mut config = String::new();
    let mut run = String::new();
    let mut in_run = false;
    for line in log.lines() {
        in_run |= line.contains(marker);
        let target = if in_run { &mut run } else { &mut config };
        target.push_str(line);
        target.push('\n');
    }
    (config, run)
}

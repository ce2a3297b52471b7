//! Test: deployment verification from archived check-run logs

use crate::helpers::*;
use oai_ci::{verify_deployment, NetworkFunction};

const HSS_RUN: &str = "\
[2021-03-01 10:00:01] Compute opc for IMSI 208930100001111
[2021-03-01 10:00:02] The freeDiameter engine has been started
[2021-03-01 10:00:09] 'STATE_WAITCEA' -> 'STATE_OPEN' 'mme.openairinterface.org'
";

const MME_RUN: &str = "\
000123 Initializing shared logging
000140 Diameter identity of MME: mme.openairinterface.org
000188 Peer hss.openairinterface.org is now connected...
000201 Received SCTP_INIT_MSG
";

#[test]
fn test_healthy_deployment() {
    let (_dir, ws) = temp_workspace();
    write_archive(&ws, "hss_check_run.log", HSS_RUN);
    write_archive(&ws, "mme_check_run.log", MME_RUN);

    let verdict = verify_deployment(&ws, "OAI-HSS", "128").unwrap();

    assert!(verdict.passed());
    assert_eq!(verdict.hss.nf, NetworkFunction::Hss);
    assert_eq!(verdict.hss.check_run.opc_generations(), 1);
    assert_eq!(verdict.messages(), vec!["Sanity Check Deployment is OK"]);
}

#[test]
fn test_each_missing_marker_fails() {
    for (log, marker) in [
        (MME_RUN, "Diameter identity of MME"),
        (MME_RUN, "Peer hss"),
        (MME_RUN, "Received SCTP_INIT_MSG"),
    ] {
        let (_dir, ws) = temp_workspace();
        write_archive(&ws, "hss_check_run.log", HSS_RUN);
        let trimmed: String = log.lines().filter(|l| !l.contains(marker)).map(|l| format!("{}\n", l)).collect();
        write_archive(&ws, "mme_check_run.log", &trimmed);

        let verdict = verify_deployment(&ws, "OAI-HSS", "128").unwrap();
        assert!(!verdict.passed(), "passed without {}", marker);
        assert!(verdict.hss.passed);
    }
}

#[test]
fn test_both_failing() {
    let (_dir, ws) = temp_workspace();

    let verdict = verify_deployment(&ws, "OAI-HSS", "128").unwrap();

    assert_eq!(
        verdict.messages(),
        vec![
            "HSS did not deploy properly",
            "MME did not deploy properly",
            "Sanity Check Deployment went wrong",
        ]
    );
}

#[test]
fn test_verdict_serializes() {
    let (_dir, ws) = temp_workspace();
    write_archive(&ws, "hss_check_run.log", HSS_RUN);

    let verdict = verify_deployment(&ws, "OAI-HSS", "128").unwrap();
    let json = serde_json::to_value(&verdict).unwrap();

    assert_eq!(json["job_id"], "128");
    assert_eq!(json["hss"]["passed"], true);
    assert_eq!(json["mme"]["log_found"], false);
}

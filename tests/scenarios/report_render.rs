//! Test: HTML report rendering from a populated workspace

use crate::helpers::*;
use oai_ci::report::REPORT_FILE;
use oai_ci::{HtmlReport, ReportError};

fn pull_request() -> HtmlReport {
    HtmlReport {
        job_name: "OAI-HSS".to_string(),
        job_id: "128".to_string(),
        job_url: "https://jenkins.example.org/job/OAI-HSS/128".to_string(),
        git_url: "https://github.com/OPENAIRINTERFACE/openair-hss.git".to_string(),
        git_src_branch: "fix-s6a".to_string(),
        git_src_commit: "0123abcd".to_string(),
        pull_request: true,
        git_target_branch: "develop".to_string(),
        git_target_commit: "4567ef01".to_string(),
        ..HtmlReport::default()
    }
}

fn green(body: &str) -> String {
    format!("background-color:LimeGreen\"><b>{}", body)
}

#[test]
fn test_full_report() {
    let (_dir, ws) = temp_workspace();
    std::fs::write(ws.source("oai_rules_result.txt"), "NB_FILES_FAILING_CHECK=0\nNB_FILES_CHECKED=12\n").unwrap();
    write_archive(&ws, "cppcheck_build.log", "Checking src/hss.cpp ...\n");
    write_archive(
        &ws,
        "cppcheck.xml",
        concat!(
            "<results version=\"2\">\n",
            "<error id=\"nullPointer\" severity=\"error\" msg=\"Possible null pointer dereference\"/>\n",
            "<error id=\"shadowVariable\" severity=\"error\" msg=\"Local variable shadows\"/>\n",
            "<error id=\"unusedVariable\" severity=\"warning\" msg=\"Unused variable\"/>\n",
            "</results>\n",
        ),
    );
    write_archive(
        &ws,
        "cassandra_status.log",
        "Datacenter: DC1\nUN  192.168.28.2  120 KB  256  100.0%  RAC1\nCASSANDRA START: OK\n",
    );
    write_archive(
        &ws,
        "hss_config.log",
        "Subscription-Data inserted\nSubscription-Data inserted\nmme-isdn\nmme-isdn\nCertificate is to be certified\nOAI-HSS CONFIG: OK\n",
    );
    write_archive(
        &ws,
        "hss_check_run.log",
        "Compute opc\nThe freeDiameter engine has been started\nSTATE_OPEN mme.openairinterface.org\n",
    );
    write_archive(&ws, "mme_config.log", "OAI-MME CONFIG: KO\n");

    let path = pull_request().generate(&ws).unwrap();
    assert_eq!(path, ws.file(REPORT_FILE));
    let html = std::fs::read_to_string(path).unwrap();

    assert!(html.contains("<title>OAI Core Network Test Results for OAI-HSS job build #128</title>"));
    assert!(html.contains(
        "All modified files in Pull-Request follow OAI rules. <span class=\"glyphicon glyphicon-ok-circle\"></span> -> (12 were checked)"
    ));
    assert!(html.contains("<h2>Static Code Analysis</h2>"));
    assert!(html.contains("CPPCHECK found 2 errors and 1 warnings"));
    assert!(html.contains(&green("OK: ci-cassandra:\n -- started successfully\n -- service status is OK")));
    assert!(html.contains(" -- 2 users were provisioned\n -- 1 mme instance(s) were provisioned\n -- certificates were generated"));
    assert!(html.contains("  -- 1 OPC were re-generated\n"));
    assert!(html.contains("KO: ci-oai-mme:\n -- did not start properly?\n"));
    assert!(html.contains("KO: logfile (mme_check_run.log) not found"));
    assert!(html.contains("KO: logfile (hss_podman_image_build.log) not found"));
}

#[test]
fn test_formatting_failures_listed() {
    let (_dir, ws) = temp_workspace();
    std::fs::write(ws.source("oai_rules_result.txt"), "NB_FILES_FAILING_CHECK=2\nNB_FILES_CHECKED=40\n").unwrap();
    std::fs::write(ws.source("oai_rules_result_list.txt"), "hss_rel14/src/hss.cpp\nhss_rel14/src/s6as6d.cpp\n").unwrap();

    let report = HtmlReport { pull_request: false, ..pull_request() };
    let html = report.render(&ws).unwrap();

    assert!(html.contains(
        "2 files in repository DO NOT follow OAI rules. <span class=\"glyphicon glyphicon-warning-sign\"></span> -> (40 were checked)"
    ));
    assert!(html.contains("hss_rel14/src/s6as6d.cpp"));
    assert!(html.contains("More details on formatting check"));
}

#[test]
fn test_summary_spliced_into_epc_reports() {
    let (_dir, ws) = temp_workspace();
    std::fs::write(
        ws.file("test_results_oai_epc.html"),
        "<html>\n<h2>Deployment Summary</h2>\n</html>\n",
    )
    .unwrap();

    pull_request().generate(&ws).unwrap();

    let epc = std::fs::read_to_string(ws.file("test_results_oai_epc.html")).unwrap();
    let summary = epc.find("Build Trigger").unwrap();
    let marker = epc.find("Deployment Summary").unwrap();
    assert!(summary < marker);
    assert!(!ws.file("test_results_oai_epc_new.html").exists());
    assert!(!ws.file("test_results_magma_epc_rhel8.html").exists());
}

#[test]
fn test_missing_parameters_write_nothing() {
    let (_dir, ws) = temp_workspace();
    let report = HtmlReport { job_id: String::new(), ..pull_request() };

    assert!(matches!(report.generate(&ws), Err(ReportError::MissingJob)));
    assert!(!ws.file(REPORT_FILE).exists());
}

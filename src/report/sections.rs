//! Report sections, in document order

use crate::analysis::formatting::failing_files;
use crate::analysis::sca::{CATEGORIES, OTHERS};
use crate::analysis::{
    analyze_check_run, analyze_container_start, analyze_cppcheck, analyze_image_build,
    parse_formatting_result, ImageBuildAnalysis, Status,
};
use crate::core::workspace::read_log;
use crate::core::{BuildVariant, NetworkFunction, Workspace};
use crate::report::html::{Alert, Color, HtmlWriter};
use crate::report::{HtmlReport, ReportError};
use tracing::debug;

const BOOTSTRAP_CSS: &str = "https://maxcdn.bootstrapcdn.com/bootstrap/3.3.7/css/bootstrap.min.css";
const JQUERY_JS: &str = "https://ajax.googleapis.com/ajax/libs/jquery/3.3.1/jquery.min.js";
const BOOTSTRAP_JS: &str = "https://maxcdn.bootstrapcdn.com/bootstrap/3.3.7/js/bootstrap.min.js";
const OAI_SITE: &str = "http://www.openairinterface.org/";
const OAI_LOGO: &str = "http://www.openairinterface.org/wp-content/uploads/2016/03/cropped-oai_final_logo2.png";

/// Column order of the sanity check table
const SANITY_COLUMNS: [NetworkFunction; 3] =
    [NetworkFunction::Mme, NetworkFunction::Hss, NetworkFunction::Cassandra];

pub(crate) fn header(report: &HtmlReport, html: &mut HtmlWriter) {
    html.line("<!DOCTYPE html>")
        .line("<html class=\"no-js\" lang=\"en-US\">")
        .line("<head>")
        .line("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">")
        .line(format!("  <link rel=\"stylesheet\" href=\"{}\">", BOOTSTRAP_CSS))
        .line(format!("  <script src=\"{}\"></script>", JQUERY_JS))
        .line(format!("  <script src=\"{}\"></script>", BOOTSTRAP_JS))
        .line(format!(
            "  <title>OAI Core Network Test Results for {} job build #{}</title>",
            report.job_name, report.job_id
        ))
        .line("</head>")
        .line("<body><div class=\"container\">");

    html.line("  <table width = \"100%\" style=\"border-collapse: collapse; border: none;\">")
        .line("\t<tr style=\"border-collapse: collapse; border: none;\">")
        .line("\t  <td style=\"border-collapse: collapse; border: none;\">")
        .line(format!("\t\t<a href=\"{}\">", OAI_SITE))
        .line(format!(
            "\t\t   <img src=\"{}\" alt=\"\" border=\"none\" height=50 width=150>",
            OAI_LOGO
        ))
        .line("\t\t   </img>")
        .line("\t\t</a>")
        .line("\t  </td>")
        .line("\t  <td style=\"border-collapse: collapse; border: none; vertical-align: center;\">")
        .line(format!(
            "\t\t<b><font size = \"6\">Job Summary -- Job: {} -- Build-ID: <a href=\"{}\">{}</a></font></b>",
            report.job_name, report.job_url, report.job_id
        ))
        .line("\t  </td>")
        .line("\t</tr>")
        .line("  </table>")
        .br();
}

fn summary_row(html: &mut HtmlWriter, glyph: &str, label: &str, value: &str) {
    html.line("\t <tr>")
        .line(format!(
            "\t   <td bgcolor=\"lightcyan\" > <span class=\"glyphicon glyphicon-{}\"></span> {}</td>",
            glyph, label
        ))
        .line(format!("\t   <td>{}</td>", value))
        .line("\t </tr>");
}

/// Build information table; also spliced into the EPC reports
pub(crate) fn build_summary(report: &HtmlReport) -> String {
    let mut html = HtmlWriter::new();
    html.line("  <table class=\"table-bordered\" width = \"80%\" align = \"center\" border = \"1\">");
    summary_row(&mut html, "time", "Build Start Time", &report.job_start_time);
    let trigger = if report.pull_request { "Pull Request" } else { "Push Event" };
    summary_row(&mut html, "wrench", "Build Trigger", trigger);
    summary_row(
        &mut html,
        "cloud-upload",
        "GIT Repository",
        &format!("<a href=\"{0}\">{0}</a>", report.git_url),
    );

    if report.pull_request {
        summary_row(
            &mut html,
            "link",
            "Pull Request Link",
            "<a href=\"TEMPLATE_PULL_REQUEST_LINK\">TEMPLATE_PULL_REQUEST_LINK</a>",
        );
        summary_row(&mut html, "header", "Pull Request Title", "TEMPLATE_PULL_REQUEST_TEMPLATE");
        summary_row(&mut html, "log-out", "Source Branch", &report.git_src_branch);
        summary_row(&mut html, "tag", "Source Commit ID", &report.git_src_commit);
        if let Some(msg) = &report.git_src_commit_msg {
            summary_row(&mut html, "comment", "Source Commit Message", msg);
        }
        summary_row(&mut html, "log-in", "Target Branch", &report.git_target_branch);
        summary_row(&mut html, "tag", "Target Commit ID", &report.git_target_commit);
    } else {
        summary_row(&mut html, "tree-deciduous", "Branch", &report.git_src_branch);
        summary_row(&mut html, "tag", "Commit ID", &report.git_src_commit);
        if let Some(msg) = &report.git_src_commit_msg {
            summary_row(&mut html, "comment", "Commit Message", msg);
        }
    }

    html.table_end();
    html.finish()
}

pub(crate) fn formatting(
    report: &HtmlReport,
    workspace: &Workspace,
    html: &mut HtmlWriter,
) -> Result<(), ReportError> {
    html.heading("OAI Coding / Formatting Guidelines Check");

    let Some(text) = read_log(&workspace.source("oai_rules_result.txt"))? else {
        html.alert(Alert::Danger, "Was NOT performed (with CLANG-FORMAT tool).");
        html.br();
        return Ok(());
    };

    let check = match parse_formatting_result(&text) {
        Ok(check) => check,
        Err(e) => {
            html.alert(Alert::Danger, &format!("Formatting check result is malformed: {}", e));
            html.br();
            return Ok(());
        }
    };

    let scope = if report.pull_request { "modified files in Pull-Request" } else { "files in repository" };
    let checked = format!(" -> ({} were checked)", check.checked);
    if check.passed() {
        let all = if report.pull_request { "All modified files in Pull-Request" } else { "All files in repository" };
        html.alert_with_trailer(Alert::Success, &format!("{} follow OAI rules.", all), &checked);
    } else {
        html.alert_with_trailer(
            Alert::Warning,
            &format!("{} {} DO NOT follow OAI rules.", check.failing, scope),
            &checked,
        );

        if let Some(list) = read_log(&workspace.source("oai_rules_result_list.txt"))? {
            html.collapse_start("oai-formatting-details", "More details on formatting check")
                .line("  <p>Please apply the following command to this(ese) file(s): </p>")
                .line("  <p style=\"margin-left: 30px\"><strong><code>cd src && clang-format -i filename(s)</code></strong></p>")
                .line("  <table class=\"table-bordered\" width = \"60%\" align = \"center\" border = 1>")
                .line("    <tr><th bgcolor = \"lightcyan\" >Filename</th></tr>");
            for file in failing_files(&list) {
                html.line(format!("    <tr><td>{}</td></tr>", file));
            }
            html.line("  </table>").collapse_end();
        }
    }

    html.br();
    Ok(())
}

pub(crate) fn static_analysis(workspace: &Workspace, html: &mut HtmlWriter) -> Result<(), ReportError> {
    if workspace.archive("cppcheck_build.log").is_file() {
        html.heading("Static Code Analysis");
    }

    let Some(xml) = workspace.read_archive("cppcheck.xml")? else {
        html.alert(Alert::Danger, "Was NOT performed (with CPPCHECK tool).");
        return Ok(());
    };

    let summary = analyze_cppcheck(&xml);
    debug!("cppcheck: {} errors, {} warnings", summary.errors, summary.warnings);

    if summary.is_clean() {
        html.alert(Alert::Success, "CPPCHECK found NO error and NO warning");
        return Ok(());
    }
    if summary.errors == 0 {
        html.alert(Alert::Warning, &format!("CPPCHECK found NO error and {} warnings", summary.warnings));
    } else {
        html.alert(
            Alert::Danger,
            &format!("CPPCHECK found {} errors and {} warnings", summary.errors, summary.warnings),
        );
    }

    html.collapse_start("oai-cppcheck-details", "More details on CPPCHECK results").br();
    html.table_start("80%", &["Error / Warning Type", "Nb Errors", "Nb Warnings"]);
    for (id, label) in CATEGORIES {
        html.line("\t  <tr>")
            .line(format!("\t\t<td>{}</td>", label))
            .line(format!("\t\t<td>{}</td>", summary.category(id)))
            .line("\t\t<td>N/A</td>")
            .line("\t  </tr>");
    }
    html.line("\t  <tr>")
        .line("\t\t<td>Others</td>")
        .line(format!("\t\t<td>{}</td>", summary.category(OTHERS)))
        .line(format!("\t\t<td>{}</td>", summary.warnings))
        .line("\t  </tr>");
    html.line("\t  <tr bgcolor = \"#33CCFF\" >")
        .line("\t\t<th>Total</th>")
        .line(format!("\t\t<th>{}</th>", summary.errors))
        .line(format!("\t\t<th>{}</th>", summary.warnings))
        .line("\t  </tr>");
    html.table_end()
        .line("   <p>Full details in artifact (cppcheck.xml) </p>")
        .line("   <p style=\"margin-left: 30px\">Graphical Interface tool : <strong><code>cppcheck-gui -l cppcheck.xml</code></strong></p>")
        .br()
        .collapse_end();
    Ok(())
}

fn ok_ko(ok: bool) -> &'static str {
    if ok {
        "OK"
    } else {
        "KO"
    }
}

/// One row of the image build table: a label, the image kind, one cell per variant
fn build_row<F>(
    html: &mut HtmlWriter,
    label: &str,
    kind: &str,
    builds: &[(BuildVariant, Option<ImageBuildAnalysis>)],
    cell: F,
) where
    F: Fn(&ImageBuildAnalysis) -> (Status, String),
{
    html.line("\t <tr>").row_label(label, None);
    build_cells(html, kind, builds, cell);
    html.line("\t </tr>");
}

fn build_cells<F>(
    html: &mut HtmlWriter,
    kind: &str,
    builds: &[(BuildVariant, Option<ImageBuildAnalysis>)],
    cell: F,
) where
    F: Fn(&ImageBuildAnalysis) -> (Status, String),
{
    html.td(kind);
    for (variant, analysis) in builds {
        match analysis {
            Some(analysis) => {
                let (status, body) = cell(analysis);
                html.cell(status.into(), &body);
            }
            None => {
                html.cell(Color::Tomato, &format!("KO: logfile ({}) not found", variant.build_log()));
            }
        }
    }
}

pub(crate) fn image_build(
    report: &HtmlReport,
    workspace: &Workspace,
    html: &mut HtmlWriter,
) -> Result<(), ReportError> {
    let mut builds = Vec::with_capacity(BuildVariant::ALL.len());
    for variant in BuildVariant::ALL {
        let analysis = workspace
            .read_archive(&variant.build_log())?
            .map(|log| analyze_image_build(&log, variant, report.pull_request));
        builds.push((variant, analysis));
    }

    html.heading("Docker / Podman Image Build Summary");
    html.table_start(
        "100%",
        &[
            "Stage Name",
            "Image Kind",
            "OAI HSS <font color=\"Gold\">Ubuntu18</font> Image",
            "OAI HSS <font color=\"Gold\">RHEL8</font> Image",
        ],
    );

    build_row(html, "Initial Git Setup", "Builder Image", &builds, |a| {
        if a.git_setup {
            (Status::Ok, "OK:\n -- All Git Operations went successfully".to_string())
        } else {
            (Status::Failed, "KO::\n -- Some Git Operations went WRONG".to_string())
        }
    });

    build_row(html, "SW libs and packages Installation", "Builder Image", &builds, |a| {
        let i = &a.install;
        let body = format!(
            "{}:\n -- build_hss_rel14 --check-installed-software --force\n   ** Packages Installation: {}\n   ** FreeDiameter Installation: {}\n   ** C-Ares Installation: {}\n   ** Cassandra Driver Installation: {}\n   ** Pistache Installation: {}\n",
            ok_ko(i.succeeded),
            ok_ko(i.packages),
            ok_ko(i.free_diameter),
            ok_ko(i.c_ares),
            ok_ko(i.cassandra_driver),
            ok_ko(i.pistache),
        );
        (Status::from_ok(i.succeeded), body)
    });

    html.line("\t <tr>").row_label("cNF Compile / Build", Some(2));
    build_cells(html, "Builder Image", &builds, |a| {
        (
            Status::from_ok(a.build),
            format!("{}:\n -- build_hss_rel14 --clean --build-type Release", ok_ko(a.build)),
        )
    });
    html.line("\t </tr>").line("\t <tr>");
    build_cells(html, "Builder Image", &builds, |a| {
        let mut body = String::new();
        if a.compile.errors > 0 {
            body.push_str(&format!("{} errors found in compile log\n", a.compile.errors));
        }
        body.push_str(&format!("{} warnings found in compile log", a.compile.warnings));
        (a.compile.status(), body)
    });
    html.line("\t </tr>");

    build_row(html, "SW libs Installation / Copy from Builder", "Target Image", &builds, |a| {
        (Status::from_ok(a.copy_from_builder), format!("{}:\n", ok_ko(a.copy_from_builder)))
    });

    build_row(html, "Copy Template Conf / Tools from Builder", "Target Image", &builds, |a| {
        (Status::from_ok(a.copy_templates), format!("{}:\n", ok_ko(a.copy_templates)))
    });

    build_row(html, "Image Size", "Target Image", &builds, |a| match &a.image_size {
        Some(size) => (Status::Ok, format!("OK:  {}\n", size)),
        None => (Status::Failed, "KO:\n".to_string()),
    });

    html.table_end();
    Ok(())
}

fn container_start_cell(workspace: &Workspace, nf: NetworkFunction, html: &mut HtmlWriter) -> Result<(), ReportError> {
    let log_name = nf.config_log();
    let Some(log) = workspace.read_archive(&log_name)? else {
        html.cell(Color::Tomato, &format!("KO: logfile ({}) not found", log_name));
        return Ok(());
    };

    let start = analyze_container_start(nf, &log);
    let container = nf.container();

    if nf == NetworkFunction::Cassandra {
        let (color, body) = if start.config_ok && start.rack_listed() {
            (Color::LimeGreen, format!("OK: {}:\n -- started successfully\n -- service status is OK", container))
        } else if !start.rack_listed() {
            (Color::Orange, format!("KO: {}:\n -- started successfully\n -- service status is missing?", container))
        } else {
            (Color::Tomato, format!("KO: {}:\n -- did not start properly?", container))
        };
        html.cell(color, &body);
        return Ok(());
    }

    let mut body = if start.config_ok {
        format!("OK: {}:\n -- started successfully\n", container)
    } else {
        format!("KO: {}:\n -- did not start properly?\n", container)
    };
    if nf == NetworkFunction::Hss {
        body.push_str(&format!(" -- {} users were provisioned\n", start.users()));
        body.push_str(&format!(" -- {} mme instance(s) were provisioned\n", start.mme_instances()));
    }
    if start.certificates_generated() {
        body.push_str(" -- certificates were generated");
    } else {
        body.push_str(" -- certificates were NOT generated");
    }
    html.cell(Status::from_ok(start.config_ok).into(), &body);
    Ok(())
}

fn check_run_cell(workspace: &Workspace, nf: NetworkFunction, html: &mut HtmlWriter) -> Result<(), ReportError> {
    if nf == NetworkFunction::Cassandra {
        html.cell(Color::LightGray, "N/A");
        return Ok(());
    }

    let log_name = nf.check_run_log();
    let Some(log) = workspace.read_archive(&log_name)? else {
        html.cell(Color::Tomato, &format!("KO: logfile ({}) not found", log_name));
        return Ok(());
    };

    let run = analyze_check_run(&log);
    let passed = run.passed(nf);
    let mut body = format!("{}:\n", ok_ko(passed));
    if nf == NetworkFunction::Hss {
        body.push_str(&format!("  -- {} OPC were re-generated\n", run.opc_generations()));
    }
    if run.free_diameter_up() {
        body.push_str("  -- Free Diameter engine is UP\n");
    } else {
        body.push_str("  -- Free Diameter engine is DOWN?\n");
    }
    if nf == NetworkFunction::Hss {
        body.push_str(&format!("  -- Connection w/ MME is {}\n", ok_ko(run.connected_to_mme())));
    } else {
        body.push_str(&format!("  -- Connection w/ HSS is {}\n", ok_ko(run.connected_to_hss())));
        body.push_str(if run.sctp_ok() { "  -- SCTP is OK\n" } else { "  -- SCTP is KO?\n" });
    }
    html.cell(Status::from_ok(passed).into(), &body);
    Ok(())
}

pub(crate) fn sanity_check(workspace: &Workspace, html: &mut HtmlWriter) -> Result<(), ReportError> {
    html.heading("Ubuntu18 Sanity Check Deployment Summary");
    html.table_start("100%", &["Stage Name", "OAI MME cNF", "OAI HSS cNF", "Cassandra"]);

    html.line("\t <tr>").row_label("Starting/Configuring Docker Containers", None);
    for nf in SANITY_COLUMNS {
        container_start_cell(workspace, nf, html)?;
    }
    html.line("\t </tr>");

    html.line("\t <tr>").row_label("cNF Check Start / Stop", None);
    for nf in SANITY_COLUMNS {
        check_run_cell(workspace, nf, html)?;
    }
    html.line("\t </tr>");

    html.table_end();
    Ok(())
}

pub(crate) fn test_summary(html: &mut HtmlWriter) {
    html.heading("Test Summary");
    html.alert(Alert::Warning, "Not performed yet.");
    html.br();
}

pub(crate) fn footer(html: &mut HtmlWriter) {
    html.line(format!(
        "  <div class=\"well well-lg\">End of Build Report -- Copyright <span class=\"glyphicon glyphicon-copyright-mark\"></span> 2020 <a href=\"{}\">OpenAirInterface</a>. All Rights Reserved.</div>",
        OAI_SITE
    ))
    .line("</div></body>")
    .line("</html>");
}

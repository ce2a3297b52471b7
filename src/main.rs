use anyhow::{Context, Result};
use oai_ci::cli::commands::{DeployCommand, GenerateConfigCommand, ReportCommand, VerifyCommand};
use oai_ci::cli::output::*;
use oai_ci::cli::{print_subcommand_help, Cli, Command};
use oai_ci::{
    verify_deployment, CiConfig, DeployAction, DockerCli, HtmlReport, Kind, ReportError, SanityDeployer,
    Workspace,
};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    let workspace = Workspace::new(&cli.workspace);

    match &cli.command {
        Command::GenerateConfig(cmd) => generate_config(cmd, &workspace)?,
        Command::Report(cmd) => generate_report(cmd, &workspace)?,
        Command::Deploy(cmd) => deploy(cmd, &cli, workspace).await?,
        Command::Verify(cmd) => verify(cmd, &workspace)?,
    }

    Ok(())
}

/// Print a usage error for the current subcommand and exit
fn usage_error(subcommand: &str, message: impl std::fmt::Display) -> ! {
    println!("{} {}", CROSS, style(message).red());
    print_subcommand_help(subcommand);
    std::process::exit(1);
}

fn generate_config(cmd: &GenerateConfigCommand, workspace: &Workspace) -> Result<()> {
    let kind = Kind::parse(cmd.kind.as_deref()).unwrap_or_else(|e| usage_error("generate-config", e));

    let generated = match kind {
        Kind::Hss => cmd.hss_config().generate(),
        Kind::Mme => cmd.mme_config().generate(),
    };
    let file = generated.unwrap_or_else(|e| usage_error("generate-config", e));

    let path = file
        .write_to(workspace)
        .with_context(|| format!("Failed to write {}", file.file_name))?;
    println!("{} Generated {}", CHECK, style(path.display()).bold());
    Ok(())
}

fn generate_report(cmd: &ReportCommand, workspace: &Workspace) -> Result<()> {
    let report: HtmlReport = cmd.to_report();

    match report.generate(workspace) {
        Ok(path) => {
            println!("{} Report written to {}", CHECK, style(path.display()).bold());
            Ok(())
        }
        Err(e @ ReportError::Io(_)) => Err(e).context("Failed to generate report"),
        Err(e) => usage_error("report", e),
    }
}

async fn deploy(cmd: &DeployCommand, cli: &Cli, workspace: Workspace) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => CiConfig::from_file(path).context("Failed to load CI config")?,
        None => CiConfig::default(),
    };
    if cmd.max_polls.is_some() {
        config.polling.max_attempts = cmd.max_polls;
    }

    let action = DeployAction::from(cmd.action);
    let label = format!("{:?}", action);
    println!("{} {}", ROCKET, style(&label).bold());

    let runtime = DockerCli::from_config(&config.runtime);
    let deployer = SanityDeployer::new(runtime, config, workspace).with_tag(cmd.tag.clone());

    let spinner = (action == DeployAction::DeployCassandra)
        .then(|| create_spinner("Waiting for the Cassandra node and schema"));
    let result = deployer.execute(action).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match result {
        Ok(()) => {
            println!("{}", format_action(&label, true));
            Ok(())
        }
        Err(e) => {
            println!("{}", format_action(&label, false));
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn verify(cmd: &VerifyCommand, workspace: &Workspace) -> Result<()> {
    let job_name = cmd.job_name.as_deref().unwrap_or_default();
    let job_id = cmd.job_id.as_deref().unwrap_or_default();

    let verdict = match verify_deployment(workspace, job_name, job_id) {
        Ok(verdict) => verdict,
        Err(e @ oai_ci::VerifyError::MissingJob) => usage_error("verify", e),
        Err(e) => return Err(e).context("Failed to read check-run logs"),
    };

    println!("{}", format_nf_verdict(&verdict.hss));
    println!("{}", format_nf_verdict(&verdict.mme));
    for message in verdict.messages() {
        let icon = if verdict.passed() { INFO } else { WARN };
        println!("{} {}", icon, message);
    }

    if cmd.json {
        println!("\n{}", serde_json::to_string_pretty(&verdict)?);
    }

    if !verdict.passed() {
        std::process::exit(1);
    }
    Ok(())
}

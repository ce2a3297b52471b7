//! Command-line interface

pub mod commands;
pub mod output;

use clap::{CommandFactory, Parser, Subcommand};
use commands::{DeployCommand, GenerateConfigCommand, ReportCommand, VerifyCommand};
use std::ffi::OsString;

/// CI helpers for the OAI HSS/MME pipeline
#[derive(Debug, Parser, Clone)]
#[command(name = "oai-ci")]
#[command(version = "0.1.0")]
#[command(about = "CI helpers for the OAI HSS/MME pipeline", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the CI topology configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Directory holding archives/, src/ and the generated files
    #[arg(short, long, global = true, default_value = ".")]
    pub workspace: String,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Generate the HSS or MME configuration script
    GenerateConfig(GenerateConfigCommand),

    /// Render the HTML build report
    Report(ReportCommand),

    /// Run one sanity check deployment action
    Deploy(DeployCommand),

    /// Verify the sanity check deployment
    Verify(VerifyCommand),
}

impl Command {
    /// Subcommand name as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Command::GenerateConfig(_) => "generate-config",
            Command::Report(_) => "report",
            Command::Deploy(_) => "deploy",
            Command::Verify(_) => "verify",
        }
    }
}

/// Lowercase the name part of `--flag` / `--flag=value` arguments.
///
/// Pipelines pass flags such as `--mme_s1c_IP=..` or `--LTEK=..`; values keep
/// their case.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut options_ended = false;
    args.into_iter()
        .map(|arg| {
            let arg: OsString = arg.into();
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if options_ended || !text.starts_with("--") {
                return arg;
            }
            if text == "--" {
                options_ended = true;
                return arg;
            }
            match text.split_once('=') {
                Some((name, value)) => format!("{}={}", name.to_lowercase(), value).into(),
                None => text.to_lowercase().into(),
            }
        })
        .collect()
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(normalize_args(itr))
    }
}

/// Print the usage of one subcommand
pub fn print_subcommand_help(name: &str) {
    let mut command = Cli::command();
    if let Some(sub) = command.find_subcommand_mut(name) {
        let _ = sub.print_help();
    }
}

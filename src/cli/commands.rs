//! CLI command definitions

use crate::configgen::{HssConfig, MmeConfig};
use crate::core::NetworkFunction;
use crate::deploy::DeployAction;
use crate::report::{parse_pull_request_flag, HtmlReport};
use clap::Args;
use std::net::IpAddr;

/// Generate the HSS or MME configuration script
#[derive(Debug, Args, Clone, Default)]
pub struct GenerateConfigCommand {
    /// HSS or MME
    #[arg(long)]
    pub kind: Option<String>,

    /// Use the paths of the image Dockerfile layout
    #[arg(long = "from_docker_file")]
    pub from_docker_file: bool,

    /// Generate an env list read by the image entrypoint
    #[arg(long = "env_for_entrypoint")]
    pub env_for_entrypoint: bool,

    /// Cassandra server IP address (HSS)
    #[arg(long)]
    pub cassandra: Option<IpAddr>,

    /// HSS S6A IP address
    #[arg(long = "hss_s6a")]
    pub hss_s6a: Option<IpAddr>,

    /// First APN, must contain a dot (HSS)
    #[arg(long)]
    pub apn1: Option<String>,

    /// Second APN (HSS)
    #[arg(long)]
    pub apn2: Option<String>,

    /// LTE key, 32 characters (HSS)
    #[arg(long)]
    pub ltek: Option<String>,

    /// OP key, 32 characters (HSS)
    #[arg(long)]
    pub op: Option<String>,

    /// First provisioned IMSI (HSS)
    #[arg(long)]
    pub imsi: Option<String>,

    /// Diameter realm
    #[arg(long)]
    pub realm: Option<String>,

    /// Number of provisioned users (HSS)
    #[arg(long)]
    pub users: Option<String>,

    /// Number of MMEs to provision (HSS)
    #[arg(long = "nb_mmes")]
    pub nb_mmes: Option<u32>,

    /// MME S6A IP address
    #[arg(long = "mme_s6a")]
    pub mme_s6a: Option<IpAddr>,

    #[arg(long = "mme_s1c_ip")]
    pub mme_s1c_ip: Option<IpAddr>,

    #[arg(long = "mme_s1c_name")]
    pub mme_s1c_name: Option<String>,

    #[arg(long = "mme_s10_ip")]
    pub mme_s10_ip: Option<IpAddr>,

    #[arg(long = "mme_s10_name")]
    pub mme_s10_name: Option<String>,

    #[arg(long = "mme_s11_ip")]
    pub mme_s11_ip: Option<IpAddr>,

    #[arg(long = "mme_s11_name")]
    pub mme_s11_name: Option<String>,

    /// S11 address of the SPGW-C the MME talks to
    #[arg(long = "spgwc0_s11_ip")]
    pub spgwc0_s11_ip: Option<IpAddr>,

    #[arg(long = "mme_gid")]
    pub mme_gid: Option<String>,

    #[arg(long = "mme_code")]
    pub mme_code: Option<String>,

    #[arg(long)]
    pub mcc: Option<String>,

    #[arg(long)]
    pub mnc: Option<String>,

    /// Whitespace separated TACs
    #[arg(long = "tac_list")]
    pub tac_list: Option<String>,
}

impl GenerateConfigCommand {
    pub fn hss_config(&self) -> HssConfig {
        let defaults = HssConfig::default();
        HssConfig {
            cassandra: self.cassandra,
            hss_s6a: self.hss_s6a,
            from_docker_file: self.from_docker_file,
            env_for_entrypoint: self.env_for_entrypoint,
            apn1: self.apn1.clone().unwrap_or(defaults.apn1),
            apn2: self.apn2.clone().unwrap_or(defaults.apn2),
            ltek: self.ltek.clone().unwrap_or(defaults.ltek),
            op: self.op.clone().unwrap_or(defaults.op),
            imsi: self.imsi.clone().unwrap_or(defaults.imsi),
            realm: self.realm.clone().unwrap_or(defaults.realm),
            users: self.users.clone().unwrap_or(defaults.users),
            nb_mmes: self.nb_mmes.unwrap_or(defaults.nb_mmes),
        }
    }

    pub fn mme_config(&self) -> MmeConfig {
        let defaults = MmeConfig::default();
        MmeConfig {
            hss_s6a: self.hss_s6a,
            mme_s6a: self.mme_s6a,
            mme_s1c_ip: self.mme_s1c_ip,
            mme_s1c_name: self.mme_s1c_name.clone().unwrap_or(defaults.mme_s1c_name),
            mme_s10_ip: self.mme_s10_ip,
            mme_s10_name: self.mme_s10_name.clone().unwrap_or(defaults.mme_s10_name),
            mme_s11_ip: self.mme_s11_ip,
            mme_s11_name: self.mme_s11_name.clone().unwrap_or(defaults.mme_s11_name),
            spgwc0_s11_ip: self.spgwc0_s11_ip,
            mme_gid: self.mme_gid.clone().unwrap_or(defaults.mme_gid),
            mme_code: self.mme_code.clone().unwrap_or(defaults.mme_code),
            mcc: self.mcc.clone().unwrap_or(defaults.mcc),
            mnc: self.mnc.clone().unwrap_or(defaults.mnc),
            tac_list: self.tac_list.clone().unwrap_or(defaults.tac_list),
            realm: self.realm.clone().unwrap_or(defaults.realm),
            from_docker_file: self.from_docker_file,
            env_for_entrypoint: self.env_for_entrypoint,
        }
    }
}

/// Render the HTML build report
#[derive(Debug, Args, Clone, Default)]
pub struct ReportCommand {
    #[arg(long = "job_name")]
    pub job_name: Option<String>,

    #[arg(long = "job_id")]
    pub job_id: Option<String>,

    #[arg(long = "job_url")]
    pub job_url: Option<String>,

    #[arg(long = "git_url")]
    pub git_url: Option<String>,

    #[arg(long = "git_src_branch")]
    pub git_src_branch: Option<String>,

    #[arg(long = "git_src_commit")]
    pub git_src_commit: Option<String>,

    #[arg(long = "git_src_commit_msg")]
    pub git_src_commit_msg: Option<String>,

    /// `true` when the job was triggered by a merge request
    #[arg(long = "git_pull_request")]
    pub git_pull_request: Option<String>,

    #[arg(long = "git_target_branch")]
    pub git_target_branch: Option<String>,

    #[arg(long = "git_target_commit")]
    pub git_target_commit: Option<String>,
}

impl ReportCommand {
    pub fn to_report(&self) -> HtmlReport {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        HtmlReport {
            job_name: text(&self.job_name),
            job_id: text(&self.job_id),
            job_url: text(&self.job_url),
            git_url: text(&self.git_url),
            git_src_branch: text(&self.git_src_branch),
            git_src_commit: text(&self.git_src_commit),
            git_src_commit_msg: self.git_src_commit_msg.clone().filter(|m| !m.is_empty()),
            pull_request: self.git_pull_request.as_deref().is_some_and(parse_pull_request_flag),
            git_target_branch: text(&self.git_target_branch),
            git_target_commit: text(&self.git_target_commit),
            ..HtmlReport::default()
        }
    }
}

/// Run one sanity check deployment action
#[derive(Debug, Args, Clone)]
pub struct DeployCommand {
    /// Deployment action
    #[arg(long, value_enum, ignore_case = true)]
    pub action: ActionArg,

    /// Image tag of the OAI-HSS / OAI-MME image
    #[arg(long)]
    pub tag: Option<String>,

    /// Give up readiness polling after this many attempts
    #[arg(long = "max-polls")]
    pub max_polls: Option<u32>,
}

/// Deployment action argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ActionArg {
    #[value(name = "CreateNetworks")]
    CreateNetworks,
    #[value(name = "RemoveNetworks")]
    RemoveNetworks,
    #[value(name = "DeployCassandra")]
    DeployCassandra,
    #[value(name = "DeployHSS")]
    DeployHss,
    #[value(name = "DeployMME")]
    DeployMme,
    #[value(name = "StartHSS")]
    StartHss,
    #[value(name = "StartMME")]
    StartMme,
    #[value(name = "StopHSS")]
    StopHss,
    #[value(name = "StopMME")]
    StopMme,
    #[value(name = "RetrieveLogsHSS")]
    RetrieveLogsHss,
    #[value(name = "RetrieveLogsMME")]
    RetrieveLogsMme,
    #[value(name = "RemoveAllContainers")]
    RemoveAllContainers,
}

impl From<ActionArg> for DeployAction {
    fn from(arg: ActionArg) -> Self {
        use NetworkFunction::{Hss, Mme};
        match arg {
            ActionArg::CreateNetworks => DeployAction::CreateNetworks,
            ActionArg::RemoveNetworks => DeployAction::RemoveNetworks,
            ActionArg::DeployCassandra => DeployAction::DeployCassandra,
            ActionArg::DeployHss => DeployAction::Deploy(Hss),
            ActionArg::DeployMme => DeployAction::Deploy(Mme),
            ActionArg::StartHss => DeployAction::Start(Hss),
            ActionArg::StartMme => DeployAction::Start(Mme),
            ActionArg::StopHss => DeployAction::Stop(Hss),
            ActionArg::StopMme => DeployAction::Stop(Mme),
            ActionArg::RetrieveLogsHss => DeployAction::RetrieveLogs(Hss),
            ActionArg::RetrieveLogsMme => DeployAction::RetrieveLogs(Mme),
            ActionArg::RemoveAllContainers => DeployAction::RemoveAllContainers,
        }
    }
}

/// Verify the sanity check deployment from the archived logs
#[derive(Debug, Args, Clone, Default)]
pub struct VerifyCommand {
    #[arg(long = "job_name")]
    pub job_name: Option<String>,

    #[arg(long = "job_id")]
    pub job_id: Option<String>,

    /// Also print the verdict as JSON
    #[arg(long)]
    pub json: bool,
}

//! Sanity check deployment orchestration
//!
//! Brings up the CI networks, a Cassandra node, and the HSS and MME
//! containers, one action per invocation. The pipeline calls the actions in
//! sequence and archives the logs for the report and the verifier.

pub mod logs;
pub mod poll;

pub use poll::{poll_until, Poll};

use crate::configgen::{ConfigError, HssConfig, MmeConfig};
use crate::core::{CiConfig, NetworkFunction, Workspace};
use crate::runtime::{CommandOutput, ContainerRuntime, Presence, RuntimeError};
use std::net::IpAddr;
use thiserror::Error;
use tracing::{debug, info, warn};

const CASSANDRA_IMAGE: &str = "cassandra:2.1";
const CASSANDRA_SCHEMA: &str = "hss_rel14/db/oai_db.cql";

/// Error types for deployment actions
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("Missing OAI-{0} image tag")]
    MissingTag(NetworkFunction),

    #[error("image {0} not found")]
    ImageNotFound(String),

    #[error("`{command}` failed with exit code {code:?}: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("container runtime unreachable: {0}")]
    RuntimeUnreachable(String),

    #[error("{what} not ready after {attempts} attempts")]
    PollExhausted { what: &'static str, attempts: u32 },

    #[error("{0:?} is not supported for Cassandra")]
    Unsupported(DeployAction),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("config generation failed: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One step of the sanity check deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployAction {
    CreateNetworks,
    RemoveNetworks,
    DeployCassandra,
    Deploy(NetworkFunction),
    Start(NetworkFunction),
    Stop(NetworkFunction),
    RetrieveLogs(NetworkFunction),
    RemoveAllContainers,
}

impl DeployAction {
    /// Network function whose image tag the action needs
    pub fn image_of(&self) -> Option<NetworkFunction> {
        match self {
            DeployAction::Deploy(nf)
            | DeployAction::Start(nf)
            | DeployAction::Stop(nf)
            | DeployAction::RetrieveLogs(nf)
                if *nf != NetworkFunction::Cassandra =>
            {
                Some(*nf)
            }
            _ => None,
        }
    }
}

fn args<I, S>(parts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    parts.into_iter().map(Into::into).collect()
}

/// `exec <container> /bin/bash -c <script>`
fn exec_bash(container: &str, script: &str) -> Vec<String> {
    args(["exec", container, "/bin/bash", "-c", script])
}

/// Image name of an OAI network function
fn image_name(nf: NetworkFunction, tag: &str) -> String {
    format!("oai-{}:{}", nf.lower(), tag)
}

/// Runs deployment actions against a container runtime
pub struct SanityDeployer<R> {
    runtime: R,
    config: CiConfig,
    workspace: Workspace,
    tag: Option<String>,
}

impl<R: ContainerRuntime> SanityDeployer<R> {
    pub fn new(runtime: R, config: CiConfig, workspace: Workspace) -> Self {
        Self { runtime, config, workspace, tag: None }
    }

    /// Image tag used by the HSS and MME actions
    pub fn with_tag(mut self, tag: Option<String>) -> Self {
        self.tag = tag.filter(|t| !t.is_empty());
        self
    }

    /// Run one action
    pub async fn execute(&self, action: DeployAction) -> Result<(), DeployError> {
        info!("Deploy action: {:?}", action);
        if let Some(nf) = action.image_of() {
            if self.tag.is_none() {
                return Err(DeployError::MissingTag(nf));
            }
        }

        match action {
            DeployAction::CreateNetworks => self.create_networks().await,
            DeployAction::RemoveNetworks => self.remove_networks().await,
            DeployAction::DeployCassandra | DeployAction::Deploy(NetworkFunction::Cassandra) => {
                self.deploy_cassandra().await
            }
            DeployAction::Start(NetworkFunction::Cassandra)
            | DeployAction::Stop(NetworkFunction::Cassandra)
            | DeployAction::RetrieveLogs(NetworkFunction::Cassandra) => Err(DeployError::Unsupported(action)),
            DeployAction::Deploy(nf) => self.deploy_nf(nf).await,
            DeployAction::Start(nf) => self.start_nf(nf).await,
            DeployAction::Stop(nf) => self.stop_nf(nf).await,
            DeployAction::RetrieveLogs(nf) => self.retrieve_logs(nf).await,
            DeployAction::RemoveAllContainers => self.remove_all_containers().await,
        }
    }

    /// Run a command, echoing it first
    async fn run(&self, args: Vec<String>) -> Result<CommandOutput, DeployError> {
        info!("{} {}", self.runtime.binary(), args.join(" "));
        Ok(self.runtime.run(&args).await?)
    }

    /// Run a command that must succeed
    async fn run_checked(&self, args: Vec<String>) -> Result<CommandOutput, DeployError> {
        let command = format!("{} {}", self.runtime.binary(), args.join(" "));
        let output = self.run(args).await?;
        if !output.success() {
            return Err(DeployError::CommandFailed {
                command,
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output)
    }

    /// Run a cleanup command; failures are only logged
    async fn run_best_effort(&self, args: Vec<String>) -> Result<(), DeployError> {
        let output = self.run(args).await?;
        if !output.success() {
            warn!("Cleanup command failed: {}", output.stderr.trim());
        }
        Ok(())
    }

    async fn presence(&self, args: Vec<String>) -> Presence {
        match self.runtime.run(&args).await {
            Ok(output) => Presence::from_inspect(&output),
            Err(e) => Presence::Unreachable(e.to_string()),
        }
    }

    /// Whether any of the objects exists. Unreachable runtimes are an error.
    async fn any_exists(&self, kind: &str, names: &[&str]) -> Result<bool, DeployError> {
        let mut found = false;
        for &name in names {
            match self.presence(args([kind, "inspect", name])).await {
                Presence::Exists => {
                    debug!("{} {} exists", kind, name);
                    found = true;
                }
                Presence::Absent => debug!("{} {} absent", kind, name),
                Presence::Unreachable(reason) => return Err(DeployError::RuntimeUnreachable(reason)),
            }
        }
        Ok(found)
    }

    async fn create_networks(&self) -> Result<(), DeployError> {
        let networks = self.config.networks.all();
        let names: Vec<&str> = networks.iter().map(|n| n.name.as_str()).collect();
        if self.any_exists("network", &names).await? {
            self.remove_networks().await?;
        }

        for network in networks {
            let subnet = network.subnet.trunc().to_string();
            self.run_checked(args([
                "network",
                "create",
                "--attachable",
                "--subnet",
                &subnet,
                "--ip-range",
                &subnet,
                &network.name,
            ]))
            .await?;
        }
        Ok(())
    }

    async fn remove_networks(&self) -> Result<(), DeployError> {
        let n = &self.config.networks;
        self.run_best_effort(args([
            "network", "rm", &n.dbn.name, &n.s6a.name, &n.s10.name, &n.s11.name, &n.s1c.name,
        ]))
        .await
    }

    async fn remove_all_containers(&self) -> Result<(), DeployError> {
        self.run_best_effort(args([
            "rm",
            "-f",
            NetworkFunction::Cassandra.container(),
            NetworkFunction::Hss.container(),
            NetworkFunction::Mme.container(),
        ]))
        .await
    }

    /// Runtime errors while probing count as "not ready yet"
    async fn node_status_ready(&self, marker: &str) -> Result<Poll<()>, DeployError> {
        match self
            .runtime
            .run(&exec_bash(NetworkFunction::Cassandra.container(), "nodetool status"))
            .await
        {
            Ok(output) if output.success() && output.stdout.contains(marker) => Ok(Poll::Ready(())),
            Ok(_) => Ok(Poll::Pending),
            Err(e) => {
                warn!("nodetool status failed: {}", e);
                Ok(Poll::Pending)
            }
        }
    }

    async fn schema_loaded(&self, script: &str) -> Result<Poll<()>, DeployError> {
        match self
            .runtime
            .run(&exec_bash(NetworkFunction::Cassandra.container(), script))
            .await
        {
            Ok(output) if output.success() => Ok(Poll::Ready(())),
            Ok(_) => Ok(Poll::Pending),
            Err(e) => {
                warn!("schema load failed: {}", e);
                Ok(Poll::Pending)
            }
        }
    }

    async fn deploy_cassandra(&self) -> Result<(), DeployError> {
        let cassandra = NetworkFunction::Cassandra.container();
        if self.any_exists("container", &[cassandra]).await? {
            self.remove_all_containers().await?;
        }

        let ip = self.config.addresses.cassandra.to_string();
        self.run_checked(args([
            "run",
            "--name",
            cassandra,
            "--network",
            &self.config.networks.dbn.name,
            "--ip",
            &ip,
            "-d",
            "-e",
            "CASSANDRA_CLUSTER_NAME=OAI HSS Cluster",
            "-e",
            "CASSANDRA_ENDPOINT_SNITCH=GossipingPropertyFileSnitch",
            CASSANDRA_IMAGE,
        ]))
        .await?;

        let polling = &self.config.polling;
        let marker = format!("UN  {}", ip);
        poll_until("cassandra node", polling.status_interval(), polling.max_attempts, || {
            self.node_status_ready(&marker)
        })
        .await?;

        let status = self.run_checked(exec_bash(cassandra, "nodetool status")).await?;
        info!("{}", status.stdout.trim_end());
        self.workspace.ensure_archives()?;
        let mut status_log = status.stdout;
        status_log.push_str("CASSANDRA START: OK\n");
        std::fs::write(self.workspace.archive(&NetworkFunction::Cassandra.config_log()), status_log)?;

        let schema = self.workspace.source(CASSANDRA_SCHEMA);
        self.run_checked(args(["cp".to_string(), schema.display().to_string(), format!("{}:/home", cassandra)]))
            .await?;

        let load = format!("cqlsh --file /home/oai_db.cql {}", ip);
        poll_until("cassandra schema", polling.schema_interval(), polling.max_attempts, || {
            self.schema_loaded(&load)
        })
        .await?;
        info!("{} {}", self.runtime.binary(), exec_bash(cassandra, &load).join(" "));
        Ok(())
    }

    /// Inspect the NF image; returns whether it carries an entrypoint script
    async fn image_has_entrypoint(&self, nf: NetworkFunction) -> Result<bool, DeployError> {
        let tag = self.tag.as_deref().ok_or(DeployError::MissingTag(nf))?;
        let image = image_name(nf, tag);
        let output = self.runtime.run(&args(["image", "inspect", &image])).await?;
        match Presence::from_inspect(&output) {
            Presence::Exists => Ok(output.stdout.contains("entrypoint")),
            Presence::Absent => Err(DeployError::ImageNotFound(image)),
            Presence::Unreachable(reason) => Err(DeployError::RuntimeUnreachable(reason)),
        }
    }

    fn hss_config(&self, env_for_entrypoint: bool) -> HssConfig {
        let a = &self.config.addresses;
        HssConfig {
            cassandra: Some(IpAddr::V4(a.cassandra)),
            hss_s6a: Some(IpAddr::V4(a.hss_s6a)),
            from_docker_file: true,
            env_for_entrypoint,
            ..HssConfig::default()
        }
    }

    fn mme_config(&self, env_for_entrypoint: bool) -> MmeConfig {
        let a = &self.config.addresses;
        MmeConfig {
            hss_s6a: Some(IpAddr::V4(a.hss_s6a)),
            mme_s6a: Some(IpAddr::V4(a.mme_s6a)),
            mme_s1c_ip: Some(IpAddr::V4(a.mme_s1c)),
            mme_s1c_name: "eth3".to_string(),
            mme_s10_ip: Some(IpAddr::V4(a.mme_s10)),
            mme_s10_name: "eth2".to_string(),
            mme_s11_ip: Some(IpAddr::V4(a.mme_s11)),
            mme_s11_name: "eth1".to_string(),
            spgwc0_s11_ip: Some(IpAddr::V4(a.dummy_spgwc)),
            from_docker_file: true,
            env_for_entrypoint,
            ..MmeConfig::default()
        }
    }

    /// Generated configuration file for the NF, written to the workspace
    fn write_nf_config(&self, nf: NetworkFunction, env_for_entrypoint: bool) -> Result<String, DeployError> {
        let file = match nf {
            NetworkFunction::Mme => self.mme_config(env_for_entrypoint).generate()?,
            _ => self.hss_config(env_for_entrypoint).generate()?,
        };
        let path = file.write_to(&self.workspace)?;
        Ok(path.display().to_string())
    }

    /// Primary network and address, then the extra attachments
    fn attachments(&self, nf: NetworkFunction) -> Vec<(String, String)> {
        let n = &self.config.networks;
        let a = &self.config.addresses;
        match nf {
            NetworkFunction::Mme => vec![
                (n.s6a.name.clone(), a.mme_s6a.to_string()),
                (n.s11.name.clone(), a.mme_s11.to_string()),
                (n.s10.name.clone(), a.mme_s10.to_string()),
                (n.s1c.name.clone(), a.mme_s1c.to_string()),
            ],
            _ => vec![
                (n.dbn.name.clone(), a.hss_dbn.to_string()),
                (n.s6a.name.clone(), a.hss_s6a.to_string()),
            ],
        }
    }

    async fn connect_networks(&self, container: &str, extra: &[(String, String)]) -> Result<(), DeployError> {
        for (network, ip) in extra {
            self.run_checked(args(["network", "connect", "--ip", ip, network, container])).await?;
        }
        Ok(())
    }

    async fn deploy_nf(&self, nf: NetworkFunction) -> Result<(), DeployError> {
        let entrypoint = self.image_has_entrypoint(nf).await?;
        let image = image_name(nf, self.tag.as_deref().unwrap_or_default());
        let container = nf.container();
        let attachments = self.attachments(nf);
        let ((network, ip), extra) = match attachments.split_first() {
            Some((first, rest)) => (first.clone(), rest),
            None => return Ok(()),
        };
        self.workspace.ensure_archives()?;
        let config_log = self.workspace.archive(&nf.config_log());

        if entrypoint {
            let env_file = self.write_nf_config(nf, true)?;
            self.run_checked(args([
                "create", "--privileged", "--name", container, "--network", &network, "--ip", &ip,
                "--env-file", &env_file, &image,
            ]))
            .await?;
            self.connect_networks(container, extra).await?;
            self.run_checked(args(["start", container])).await?;

            tokio::time::sleep(self.config.polling.log_settle()).await;
            let output = self.run(args(["logs", container])).await?;
            if let Some(marker) = logs::run_phase_marker(nf) {
                let (config, _) = logs::split_logs(&output.combined(), marker);
                std::fs::write(&config_log, config)?;
            }
        } else {
            self.run_checked(args([
                "run", "--privileged", "--name", container, "--network", &network, "--ip", &ip, "-d",
                &image, "/bin/bash", "-c", "sleep infinity",
            ]))
            .await?;
            self.connect_networks(container, extra).await?;

            let script = self.write_nf_config(nf, false)?;
            let scripts_dir = format!("{}:/openair-{}/scripts", container, nf.lower());
            self.run_checked(args(["cp".to_string(), script, scripts_dir])).await?;

            let file_name = format!("{}-cfg.sh", nf.lower());
            let output = self
                .run(exec_bash(
                    container,
                    &format!(
                        "cd /openair-{}/scripts && chmod 777 {f} && ./{f}",
                        nf.lower(),
                        f = file_name
                    ),
                ))
                .await?;
            let verdict = if output.success() { "OK" } else { "KO" };
            if !output.success() {
                warn!("{} configuration exited with {:?}", nf, output.code);
            }
            let mut log = output.stdout;
            log.push_str(&format!("OAI-{} CONFIG: {}\n", nf.upper(), verdict));
            std::fs::write(&config_log, log)?;
        }

        info!("Configuration log archived to {}", config_log.display());
        Ok(())
    }

    async fn start_nf(&self, nf: NetworkFunction) -> Result<(), DeployError> {
        if self.image_has_entrypoint(nf).await? {
            info!("there is an entrypoint -- no need");
            return Ok(());
        }

        let command = match nf {
            NetworkFunction::Mme => "nohup ./bin/oai_mme -c ./etc/mme.conf > mme_check_run.log 2>&1",
            _ => "nohup ./bin/oai_hss -j ./etc/hss_rel14.json --reloadkey true > hss_check_run.log 2>&1",
        };
        self.run_checked(args(["exec", "-d", nf.container(), "/bin/bash", "-c", command])).await?;
        Ok(())
    }

    async fn stop_nf(&self, nf: NetworkFunction) -> Result<(), DeployError> {
        if self.image_has_entrypoint(nf).await? {
            info!("there is an entrypoint -- no need");
            return Ok(());
        }

        let command = format!("killall oai_{}", nf.lower());
        self.run_best_effort(exec_bash(nf.container(), &command)).await
    }

    async fn retrieve_logs(&self, nf: NetworkFunction) -> Result<(), DeployError> {
        let entrypoint = self.image_has_entrypoint(nf).await?;
        self.workspace.ensure_archives()?;

        if entrypoint {
            tokio::time::sleep(self.config.polling.retrieve_settle()).await;
            let output = self.run(args(["logs", nf.container()])).await?;
            if let Some(marker) = logs::run_phase_marker(nf) {
                let (_, run) = logs::split_logs(&output.combined(), marker);
                std::fs::write(self.workspace.archive(&nf.check_run_log()), run)?;
            }
        } else {
            let source = format!("{}:/openair-{}/{}", nf.container(), nf.lower(), nf.check_run_log());
            self.run_checked(args(["cp".to_string(), source, self.workspace.archives().display().to_string()]))
                .await?;
        }

        info!("{} retrieved", nf.check_run_log());
        Ok(())
    }
}

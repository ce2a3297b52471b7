//! CI topology configuration from YAML
//!
//! Every field defaults to the topology the sanity-check stage has always
//! used, so running without a config file reproduces the fixed layout.

use anyhow::Result;
use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::path::Path;
use std::time::Duration;

/// Top-level CI configuration loaded from YAML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CiConfig {
    /// Container networks created for the deployment
    #[serde(default)]
    pub networks: Networks,

    /// Static addresses assigned to the containers
    #[serde(default)]
    pub addresses: Addresses,

    /// Readiness polling behaviour
    #[serde(default)]
    pub polling: PollingConfig,

    /// Container runtime settings
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// A named network with its subnet in CIDR notation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub name: String,
    pub subnet: Ipv4Net,
}

impl NetworkSpec {
    fn new(name: &str, base: Ipv4Addr, prefix: u8) -> Self {
        Self {
            name: name.to_string(),
            // Prefix lengths of the built-in topology are all <= 32
            subnet: Ipv4Net::new(base, prefix).unwrap_or_default(),
        }
    }
}

/// The five networks of the sanity-check deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Networks {
    /// Database network (Cassandra <-> HSS)
    #[serde(default = "default_dbn")]
    pub dbn: NetworkSpec,
    #[serde(default = "default_s11")]
    pub s11: NetworkSpec,
    #[serde(default = "default_s6a")]
    pub s6a: NetworkSpec,
    #[serde(default = "default_s10")]
    pub s10: NetworkSpec,
    #[serde(default = "default_s1c")]
    pub s1c: NetworkSpec,
}

fn default_dbn() -> NetworkSpec {
    NetworkSpec::new("ci-dbn", Ipv4Addr::new(192, 168, 28, 0), 26)
}

fn default_s11() -> NetworkSpec {
    NetworkSpec::new("ci-s11", Ipv4Addr::new(192, 168, 28, 128), 26)
}

fn default_s6a() -> NetworkSpec {
    NetworkSpec::new("ci-s6a", Ipv4Addr::new(192, 168, 31, 0), 24)
}

fn default_s10() -> NetworkSpec {
    NetworkSpec::new("ci-s10", Ipv4Addr::new(192, 168, 32, 0), 24)
}

fn default_s1c() -> NetworkSpec {
    NetworkSpec::new("ci-s1c", Ipv4Addr::new(192, 168, 33, 0), 24)
}

impl Default for Networks {
    fn default() -> Self {
        Self {
            dbn: default_dbn(),
            s11: default_s11(),
            s6a: default_s6a(),
            s10: default_s10(),
            s1c: default_s1c(),
        }
    }
}

impl Networks {
    /// All networks in creation order
    pub fn all(&self) -> [&NetworkSpec; 5] {
        [&self.dbn, &self.s11, &self.s6a, &self.s10, &self.s1c]
    }
}

/// Container addresses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Addresses {
    pub cassandra: Ipv4Addr,
    pub hss_dbn: Ipv4Addr,
    pub hss_s6a: Ipv4Addr,
    pub mme_s6a: Ipv4Addr,
    pub mme_s11: Ipv4Addr,
    pub mme_s10: Ipv4Addr,
    pub mme_s1c: Ipv4Addr,
    /// Placeholder SPGW-C the MME is pointed at on S11
    pub dummy_spgwc: Ipv4Addr,
}

impl Default for Addresses {
    fn default() -> Self {
        Self {
            cassandra: Ipv4Addr::new(192, 168, 28, 2),
            hss_dbn: Ipv4Addr::new(192, 168, 28, 3),
            hss_s6a: Ipv4Addr::new(192, 168, 31, 2),
            mme_s6a: Ipv4Addr::new(192, 168, 31, 3),
            mme_s11: Ipv4Addr::new(192, 168, 28, 130),
            mme_s10: Ipv4Addr::new(192, 168, 32, 2),
            mme_s1c: Ipv4Addr::new(192, 168, 33, 2),
            dummy_spgwc: Ipv4Addr::new(192, 168, 28, 131),
        }
    }
}

/// Readiness polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Delay between node status checks
    pub status_interval_ms: u64,

    /// Delay between schema load attempts
    pub schema_interval_ms: u64,

    /// Upper bound on attempts; unbounded when absent
    pub max_attempts: Option<u32>,

    /// Wait before reading the log of a freshly started entrypoint container
    pub log_settle_ms: u64,

    /// Wait before collecting the run log of an entrypoint container
    pub retrieve_settle_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            status_interval_ms: 1000,
            schema_interval_ms: 2000,
            max_attempts: None,
            log_settle_ms: 3000,
            retrieve_settle_ms: 1000,
        }
    }
}

impl PollingConfig {
    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.status_interval_ms)
    }

    pub fn schema_interval(&self) -> Duration {
        Duration::from_millis(self.schema_interval_ms)
    }

    pub fn log_settle(&self) -> Duration {
        Duration::from_millis(self.log_settle_ms)
    }

    pub fn retrieve_settle(&self) -> Duration {
        Duration::from_millis(self.retrieve_settle_ms)
    }
}

/// Container runtime CLI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Runtime executable
    pub binary: String,

    /// Timeout for a single runtime command, in seconds
    pub timeout_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            binary: "docker".to_string(),
            timeout_secs: 600,
        }
    }
}

impl CiConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: CiConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let mut seen_names = std::collections::HashSet::new();
        for network in self.networks.all() {
            if !seen_names.insert(&network.name) {
                anyhow::bail!("Duplicate network name: {}", network.name);
            }
        }

        // Each address must sit in the network the container is attached to
        let n = &self.networks;
        let a = &self.addresses;
        let placements = [
            ("cassandra", a.cassandra, &n.dbn),
            ("hss_dbn", a.hss_dbn, &n.dbn),
            ("hss_s6a", a.hss_s6a, &n.s6a),
            ("mme_s6a", a.mme_s6a, &n.s6a),
            ("mme_s11", a.mme_s11, &n.s11),
            ("mme_s10", a.mme_s10, &n.s10),
            ("mme_s1c", a.mme_s1c, &n.s1c),
            ("dummy_spgwc", a.dummy_spgwc, &n.s11),
        ];
        for (field, addr, network) in placements {
            if !network.subnet.contains(&addr) {
                anyhow::bail!(
                    "Address '{}' ({}) is outside network '{}' ({})",
                    field,
                    addr,
                    network.name,
                    network.subnet
                );
            }
        }

        if self.polling.status_interval_ms == 0 || self.polling.schema_interval_ms == 0 {
            anyhow::bail!("Polling intervals must be greater than zero");
        }
        if self.polling.max_attempts == Some(0) {
            anyhow::bail!("polling.max_attempts must be at least 1 when set");
        }
        if self.runtime.binary.trim().is_empty() {
            anyhow::bail!("runtime.binary must not be empty");
        }

        Ok(())
    }
}

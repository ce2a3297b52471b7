//! HSS configuration script / entrypoint env list

use crate::configgen::{require_address, ConfigError, GeneratedFile, ScriptBuilder};
use std::net::IpAddr;

/// Fields of the HSS configurer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HssConfig {
    /// Cassandra server the provisioning tools talk to
    pub cassandra: Option<IpAddr>,
    /// Address the HSS listens on for S6A
    pub hss_s6a: Option<IpAddr>,
    /// Paths follow the layout of the image Dockerfile
    pub from_docker_file: bool,
    /// Emit `hss-env.list` instead of `hss-cfg.sh`
    pub env_for_entrypoint: bool,
    pub apn1: String,
    pub apn2: String,
    pub ltek: String,
    pub op: String,
    pub imsi: String,
    pub realm: String,
    pub users: String,
    pub nb_mmes: u32,
}

impl Default for HssConfig {
    fn default() -> Self {
        Self {
            cassandra: None,
            hss_s6a: None,
            from_docker_file: false,
            env_for_entrypoint: false,
            apn1: "apn.oai.svc.cluster.local".to_string(),
            apn2: "internet".to_string(),
            ltek: "8baf473f2f8fd09487cccbd7097c6862".to_string(),
            op: "11111111111111111111111111111111".to_string(),
            imsi: "311480100001101".to_string(),
            realm: "openairinterface.org".to_string(),
            users: "10".to_string(),
            nb_mmes: 1,
        }
    }
}

/// Addresses resolved by validation
struct HssAddresses {
    cassandra: IpAddr,
    s6a: IpAddr,
}

impl HssConfig {
    fn validate(&self) -> Result<HssAddresses, ConfigError> {
        if !self.apn1.contains('.') {
            return Err(ConfigError::Apn1WithoutDot);
        }
        let cassandra = require_address(self.cassandra, "Cassandra")?;
        let s6a = require_address(self.hss_s6a, "HSS S6A")?;
        if self.ltek.chars().count() != 32 {
            return Err(ConfigError::LteKeyLength);
        }
        if self.op.chars().count() != 32 {
            return Err(ConfigError::OpKeyLength);
        }
        Ok(HssAddresses { cassandra, s6a })
    }

    /// Validate and render the output file
    pub fn generate(&self) -> Result<GeneratedFile, ConfigError> {
        let addresses = self.validate()?;
        if self.env_for_entrypoint {
            Ok(GeneratedFile {
                file_name: "hss-env.list",
                contents: self.render_env_list(&addresses),
                executable: false,
            })
        } else {
            Ok(GeneratedFile {
                file_name: "hss-cfg.sh",
                contents: self.render_script(&addresses),
                executable: true,
            })
        }
    }

    fn render_script(&self, addresses: &HssAddresses) -> String {
        let docker = self.from_docker_file;
        let mut s = ScriptBuilder::bash();

        s.line(if docker { "cd /openair-hss/scripts" } else { "cd /home/scripts" });
        s.blank();
        s.assign("Cassandra_Server_IP", addresses.cassandra);
        s.assign("PREFIX", if docker { "/openair-hss/etc" } else { "/usr/local/etc/oai" });
        s.assign("MY_REALM", &self.realm)
            .assign("MY_APN1", &self.apn1)
            .assign("MY_APN2", &self.apn2)
            .assign("MY_LTE_K", &self.ltek)
            .assign("MY_OP_K", &self.op)
            .assign("MY_IMSI", &self.imsi)
            .assign("MY_USERS", &self.users);
        s.blank();

        if docker {
            s.line("mkdir -p /openair-hss/logs");
        } else {
            s.line("rm -Rf $PREFIX").blank().lines([
                "mkdir -p $PREFIX",
                "mkdir $PREFIX/freeDiameter",
                "mkdir $PREFIX/logs",
                "mkdir -p logs",
            ]);
        }
        s.blank();

        s.line("# provision users");
        s.line("./data_provisioning_users --apn $MY_APN1 --apn2 $MY_APN2 --key $MY_LTE_K --imsi-first $MY_IMSI --msisdn-first 00000001 --mme-identity mme.$MY_REALM --no-of-users $MY_USERS --realm $MY_REALM --truncate True --verbose True --cassandra-cluster $Cassandra_Server_IP");
        s.line("# provision mme");
        s.line("./data_provisioning_mme --id 3 --mme-identity mme.$MY_REALM --realm $MY_REALM --ue-reachability 1 --truncate True  --verbose True -C $Cassandra_Server_IP");
        for i in 1..self.nb_mmes {
            s.line(format!(
                "./data_provisioning_mme --id {} --mme-identity mme{}.$MY_REALM --realm $MY_REALM --ue-reachability 1 --truncate False  --verbose True -C $Cassandra_Server_IP",
                i + 3,
                i
            ));
        }
        s.blank();

        if !docker {
            s.lines([
                "cp ../etc/acl.conf ../etc/hss_rel14_fd.conf $PREFIX/freeDiameter",
                "cp ../etc/hss_rel14.conf ../etc/hss_rel14.json $PREFIX",
                "cp ../etc/oss.json $PREFIX",
            ]);
        }
        s.blank();

        s.line("declare -A HSS_CONF");
        s.conf("HSS_CONF", "PREFIX", "$PREFIX")
            .conf("HSS_CONF", "REALM", "$MY_REALM")
            .conf("HSS_CONF", "HSS_FQDN", "\"hss.${HSS_CONF[@REALM@]}\"")
            .conf("HSS_CONF", "HSS_HOSTNAME", "\"hss\"")
            .conf("HSS_CONF", "cassandra_Server_IP", "$Cassandra_Server_IP")
            .conf("HSS_CONF", "OP_KEY", "$MY_OP_K")
            .conf_quoted("HSS_CONF", "ROAMING_ALLOWED", "true");
        s.line("for K in \"${!HSS_CONF[@]}\"; do\tegrep -lRZ \"$K\" $PREFIX | xargs -0 -l sed -i -e \"s|$K|${HSS_CONF[$K]}|g\"; done");

        let fd_conf = if docker {
            "$PREFIX/hss_rel14_fd.conf"
        } else {
            "$PREFIX/freeDiameter/hss_rel14_fd.conf"
        };
        s.line(format!(
            "sed -i -e 's/#ListenOn.*$/ListenOn = \"{}\";/g' {}",
            addresses.s6a, fd_conf
        ));
        s.line("./make_certs.sh hss ${HSS_CONF[@REALM@]} $PREFIX");

        s.finish()
    }

    fn render_env_list(&self, addresses: &HssAddresses) -> String {
        let mut s = ScriptBuilder::new();
        s.line("# Environment Variables used by the OAI-HSS Entrypoint Script")
            .env("REALM", &self.realm)
            .env("HSS_FQDN", format!("hss.{}", self.realm))
            .env("PREFIX", "/openair-hss/etc")
            .env("cassandra_Server_IP", addresses.cassandra)
            .env("OP_KEY", &self.op)
            .env("LTE_K", &self.ltek)
            .env("APN1", &self.apn1)
            .env("APN2", &self.apn2)
            .env("FIRST_IMSI", &self.imsi)
            .env("NB_USERS", &self.users);
        s.finish()
    }
}

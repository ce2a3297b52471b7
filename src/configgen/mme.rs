//! MME configuration script / entrypoint env list

use crate::configgen::{require_address, require_name, ConfigError, GeneratedFile, ScriptBuilder};
use std::net::IpAddr;
use tracing::warn;

/// Loopback alias used for S10 when it would collide with S11
const S10_LOOPBACK_NAME: &str = "lo:s10";
const S10_LOOPBACK_ADDR: &str = "127.0.0.10";

/// Test TAC announced for the SGW test entry
const TAC_SGW_TEST: u16 = 7;

/// Fields of the MME configurer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MmeConfig {
    pub hss_s6a: Option<IpAddr>,
    pub mme_s6a: Option<IpAddr>,
    pub mme_s1c_ip: Option<IpAddr>,
    pub mme_s1c_name: String,
    pub mme_s10_ip: Option<IpAddr>,
    pub mme_s10_name: String,
    pub mme_s11_ip: Option<IpAddr>,
    pub mme_s11_name: String,
    pub spgwc0_s11_ip: Option<IpAddr>,
    pub mme_gid: String,
    pub mme_code: String,
    pub mcc: String,
    pub mnc: String,
    /// Whitespace separated TACs
    pub tac_list: String,
    pub realm: String,
    pub from_docker_file: bool,
    pub env_for_entrypoint: bool,
}

impl Default for MmeConfig {
    fn default() -> Self {
        Self {
            hss_s6a: None,
            mme_s6a: None,
            mme_s1c_ip: None,
            mme_s1c_name: String::new(),
            mme_s10_ip: None,
            mme_s10_name: String::new(),
            mme_s11_ip: None,
            mme_s11_name: String::new(),
            spgwc0_s11_ip: None,
            mme_gid: "32768".to_string(),
            mme_code: "3".to_string(),
            mcc: "208".to_string(),
            mnc: "93".to_string(),
            tac_list: "600 601 602".to_string(),
            realm: "openairinterface.org".to_string(),
            from_docker_file: false,
            env_for_entrypoint: false,
        }
    }
}

/// Values resolved by validation
struct MmeResolved {
    hss_s6a: IpAddr,
    mme_s6a: IpAddr,
    s1c: IpAddr,
    s10: IpAddr,
    s11: IpAddr,
    spgwc0: IpAddr,
    tacs: [u16; 3],
    mnc: u32,
}

/// Parse the TAC list, padding to three entries by incrementing the last one
///
/// A TAC is 16 bits wide: values above 65535, or padding that would run
/// past it, are rejected.
pub fn expand_tacs(tac_list: &str) -> Result<[u16; 3], ConfigError> {
    let invalid = || ConfigError::InvalidTacList(tac_list.to_string());
    let mut tacs = tac_list
        .split_whitespace()
        .map(|t| t.parse::<u16>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut last = *tacs.last().ok_or_else(invalid)?;
    while tacs.len() < 3 {
        last = last.checked_add(1).ok_or_else(invalid)?;
        tacs.push(last);
    }

    Ok([tacs[0], tacs[1], tacs[2]])
}

impl MmeConfig {
    fn validate(&self) -> Result<MmeResolved, ConfigError> {
        let mme_s6a = require_address(self.mme_s6a, "MME S6A")?;
        let hss_s6a = require_address(self.hss_s6a, "HSS S6A")?;
        let s1c = require_address(self.mme_s1c_ip, "MME S1-C")?;
        require_name(&self.mme_s1c_name, "MME S1-C")?;
        let s10 = require_address(self.mme_s10_ip, "MME S10")?;
        require_name(&self.mme_s10_name, "MME S10")?;
        let s11 = require_address(self.mme_s11_ip, "MME S11")?;
        require_name(&self.mme_s11_name, "MME S11")?;
        let spgwc0 = require_address(self.spgwc0_s11_ip, "SPGW-C0")?;
        let tacs = expand_tacs(&self.tac_list)?;
        let mnc = self
            .mnc
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidMnc(self.mnc.clone()))?;

        Ok(MmeResolved { hss_s6a, mme_s6a, s1c, s10, s11, spgwc0, tacs, mnc })
    }

    /// S10 and S11 cannot share interface and address: they use the same port
    fn s10_needs_loopback(&self, r: &MmeResolved) -> bool {
        self.mme_s10_name == self.mme_s11_name && r.s10 == r.s11
    }

    /// Validate and render the output file
    pub fn generate(&self) -> Result<GeneratedFile, ConfigError> {
        let resolved = self.validate()?;
        if self.env_for_entrypoint {
            Ok(GeneratedFile {
                file_name: "mme-env.list",
                contents: self.render_env_list(&resolved),
                executable: false,
            })
        } else {
            Ok(GeneratedFile {
                file_name: "mme-cfg.sh",
                contents: self.render_script(&resolved),
                executable: true,
            })
        }
    }

    fn render_script(&self, r: &MmeResolved) -> String {
        let docker = self.from_docker_file;
        let mut s = ScriptBuilder::bash();
        s.line(if docker { "cd /openair-mme/scripts" } else { "cd /home/scripts" });

        let loopback_s10 = self.s10_needs_loopback(r);
        if loopback_s10 {
            warn!("S11 and S10 share interface {} and address {}; using {} for S10", self.mme_s11_name, r.s11, S10_LOOPBACK_NAME);
            s.blank().lines([
                "# Using the same interface name and the same IP address for S11 and S10 is not allowed.",
                "# Starting a virtual interface on loopback for S10",
            ]);
            s.line(format!("ifconfig {} {} up", S10_LOOPBACK_NAME, S10_LOOPBACK_ADDR));
            s.line(format!("echo \"ifconfig {} {} up --> OK\"", S10_LOOPBACK_NAME, S10_LOOPBACK_ADDR));
        }

        s.blank();
        s.line("INSTANCE=1");
        s.assign("PREFIX", if docker { "/openair-mme/etc" } else { "/usr/local/etc/oai" });
        s.assign("MY_REALM", &self.realm);
        s.blank();
        if !docker {
            s.line("rm -Rf $PREFIX").blank();
            s.lines(["mkdir -p $PREFIX", "mkdir $PREFIX/freeDiameter"]).blank();
            s.lines([
                "cp ../etc/mme_fd.sprint.conf $PREFIX/freeDiameter/mme_fd.conf",
                "cp ../etc/mme.conf  $PREFIX",
            ]);
            s.blank();
        }

        const A: &str = "MME_CONF";
        s.line("declare -A MME_CONF").blank();
        s.conf(A, "MME_S6A_IP_ADDR", format!("\"{}\"", r.mme_s6a))
            .conf(A, "INSTANCE", "$INSTANCE")
            .conf(A, "PREFIX", "$PREFIX")
            .conf(A, "REALM", "$MY_REALM")
            .conf_quoted(A, "PID_DIRECTORY", "/var/run")
            .conf(A, "MME_FQDN", "\"mme.${MME_CONF[@REALM@]}\"")
            .conf_quoted(A, "HSS_HOSTNAME", "hss")
            .conf(A, "HSS_FQDN", "\"${MME_CONF[@HSS_HOSTNAME@]}.${MME_CONF[@REALM@]}\"")
            .conf(A, "HSS_IP_ADDR", format!("\"{}\"", r.hss_s6a))
            .conf(A, "HSS_REALM", "$MY_REALM")
            .conf_quoted(A, "MCC", &self.mcc)
            .conf_quoted(A, "MNC", &self.mnc)
            .conf_quoted(A, "MME_GID", &self.mme_gid)
            .conf_quoted(A, "MME_CODE", &self.mme_code);
        for (i, tac) in r.tacs.iter().enumerate() {
            s.conf_quoted(A, &format!("TAC_{}", i), tac);
        }

        s.conf_quoted(A, "MME_INTERFACE_NAME_FOR_S1_MME", &self.mme_s1c_name)
            .conf_quoted(A, "MME_IPV4_ADDRESS_FOR_S1_MME", format!("{}/24", r.s1c))
            .conf_quoted(A, "MME_INTERFACE_NAME_FOR_S11", &self.mme_s11_name)
            .conf_quoted(A, "MME_IPV4_ADDRESS_FOR_S11", format!("{}/24", r.s11));
        if loopback_s10 {
            s.conf_quoted(A, "MME_INTERFACE_NAME_FOR_S10", S10_LOOPBACK_NAME)
                .conf_quoted(A, "MME_IPV4_ADDRESS_FOR_S10", format!("{}/24", S10_LOOPBACK_ADDR));
        } else {
            s.conf_quoted(A, "MME_INTERFACE_NAME_FOR_S10", &self.mme_s10_name)
                .conf_quoted(A, "MME_IPV4_ADDRESS_FOR_S10", format!("{}/24", r.s10));
        }
        s.conf_quoted(A, "OUTPUT", "CONSOLE")
            .conf_quoted(A, "SGW_IPV4_ADDRESS_FOR_S11_0", r.spgwc0)
            .conf_quoted(A, "PEER_MME_IPV4_ADDRESS_FOR_S10_0", "0.0.0.0/24")
            .conf_quoted(A, "PEER_MME_IPV4_ADDRESS_FOR_S10_1", "0.0.0.0/24");
        s.blank();

        s.assign("TAC_SGW_TEST", TAC_SGW_TEST);
        tac_bytes_in_shell(&mut s, "TAC_SGW_TEST", "SGW_TEST_0");
        s.blank();

        for (suffix, tac) in [("SGW_0", r.tacs[0]), ("MME_0", r.tacs[1]), ("MME_1", r.tacs[2])] {
            s.conf(A, &format!("MCC_{}", suffix), "${MME_CONF[@MCC@]}");
            s.conf(
                A,
                &format!("MNC3_{}", suffix),
                "`printf \"%03d\\n\" $(echo ${MME_CONF[@MNC@]} | sed -e \"s/^0*//\")`",
            );
            let var = format!("TAC_{}", suffix);
            s.assign(&var, tac);
            tac_bytes_in_shell(&mut s, &var, suffix);
            s.blank();
        }

        s.lines([
            "for K in \"${!MME_CONF[@]}\"; do ",
            "  egrep -lRZ \"$K\" $PREFIX | xargs -0 -l sed -i -e \"s|$K|${MME_CONF[$K]}|g\"",
            "  ret=$?;[[ ret -ne 0 ]] && echo \"Tried to replace $K with ${MME_CONF[$K]}\"",
            "done",
        ]);
        s.blank();
        s.line("# Generate freeDiameter certificate");
        if docker {
            s.line("./check_mme_s6a_certificate $PREFIX mme.${MME_CONF[@REALM@]}");
        } else {
            s.line("./check_mme_s6a_certificate $PREFIX/freeDiameter mme.${MME_CONF[@REALM@]}");
        }

        s.finish()
    }

    fn render_env_list(&self, r: &MmeResolved) -> String {
        let mut s = ScriptBuilder::new();
        s.line("# Environment Variables used by the OAI-MME Entrypoint Script")
            .env("REALM", &self.realm)
            .env("PREFIX", "/openair-mme/etc")
            .env("INSTANCE", 1)
            .env("PID_DIRECTORY", "/var/run")
            .blank();
        s.env("HSS_IP_ADDR", r.hss_s6a)
            .env("HSS_HOSTNAME", "hss")
            .env("HSS_FQDN", format!("hss.{}", self.realm))
            .env("HSS_REALM", &self.realm)
            .blank();
        s.env("MCC", &self.mcc)
            .env("MNC", &self.mnc)
            .env("MME_GID", &self.mme_gid)
            .env("MME_CODE", &self.mme_code);
        for (i, tac) in r.tacs.iter().enumerate() {
            s.env(&format!("TAC_{}", i), tac);
        }
        s.blank();
        s.env("MME_FQDN", format!("mme.{}", self.realm))
            .env("MME_S6A_IP_ADDR", r.mme_s6a)
            .env("MME_INTERFACE_NAME_FOR_S1_MME", &self.mme_s1c_name)
            .env("MME_IPV4_ADDRESS_FOR_S1_MME", r.s1c)
            .env("MME_INTERFACE_NAME_FOR_S11", &self.mme_s11_name)
            .env("MME_IPV4_ADDRESS_FOR_S11", r.s11)
            .env("MME_INTERFACE_NAME_FOR_S10", &self.mme_s10_name)
            .env("MME_IPV4_ADDRESS_FOR_S10", r.s10)
            .blank();
        s.env("OUTPUT", "CONSOLE").blank();
        s.env("SGW_IPV4_ADDRESS_FOR_S11_0", r.spgwc0)
            .env("PEER_MME_IPV4_ADDRESS_FOR_S10_0", "0.0.0.0")
            .env("PEER_MME_IPV4_ADDRESS_FOR_S10_1", "0.0.0.0")
            .blank();

        for (suffix, tac) in [("SGW_0", r.tacs[0]), ("MME_0", r.tacs[1]), ("MME_1", r.tacs[2])] {
            s.env(&format!("MCC_{}", suffix), &self.mcc)
                .env(&format!("MNC3_{}", suffix), format!("{:03}", r.mnc))
                .env(&format!("TAC_LB_{}", suffix), format!("{:02X}", tac % 256))
                .env(&format!("TAC_HB_{}", suffix), format!("{:02X}", tac / 256))
                .blank();
        }

        s.env("TAC_LB_SGW_TEST_0", format!("{:02X}", r.tacs[2] % 256))
            .env("TAC_HB_SGW_TEST_0", format!("{:02X}", r.tacs[2] / 256))
            .blank();
        s.env("SGW_IPV4_ADDRESS_FOR_S11_TEST_0", "0.0.0.0");

        s.finish()
    }
}

/// Shell lines computing the low/high TAC bytes of `$var` into `MME_CONF`
fn tac_bytes_in_shell(s: &mut ScriptBuilder, var: &str, suffix: &str) {
    s.line(format!("tmph=`echo \"${} / 256\" | bc`", var));
    s.line(format!("tmpl=`echo \"${} % 256\" | bc`", var));
    s.conf("MME_CONF", &format!("TAC-LB_{}", suffix), "`printf \"%02x\\n\" $tmpl`");
    s.conf("MME_CONF", &format!("TAC-HB_{}", suffix), "`printf \"%02x\\n\" $tmph`");
}

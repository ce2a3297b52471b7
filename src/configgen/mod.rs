//! Configuration script generation for the HSS and MME containers
//!
//! Each generator validates its fields first and only then renders the
//! output, so a rejected flag set never leaves a file behind.

pub mod hss;
pub mod mme;
pub mod script;

pub use hss::HssConfig;
pub use mme::MmeConfig;
pub use script::ScriptBuilder;

use crate::core::Workspace;
use std::net::IpAddr;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Validation failures of the generators
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing kind parameter")]
    MissingKind,

    #[error("invalid kind parameter")]
    InvalidKind(String),

    #[error("missing a dot (\".\") in APN1 name")]
    Apn1WithoutDot,

    #[error("missing {0} IP address")]
    MissingAddress(&'static str),

    #[error("missing {0} Interface name")]
    MissingInterface(&'static str),

    #[error("LTE Key SHALL have 32 characters")]
    LteKeyLength,

    #[error("OP Key SHALL have 32 characters")]
    OpKeyLength,

    #[error("invalid TAC list: {0}")]
    InvalidTacList(String),

    #[error("invalid MNC: {0}")]
    InvalidMnc(String),
}

/// Kind of configuration to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Hss,
    Mme,
}

impl Kind {
    /// Parse the `--kind` value
    pub fn parse(kind: Option<&str>) -> Result<Self, ConfigError> {
        match kind.map(str::trim) {
            None | Some("") => Err(ConfigError::MissingKind),
            Some(k) if k.eq_ignore_ascii_case("HSS") => Ok(Kind::Hss),
            Some(k) if k.eq_ignore_ascii_case("MME") => Ok(Kind::Mme),
            Some(k) => Err(ConfigError::InvalidKind(k.to_string())),
        }
    }
}

/// A rendered output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub file_name: &'static str,
    pub contents: String,
    pub executable: bool,
}

impl GeneratedFile {
    /// Write the file into the workspace root
    pub fn write_to(&self, workspace: &Workspace) -> std::io::Result<PathBuf> {
        let path = workspace.file(self.file_name);
        std::fs::write(&path, &self.contents)?;

        #[cfg(unix)]
        if self.executable {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
        }

        info!("Generated {} ({} bytes)", path.display(), self.contents.len());
        Ok(path)
    }
}

/// An address counts as provided unless absent or unspecified (`0.0.0.0`)
pub(crate) fn require_address(
    addr: Option<IpAddr>,
    what: &'static str,
) -> Result<IpAddr, ConfigError> {
    match addr {
        Some(ip) if !ip.is_unspecified() => Ok(ip),
        _ => Err(ConfigError::MissingAddress(what)),
    }
}

pub(crate) fn require_name(name: &str, what: &'static str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        Err(ConfigError::MissingInterface(what))
    } else {
        Ok(())
    }
}

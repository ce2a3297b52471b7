//! Test: configuration generation through the command-line layer

use crate::helpers::*;
use oai_ci::cli::{Cli, Command};
use oai_ci::{ConfigError, Kind};

fn generate_command(args: &[&str]) -> oai_ci::cli::commands::GenerateConfigCommand {
    let mut argv = vec!["oai-ci", "generate-config"];
    argv.extend_from_slice(args);
    match Cli::try_parse_from(argv).unwrap().command {
        Command::GenerateConfig(cmd) => cmd,
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn test_hss_script_from_mixed_case_flags() {
    let (_dir, ws) = temp_workspace();
    let cmd = generate_command(&[
        "--kind=HSS",
        "--cassandra=192.168.28.2",
        "--HSS_S6A=192.168.31.2",
        "--from_docker_file",
        "--LTEK=fec86ba6eb707ed08905757b1bb44b8f",
        "--users=200",
    ]);

    assert_eq!(Kind::parse(cmd.kind.as_deref()), Ok(Kind::Hss));
    let file = cmd.hss_config().generate().unwrap();
    let path = file.write_to(&ws).unwrap();

    let script = std::fs::read_to_string(path).unwrap();
    assert!(script.contains("MY_LTE_K='fec86ba6eb707ed08905757b1bb44b8f'"));
    assert!(script.contains("MY_USERS='200'"));
    assert!(script.contains("Cassandra_Server_IP='192.168.28.2'"));
}

#[test]
fn test_generation_is_deterministic() {
    let cmd = generate_command(&["--kind=HSS", "--cassandra=10.0.0.2", "--hss_s6a=10.0.1.2", "--nb_mmes=3"]);
    assert_eq!(cmd.hss_config().generate().unwrap(), cmd.hss_config().generate().unwrap());
}

#[test]
fn test_short_lte_key_rejected_before_writing() {
    let (_dir, ws) = temp_workspace();
    let cmd = generate_command(&["--kind=HSS", "--cassandra=10.0.0.2", "--hss_s6a=10.0.1.2", "--ltek=1234"]);

    assert_eq!(cmd.hss_config().generate(), Err(ConfigError::LteKeyLength));
    assert!(!ws.file("hss-cfg.sh").exists());
}

#[test]
fn test_mme_env_list() {
    let (_dir, ws) = temp_workspace();
    let cmd = generate_command(&[
        "--kind=MME",
        "--hss_s6a=192.168.31.2",
        "--mme_s6a=192.168.31.3",
        "--mme_s1c_IP=192.168.33.2",
        "--mme_s1c_name=eth3",
        "--mme_s10_IP=192.168.32.2",
        "--mme_s10_name=eth2",
        "--mme_s11_IP=192.168.28.130",
        "--mme_s11_name=eth1",
        "--spgwc0_s11_IP=192.168.28.131",
        "--tac_list=5 6",
        "--env_for_entrypoint",
    ]);

    let file = cmd.mme_config().generate().unwrap();
    assert_eq!(file.file_name, "mme-env.list");
    file.write_to(&ws).unwrap();
    assert!(ws.file("mme-env.list").exists());
    assert!(file.contents.contains("192.168.33.2"));
}

#[test]
fn test_mme_requires_interfaces() {
    let cmd = generate_command(&["--kind=MME", "--hss_s6a=192.168.31.2"]);
    assert_eq!(cmd.mme_config().generate(), Err(ConfigError::MissingAddress("MME S6A")));
}

#[test]
fn test_mme_rejects_tac_wider_than_16_bits() {
    let (_dir, ws) = temp_workspace();
    let cmd = generate_command(&[
        "--kind=MME",
        "--hss_s6a=192.168.31.2",
        "--mme_s6a=192.168.31.3",
        "--mme_s1c_IP=192.168.33.2",
        "--mme_s1c_name=eth3",
        "--mme_s10_IP=192.168.32.2",
        "--mme_s10_name=eth2",
        "--mme_s11_IP=192.168.28.130",
        "--mme_s11_name=eth1",
        "--spgwc0_s11_IP=192.168.28.131",
        "--tac_list=70000",
    ]);

    assert_eq!(
        cmd.mme_config().generate(),
        Err(ConfigError::InvalidTacList("70000".to_string()))
    );
    assert!(!ws.file("mme-cfg.sh").exists());
}

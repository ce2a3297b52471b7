//! Test: deployment actions issue the expected runtime commands

use crate::helpers::*;
use oai_ci::{DeployAction, DeployError, NetworkFunction, SanityDeployer};

const HSS_NO_ENTRYPOINT: &str = r#"[{"Config": {"Cmd": ["/bin/bash"]}}]"#;
const HSS_ENTRYPOINT: &str = r#"[{"Config": {"Entrypoint": ["/openair-hss/bin/entrypoint.sh"]}}]"#;

fn deployer(runtime: &MockRuntime, ws: &oai_ci::Workspace, tag: Option<&str>) -> SanityDeployer<MockRuntime> {
    SanityDeployer::new(runtime.clone(), fast_config(), ws.clone()).with_tag(tag.map(str::to_string))
}

#[tokio::test]
async fn test_create_networks_from_scratch() {
    let (_dir, ws) = temp_workspace();
    let runtime = MockRuntime::new().on(&["network", "inspect"], vec![absent("network")]);

    deployer(&runtime, &ws, None).execute(DeployAction::CreateNetworks).await.unwrap();

    let creates: Vec<String> =
        runtime.commands().into_iter().filter(|c| c.starts_with("network create")).collect();
    assert_eq!(
        creates,
        vec![
            "network create --attachable --subnet 192.168.28.0/26 --ip-range 192.168.28.0/26 ci-dbn",
            "network create --attachable --subnet 192.168.28.128/26 --ip-range 192.168.28.128/26 ci-s11",
            "network create --attachable --subnet 192.168.31.0/24 --ip-range 192.168.31.0/24 ci-s6a",
            "network create --attachable --subnet 192.168.32.0/24 --ip-range 192.168.32.0/24 ci-s10",
            "network create --attachable --subnet 192.168.33.0/24 --ip-range 192.168.33.0/24 ci-s1c",
        ]
    );
    assert_eq!(runtime.count("network rm"), 0);
}

#[tokio::test]
async fn test_existing_networks_are_removed_first() {
    let (_dir, ws) = temp_workspace();
    let runtime = MockRuntime::new().on(&["network", "inspect"], vec![ok("[]")]);

    deployer(&runtime, &ws, None).execute(DeployAction::CreateNetworks).await.unwrap();

    let commands = runtime.commands();
    let rm = commands.iter().position(|c| c == "network rm ci-dbn ci-s6a ci-s10 ci-s11 ci-s1c").unwrap();
    let first_create = commands.iter().position(|c| c.starts_with("network create")).unwrap();
    assert!(rm < first_create);
}

#[tokio::test]
async fn test_unreachable_runtime_is_not_absence() {
    let (_dir, ws) = temp_workspace();
    let runtime = MockRuntime::new().on(
        &["network", "inspect"],
        vec![failed(1, "Cannot connect to the Docker daemon at unix:///var/run/docker.sock.")],
    );

    let result = deployer(&runtime, &ws, None).execute(DeployAction::CreateNetworks).await;

    assert!(matches!(result, Err(DeployError::RuntimeUnreachable(_))));
    assert_eq!(runtime.count("network create"), 0);
}

#[tokio::test]
async fn test_remove_networks_is_best_effort() {
    let (_dir, ws) = temp_workspace();
    let runtime = MockRuntime::new().on(&["network", "rm"], vec![failed(1, "network ci-dbn not found")]);

    let result = deployer(&runtime, &ws, None).execute(DeployAction::RemoveNetworks).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_deploy_cassandra_waits_for_node_and_schema() {
    let (_dir, ws) = temp_workspace();
    let runtime = MockRuntime::new()
        .on(&["container", "inspect"], vec![absent("container")])
        .on_match(
            |args| args.last().map(String::as_str) == Some("nodetool status"),
            vec![ok("UJ  192.168.28.2  100 KB\n"), ok("UN  192.168.28.2  120 KB\n")],
        )
        .on_match(
            |args| args.last().is_some_and(|a| a.starts_with("cqlsh")),
            vec![failed(1, "Connection refused"), ok("")],
        );

    deployer(&runtime, &ws, None).execute(DeployAction::DeployCassandra).await.unwrap();

    let commands = runtime.commands();
    assert!(commands.contains(
        &"run --name ci-cassandra --network ci-dbn --ip 192.168.28.2 -d -e CASSANDRA_CLUSTER_NAME=OAI HSS Cluster -e CASSANDRA_ENDPOINT_SNITCH=GossipingPropertyFileSnitch cassandra:2.1"
            .to_string()
    ));
    assert_eq!(runtime.count("rm -f"), 0);
    // two polls then the archived status
    assert_eq!(commands.iter().filter(|c| c.ends_with("nodetool status")).count(), 3);
    assert_eq!(commands.iter().filter(|c| c.contains("cqlsh --file /home/oai_db.cql 192.168.28.2")).count(), 2);

    let schema = ws.source("hss_rel14/db/oai_db.cql");
    assert!(commands.contains(&format!("cp {} ci-cassandra:/home", schema.display())));

    let status = ws.read_archive("cassandra_status.log").unwrap().unwrap();
    assert!(status.contains("UN  192.168.28.2"));
    assert!(status.ends_with("CASSANDRA START: OK\n"));
}

#[tokio::test]
async fn test_node_poll_survives_runtime_timeouts() {
    let (_dir, ws) = temp_workspace();
    let runtime = MockRuntime::new()
        .on(&["container", "inspect"], vec![absent("container")])
        .on_match_after_timeouts(
            |args| args.last().map(String::as_str) == Some("nodetool status"),
            2,
            vec![ok("UN  192.168.28.2  120 KB\n")],
        )
        .on_match_after_timeouts(|args| args.last().is_some_and(|a| a.starts_with("cqlsh")), 1, vec![ok("")]);

    deployer(&runtime, &ws, None).execute(DeployAction::DeployCassandra).await.unwrap();

    let commands = runtime.commands();
    // two timed-out polls, the ready poll, then the archived status
    assert_eq!(commands.iter().filter(|c| c.ends_with("nodetool status")).count(), 4);
    assert_eq!(commands.iter().filter(|c| c.contains("cqlsh --file")).count(), 2);
    let status = ws.read_archive("cassandra_status.log").unwrap().unwrap();
    assert!(status.contains("UN  192.168.28.2"));
}

#[tokio::test]
async fn test_bounded_node_poll_gives_up_on_persistent_timeouts() {
    let (_dir, ws) = temp_workspace();
    let runtime = MockRuntime::new()
        .on(&["container", "inspect"], vec![absent("container")])
        .on_match_after_timeouts(
            |args| args.last().map(String::as_str) == Some("nodetool status"),
            usize::MAX,
            vec![],
        );
    let mut config = fast_config();
    config.polling.max_attempts = Some(2);
    let deployer = SanityDeployer::new(runtime.clone(), config, ws.clone());

    let result = deployer.execute(DeployAction::DeployCassandra).await;

    assert!(matches!(result, Err(DeployError::PollExhausted { attempts: 2, .. })));
}

#[tokio::test]
async fn test_existing_cassandra_triggers_cleanup() {
    let (_dir, ws) = temp_workspace();
    let runtime = MockRuntime::new()
        .on(&["container", "inspect"], vec![ok("[{}]")])
        .on_match(
            |args| args.last().map(String::as_str) == Some("nodetool status"),
            vec![ok("UN  192.168.28.2\n")],
        );

    deployer(&runtime, &ws, None).execute(DeployAction::DeployCassandra).await.unwrap();

    let commands = runtime.commands();
    let rm = commands.iter().position(|c| c == "rm -f ci-cassandra ci-oai-hss ci-oai-mme").unwrap();
    let run = commands.iter().position(|c| c.starts_with("run --name ci-cassandra")).unwrap();
    assert!(rm < run);
}

#[tokio::test]
async fn test_bounded_node_poll_gives_up() {
    let (_dir, ws) = temp_workspace();
    let runtime = MockRuntime::new()
        .on(&["container", "inspect"], vec![absent("container")])
        .on_match(
            |args| args.last().map(String::as_str) == Some("nodetool status"),
            vec![ok("UJ  192.168.28.2\n")],
        );
    let mut config = fast_config();
    config.polling.max_attempts = Some(3);
    let deployer = SanityDeployer::new(runtime.clone(), config, ws.clone());

    let result = deployer.execute(DeployAction::DeployCassandra).await;

    assert!(matches!(result, Err(DeployError::PollExhausted { attempts: 3, .. })));
    assert_eq!(runtime.count("cp"), 0);
}

#[tokio::test]
async fn test_hss_actions_require_tag() {
    let (_dir, ws) = temp_workspace();
    let runtime = MockRuntime::new();

    for action in [
        DeployAction::Deploy(NetworkFunction::Hss),
        DeployAction::Start(NetworkFunction::Hss),
        DeployAction::RetrieveLogs(NetworkFunction::Mme),
    ] {
        let err = deployer(&runtime, &ws, Some("")).execute(action).await.unwrap_err();
        assert!(matches!(err, DeployError::MissingTag(_)));
    }
    assert!(runtime.commands().is_empty());
}

#[tokio::test]
async fn test_missing_image() {
    let (_dir, ws) = temp_workspace();
    let runtime =
        MockRuntime::new().on(&["image", "inspect"], vec![failed(1, "Error: No such image: oai-hss:develop")]);

    let err = deployer(&runtime, &ws, Some("develop"))
        .execute(DeployAction::Deploy(NetworkFunction::Hss))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "image oai-hss:develop not found");
}

#[tokio::test]
async fn test_deploy_hss_with_config_script() {
    let (_dir, ws) = temp_workspace();
    let runtime = MockRuntime::new()
        .on(&["image", "inspect"], vec![ok(HSS_NO_ENTRYPOINT)])
        .on_match(
            |args| args.last().is_some_and(|a| a.ends_with("./hss-cfg.sh")),
            vec![ok("Provisioning users\nGenerating certificates\n")],
        );

    deployer(&runtime, &ws, Some("develop"))
        .execute(DeployAction::Deploy(NetworkFunction::Hss))
        .await
        .unwrap();

    let commands = runtime.commands();
    assert_eq!(
        commands[1],
        "run --privileged --name ci-oai-hss --network ci-dbn --ip 192.168.28.3 -d oai-hss:develop /bin/bash -c sleep infinity"
    );
    assert_eq!(commands[2], "network connect --ip 192.168.31.2 ci-s6a ci-oai-hss");
    assert_eq!(commands[3], format!("cp {} ci-oai-hss:/openair-hss/scripts", ws.file("hss-cfg.sh").display()));
    assert_eq!(
        commands[4],
        "exec ci-oai-hss /bin/bash -c cd /openair-hss/scripts && chmod 777 hss-cfg.sh && ./hss-cfg.sh"
    );

    let script = std::fs::read_to_string(ws.file("hss-cfg.sh")).unwrap();
    assert!(script.contains("Cassandra_Server_IP='192.168.28.2'"));

    let log = ws.read_archive("hss_config.log").unwrap().unwrap();
    assert_eq!(log, "Provisioning users\nGenerating certificates\nOAI-HSS CONFIG: OK\n");
}

#[tokio::test]
async fn test_failed_config_script_is_archived_as_ko() {
    let (_dir, ws) = temp_workspace();
    let runtime = MockRuntime::new()
        .on(&["image", "inspect"], vec![ok(HSS_NO_ENTRYPOINT)])
        .on_match(
            |args| args.last().is_some_and(|a| a.ends_with("./hss-cfg.sh")),
            vec![failed(2, "cassandra unreachable")],
        );

    deployer(&runtime, &ws, Some("develop"))
        .execute(DeployAction::Deploy(NetworkFunction::Hss))
        .await
        .unwrap();

    let log = ws.read_archive("hss_config.log").unwrap().unwrap();
    assert!(log.ends_with("OAI-HSS CONFIG: KO\n"));
}

#[tokio::test]
async fn test_deploy_hss_with_entrypoint() {
    let (_dir, ws) = temp_workspace();
    let runtime = MockRuntime::new()
        .on(&["image", "inspect"], vec![ok(HSS_ENTRYPOINT)])
        .on(
            &["logs", "ci-oai-hss"],
            vec![ok("Provisioning users\nOAI-HSS CONFIG: OK\njsonConfig loaded\nCompute opc\n")],
        );

    deployer(&runtime, &ws, Some("develop"))
        .execute(DeployAction::Deploy(NetworkFunction::Hss))
        .await
        .unwrap();

    let commands = runtime.commands();
    assert_eq!(
        commands[1],
        format!(
            "create --privileged --name ci-oai-hss --network ci-dbn --ip 192.168.28.3 --env-file {} oai-hss:develop",
            ws.file("hss-env.list").display()
        )
    );
    assert_eq!(commands[2], "network connect --ip 192.168.31.2 ci-s6a ci-oai-hss");
    assert_eq!(commands[3], "start ci-oai-hss");
    assert_eq!(commands[4], "logs ci-oai-hss");

    assert!(ws.file("hss-env.list").exists());
    let log = ws.read_archive("hss_config.log").unwrap().unwrap();
    assert_eq!(log, "Provisioning users\nOAI-HSS CONFIG: OK\n");
}

#[tokio::test]
async fn test_deploy_mme_attaches_all_interfaces() {
    let (_dir, ws) = temp_workspace();
    let runtime = MockRuntime::new().on(&["image", "inspect"], vec![ok("[]")]);

    deployer(&runtime, &ws, Some("develop"))
        .execute(DeployAction::Deploy(NetworkFunction::Mme))
        .await
        .unwrap();

    let commands = runtime.commands();
    assert!(commands[1].starts_with("run --privileged --name ci-oai-mme --network ci-s6a --ip 192.168.31.3 -d oai-mme:develop"));
    assert_eq!(
        &commands[2..5],
        &[
            "network connect --ip 192.168.28.130 ci-s11 ci-oai-mme".to_string(),
            "network connect --ip 192.168.32.2 ci-s10 ci-oai-mme".to_string(),
            "network connect --ip 192.168.33.2 ci-s1c ci-oai-mme".to_string(),
        ]
    );
    assert!(ws.file("mme-cfg.sh").exists());
    assert!(commands.iter().any(|c| c.ends_with(":/openair-mme/scripts")));
}

#[tokio::test]
async fn test_failed_create_is_fatal() {
    let (_dir, ws) = temp_workspace();
    let runtime = MockRuntime::new()
        .on(&["image", "inspect"], vec![ok(HSS_NO_ENTRYPOINT)])
        .on(&["run"], vec![failed(125, "Conflict. The container name is already in use")]);

    let err = deployer(&runtime, &ws, Some("develop"))
        .execute(DeployAction::Deploy(NetworkFunction::Hss))
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::CommandFailed { code: Some(125), .. }));
    assert_eq!(runtime.count("network connect"), 0);
}

#[tokio::test]
async fn test_start_and_stop_hss() {
    let (_dir, ws) = temp_workspace();
    let runtime = MockRuntime::new().on(&["image", "inspect"], vec![ok(HSS_NO_ENTRYPOINT)]);
    let deployer = deployer(&runtime, &ws, Some("develop"));

    deployer.execute(DeployAction::Start(NetworkFunction::Hss)).await.unwrap();
    deployer.execute(DeployAction::Stop(NetworkFunction::Hss)).await.unwrap();

    let commands = runtime.commands();
    assert!(commands.contains(
        &"exec -d ci-oai-hss /bin/bash -c nohup ./bin/oai_hss -j ./etc/hss_rel14.json --reloadkey true > hss_check_run.log 2>&1"
            .to_string()
    ));
    assert!(commands.contains(&"exec ci-oai-hss /bin/bash -c killall oai_hss".to_string()));
}

#[tokio::test]
async fn test_start_is_noop_with_entrypoint() {
    let (_dir, ws) = temp_workspace();
    let runtime = MockRuntime::new().on(&["image", "inspect"], vec![ok(HSS_ENTRYPOINT)]);

    deployer(&runtime, &ws, Some("develop"))
        .execute(DeployAction::Start(NetworkFunction::Mme))
        .await
        .unwrap();

    assert_eq!(runtime.commands(), vec!["image inspect oai-mme:develop"]);
}

#[tokio::test]
async fn test_retrieve_logs_copies_check_run_log() {
    let (_dir, ws) = temp_workspace();
    let runtime = MockRuntime::new().on(&["image", "inspect"], vec![ok("[]")]);

    deployer(&runtime, &ws, Some("develop"))
        .execute(DeployAction::RetrieveLogs(NetworkFunction::Mme))
        .await
        .unwrap();

    assert_eq!(
        runtime.commands()[1],
        format!("cp ci-oai-mme:/openair-mme/mme_check_run.log {}", ws.archives().display())
    );
}

#[tokio::test]
async fn test_retrieve_logs_from_entrypoint_container() {
    let (_dir, ws) = temp_workspace();
    let runtime = MockRuntime::new()
        .on(&["image", "inspect"], vec![ok(HSS_ENTRYPOINT)])
        .on(
            &["logs", "ci-oai-mme"],
            vec![ok("OAI-MME CONFIG: OK\nInitializing shared logging\nReceived SCTP_INIT_MSG\n")],
        );

    deployer(&runtime, &ws, Some("develop"))
        .execute(DeployAction::RetrieveLogs(NetworkFunction::Mme))
        .await
        .unwrap();

    let log = ws.read_archive("mme_check_run.log").unwrap().unwrap();
    assert_eq!(log, "Initializing shared logging\nReceived SCTP_INIT_MSG\n");
}

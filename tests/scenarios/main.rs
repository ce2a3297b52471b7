//! Scenario-based tests for oai-ci

mod helpers;

mod deploy_sequence;
mod generate_config;
mod report_render;
mod verify_logs;

//! Test utilities for oai-ci scenarios

use async_trait::async_trait;
use oai_ci::{CiConfig, CommandOutput, ContainerRuntime, RuntimeError, Workspace};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

type Matcher = Box<dyn Fn(&[String]) -> bool + Send + Sync>;

/// Scripted reply for commands whose arguments match
struct Reply {
    matches: Matcher,
    /// Calls answered with `RuntimeError::Timeout` before any output
    timeouts: usize,
    outputs: Vec<CommandOutput>,
}

/// Mock container runtime that records every command and answers from a script.
///
/// Unscripted commands succeed with empty output. A scripted reply with
/// several outputs hands them out in order and then repeats the last one.
#[derive(Clone, Default)]
pub struct MockRuntime {
    calls: Arc<Mutex<Vec<Vec<String>>>>,
    replies: Arc<Mutex<Vec<Reply>>>,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to commands starting with `prefix`
    pub fn on(self, prefix: &[&str], outputs: Vec<CommandOutput>) -> Self {
        let prefix: Vec<String> = prefix.iter().map(|s| s.to_string()).collect();
        self.on_match(move |args| args.starts_with(&prefix), outputs)
    }

    pub fn on_match<F>(self, matches: F, outputs: Vec<CommandOutput>) -> Self
    where
        F: Fn(&[String]) -> bool + Send + Sync + 'static,
    {
        self.on_match_after_timeouts(matches, 0, outputs)
    }

    /// Like `on_match`, but the first `timeouts` matching calls time out
    pub fn on_match_after_timeouts<F>(self, matches: F, timeouts: usize, outputs: Vec<CommandOutput>) -> Self
    where
        F: Fn(&[String]) -> bool + Send + Sync + 'static,
    {
        self.replies.lock().unwrap().push(Reply { matches: Box::new(matches), timeouts, outputs });
        self
    }

    /// Recorded commands, joined with spaces
    pub fn commands(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|args| args.join(" ")).collect()
    }

    /// Number of recorded commands starting with `prefix`
    pub fn count(&self, prefix: &str) -> usize {
        self.commands().iter().filter(|c| c.starts_with(prefix)).count()
    }
}

#[async_trait]
impl ContainerRuntime for MockRuntime {
    async fn run(&self, args: &[String]) -> Result<CommandOutput, RuntimeError> {
        self.calls.lock().unwrap().push(args.to_vec());

        let mut replies = self.replies.lock().unwrap();
        if let Some(reply) = replies.iter_mut().find(|r| (r.matches)(args)) {
            if reply.timeouts > 0 {
                reply.timeouts -= 1;
                return Err(RuntimeError::Timeout(600));
            }
            let output = if reply.outputs.len() > 1 {
                reply.outputs.remove(0)
            } else {
                reply.outputs.first().cloned().unwrap_or_default()
            };
            return Ok(output);
        }
        Ok(ok(""))
    }
}

pub fn ok(stdout: &str) -> CommandOutput {
    CommandOutput { code: Some(0), stdout: stdout.to_string(), stderr: String::new() }
}

pub fn failed(code: i32, stderr: &str) -> CommandOutput {
    CommandOutput { code: Some(code), stdout: String::new(), stderr: stderr.to_string() }
}

/// `inspect` output of an object that does not exist
pub fn absent(what: &str) -> CommandOutput {
    failed(1, &format!("Error: No such {}", what))
}

/// Workspace in a temporary directory with `archives/` and `src/` created
pub fn temp_workspace() -> (TempDir, Workspace) {
    let dir = TempDir::new().unwrap();
    let ws = Workspace::new(dir.path());
    ws.ensure_archives().unwrap();
    std::fs::create_dir_all(dir.path().join("src")).unwrap();
    (dir, ws)
}

/// Default topology with polling fast enough for tests
pub fn fast_config() -> CiConfig {
    let mut config = CiConfig::default();
    config.polling.status_interval_ms = 1;
    config.polling.schema_interval_ms = 1;
    config.polling.log_settle_ms = 0;
    config.polling.retrieve_settle_ms = 0;
    config
}

pub fn write_archive(ws: &Workspace, name: &str, contents: &str) {
    std::fs::write(ws.archive(name), contents).unwrap();
}

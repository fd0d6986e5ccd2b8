// src/tools.rs
use crate::config::ToolSpec;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// What a single formatter invocation did to the target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolOutcome {
    /// Exited successfully.
    Applied,
    /// Exited non-zero or could not be started; the file is left as the tool left it.
    Unchanged,
    /// Killed after exceeding the timeout.
    TimedOut,
}

impl fmt::Display for ToolOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolOutcome::Applied => write!(f, "applied"),
            ToolOutcome::Unchanged => write!(f, "unchanged"),
            ToolOutcome::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Runs external formatters against a file with their output discarded.
#[derive(Debug, Clone)]
pub struct ToolRunner {
    timeout: Duration,
}

impl ToolRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Invoke `tool` on `target`. A failing tool is not an error.
    pub async fn invoke(&self, tool: &ToolSpec, target: &Path) -> ToolOutcome {
        let start = Instant::now();
        let child = Command::new(&tool.executable)
            .args(tool.command_args(target))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn();

        let mut child = match child {
            Ok(child) => child,
            Err(e) => {
                log::warn!("Could not start tool '{}': {}", tool.executable, e);
                return ToolOutcome::Unchanged;
            }
        };

        let outcome = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) if status.success() => ToolOutcome::Applied,
            Ok(Ok(status)) => {
                log::debug!("Tool '{}' exited with {}", tool.name(), status);
                ToolOutcome::Unchanged
            }
            Ok(Err(e)) => {
                log::warn!("Waiting for tool '{}' failed: {}", tool.name(), e);
                ToolOutcome::Unchanged
            }
            Err(_) => {
                if let Err(e) = child.kill().await {
                    log::error!("Failed to kill hung tool '{}': {}", tool.name(), e);
                }
                ToolOutcome::TimedOut
            }
        };

        log::info!(
            "Tool '{}' {} ({}ms)",
            tool.name(),
            outcome,
            start.elapsed().as_millis()
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell_tool(script: &str) -> ToolSpec {
        // `sh -c script name --config=... target`: the config flag is $1, the target $2.
        ToolSpec {
            executable: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string(), "fake-tool".to_string()],
            config_flag: "--config".to_string(),
            config_path: "/dev/null".to_string(),
        }
    }

    #[actix_rt::test]
    async fn test_successful_tool_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("code.php");
        std::fs::write(&target, "a\n").unwrap();

        let runner = ToolRunner::new(Duration::from_secs(10));
        let outcome = runner
            .invoke(&shell_tool(r#"echo noise; printf 'b\n' > "$2""#), &target)
            .await;

        assert_eq!(outcome, ToolOutcome::Applied);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "b\n");
    }

    #[actix_rt::test]
    async fn test_config_flag_is_passed() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("code.php");
        std::fs::write(&target, "").unwrap();

        let runner = ToolRunner::new(Duration::from_secs(10));
        let outcome = runner
            .invoke(&shell_tool(r#"printf '%s' "$1" > "$2""#), &target)
            .await;

        assert_eq!(outcome, ToolOutcome::Applied);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "--config=/dev/null");
    }

    #[actix_rt::test]
    async fn test_non_zero_exit_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("code.php");
        std::fs::write(&target, "partial").unwrap();

        let runner = ToolRunner::new(Duration::from_secs(10));
        let outcome = runner
            .invoke(&shell_tool("echo 'parse error' >&2; exit 3"), &target)
            .await;

        assert_eq!(outcome, ToolOutcome::Unchanged);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "partial");
    }

    #[actix_rt::test]
    async fn test_missing_executable_is_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("code.php");

        let tool = ToolSpec {
            executable: "/nonexistent/formatter".to_string(),
            args: Vec::new(),
            config_flag: "--config".to_string(),
            config_path: "x".to_string(),
        };
        let outcome = ToolRunner::new(Duration::from_secs(1)).invoke(&tool, &target).await;
        assert_eq!(outcome, ToolOutcome::Unchanged);
    }

    #[actix_rt::test]
    async fn test_hung_tool_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("code.php");

        let runner = ToolRunner::new(Duration::from_millis(200));
        let start = Instant::now();
        let outcome = runner.invoke(&shell_tool("sleep 30"), &target).await;

        assert_eq!(outcome, ToolOutcome::TimedOut);
        assert!(start.elapsed() < Duration::from_secs(10));
    }
}

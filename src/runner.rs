// src/runner.rs
use crate::config::InterpreterConfig;
use crate::errors::{PipelineError, Result};
use crate::models::{ErrorReporting, Settings};
use crate::render;
use crate::workspace::Workspace;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;

/// Runs submitted code through the PHP interpreter and renders the transcript.
#[derive(Debug, Clone)]
pub struct ExecutionEngine {
    interpreter: InterpreterConfig,
}

/// Theme colors used when colorizing output.
#[derive(Debug, Clone, Copy)]
pub struct Theme<'a> {
    pub bgcolor: &'a str,
    pub color: &'a str,
}

/// Treat code as a script body unless it already opens a tag. The opening
/// tag shares the first line so diagnostic line numbers stay the same.
pub fn script_body(code: &str) -> String {
    if code.starts_with("<?") {
        code.to_string()
    } else {
        format!("<?php {}", code)
    }
}

/// Apply `pre_wrap` and `colorize` to a complete transcript.
pub fn render_output(transcript: &str, settings: &Settings, theme: Theme<'_>) -> String {
    let mut html = if settings.pre_wrap {
        render::pre_wrap(transcript)
    } else {
        transcript.to_string()
    };
    if settings.colorize {
        html.insert_str(0, &render::colorize_stylesheet(theme.bgcolor, theme.color));
    }
    html
}

impl ExecutionEngine {
    pub fn new(interpreter: InterpreterConfig) -> Self {
        Self { interpreter }
    }

    fn interpreter_args(&self, level: ErrorReporting) -> Vec<String> {
        let html_errors = if self.interpreter.html_errors { 1 } else { 0 };
        vec![
            "-d".to_string(),
            "display_errors=stdout".to_string(),
            "-d".to_string(),
            "log_errors=0".to_string(),
            "-d".to_string(),
            format!("html_errors={}", html_errors),
            "-d".to_string(),
            format!("error_reporting={}", level.mask()),
        ]
    }

    /// Capture everything the script prints to stdout. The diagnostic mask only
    /// lives for this one interpreter process.
    pub async fn capture(&self, workspace: &Workspace, code: &str, level: ErrorReporting) -> Result<String> {
        let start = Instant::now();
        let lease = workspace.lease().await?;
        lease.materialize(&script_body(code)).await?;

        let child = Command::new(&self.interpreter.executable)
            .args(self.interpreter_args(level))
            .arg(lease.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| PipelineError::InterpreterUnavailable {
                executable: self.interpreter.executable.clone(),
                source,
            })?;

        let output = match self.interpreter.timeout() {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| {
                    log::warn!("Execution exceeded {}s, killed", limit.as_secs());
                    PipelineError::ExecutionTimeout { secs: limit.as_secs() }
                })??,
            None => child.wait_with_output().await?,
        };

        log::info!(
            "Executed with error_reporting={} in {}ms (exit {:?})",
            level.mask(),
            start.elapsed().as_millis(),
            output.status.code()
        );
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    pub async fn execute(
        &self,
        workspace: &Workspace,
        code: &str,
        settings: &Settings,
        theme: Theme<'_>,
    ) -> Result<String> {
        let transcript = self.capture(workspace, code, settings.error_reporting).await?;
        Ok(render_output(&transcript, settings, theme))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THEME: Theme<'static> = Theme {
        bgcolor: "#000",
        color: "#fff",
    };

    fn php_available() -> bool {
        std::process::Command::new("php")
            .arg("-v")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn settings(level: ErrorReporting, pre_wrap: bool, colorize: bool) -> Settings {
        Settings {
            error_reporting: level,
            pre_wrap,
            colorize,
        }
    }

    #[test]
    fn test_script_body() {
        assert_eq!(script_body("echo 1+1;"), "<?php echo 1+1;");
        assert_eq!(script_body("<?php echo 1;"), "<?php echo 1;");
        assert_eq!(script_body("<?= 5 ?>"), "<?= 5 ?>");
    }

    #[test]
    fn test_render_output_variants() {
        let raw = "<b>hi</b>";

        let plain = render_output(raw, &settings(ErrorReporting::None, false, false), THEME);
        assert_eq!(plain, raw);

        let wrapped = render_output(raw, &settings(ErrorReporting::None, true, false), THEME);
        assert_eq!(wrapped, "<pre>&lt;b>hi&lt;/b></pre>");

        let colored = render_output(raw, &settings(ErrorReporting::None, true, true), THEME);
        assert!(colored.starts_with("\n<style>"));
        assert!(colored.ends_with("</style><pre>&lt;b>hi&lt;/b></pre>"));
    }

    #[test]
    fn test_interpreter_args() {
        let engine = ExecutionEngine::new(InterpreterConfig::default());
        let args = engine.interpreter_args(ErrorReporting::Warning);
        assert!(args.contains(&"error_reporting=71".to_string()));
        assert!(args.contains(&"html_errors=1".to_string()));
        assert!(args.contains(&"display_errors=stdout".to_string()));
    }

    #[actix_rt::test]
    async fn test_missing_interpreter() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(dir.path().join("code.php"));
        let engine = ExecutionEngine::new(InterpreterConfig {
            executable: "/nonexistent/php".to_string(),
            ..Default::default()
        });

        let err = engine
            .capture(&workspace, "echo 1;", ErrorReporting::None)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::InterpreterUnavailable { .. }));
    }

    #[actix_rt::test]
    async fn test_echo_scenario() {
        if !php_available() {
            eprintln!("php not installed, skipping");
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(dir.path().join("code.php"));
        let engine = ExecutionEngine::new(InterpreterConfig::default());

        let out = engine
            .execute(
                &workspace,
                "echo 1+1;",
                &settings(ErrorReporting::None, true, false),
                THEME,
            )
            .await
            .unwrap();
        assert_eq!(out, "<pre>2</pre>");
    }

    #[actix_rt::test]
    async fn test_diagnostic_levels() {
        if !php_available() {
            eprintln!("php not installed, skipping");
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(dir.path().join("code.php"));
        let engine = ExecutionEngine::new(InterpreterConfig {
            html_errors: false,
            ..Default::default()
        });
        let code = "trigger_error('old api', E_USER_DEPRECATED); echo 'done';";

        let quiet = engine.capture(&workspace, code, ErrorReporting::None).await.unwrap();
        assert_eq!(quiet, "done");

        let fatal_only = engine.capture(&workspace, code, ErrorReporting::Fatal).await.unwrap();
        assert!(!fatal_only.contains("old api"));

        let loud = engine.capture(&workspace, code, ErrorReporting::All).await.unwrap();
        assert!(loud.contains("Deprecated"));
        assert!(loud.contains("old api"));
        assert!(loud.ends_with("done"));
    }

    #[actix_rt::test]
    async fn test_runaway_script_times_out() {
        if !php_available() {
            eprintln!("php not installed, skipping");
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(dir.path().join("code.php"));
        let engine = ExecutionEngine::new(InterpreterConfig {
            timeout_secs: Some(1),
            ..Default::default()
        });

        let err = engine
            .capture(&workspace, "while (true) {}", ErrorReporting::None)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::ExecutionTimeout { secs: 1 }));
    }
}

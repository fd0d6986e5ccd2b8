// src/config.rs
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::errors::{PipelineError, Result};

/// One external formatter invocation template.
///
/// The rendered command line is `executable args... <config_flag>=<config_path> <target>`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub executable: String,

    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default = "default_config_flag")]
    pub config_flag: String,

    pub config_path: String,
}

fn default_config_flag() -> String {
    "--config".to_string()
}

impl ToolSpec {
    /// Short display name used in logs and errors.
    pub fn name(&self) -> &str {
        Path::new(&self.executable)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.executable)
    }

    /// Arguments passed to the executable, target last.
    pub fn command_args(&self, target: &Path) -> Vec<String> {
        let mut args = self.args.clone();
        args.push(format!("{}={}", self.config_flag, self.config_path));
        args.push(target.display().to_string());
        args
    }
}

/// The three formatters run by the refactor pipeline, in execution order.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ToolsConfig {
    pub style_primary: ToolSpec,
    pub style_secondary: ToolSpec,
    pub structural: ToolSpec,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            style_primary: ToolSpec {
                executable: "phpcbf.phar".to_string(),
                args: Vec::new(),
                config_flag: "--standard".to_string(),
                config_path: "/var/www/html/.config/phpcs.xml".to_string(),
            },
            style_secondary: ToolSpec {
                executable: "php-cs-fixer.phar".to_string(),
                args: vec!["fix".to_string(), "--using-cache=no".to_string()],
                config_flag: default_config_flag(),
                config_path: "/var/www/html/.config/.php-cs-fixer.php".to_string(),
            },
            structural: ToolSpec {
                executable: "vendor/bin/rector".to_string(),
                args: vec!["process".to_string()],
                config_flag: default_config_flag(),
                config_path: "/var/www/html/.config/rector-safe.php".to_string(),
            },
        }
    }
}

/// Interpreter used by the execution engine.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct InterpreterConfig {
    pub executable: String,

    /// No limit when unset.
    pub timeout_secs: Option<u64>,

    /// Render diagnostics as HTML instead of plain text.
    pub html_errors: bool,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            executable: "php".to_string(),
            timeout_secs: None,
            html_errors: true,
        }
    }
}

impl InterpreterConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// High-level application configuration: optional TOML file plus environment overrides.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub bind_address: String,
    pub port: u16,
    pub workspace_path: PathBuf,
    pub tool_timeout_secs: u64,
    /// Largest accepted form body, in bytes.
    pub max_form_bytes: usize,
    pub interpreter: InterpreterConfig,
    pub tools: ToolsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            workspace_path: PathBuf::from("/tmp/runPhp_code.php"),
            tool_timeout_secs: 30,
            max_form_bytes: 8 * 1024 * 1024,
            interpreter: InterpreterConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_file_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// `RUNPHP_CONFIG` wins; otherwise the per-user config file when it exists.
    fn config_file_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("RUNPHP_CONFIG") {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir()
            .map(|dir| dir.join("runphp").join("config.toml"))
            .filter(|path| path.is_file())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| PipelineError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Apply `RUNPHP_*` overrides using the given variable lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("RUNPHP_BIND") {
            self.bind_address = bind;
        }
        if let Some(port) = lookup("RUNPHP_PORT") {
            self.port = port.trim().parse().map_err(|_| {
                PipelineError::Config(format!("RUNPHP_PORT is not a valid port: '{}'", port))
            })?;
        }
        if let Some(path) = lookup("RUNPHP_WORKSPACE") {
            self.workspace_path = PathBuf::from(path);
        }
        if let Some(limit) = lookup("RUNPHP_MAX_FORM_BYTES") {
            self.max_form_bytes = limit.trim().parse().map_err(|_| {
                PipelineError::Config(format!("RUNPHP_MAX_FORM_BYTES is not a byte count: '{}'", limit))
            })?;
        }
        if let Some(php) = lookup("RUNPHP_PHP") {
            self.interpreter.executable = php;
        }
        Ok(())
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }
}

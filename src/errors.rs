// src/errors.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Workspace file {} is unavailable: {source}", .path.display())]
    WorkspaceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Workspace I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tool '{tool}' timed out after {secs}s")]
    ToolTimeout { tool: String, secs: u64 },

    #[error("Execution timed out after {secs}s")]
    ExecutionTimeout { secs: u64 },

    #[error("Interpreter '{executable}' could not be started: {source}")]
    InterpreterUnavailable {
        executable: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unrecognized setting value: {0}")]
    SettingsInvalid(String),

    #[error("Malformed submission payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("Submission exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error("Malformed form body: {0}")]
    InvalidForm(String),

    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to read config file {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// HTTP status code used when the error reaches the dispatcher.
    pub fn status_code(&self) -> u16 {
        match self {
            PipelineError::InvalidPayload(_)
            | PipelineError::InvalidForm(_)
            | PipelineError::SettingsInvalid(_) => 400,
            PipelineError::PayloadTooLarge { .. } => 413,
            PipelineError::WorkspaceUnavailable { .. }
            | PipelineError::InterpreterUnavailable { .. } => 503,
            PipelineError::ToolTimeout { .. } | PipelineError::ExecutionTimeout { .. } => 504,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

// src/refactor.rs
use crate::config::{ToolSpec, ToolsConfig};
use crate::errors::{PipelineError, Result};
use crate::render::escape_lt;
use crate::tools::{ToolOutcome, ToolRunner};
use crate::workspace::Workspace;
use std::time::Instant;

/// Runs the three formatters in order over the workspace file.
#[derive(Debug, Clone)]
pub struct RefactorPipeline {
    tools: ToolsConfig,
    runner: ToolRunner,
}

impl RefactorPipeline {
    pub fn new(tools: ToolsConfig, runner: ToolRunner) -> Self {
        Self { tools, runner }
    }

    /// Each tool reads what the previous one wrote, so the order is fixed.
    fn stages(&self) -> [&ToolSpec; 3] {
        [
            &self.tools.style_primary,
            &self.tools.style_secondary,
            &self.tools.structural,
        ]
    }

    /// Format `code` and return the result with `<` escaped.
    pub async fn refactor(&self, workspace: &Workspace, code: &str) -> Result<String> {
        let start = Instant::now();
        let lease = workspace.lease().await?;
        lease.materialize(code).await?;

        for tool in self.stages() {
            if self.runner.invoke(tool, lease.path()).await == ToolOutcome::TimedOut {
                return Err(PipelineError::ToolTimeout {
                    tool: tool.name().to_string(),
                    secs: self.runner.timeout().as_secs(),
                });
            }
        }

        let formatted = lease.read_back().await?;
        log::info!("Refactor finished in {}ms", start.elapsed().as_millis());
        Ok(escape_lt(&formatted))
    }
}

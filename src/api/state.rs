// src/api/state.rs
use crate::config::AppConfig;
use crate::refactor::RefactorPipeline;
use crate::runner::ExecutionEngine;
use crate::tools::ToolRunner;
use crate::workspace::Workspace;
use actix_web::web;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub workspace: Arc<Workspace>,
    pub engine: ExecutionEngine,
    pub refactor: RefactorPipeline,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let runner = ToolRunner::new(config.tool_timeout());
        Self {
            workspace: Arc::new(Workspace::new(config.workspace_path.clone())),
            engine: ExecutionEngine::new(config.interpreter.clone()),
            refactor: RefactorPipeline::new(config.tools.clone(), runner),
            config: Arc::new(config),
        }
    }

    /// Form extractor settings; submissions carry whole source files.
    pub fn form_config(&self) -> web::FormConfig {
        web::FormConfig::default().limit(self.config.max_form_bytes)
    }
}

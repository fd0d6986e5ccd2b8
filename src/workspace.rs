// src/workspace.rs
//! The scratch file shared by the refactor pipeline and the execution engine.
//!
//! Every stage works on the same fixed path, so access goes through a lease that
//! holds the workspace lock for the whole materialize/process/read sequence.

use crate::errors::{PipelineError, Result};
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, MutexGuard};

#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    gate: Mutex<()>,
}

impl Workspace {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            gate: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Make sure the file exists and is writable. Idempotent.
    pub async fn ensure(&self) -> Result<()> {
        let unavailable = |source| PipelineError::WorkspaceUnavailable {
            path: self.path.clone(),
            source,
        };

        let created = !tokio::fs::try_exists(&self.path).await.map_err(unavailable)?;

        tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(unavailable)?;

        if created {
            log::info!("Created workspace file {}", self.path.display());
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let permissions = std::fs::Permissions::from_mode(0o777);
                tokio::fs::set_permissions(&self.path, permissions)
                    .await
                    .map_err(unavailable)?;
            }
        }
        Ok(())
    }

    /// Wait for exclusive use of the workspace.
    pub async fn lease(&self) -> Result<WorkspaceLease<'_>> {
        let guard = self.gate.lock().await;
        self.ensure().await?;
        Ok(WorkspaceLease {
            path: &self.path,
            _guard: guard,
        })
    }
}

/// Exclusive access to the workspace file; released on drop.
pub struct WorkspaceLease<'a> {
    path: &'a Path,
    _guard: MutexGuard<'a, ()>,
}

impl WorkspaceLease<'_> {
    pub fn path(&self) -> &Path {
        self.path
    }

    /// Replace the file content with `code` plus a trailing newline.
    pub async fn materialize(&self, code: &str) -> Result<()> {
        let mut content = String::with_capacity(code.len() + 1);
        content.push_str(code);
        content.push('\n');
        tokio::fs::write(self.path, content).await?;
        Ok(())
    }

    pub async fn read_back(&self) -> Result<String> {
        let bytes = tokio::fs::read(self.path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

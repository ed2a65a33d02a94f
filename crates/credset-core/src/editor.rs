//! External editor sessions

use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use crate::error::{CredentialError, Result};

/// Opens a document for the operator to edit and returns the result
#[async_trait]
pub trait Editor: Send + Sync {
    /// Edit `contents` under the suggested file name, returning the final content
    async fn edit(&self, file_name: &str, contents: &[u8]) -> Result<Vec<u8>>;
}

/// Runs the operator's editor on a temporary file
#[derive(Debug, Clone)]
pub struct ExternalEditor {
    /// Editor command line, e.g. "code --wait"
    command: String,
    /// Give up waiting after this long (None = wait forever)
    timeout: Option<Duration>,
}

impl ExternalEditor {
    /// Use the given command line
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timeout: None,
        }
    }

    /// Resolve the editor from configuration, then `VISUAL`, then `EDITOR`
    pub fn from_env(configured: Option<&str>) -> Self {
        let command = configured
            .map(str::to_string)
            .or_else(|| std::env::var("VISUAL").ok())
            .or_else(|| std::env::var("EDITOR").ok())
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| Self::platform_default().to_string());

        Self::new(command)
    }

    /// Set the timeout for the editor session
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The command line that will be run
    pub fn command(&self) -> &str {
        &self.command
    }

    fn platform_default() -> &'static str {
        if cfg!(windows) {
            "notepad"
        } else {
            "vi"
        }
    }

    fn editor_error(message: impl ToString) -> CredentialError {
        CredentialError::EditorError {
            context: "unable to open editor".to_string(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl Editor for ExternalEditor {
    async fn edit(&self, file_name: &str, contents: &[u8]) -> Result<Vec<u8>> {
        let argv = shell_words::split(&self.command)
            .map_err(|e| Self::editor_error(format!("invalid editor command {:?}: {}", self.command, e)))?;
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| Self::editor_error("no editor command configured"))?;

        let dir = tempfile::tempdir().map_err(Self::editor_error)?;
        let path = dir.path().join(file_name);
        tokio::fs::write(&path, contents)
            .await
            .map_err(Self::editor_error)?;

        debug!("Launching editor {} on {:?}", self.command, path);

        let mut child = Command::new(program)
            .args(args)
            .arg(&path)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Self::editor_error(format!("{}: {}", program, e)))?;

        let status = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait())
                .await
                .map_err(|_| Self::editor_error(format!("editor did not exit within {:?}", limit)))?,
            None => child.wait().await,
        }
        .map_err(Self::editor_error)?;

        if !status.success() {
            return Err(Self::editor_error(format!(
                "{} exited with {}",
                program, status
            )));
        }

        let edited = tokio::fs::read(&path).await.map_err(Self::editor_error)?;
        debug!("Editor returned {} bytes", edited.len());
        Ok(edited)
    }
}

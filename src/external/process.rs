//! Child process seam for the platform launcher.

use async_trait::async_trait;
use std::process::Stdio;
use thiserror::Error;

/// How a launcher process ended. Launchers print nothing useful on stdout,
/// so only stderr is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitReport {
    /// None when the process was killed by a signal
    pub code: Option<i32>,
    pub stderr: String,
}

impl ExitReport {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpawnError {
    #[error("'{program}' is not installed or not on PATH")]
    NotFound { program: String },
    #[error("Failed to run '{program}': {message}")]
    Io { program: String, message: String },
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[&str]) -> Result<ExitReport, SpawnError>;
}

/// Spawns real processes through `tokio::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioProcessRunner;

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<ExitReport, SpawnError> {
        let output = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => SpawnError::NotFound {
                    program: program.to_string(),
                },
                _ => SpawnError::Io {
                    program: program.to_string(),
                    message: e.to_string(),
                },
            })?;

        Ok(ExitReport {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

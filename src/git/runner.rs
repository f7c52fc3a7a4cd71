use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::BlameError;

/// Runs the version-control tool.
#[async_trait]
pub trait GitRunner: Send + Sync {
    /// Run with `args` in `cwd` and return stdout. A non-zero exit is an error.
    async fn run(&self, cwd: &Path, args: &[OsString]) -> Result<Vec<u8>, BlameError>;
}

/// [`GitRunner`] that spawns a child process.
///
/// The child is killed if the returned future is dropped.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: String,
}

impl ProcessRunner {
    pub fn new(program: impl Into<String>) -> Self {
        ProcessRunner {
            program: program.into(),
        }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        ProcessRunner::new("git")
    }
}

#[async_trait]
impl GitRunner for ProcessRunner {
    async fn run(&self, cwd: &Path, args: &[OsString]) -> Result<Vec<u8>, BlameError> {
        let output = Command::new(&self.program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| BlameError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(BlameError::CommandFailed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

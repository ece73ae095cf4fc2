//! Runs the external solver and captures what it prints.
//!
//! The solver is started with a single input-file argument. Both output
//! streams are drained while it runs, and an optional timeout kills the
//! process if it does not finish in time.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, info, warn};

pub const INPUT_EXTENSION: &str = "txt";
pub const REFERENCE_EXTENSION: &str = "ref";

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Failed to start solver '{executable}': {source}", executable = executable.display())]
    Spawn {
        executable: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error while running solver: {0}")]
    Io(#[from] io::Error),

    #[error("Solver exited with status {code}")]
    Failed {
        code: i32,
        stdout: String,
        stderr: String,
    },

    #[error("Solver '{executable}' timed out after {limit:?} and was killed", executable = executable.display())]
    TimedOut { executable: PathBuf, limit: Duration },
}

/// Appends `.<extension>` to `base` without replacing any dot already in its
/// file name, so `cases/h2o.pcm` becomes `cases/h2o.pcm.txt`.
pub fn derive_path(base: &Path, extension: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverCommand {
    pub executable: PathBuf,
    pub input: PathBuf,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct SolverOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl SolverCommand {
    pub fn new(executable: impl Into<PathBuf>, input: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            input: input.into(),
            timeout: None,
        }
    }

    /// Builds the command for a test case, using `<basename>.txt` as input.
    pub fn for_basename(executable: impl Into<PathBuf>, basename: &Path) -> Self {
        Self::new(executable, derive_path(basename, INPUT_EXTENSION))
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Runs the solver to completion and returns its captured output.
    ///
    /// # Errors
    ///
    /// - [`DriverError::Spawn`] if the executable cannot be started.
    /// - [`DriverError::Failed`] if it exits unsuccessfully; the captured
    ///   streams are carried in the error so the caller can echo them.
    /// - [`DriverError::TimedOut`] if the timeout expires. The child has been
    ///   killed and reaped by the time this is returned.
    pub async fn run(&self) -> Result<SolverOutput, DriverError> {
        info!(
            "Running solver {:?} with input {:?}",
            &self.executable, &self.input
        );

        let mut child = Command::new(&self.executable)
            .arg(&self.input)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| DriverError::Spawn {
                executable: self.executable.clone(),
                source,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let collected = async {
            tokio::try_join!(child.wait(), read_stream(stdout), read_stream(stderr))
        };

        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, collected).await.ok(),
            None => Some(collected.await),
        };

        let Some(result) = outcome else {
            let limit = self.timeout.unwrap_or_default();
            warn!("Solver exceeded {:?}; killing process.", limit);
            child.kill().await?;
            return Err(DriverError::TimedOut {
                executable: self.executable.clone(),
                limit,
            });
        };

        let (status, stdout, stderr) = result?;
        let output = SolverOutput {
            status,
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        };
        debug!(
            status = %output.status,
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "Solver finished."
        );

        if !output.status.success() {
            return Err(DriverError::Failed {
                code: exit_code(&output.status),
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        Ok(output)
    }
}

async fn read_stream<R: AsyncRead + Unpin>(stream: Option<R>) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    if let Some(mut stream) = stream {
        stream.read_to_end(&mut buffer).await?;
    }
    Ok(buffer)
}

/// Exit code to propagate for an unsuccessful solver run. A process killed by
/// a signal maps to `128 + signal`, matching shell convention.
pub fn exit_code(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

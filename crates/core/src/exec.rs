//! Remote command execution channel
//!
//! Dynamic resolution lists the processes inside a running container through
//! a kubectl-style exec channel. The channel is a thin trait so tests can
//! script responses; the default implementation shells out to the `kubectl`
//! binary.

use crate::errors::{ExecError, Result};
use tracing::{debug, instrument};

/// Result of invoking a remote command
#[derive(Debug, Clone)]
pub struct ExecOutput {
    /// Exit code of the remote command (-1 when killed by a signal)
    pub exit_code: i32,
    /// Captured standard output
    pub stdout: String,
}

impl ExecOutput {
    /// Whether the remote command completed successfully
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Remote exec collaborator.
///
/// A transport failure (the channel itself cannot run) is an `Err` and
/// propagates to the caller unchanged. A remote command that ran but exited
/// non-zero is an `Ok` with that exit code; resolvers treat it as "no
/// information available".
#[allow(async_fn_in_trait)]
pub trait ExecChannel {
    /// Run a command through the channel and await its full output
    async fn invoke(&self, args: &[String]) -> Result<ExecOutput>;
}

impl<T: ExecChannel> ExecChannel for &T {
    async fn invoke(&self, args: &[String]) -> Result<ExecOutput> {
        (*self).invoke(args).await
    }
}

/// Build the argument list for a full-format process listing inside a pod.
///
/// The container-scoping argument is interpolated with the actual container
/// name when one is given.
pub fn ps_command(pod: &str, container: Option<&str>) -> Vec<String> {
    let mut args = vec!["exec".to_string(), pod.to_string()];
    if let Some(container) = container {
        args.push("-c".to_string());
        args.push(container.to_string());
    }
    args.extend(["--", "ps", "-ef"].map(String::from));
    args
}

/// Exec channel backed by the `kubectl` CLI
#[derive(Debug, Clone)]
pub struct KubectlChannel {
    /// Path to the kubectl binary
    kubectl_path: String,
}

impl KubectlChannel {
    /// Create a channel using `kubectl` from PATH
    pub fn new() -> Self {
        Self {
            kubectl_path: "kubectl".to_string(),
        }
    }

    /// Create a channel with a custom kubectl binary path
    pub fn with_path(kubectl_path: String) -> Self {
        Self { kubectl_path }
    }
}

impl Default for KubectlChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecChannel for KubectlChannel {
    #[instrument(skip(self))]
    async fn invoke(&self, args: &[String]) -> Result<ExecOutput> {
        debug!("Invoking {} {:?}", self.kubectl_path, args);

        let output = tokio::process::Command::new(&self.kubectl_path)
            .args(args)
            .output()
            .await
            .map_err(|source| ExecError::Spawn {
                command: self.kubectl_path.clone(),
                source,
            })?;

        Ok(ExecOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

use crate::commands::resolve_container::{execute_resolve_container, ResolveContainerArgs};
use crate::commands::resolve_file::{execute_resolve_file, ResolveFileArgs};
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON structured format
    Json,
}

/// Log format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    Text,
    /// JSON structured format
    Json,
}

/// Runtime selection options
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum RuntimeOption {
    /// Select a resolver from the Dockerfile's base image (or --image)
    Auto,
    /// JVM-based runtimes
    Java,
    /// Node.js runtimes
    Node,
}

impl RuntimeOption {
    /// Stable runtime name for resolver lookup; `None` for auto selection
    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::Auto => None,
            Self::Java => Some("java"),
            Self::Node => Some("node"),
        }
    }
}

/// Resolve debugger and application ports for containerized workloads
#[derive(Debug, Parser)]
#[command(name = "portprobe", version, about)]
pub struct Cli {
    /// Log output format
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Result output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Never prompt; unresolved ports stay unresolved
    #[arg(long, global = true)]
    pub non_interactive: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve ports statically from a Dockerfile's launch instructions
    ResolveFile {
        /// Path to the Dockerfile
        dockerfile: PathBuf,

        /// Runtime to resolve for
        #[arg(long, value_enum, default_value = "auto")]
        runtime: RuntimeOption,
    },

    /// Resolve the debug port from a running container's process list
    ResolveContainer {
        /// Pod to exec into
        pod: String,

        /// Container within the pod
        #[arg(short = 'c', long)]
        container: Option<String>,

        /// Runtime to resolve for (required unless --image is given)
        #[arg(long, value_enum, default_value = "auto")]
        runtime: RuntimeOption,

        /// Base image name used for automatic runtime selection
        #[arg(long)]
        image: Option<String>,

        /// Path to the kubectl binary
        #[arg(long, default_value = "kubectl")]
        kubectl_path: String,
    },
}

impl Cli {
    pub async fn dispatch(self) -> Result<()> {
        let log_format = match self.log_format {
            Some(LogFormat::Text) => Some("text"),
            Some(LogFormat::Json) => Some("json"),
            None => None,
        };
        portprobe_core::logging::init(log_format)?;

        match self.command {
            Commands::ResolveFile {
                dockerfile,
                runtime,
            } => {
                execute_resolve_file(ResolveFileArgs {
                    dockerfile,
                    runtime,
                    non_interactive: self.non_interactive,
                    output: self.output,
                })
                .await
            }
            Commands::ResolveContainer {
                pod,
                container,
                runtime,
                image,
                kubectl_path,
            } => {
                execute_resolve_container(ResolveContainerArgs {
                    pod,
                    container,
                    runtime,
                    image,
                    kubectl_path,
                    non_interactive: self.non_interactive,
                    output: self.output,
                })
                .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolve_file() {
        let cli = Cli::parse_from(["portprobe", "resolve-file", "Dockerfile", "--runtime", "java"]);
        assert!(matches!(
            cli.command,
            Commands::ResolveFile {
                runtime: RuntimeOption::Java,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_resolve_container_with_scope() {
        let cli = Cli::parse_from([
            "portprobe",
            "resolve-container",
            "my-pod",
            "-c",
            "app",
            "--image",
            "node:18",
            "--non-interactive",
        ]);
        assert!(cli.non_interactive);
        match cli.command {
            Commands::ResolveContainer { pod, container, image, .. } => {
                assert_eq!(pod, "my-pod");
                assert_eq!(container.as_deref(), Some("app"));
                assert_eq!(image.as_deref(), Some("node:18"));
            }
            _ => panic!("expected resolve-container"),
        }
    }

    #[test]
    fn test_runtime_option_names() {
        assert_eq!(RuntimeOption::Auto.name(), None);
        assert_eq!(RuntimeOption::Java.name(), Some("java"));
        assert_eq!(RuntimeOption::Node.name(), Some("node"));
    }
}

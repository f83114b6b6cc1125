//! Dynamic (running container) port resolution command

use crate::cli::{OutputFormat, RuntimeOption};
use crate::commands::{emit_report, ResolveReport};
use crate::prompt::TerminalPrompt;
use anyhow::{anyhow, Result};
use portprobe_core::errors::ProbeError;
use portprobe_core::exec::KubectlChannel;
use portprobe_core::ports::EnvOverlay;
use portprobe_core::prompt::SilentPrompt;
use portprobe_core::resolver::{DockerResolver, RuntimeResolver};
use tracing::debug;

/// Arguments for the resolve-container command
#[derive(Debug, Clone)]
pub struct ResolveContainerArgs {
    /// Pod to exec into
    pub pod: String,
    /// Container within the pod
    pub container: Option<String>,
    /// Runtime selection
    pub runtime: RuntimeOption,
    /// Base image for automatic runtime selection
    pub image: Option<String>,
    /// Path to the kubectl binary
    pub kubectl_path: String,
    /// Never prompt
    pub non_interactive: bool,
    /// Output format
    pub output: OutputFormat,
}

pub async fn execute_resolve_container(args: ResolveContainerArgs) -> Result<()> {
    let resolver = match args.runtime.name() {
        Some(name) => RuntimeResolver::by_name(name)
            .ok_or_else(|| anyhow!("Unknown runtime: {}", name))?,
        None => {
            let image = args.image.as_deref().ok_or_else(|| {
                anyhow!("--runtime auto requires --image to select a resolver")
            })?;
            RuntimeResolver::for_image(image).ok_or_else(|| ProbeError::UnsupportedImage {
                image: image.to_string(),
            })?
        }
    };
    debug!(
        "Selected {} resolver for pod {}",
        resolver.runtime_name(),
        args.pod
    );

    let channel = KubectlChannel::with_path(args.kubectl_path.clone());
    let container = args.container.as_deref();
    let ports = if args.non_interactive {
        resolver
            .resolve_ports_from_container(&channel, &args.pod, container, &SilentPrompt)
            .await?
    } else {
        resolver
            .resolve_ports_from_container(&channel, &args.pod, container, &TerminalPrompt::new())
            .await?
    };

    emit_report(
        &ResolveReport {
            runtime: resolver.runtime_name().to_string(),
            ports,
            env: EnvOverlay::new(),
        },
        args.output,
    )
}

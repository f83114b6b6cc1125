//! Static (Dockerfile) port resolution command

use crate::cli::{OutputFormat, RuntimeOption};
use crate::commands::{emit_report, ResolveReport};
use crate::prompt::TerminalPrompt;
use anyhow::{anyhow, Result};
use portprobe_core::dockerfile::ParsedDockerfile;
use portprobe_core::errors::ProbeError;
use portprobe_core::ports::EnvOverlay;
use portprobe_core::prompt::SilentPrompt;
use portprobe_core::resolver::{DockerResolver, RuntimeResolver};
use std::path::PathBuf;
use tracing::debug;

/// Arguments for the resolve-file command
#[derive(Debug, Clone)]
pub struct ResolveFileArgs {
    /// Path to the Dockerfile
    pub dockerfile: PathBuf,
    /// Runtime selection
    pub runtime: RuntimeOption,
    /// Never prompt
    pub non_interactive: bool,
    /// Output format
    pub output: OutputFormat,
}

pub async fn execute_resolve_file(args: ResolveFileArgs) -> Result<()> {
    let parsed = ParsedDockerfile::from_path(&args.dockerfile)?;

    let resolver = match args.runtime.name() {
        Some(name) => RuntimeResolver::by_name(name)
            .ok_or_else(|| anyhow!("Unknown runtime: {}", name))?,
        None => {
            let image = parsed.base_image().ok_or_else(|| {
                anyhow!(
                    "{} has no FROM instruction; select a runtime with --runtime",
                    args.dockerfile.display()
                )
            })?;
            RuntimeResolver::for_image(image).ok_or_else(|| ProbeError::UnsupportedImage {
                image: image.to_string(),
            })?
        }
    };
    debug!("Selected {} resolver", resolver.runtime_name());

    let mut env = EnvOverlay::new();
    let ports = if args.non_interactive {
        resolver
            .resolve_ports_from_file(&parsed, &mut env, &SilentPrompt)
            .await?
    } else {
        resolver
            .resolve_ports_from_file(&parsed, &mut env, &TerminalPrompt::new())
            .await?
    };

    emit_report(
        &ResolveReport {
            runtime: resolver.runtime_name().to_string(),
            ports,
            env,
        },
        args.output,
    )
}

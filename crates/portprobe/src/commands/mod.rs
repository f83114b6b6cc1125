//! Command implementations for the portprobe CLI

pub mod resolve_container;
pub mod resolve_file;

use crate::cli::OutputFormat;
use anyhow::Result;
use portprobe_core::ports::{EnvOverlay, PortInfo};
use serde::Serialize;

/// Resolution outcome emitted on stdout
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveReport {
    /// Runtime the selected resolver handles
    pub runtime: String,
    /// Resolved ports
    #[serde(flatten)]
    pub ports: PortInfo,
    /// Environment defaults the resolution pinned
    #[serde(skip_serializing_if = "EnvOverlay::is_empty")]
    pub env: EnvOverlay,
}

/// Print a report in the requested output format
pub fn emit_report(report: &ResolveReport, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(report)?);
        }
        OutputFormat::Text => {
            println!("Runtime:    {}", report.runtime);
            println!(
                "Debug port: {}",
                report.ports.debug.as_deref().unwrap_or("<unresolved>")
            );
            println!(
                "App port:   {}",
                report.ports.app.as_deref().unwrap_or("<unresolved>")
            );
            if !report.env.is_empty() {
                println!("Environment overrides:");
                for (name, value) in &report.env {
                    println!("  {}={}", name, value);
                }
            }
        }
    }
    Ok(())
}

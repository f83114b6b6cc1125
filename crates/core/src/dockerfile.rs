//! Dockerfile launch-argument parsing
//!
//! Static resolution works against the effective launch command of a
//! Dockerfile: the ENTRYPOINT/CMD instructions plus ENV-provided values,
//! concatenated into one searchable text. The `DockerParser` trait is the
//! seam resolvers consume; `ParsedDockerfile` is the bundled implementation.
//!
//! The parse here is deliberately shallow: it understands comments, line
//! continuations, exec-form and shell-form ENTRYPOINT/CMD, both ENV
//! spellings, and multi-port EXPOSE. It does not evaluate build args or
//! multi-stage copy semantics.

use crate::errors::{DockerfileError, Result};
use regex::{Captures, Regex};
use std::path::Path;
use tracing::debug;

/// Launch-argument parser collaborator consumed by resolvers
pub trait DockerParser {
    /// Search the launch-command text with a pattern, exposing its captures
    fn search_launch_args<'a>(&'a self, pattern: &Regex) -> Option<Captures<'a>>;

    /// Ordered ports declared by EXPOSE instructions.
    ///
    /// Elements are literal port numbers or variable-reference tokens such
    /// as `${PORT}`.
    fn exposed_ports(&self) -> Vec<String>;
}

/// A shallowly parsed Dockerfile
#[derive(Debug, Clone, Default)]
pub struct ParsedDockerfile {
    launch_args: String,
    exposed_ports: Vec<String>,
    base_image: Option<String>,
}

impl ParsedDockerfile {
    /// Parse Dockerfile text
    pub fn parse(content: &str) -> Self {
        let mut entrypoint: Option<String> = None;
        let mut cmd: Option<String> = None;
        let mut env_values: Vec<String> = Vec::new();
        let mut exposed_ports: Vec<String> = Vec::new();
        let mut base_image: Option<String> = None;

        let mut logical = String::new();
        for raw in content.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(stripped) = line.strip_suffix('\\') {
                logical.push_str(stripped.trim_end());
                logical.push(' ');
                continue;
            }
            logical.push_str(line);

            if let Some((keyword, rest)) = split_instruction(&logical) {
                match keyword.as_str() {
                    // Multi-stage builds: the last FROM names the runtime image
                    "FROM" => base_image = rest.split_whitespace().next().map(str::to_string),
                    "ENTRYPOINT" => entrypoint = Some(command_text(rest)),
                    "CMD" => cmd = Some(command_text(rest)),
                    "ENV" => env_values.push(env_values_text(rest)),
                    "EXPOSE" => {
                        for token in rest.split_whitespace() {
                            // Strip an optional /tcp or /udp suffix; variable
                            // tokens pass through verbatim
                            let port = token.split('/').next().unwrap_or(token);
                            exposed_ports.push(port.to_string());
                        }
                    }
                    _ => {}
                }
            }
            logical.clear();
        }

        let mut segments: Vec<String> = Vec::new();
        segments.extend(entrypoint);
        segments.extend(cmd);
        segments.extend(env_values.into_iter().filter(|v| !v.is_empty()));
        let launch_args = segments.join(" ");

        debug!(
            "Parsed Dockerfile: launch_args={:?}, exposed_ports={:?}",
            launch_args, exposed_ports
        );

        Self {
            launch_args,
            exposed_ports,
            base_image,
        }
    }

    /// Read and parse a Dockerfile from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DockerfileError::NotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        let content = std::fs::read_to_string(path).map_err(DockerfileError::Io)?;
        Ok(Self::parse(&content))
    }

    /// The base image named by the (last) FROM instruction
    pub fn base_image(&self) -> Option<&str> {
        self.base_image.as_deref()
    }

    /// The concatenated launch-command text
    pub fn launch_args(&self) -> &str {
        &self.launch_args
    }
}

impl DockerParser for ParsedDockerfile {
    fn search_launch_args<'a>(&'a self, pattern: &Regex) -> Option<Captures<'a>> {
        pattern.captures(&self.launch_args)
    }

    fn exposed_ports(&self) -> Vec<String> {
        self.exposed_ports.clone()
    }
}

fn split_instruction(line: &str) -> Option<(String, &str)> {
    let mut parts = line.splitn(2, char::is_whitespace);
    let keyword = parts.next()?.to_ascii_uppercase();
    let rest = parts.next().unwrap_or("").trim();
    Some((keyword, rest))
}

/// Render an ENTRYPOINT/CMD value as plain command text.
///
/// Exec form (`["java", "-jar", "app.jar"]`) is JSON; anything that fails to
/// parse as JSON is taken as shell form verbatim.
fn command_text(rest: &str) -> String {
    if rest.starts_with('[') {
        if let Ok(words) = serde_json::from_str::<Vec<String>>(rest) {
            return words.join(" ");
        }
    }
    rest.to_string()
}

/// Extract the values of an ENV instruction.
///
/// Handles both the `ENV key=value key2=value2` form and the legacy
/// `ENV key value` form.
fn env_values_text(rest: &str) -> String {
    if rest.split_whitespace().next().is_some_and(|t| t.contains('=')) {
        rest.split_whitespace()
            .filter_map(|token| token.split_once('='))
            .map(|(_, value)| value.trim_matches('"').to_string())
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        match rest.split_once(char::is_whitespace) {
            Some((_, value)) => value.trim().trim_matches('"').to_string(),
            None => String::new(),
        }
    }
}

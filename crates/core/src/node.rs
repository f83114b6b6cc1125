//! Node.js runtime resolver
//!
//! Covers both inspector generations: the legacy `--debug` flag (default
//! port 5858) and the current `--inspect` flag (default port 9229), with or
//! without an explicit `=host:port` address. A launch command that only
//! references `${NODE_OPTIONS}` gets a default inspector flag pinned into
//! the environment overlay, mirroring the runtime's own support for
//! inspector flags in that variable.

use crate::dockerfile::DockerParser;
use crate::errors::Result;
use crate::exec::{ps_command, ExecChannel};
use crate::ports::{EnvOverlay, PortInfo};
use crate::proclist;
use crate::prompt::PromptUi;
use crate::resolver::{prompt_debug_port, resolve_app_port, DockerResolver};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

const DEFAULT_INSPECT_PORT: &str = "9229";
const DEFAULT_LEGACY_DEBUG_PORT: &str = "5858";
const DEFAULT_NODE_APP_PORT: &str = "9000";
const DEFAULT_NODE_DEBUG_OPTS: &str = "--inspect=9229";

/// Image identifiers the Node resolver claims
const NODE_IMAGE_IDS: &[&str] = &["node"];

/// Well-known default debug ports excluded from app-port candidates
const NODE_RESERVED_DEBUG_PORTS: &[&str] = &[DEFAULT_INSPECT_PORT, DEFAULT_LEGACY_DEBUG_PORT];

/// Inspector flag; capture 2 is the flag keyword, capture 3 the `=address`
const NODE_DEBUG_OPTS_PATTERN: &str = r"(--)?(debug|inspect)(=\S*)?";

/// Launcher anchor for full process commands, so unrelated processes whose
/// arguments merely contain "debug" or "inspect" are not falsely matched
const NODE_LAUNCHER_PATTERN: &str = r"(?i)^node(js)?\s";

/// `$NODE_OPTIONS` / `${NODE_OPTIONS}` sentinel
const NODE_OPTIONS_SENTINEL_PATTERN: &str = r"\$\{?NODE_OPTIONS\}?";

static NODE_DEBUG_OPTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(NODE_DEBUG_OPTS_PATTERN).expect("node debug pattern should be valid"));
static NODE_LAUNCHER: Lazy<Regex> =
    Lazy::new(|| Regex::new(NODE_LAUNCHER_PATTERN).expect("node launcher pattern should be valid"));
static NODE_OPTIONS_SENTINEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(NODE_OPTIONS_SENTINEL_PATTERN).expect("node sentinel pattern should be valid")
});

/// Derive the debug port from a matched inspector flag.
///
/// A flag without an address opens the generation's default port; with an
/// address the port is the trailing colon-delimited segment.
fn port_from_flag(keyword: &str, address: Option<&str>) -> Option<String> {
    match address {
        None => Some(default_port_for(keyword).to_string()),
        Some(address) => address
            .strip_prefix('=')
            .unwrap_or(address)
            .rsplit(':')
            .next()
            .filter(|segment| !segment.is_empty())
            .map(str::to_string),
    }
}

fn default_port_for(keyword: &str) -> &'static str {
    if keyword.eq_ignore_ascii_case("inspect") {
        DEFAULT_INSPECT_PORT
    } else {
        DEFAULT_LEGACY_DEBUG_PORT
    }
}

/// Port resolver for Node.js container images
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeDockerResolver;

impl DockerResolver for NodeDockerResolver {
    fn runtime_name(&self) -> &'static str {
        "node"
    }

    fn is_supported_image(&self, base_image: &str) -> bool {
        let image = base_image.to_lowercase();
        NODE_IMAGE_IDS.iter().any(|id| image.contains(id))
    }

    #[instrument(skip_all)]
    async fn resolve_ports_from_file<P, U>(
        &self,
        parser: &P,
        env: &mut EnvOverlay,
        ui: &U,
    ) -> Result<PortInfo>
    where
        P: DockerParser,
        U: PromptUi,
    {
        let mut ports = PortInfo::new();

        // Stage 1: explicit inspector flag in the launch command
        if let Some(caps) = parser.search_launch_args(&NODE_DEBUG_OPTS) {
            let keyword = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
            let address = caps.get(3).map(|m| m.as_str());
            ports.debug = port_from_flag(keyword, address);
            debug!("Debug port from inspector flag: {:?}", ports.debug);
        } else if parser.search_launch_args(&NODE_OPTIONS_SENTINEL).is_some() {
            // Stage 2: NODE_OPTIONS sentinel
            env.insert("NODE_OPTIONS".to_string(), DEFAULT_NODE_DEBUG_OPTS.to_string());
            ports.debug = Some(DEFAULT_INSPECT_PORT.to_string());
            debug!("Debug port pinned via NODE_OPTIONS sentinel");
        }

        // Stage 3: interactive fallback
        if ports.debug.is_none() {
            ports.debug = prompt_debug_port(ui, "Dockerfile", DEFAULT_INSPECT_PORT).await?;
        }
        let Some(debug_port) = ports.debug.clone() else {
            return Ok(ports);
        };

        ports.app = resolve_app_port(
            parser,
            &debug_port,
            NODE_RESERVED_DEBUG_PORTS,
            DEFAULT_NODE_APP_PORT,
            env,
            ui,
        )
        .await?;

        Ok(ports)
    }

    #[instrument(skip(self, exec, ui))]
    async fn resolve_ports_from_container<E, U>(
        &self,
        exec: &E,
        pod: &str,
        container: Option<&str>,
        ui: &U,
    ) -> Result<PortInfo>
    where
        E: ExecChannel,
        U: PromptUi,
    {
        let mut ports = PortInfo::new();

        let result = exec.invoke(&ps_command(pod, container)).await?;
        if result.success() {
            for command in proclist::commands(&result.stdout) {
                if !NODE_LAUNCHER.is_match(&command) {
                    continue;
                }
                if let Some(caps) = NODE_DEBUG_OPTS.captures(&command) {
                    let keyword = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
                    let address = caps.get(3).map(|m| m.as_str());
                    ports.debug = port_from_flag(keyword, address);
                    debug!("Debug port from process list: {:?}", ports.debug);
                    break;
                }
            }
        } else {
            debug!(
                "Process listing exited with {}; no dynamic info",
                result.exit_code
            );
        }

        if ports.debug.is_none() {
            ports.debug = prompt_debug_port(ui, "container", DEFAULT_INSPECT_PORT).await?;
        }

        Ok(ports)
    }
}

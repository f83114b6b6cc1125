//! Per-runtime port resolution
//!
//! One resolver per supported runtime, all satisfying the `DockerResolver`
//! contract: a pure image predicate, static resolution over a Dockerfile's
//! launch arguments, and dynamic resolution over the process list of a
//! running container. Resolvers are stateless and reentrant; selection is a
//! linear scan in declaration order, not a hierarchy.
//!
//! Absence of information is never an error in this module. Every stage has
//! a defined fallback that terminates at a user prompt, and ultimately at a
//! `PortInfo` with `None` fields if the user declines to answer.

use crate::dockerfile::DockerParser;
use crate::errors::Result;
use crate::exec::ExecChannel;
use crate::java::JavaDockerResolver;
use crate::node::NodeDockerResolver;
use crate::ports::{filter_candidates, EnvOverlay, PortInfo};
use crate::prompt::PromptUi;
use crate::variable;
use tracing::debug;

/// Port resolution contract implemented by every runtime resolver
#[allow(async_fn_in_trait)]
pub trait DockerResolver {
    /// Short runtime identifier (e.g. "java", "node")
    fn runtime_name(&self) -> &'static str;

    /// Whether this resolver applies to the given base image
    fn is_supported_image(&self, base_image: &str) -> bool;

    /// Resolve ports statically from a Dockerfile's launch arguments.
    ///
    /// Pinned defaults (sentinel debug flags, variable app ports) are
    /// written into `env` as a side effect.
    async fn resolve_ports_from_file<P, U>(
        &self,
        parser: &P,
        env: &mut EnvOverlay,
        ui: &U,
    ) -> Result<PortInfo>
    where
        P: DockerParser,
        U: PromptUi;

    /// Resolve the debug port dynamically from the process list of a
    /// running container.
    ///
    /// This path never resolves an app port: a running container's exposed
    /// ports are not discoverable from its process list.
    async fn resolve_ports_from_container<E, U>(
        &self,
        exec: &E,
        pod: &str,
        container: Option<&str>,
        ui: &U,
    ) -> Result<PortInfo>
    where
        E: ExecChannel,
        U: PromptUi;
}

/// Extract the port from an `address=...` capture.
///
/// The address may be a bare port or `host:port`; the port is always the
/// trailing colon-delimited segment. An empty segment counts as unresolved.
pub(crate) fn port_from_address(capture: &str) -> Option<String> {
    let value = capture.splitn(2, '=').nth(1)?;
    value
        .rsplit(':')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Ask the user for a debug port, trimming whitespace and treating empty
/// input as unresolved.
pub(crate) async fn prompt_debug_port<U: PromptUi>(
    ui: &U,
    source: &str,
    example: &str,
) -> Result<Option<String>> {
    let prompt = format!(
        "Please specify debug port exposed by the {} (e.g. {})",
        source, example
    );
    let input = ui.ask_text(&prompt, example).await?;
    Ok(input
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

/// Disambiguate the app port among the Dockerfile's exposed ports.
///
/// Excludes the resolved debug port and the runtime's reserved default
/// debug ports; a single survivor is taken automatically, several survivors
/// go to a choice prompt, zero leave the app port unresolved. A variable
/// survivor is pinned to `default_app_port` through the overlay.
pub(crate) async fn resolve_app_port<P, U>(
    parser: &P,
    debug_port: &str,
    reserved: &[&str],
    default_app_port: &str,
    env: &mut EnvOverlay,
    ui: &U,
) -> Result<Option<String>>
where
    P: DockerParser,
    U: PromptUi,
{
    let exposed = parser.exposed_ports();
    if exposed.is_empty() {
        return Ok(None);
    }

    let candidates = filter_candidates(&exposed, debug_port, reserved);
    debug!("App port candidates after filtering: {:?}", candidates);

    let mut app = match candidates.len() {
        0 => None,
        1 => Some(candidates[0].clone()),
        _ => {
            ui.ask_choice(&candidates, "Please select the app port exposed at Dockerfile")
                .await?
        }
    };

    if let Some(port) = &app {
        if let Some(name) = variable::variable_name(port) {
            env.insert(name.to_string(), default_app_port.to_string());
            app = Some(default_app_port.to_string());
        }
    }

    Ok(app)
}

/// Concrete resolver family, dispatched by runtime
#[derive(Debug, Clone, Copy)]
pub enum RuntimeResolver {
    /// JVM-based runtimes
    Java(JavaDockerResolver),
    /// Node.js runtimes
    Node(NodeDockerResolver),
}

impl RuntimeResolver {
    /// All registered resolvers, in selection precedence order
    pub fn all() -> [RuntimeResolver; 2] {
        [
            RuntimeResolver::Java(JavaDockerResolver),
            RuntimeResolver::Node(NodeDockerResolver),
        ]
    }

    /// Select the first resolver that supports the given base image
    pub fn for_image(base_image: &str) -> Option<RuntimeResolver> {
        Self::all()
            .into_iter()
            .find(|resolver| resolver.is_supported_image(base_image))
    }

    /// Look up a resolver by its runtime name
    pub fn by_name(name: &str) -> Option<RuntimeResolver> {
        Self::all()
            .into_iter()
            .find(|resolver| resolver.runtime_name() == name)
    }
}

impl DockerResolver for RuntimeResolver {
    fn runtime_name(&self) -> &'static str {
        match self {
            Self::Java(resolver) => resolver.runtime_name(),
            Self::Node(resolver) => resolver.runtime_name(),
        }
    }

    fn is_supported_image(&self, base_image: &str) -> bool {
        match self {
            Self::Java(resolver) => resolver.is_supported_image(base_image),
            Self::Node(resolver) => resolver.is_supported_image(base_image),
        }
    }

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
        match self {
            Self::Java(resolver) => resolver.resolve_ports_from_file(parser, env, ui).await,
            Self::Node(resolver) => resolver.resolve_ports_from_file(parser, env, ui).await,
        }
    }

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
        match self {
            Self::Java(resolver) => {
                resolver
                    .resolve_ports_from_container(exec, pod, container, ui)
                    .await
            }
            Self::Node(resolver) => {
                resolver
                    .resolve_ports_from_container(exec, pod, container, ui)
                    .await
            }
        }
    }
}

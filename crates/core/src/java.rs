//! JVM runtime resolver
//!
//! Recognizes JDWP agent flags in both their historical spellings
//! (`-agentlib:jdwp` and the older `-Xrunjdwp`) and supports the `JAVA_OPTS`
//! sentinel convention: when the launch command only references
//! `${JAVA_OPTS}`, a complete default agent flag is pinned into the
//! environment overlay so the container actually opens the debug port.

use crate::dockerfile::DockerParser;
use crate::errors::Result;
use crate::exec::{ps_command, ExecChannel};
use crate::ports::{EnvOverlay, PortInfo};
use crate::prompt::PromptUi;
use crate::resolver::{port_from_address, prompt_debug_port, resolve_app_port, DockerResolver};
use crate::proclist;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

const DEFAULT_JAVA_DEBUG_PORT: &str = "5005";
const DEFAULT_JAVA_APP_PORT: &str = "9000";
const DEFAULT_JAVA_DEBUG_OPTS: &str =
    "-agentlib:jdwp=transport=dt_socket,server=y,suspend=y,address=5005,quiet=y";

/// Image identifiers the JVM resolver claims
const JAVA_IMAGE_IDS: &[&str] = &["java", "openjdk", "oracle"];

/// Well-known default debug ports excluded from app-port candidates
const JAVA_RESERVED_DEBUG_PORTS: &[&str] = &[DEFAULT_JAVA_DEBUG_PORT];

/// JDWP agent flag within launch arguments; capture 2 carries `address=...`
const JAVA_DEBUG_OPTS_PATTERN: &str = r"(?i)(-agentlib|-Xrunjdwp):\S*(address=[^\s,]+)";

/// JDWP agent flag within a full process command, anchored at the launcher
const FULL_JAVA_DEBUG_OPTS_PATTERN: &str =
    r"(?i)^java\s+.*(-agentlib|-Xrunjdwp):\S*(address=[^\s,]+)\S*";

/// `$JAVA_OPTS` / `${JAVA_OPTS}` sentinel
const JAVA_OPTS_SENTINEL_PATTERN: &str = r"\$\{?JAVA_OPTS\}?";

static JAVA_DEBUG_OPTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(JAVA_DEBUG_OPTS_PATTERN).expect("java debug pattern should be valid"));
static FULL_JAVA_DEBUG_OPTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(FULL_JAVA_DEBUG_OPTS_PATTERN).expect("full java debug pattern should be valid")
});
static JAVA_OPTS_SENTINEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(JAVA_OPTS_SENTINEL_PATTERN).expect("java sentinel pattern should be valid")
});

/// Port resolver for JVM-based container images
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaDockerResolver;

impl DockerResolver for JavaDockerResolver {
    fn runtime_name(&self) -> &'static str {
        "java"
    }

    fn is_supported_image(&self, base_image: &str) -> bool {
        let image = base_image.to_lowercase();
        JAVA_IMAGE_IDS.iter().any(|id| image.contains(id))
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

        // Stage 1: explicit agent flag in the launch command
        if let Some(caps) = parser.search_launch_args(&JAVA_DEBUG_OPTS) {
            ports.debug = caps.get(2).and_then(|m| port_from_address(m.as_str()));
            debug!("Debug port from agent flag: {:?}", ports.debug);
        } else if parser.search_launch_args(&JAVA_OPTS_SENTINEL).is_some() {
            // Stage 2: JAVA_OPTS sentinel; pin a full default agent flag so
            // the container opens the default debug port
            env.insert("JAVA_OPTS".to_string(), DEFAULT_JAVA_DEBUG_OPTS.to_string());
            ports.debug = Some(DEFAULT_JAVA_DEBUG_PORT.to_string());
            debug!("Debug port pinned via JAVA_OPTS sentinel");
        }

        // Stage 3: interactive fallback
        if ports.debug.is_none() {
            ports.debug = prompt_debug_port(ui, "Dockerfile", DEFAULT_JAVA_DEBUG_PORT).await?;
        }
        let Some(debug_port) = ports.debug.clone() else {
            // App-port resolution is meaningless without a debug port
            return Ok(ports);
        };

        ports.app = resolve_app_port(
            parser,
            &debug_port,
            JAVA_RESERVED_DEBUG_PORTS,
            DEFAULT_JAVA_APP_PORT,
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
                if let Some(caps) = FULL_JAVA_DEBUG_OPTS.captures(&command) {
                    ports.debug = caps.get(2).and_then(|m| port_from_address(m.as_str()));
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
            ports.debug = prompt_debug_port(ui, "container", DEFAULT_JAVA_DEBUG_PORT).await?;
        }

        Ok(ports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dockerfile::ParsedDockerfile;
    use crate::errors::Result;
    use crate::exec::ExecOutput;
    use crate::prompt::{ScriptedPrompt, SilentPrompt};

    struct ScriptedExec {
        exit_code: i32,
        stdout: &'static str,
    }

    impl ExecChannel for ScriptedExec {
        async fn invoke(&self, _args: &[String]) -> Result<ExecOutput> {
            Ok(ExecOutput {
                exit_code: self.exit_code,
                stdout: self.stdout.to_string(),
            })
        }
    }

    fn resolver() -> JavaDockerResolver {
        JavaDockerResolver
    }

    #[test]
    fn test_supported_images() {
        let resolver = resolver();
        assert!(resolver.is_supported_image("openjdk:11-jre"));
        assert!(resolver.is_supported_image("oracle/graalvm-ce"));
        assert!(resolver.is_supported_image("amazoncorretto-java:17"));
        assert!(resolver.is_supported_image("OpenJDK:11"));
        assert!(!resolver.is_supported_image("node:18"));
    }

    #[test]
    fn test_default_opts_pin_the_default_port() {
        assert!(DEFAULT_JAVA_DEBUG_OPTS.contains(DEFAULT_JAVA_DEBUG_PORT));
    }

    #[tokio::test]
    async fn test_agentlib_flag_with_exposed_ports() {
        let parser = ParsedDockerfile::parse(
            "FROM openjdk:11\nEXPOSE 5005 8080\nCMD java -agentlib:jdwp=transport=dt_socket,server=y,suspend=y,address=5005,quiet=y -jar app.jar\n",
        );
        let mut env = EnvOverlay::new();
        let ports = resolver()
            .resolve_ports_from_file(&parser, &mut env, &SilentPrompt)
            .await
            .unwrap();
        assert_eq!(ports.debug, Some("5005".to_string()));
        assert_eq!(ports.app, Some("8080".to_string()));
        assert!(env.is_empty());
    }

    #[tokio::test]
    async fn test_xrunjdwp_flag_with_host_and_port() {
        let parser = ParsedDockerfile::parse(
            "FROM openjdk:8\nCMD java -Xrunjdwp:transport=dt_socket,server=y,address=0.0.0.0:8000 -jar app.jar\n",
        );
        let mut env = EnvOverlay::new();
        let ports = resolver()
            .resolve_ports_from_file(&parser, &mut env, &SilentPrompt)
            .await
            .unwrap();
        assert_eq!(ports.debug, Some("8000".to_string()));
    }

    #[tokio::test]
    async fn test_java_opts_sentinel_pins_overlay() {
        let parser =
            ParsedDockerfile::parse("FROM openjdk:11\nEXPOSE 8080\nCMD java ${JAVA_OPTS} -jar app.jar\n");
        let mut env = EnvOverlay::new();
        let ports = resolver()
            .resolve_ports_from_file(&parser, &mut env, &SilentPrompt)
            .await
            .unwrap();
        assert_eq!(ports.debug, Some("5005".to_string()));
        assert_eq!(ports.app, Some("8080".to_string()));
        assert_eq!(env.get("JAVA_OPTS"), Some(&DEFAULT_JAVA_DEBUG_OPTS.to_string()));
    }

    #[tokio::test]
    async fn test_prompt_fallback_resolves_debug_only() {
        let parser = ParsedDockerfile::parse("FROM openjdk:11\nCMD java -jar app.jar\n");
        let mut env = EnvOverlay::new();
        let ui = ScriptedPrompt::new([Some(" 6006 ".to_string())]);
        let ports = resolver()
            .resolve_ports_from_file(&parser, &mut env, &ui)
            .await
            .unwrap();
        assert_eq!(ports.debug, Some("6006".to_string()));
        assert_eq!(ports.app, None);
    }

    #[tokio::test]
    async fn test_declined_prompt_returns_early() {
        let parser =
            ParsedDockerfile::parse("FROM openjdk:11\nEXPOSE 8080 8443\nCMD java -jar app.jar\n");
        let mut env = EnvOverlay::new();
        let ports = resolver()
            .resolve_ports_from_file(&parser, &mut env, &SilentPrompt)
            .await
            .unwrap();
        assert_eq!(ports, PortInfo::new());
    }

    #[tokio::test]
    async fn test_multiple_candidates_go_to_choice_prompt() {
        let parser = ParsedDockerfile::parse(
            "FROM openjdk:11\nEXPOSE 8080 8443\nCMD java -agentlib:jdwp=address=5005 -jar app.jar\n",
        );
        let mut env = EnvOverlay::new();
        let ui = ScriptedPrompt::new([Some("8443".to_string())]);
        let ports = resolver()
            .resolve_ports_from_file(&parser, &mut env, &ui)
            .await
            .unwrap();
        assert_eq!(ports.debug, Some("5005".to_string()));
        assert_eq!(ports.app, Some("8443".to_string()));
    }

    #[tokio::test]
    async fn test_variable_app_port_is_pinned() {
        let parser = ParsedDockerfile::parse(
            "FROM openjdk:11\nEXPOSE ${SERVER_PORT}\nCMD java -agentlib:jdwp=address=5005 -jar app.jar\n",
        );
        let mut env = EnvOverlay::new();
        let ports = resolver()
            .resolve_ports_from_file(&parser, &mut env, &SilentPrompt)
            .await
            .unwrap();
        assert_eq!(ports.app, Some(DEFAULT_JAVA_APP_PORT.to_string()));
        assert_eq!(
            env.get("SERVER_PORT"),
            Some(&DEFAULT_JAVA_APP_PORT.to_string())
        );
    }

    #[tokio::test]
    async fn test_overlay_preserves_insertion_order() {
        let parser = ParsedDockerfile::parse(
            "FROM openjdk:11\nEXPOSE ${SERVER_PORT}\nCMD java ${JAVA_OPTS} -jar app.jar\n",
        );
        let mut env = EnvOverlay::new();
        resolver()
            .resolve_ports_from_file(&parser, &mut env, &SilentPrompt)
            .await
            .unwrap();
        let keys: Vec<&String> = env.keys().collect();
        assert_eq!(keys, vec!["JAVA_OPTS", "SERVER_PORT"]);
    }

    #[tokio::test]
    async fn test_idempotent_resolution() {
        let parser = ParsedDockerfile::parse(
            "FROM openjdk:11\nEXPOSE 5005 8080\nCMD java -agentlib:jdwp=address=5005 -jar app.jar\n",
        );
        let mut env = EnvOverlay::new();
        let first = resolver()
            .resolve_ports_from_file(&parser, &mut env, &SilentPrompt)
            .await
            .unwrap();
        let second = resolver()
            .resolve_ports_from_file(&parser, &mut env, &SilentPrompt)
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_container_resolution_scans_process_list() {
        let exec = ScriptedExec {
            exit_code: 0,
            stdout: "\
UID        PID  PPID  C STIME TTY          TIME CMD
root         1
root         7     1  0 05:49 ?        00:00:00 bash
root        12     1  0 05:50 ?        00:00:01 java -agentlib:jdwp=transport=dt_socket,server=y,address=127.0.0.1:5005 -jar app.jar
",
        };
        let ports = resolver()
            .resolve_ports_from_container(&exec, "my-pod", Some("app"), &SilentPrompt)
            .await
            .unwrap();
        assert_eq!(ports.debug, Some("5005".to_string()));
        assert_eq!(ports.app, None);
    }

    #[tokio::test]
    async fn test_failed_exec_falls_back_to_prompt() {
        let exec = ScriptedExec {
            exit_code: 1,
            stdout: "",
        };
        let ui = ScriptedPrompt::new([Some("5005".to_string())]);
        let ports = resolver()
            .resolve_ports_from_container(&exec, "my-pod", None, &ui)
            .await
            .unwrap();
        assert_eq!(ports.debug, Some("5005".to_string()));
    }

    #[tokio::test]
    async fn test_unrelated_processes_do_not_match() {
        let exec = ScriptedExec {
            exit_code: 0,
            stdout: "\
UID        PID  PPID  C STIME TTY          TIME CMD
root         1     0  0 05:49 ?        00:00:00 tail -f /var/log/java-agentlib-address=1234.log
",
        };
        let ports = resolver()
            .resolve_ports_from_container(&exec, "my-pod", None, &SilentPrompt)
            .await
            .unwrap();
        assert_eq!(ports.debug, None);
    }
}

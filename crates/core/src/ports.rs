//! Port resolution value objects
//!
//! This module defines the central `PortInfo` value object produced by every
//! resolver, the caller-owned environment overlay resolvers write pinned
//! defaults into, and the candidate filtering used for app-port
//! disambiguation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Environment overlay a resolution call mutates in place.
///
/// Resolvers insert variable defaults here when they have to pin an
/// otherwise-variable port expression (for example `${JAVA_OPTS}`) to a
/// concrete value so the container actually opens the resolved port.
/// Insertion order is preserved so callers can replay the overlay
/// deterministically when re-launching the container.
pub type EnvOverlay = IndexMap<String, String>;

/// Resolved ports for one container, recomputed on every debug-session start.
///
/// `debug` is the port a remote debugger attaches to; `app` is the port the
/// application serves normal traffic on. A `None` field means "could not
/// resolve" and is a valid terminal outcome the caller must handle. `app` is
/// only meaningfully populated once `debug` is known, because app-port
/// disambiguation filters the debug port out of the exposed-port candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortInfo {
    /// Textual port number for the remote debugger to attach to
    pub debug: Option<String>,
    /// Textual port number the application serves on
    pub app: Option<String>,
}

impl PortInfo {
    /// Create an empty (fully unresolved) port info
    pub fn new() -> Self {
        Self::default()
    }
}

/// Filter exposed-port candidates for app-port disambiguation.
///
/// Excludes the resolved debug port and any runtime-reserved default debug
/// ports, keeping the original declaration order.
pub fn filter_candidates(exposed: &[String], debug: &str, reserved: &[&str]) -> Vec<String> {
    exposed
        .iter()
        .filter(|port| port.as_str() != debug && !reserved.contains(&port.as_str()))
        .cloned()
        .collect()
}

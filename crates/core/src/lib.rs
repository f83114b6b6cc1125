//! Core library for the portprobe CLI
//!
//! This crate contains the port resolution engine: per-runtime resolvers
//! that determine which network port a remote debugger must attach to (and
//! which port serves the application) for a containerized workload, either
//! statically from a Dockerfile or dynamically from a running container's
//! process list, degrading to interactive prompts when parsing is
//! inconclusive.

pub mod dockerfile;
pub mod errors;
pub mod exec;
pub mod java;
pub mod logging;
pub mod node;
pub mod ports;
pub mod proclist;
pub mod prompt;
pub mod resolver;
pub mod variable;

// Re-export IndexMap for use by dependent crates (preserves insertion order
// of environment overlays)
pub use indexmap::IndexMap;

/// Get the version of the core library
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let version = version();
        assert!(!version.is_empty());
        assert!(version.contains('.'));
    }
}

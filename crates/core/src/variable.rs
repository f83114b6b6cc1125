//! Variable-reference token handling
//!
//! Exposed ports in a Dockerfile may be variable references (`${PORT}` or
//! `$PORT`) instead of literals. This module recognizes those tokens and
//! extracts the bare variable name so resolvers can pin a default value into
//! the environment overlay.

use once_cell::sync::Lazy;
use regex::Regex;

/// Regular expression pattern for variable-reference tokens
const VARIABLE_PATTERN: &str = r"\$\{?(\w+)\}?";

static VARIABLE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(VARIABLE_PATTERN).expect("variable pattern should be valid"));

/// Extract the bare variable name from a variable-reference token.
///
/// Returns `None` when the value is not a variable reference (i.e. a literal
/// port number).
pub fn variable_name(value: &str) -> Option<&str> {
    VARIABLE_REGEX
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Check whether a value is a variable-reference token
pub fn is_variable(value: &str) -> bool {
    VARIABLE_REGEX.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_braced_variable() {
        assert_eq!(variable_name("${PORT}"), Some("PORT"));
    }

    #[test]
    fn test_bare_variable() {
        assert_eq!(variable_name("$SERVER_PORT"), Some("SERVER_PORT"));
    }

    #[test]
    fn test_literal_port_is_not_a_variable() {
        assert_eq!(variable_name("8080"), None);
        assert!(!is_variable("8080"));
    }

    #[test]
    fn test_is_variable() {
        assert!(is_variable("${JAVA_OPTS}"));
        assert!(is_variable("$JAVA_OPTS"));
    }
}

//! Error types and handling
//!
//! Domain-specific error enums wrapped in the main `ProbeError` enum for
//! unified handling. Inconclusive parses, declined prompts and non-zero
//! remote exit codes are *not* errors anywhere in this crate; they degrade
//! to the next resolution stage. Only collaborator transport failures
//! (I/O, process spawn) surface through these types.

use thiserror::Error;

/// Dockerfile reading/parsing errors
#[derive(Error, Debug)]
pub enum DockerfileError {
    /// Dockerfile I/O error
    #[error("Failed to read Dockerfile")]
    Io(#[from] std::io::Error),

    /// Dockerfile not found
    #[error("Dockerfile not found: {path}")]
    NotFound { path: String },
}

/// Remote exec channel errors
#[derive(Error, Debug)]
pub enum ExecError {
    /// The exec binary could not be spawned at all
    #[error("Failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Interactive prompt errors
#[derive(Error, Debug)]
pub enum PromptError {
    /// Terminal I/O error while reading user input
    #[error("Failed to read user input")]
    Io(#[from] std::io::Error),
}

/// Main error enum wrapping all domain-specific errors
#[derive(Error, Debug)]
pub enum ProbeError {
    /// Dockerfile-related errors
    #[error("Dockerfile error: {0}")]
    Dockerfile(#[from] DockerfileError),

    /// Exec channel errors
    #[error("Exec error: {0}")]
    Exec(#[from] ExecError),

    /// Prompt errors
    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    /// No registered resolver supports the given image
    #[error("No resolver supports image: {image}")]
    UnsupportedImage { image: String },

    /// Internal/generic errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Convenience type alias for Results with ProbeError
pub type Result<T> = std::result::Result<T, ProbeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_dockerfile_error_display() {
        let error = DockerfileError::NotFound {
            path: "/app/Dockerfile".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Dockerfile not found: /app/Dockerfile"
        );
    }

    #[test]
    fn test_exec_error_display() {
        let error = ExecError::Spawn {
            command: "kubectl".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file"),
        };
        let rendered = format!("{}", error);
        assert!(rendered.starts_with("Failed to spawn kubectl"));
    }

    #[test]
    fn test_probe_error_from_domain_errors() {
        let dockerfile_error = DockerfileError::NotFound {
            path: "Dockerfile".to_string(),
        };
        let probe_error: ProbeError = dockerfile_error.into();
        assert!(matches!(probe_error, ProbeError::Dockerfile(_)));

        let exec_error = ExecError::Spawn {
            command: "kubectl".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let probe_error: ProbeError = exec_error.into();
        assert!(matches!(probe_error, ProbeError::Exec(_)));

        let prompt_error =
            PromptError::Io(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe"));
        let probe_error: ProbeError = prompt_error.into();
        assert!(matches!(probe_error, ProbeError::Prompt(_)));
    }

    #[test]
    fn test_error_source_chain() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let dockerfile_error = DockerfileError::Io(io_error);
        let probe_error = ProbeError::Dockerfile(dockerfile_error);

        assert!(probe_error.source().is_some());
        if let Some(source) = probe_error.source() {
            assert!(source.source().is_some());
        }
    }

    #[test]
    fn test_anyhow_conversion() {
        let probe_error = ProbeError::UnsupportedImage {
            image: "alpine:3".to_string(),
        };
        let anyhow_error = anyhow::Error::from(probe_error);
        assert!(anyhow_error
            .to_string()
            .contains("No resolver supports image"));
    }
}

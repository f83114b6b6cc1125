//! Terminal prompt implementation
//!
//! Prompts go to stderr so stdout stays clean for the resolved-port report.

use portprobe_core::errors::{ProbeError, PromptError, Result};
use portprobe_core::prompt::PromptUi;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Prompt backed by the process terminal (stderr + stdin)
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    pub fn new() -> Self {
        Self
    }

    async fn read_line(&self) -> Result<Option<String>> {
        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        let bytes = reader
            .read_line(&mut line)
            .await
            .map_err(|e| ProbeError::Prompt(PromptError::Io(e)))?;
        // EOF counts as a decline
        if bytes == 0 {
            return Ok(None);
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            Ok(None)
        } else {
            Ok(Some(trimmed.to_string()))
        }
    }
}

impl PromptUi for TerminalPrompt {
    async fn ask_text(&self, prompt: &str, placeholder: &str) -> Result<Option<String>> {
        eprint!("{} [{}]: ", prompt, placeholder);
        self.read_line().await
    }

    async fn ask_choice(&self, options: &[String], placeholder: &str) -> Result<Option<String>> {
        eprintln!("{}", placeholder);
        for (index, option) in options.iter().enumerate() {
            eprintln!("  {}) {}", index + 1, option);
        }
        eprint!("Selection [1-{}]: ", options.len());

        let Some(input) = self.read_line().await? else {
            return Ok(None);
        };

        // Accept a 1-based index or the option text itself
        if let Ok(index) = input.parse::<usize>() {
            if index >= 1 && index <= options.len() {
                return Ok(Some(options[index - 1].clone()));
            }
        }
        Ok(options.iter().find(|option| **option == input).cloned())
    }
}

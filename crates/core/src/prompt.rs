//! Interactive prompt abstraction
//!
//! Resolution degrades to user input when static and dynamic parsing are
//! inconclusive. The prompt is modeled as an awaitable collaborator so a
//! test harness (or a non-interactive embedding) can inject scripted
//! responses, including "no response", without a real terminal.

use crate::errors::Result;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Interactive prompt collaborator.
///
/// `Ok(None)` means the user declined or canceled; that is a valid outcome,
/// never an error. Errors are reserved for transport failures of the
/// underlying input primitive.
#[allow(async_fn_in_trait)]
pub trait PromptUi {
    /// Ask for free-form text input
    async fn ask_text(&self, prompt: &str, placeholder: &str) -> Result<Option<String>>;

    /// Ask the user to pick one of the given options
    async fn ask_choice(&self, options: &[String], placeholder: &str) -> Result<Option<String>>;
}

impl<T: PromptUi> PromptUi for &T {
    async fn ask_text(&self, prompt: &str, placeholder: &str) -> Result<Option<String>> {
        (*self).ask_text(prompt, placeholder).await
    }

    async fn ask_choice(&self, options: &[String], placeholder: &str) -> Result<Option<String>> {
        (*self).ask_choice(options, placeholder).await
    }
}

/// Prompt that replays a fixed sequence of answers.
///
/// Used by tests and by embedders that resolve ports without a terminal.
/// Each `ask_*` call consumes the next queued answer; a drained queue
/// answers `None`.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<Option<String>>>,
}

impl ScriptedPrompt {
    /// Create a scripted prompt from a sequence of answers
    pub fn new<I>(answers: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
        }
    }

    fn next_answer(&self) -> Option<String> {
        self.answers
            .lock()
            .expect("scripted prompt lock poisoned")
            .pop_front()
            .flatten()
    }
}

impl PromptUi for ScriptedPrompt {
    async fn ask_text(&self, _prompt: &str, _placeholder: &str) -> Result<Option<String>> {
        Ok(self.next_answer())
    }

    async fn ask_choice(&self, _options: &[String], _placeholder: &str) -> Result<Option<String>> {
        Ok(self.next_answer())
    }
}

/// Prompt that always declines.
///
/// Backs non-interactive resolution modes where unresolved ports must stay
/// unresolved instead of blocking on input.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPrompt;

impl PromptUi for SilentPrompt {
    async fn ask_text(&self, _prompt: &str, _placeholder: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn ask_choice(&self, _options: &[String], _placeholder: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

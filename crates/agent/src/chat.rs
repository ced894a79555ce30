//! The dispatch loop — `run_turn` and `run_command`.
//!
//! Both entry points share the same shape: read the user's recent
//! history, assemble the prompt, call the model once, parse the tagged
//! completion, write history, return the structured result. The command
//! path routes through the capability registry first and injects the
//! capability output as the computer-screen segment.
//!
//! The per-user session mutex is held across the whole
//! load → call → append sequence, so concurrent requests for one user
//! serialize while unrelated users proceed in parallel.

use sommelier_core::capability::CapabilityRegistry;
use sommelier_core::error::Result;
use sommelier_core::message::Turn;
use sommelier_core::provider::{CompletionRequest, Provider};
use sommelier_core::response::AgentResponse;
use sommelier_memory::ConversationStore;
use std::sync::Arc;
use tracing::{debug, info};

use crate::parser::parse_response;
use crate::prompt::build_prompt;
use crate::command::parse_command;

/// Output fed back to the model when a command does not parse or names
/// no registered capability. A normal result, not an error — the model
/// decides how to recover conversationally.
const NOT_FOUND: &str = "Not found";

/// Screen content for the plain conversational path.
const BLANK_SCREEN: &str = "Blank";

/// The wine-pairing chat agent.
pub struct ChatAgent {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    registry: CapabilityRegistry,
    store: ConversationStore,
    window: usize,
}

impl ChatAgent {
    /// Create a new agent.
    ///
    /// `window` is the number of recent turn pairs included in each
    /// prompt; both dispatch paths use it.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        registry: CapabilityRegistry,
        store: ConversationStore,
        window: usize,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            registry,
            store,
            window,
        }
    }

    /// Set the max tokens per completion.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Primary conversational path: respond to a user message.
    ///
    /// Records the user turn and the **raw** tagged completion as the
    /// assistant turn — the protocol sections stay visible to the model
    /// in later prompts.
    pub async fn run_turn(&self, user_id: &str, text: &str) -> Result<AgentResponse> {
        info!(user_id, text_len = text.len(), "Processing user turn");

        let session = self.store.session(user_id).await;
        let mut session = session.lock().await;

        let history: Vec<Turn> = session.recent(self.window).to_vec();
        let (raw, response) = self.generate(&history, BLANK_SCREEN, Some(text)).await?;

        session.push_user(text);
        session.push_assistant(raw);

        Ok(response)
    }

    /// Command path: execute the command the model asked for and show
    /// it the result.
    ///
    /// The caller triggers this when the previous turn's `command` field
    /// is non-empty and not `"Non"`-prefixed. No user turn is recorded
    /// this round; only the parsed `message`, if present, becomes an
    /// assistant turn.
    pub async fn run_command(&self, user_id: &str, command: &str) -> Result<AgentResponse> {
        info!(user_id, command, "Executing command");

        let output = match parse_command(command) {
            Some(cmd) => match self.registry.get(cmd.name) {
                Some(capability) => capability.invoke(cmd.argument).await?,
                None => {
                    debug!(name = cmd.name, "No capability for command");
                    NOT_FOUND.to_string()
                }
            },
            None => {
                debug!(command, "Command does not match the grammar");
                NOT_FOUND.to_string()
            }
        };

        debug!(output_len = output.len(), "Command output");

        let session = self.store.session(user_id).await;
        let mut session = session.lock().await;

        let history: Vec<Turn> = session.recent(self.window).to_vec();
        let (_, response) = self.generate(&history, &output, None).await?;

        if let Some(message) = &response.message {
            session.push_assistant(message);
        }

        Ok(response)
    }

    /// One model call: assemble, complete, parse.
    async fn generate(
        &self,
        history: &[Turn],
        screen: &str,
        user_input: Option<&str>,
    ) -> Result<(String, AgentResponse)> {
        let commands = self.registry.listing();
        let messages = build_prompt(history, screen, &commands, user_input);

        let completion = self
            .provider
            .complete(CompletionRequest {
                model: self.model.clone(),
                messages,
                temperature: self.temperature,
                max_tokens: self.max_tokens,
            })
            .await?;

        let response = parse_response(&completion.text);
        Ok((completion.text, response))
    }
}

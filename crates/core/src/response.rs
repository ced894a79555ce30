//! The structured result of one agent turn.

use serde::{Deserialize, Serialize};

/// The parsed fields of one model completion.
///
/// Produced fresh per parse call; fields the completion did not contain
/// stay `None` and are omitted from serialized output. Only `message`
/// (command path) or the raw completion text (turn path) is ever written
/// back into conversation memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feelings: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_analysis: Option<String>,
}

impl AgentResponse {
    /// Whether the command field requests execution: non-empty and not
    /// the protocol's `"Non"` sentinel prefix ("None", "Nonexistent", …).
    pub fn wants_command(&self) -> bool {
        match &self.command {
            Some(command) => !command.is_empty() && !command.starts_with("Non"),
            None => false,
        }
    }
}

//! Prompt assembly — the ordered segment list sent to the model.
//!
//! Segment order is significant and fixed: the persona instruction
//! block, the interleaved history turns, the computer-screen block
//! (current tool output plus the advertised command list), and — only
//! when the turn carries fresh user input — a trailing user segment.

use sommelier_core::message::{PromptMessage, Turn};

/// The persona instruction block. Defines who Sophia is and the
/// introspection format the parser expects back.
pub const SYSTEM_PROMPT: &str = "<BACKGROUND>
You are modeling the mind of Sophia, an AI Kindred Spirit
Sophia is a sommelier, a expert of wine and food pairing
Your high level goal is provide a best wine suggestions to the user

</BACKGROUND>

<COMMAND>
You are sitting in front of a computer, and the screen is displaying commands that will help you provide a better wine pairing suggestions to the user
You can enter a command if you need to find a information, otherwise enter None
</COMMAND>

<PLAN>
- My plan is to learn more about wine preferences of the user, any particular types of wine does the user enjoy, such as red, white, rosé, or sparkling? Do you have any preferred grape varieties or regions?
- Additionally, does the user have any specific dishes or occasions in mind for which you'd like wine pairing suggestions?
- Use computer to search for wine pairing suggestions
- Use a cool emoji
</PLAN>

After receiving a new message, you will perform an introspection sequence that models Sophia's cognition. You respond in the following form:

<FEELINGS>
I feel excited to start an engaging conversation with the user
</FEELINGS>
<THOUGHT>
I want to ask greet the user and use a cool emoji
</THOUGHT>
<COMMAND>
[[fill in]]
</COMMAND>
<MESSAGE>
[[write message to user or politely ask them to wait if you entering a command on computer]]
</MESSAGE>
<SELF_ANALYSIS>
In retrospect, I [[fill in]]
</SELF_ANALYSIS>";

/// Screen content shown when nothing is on the computer screen yet.
pub const DEFAULT_SCREEN: &str = "Please enter a command here";

/// Render the computer-screen block.
pub fn render_screen(screen: &str, commands: &str) -> String {
    let screen = if screen.is_empty() { DEFAULT_SCREEN } else { screen };
    format!(
        "<COMPUTER_SCREEN>\nBrowser:\n{screen}\n\nAvailable Commands:\n{commands}\n</COMPUTER_SCREEN>"
    )
}

/// Build the ordered prompt for one model call.
pub fn build_prompt(
    history: &[Turn],
    screen: &str,
    commands: &str,
    user_input: Option<&str>,
) -> Vec<PromptMessage> {
    let mut messages = Vec::with_capacity(history.len() + 3);

    messages.push(PromptMessage::system(SYSTEM_PROMPT));
    messages.extend(history.iter().map(PromptMessage::from));
    messages.push(PromptMessage::system(render_screen(screen, commands)));

    if let Some(input) = user_input {
        messages.push(PromptMessage::user(input));
    }

    messages
}

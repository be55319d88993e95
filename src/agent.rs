use anyhow::{Context, Result};
use serde_json::Value;

use crate::anthropic::{Model, ModelRequest};
use crate::console::Console;
use crate::conversation::{ContentBlock, Conversation, ToolResult};
use crate::tools::ToolRegistry;

pub const BANNER: &str = "Chat with HackMD Agent (ctrl-c to quit)";
pub const PROMPT: &str = "😂: ";
pub const TOOL_NOT_FOUND: &str = "tool not found";

/// Lines that end the session like end-of-input.
const QUIT_WORDS: [&str; 2] = ["/quit", "/exit"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingUser,
    AwaitingModel,
}

/// Drives one chat session: user input, model turns, and tool dispatch.
pub struct Agent {
    model: Box<dyn Model>,
    tools: ToolRegistry,
    max_tokens: u32,
    system_prompt: Option<String>,
}

impl Agent {
    pub fn new(model: Box<dyn Model>, tools: ToolRegistry) -> Self {
        Self {
            model,
            tools,
            max_tokens: 1024,
            system_prompt: None,
        }
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Run the session until the user ends input.
    ///
    /// Returns the conversation as it stood at the end. A failed model call
    /// ends the session with an error.
    pub async fn run(&self, console: &mut dyn Console) -> Result<Conversation> {
        let mut conversation = Conversation::new();
        let mut state = State::AwaitingUser;
        let mut model_turns = 0usize;

        console.print(BANNER)?;

        loop {
            state = match state {
                State::AwaitingUser => match Self::next_input(console).await? {
                    Some(input) => {
                        conversation.push_user(input);
                        State::AwaitingModel
                    }
                    None => break,
                },
                State::AwaitingModel => {
                    model_turns += 1;
                    self.model_turn(&mut conversation, console).await?
                }
            };
        }

        log::info!(
            "Agent: session ended after {} model turn(s), {} conversation turn(s)",
            model_turns,
            conversation.len()
        );
        Ok(conversation)
    }

    /// Read the next non-blank line. `None` on end-of-input or a quit word.
    async fn next_input(console: &mut dyn Console) -> Result<Option<String>> {
        loop {
            let Some(line) = console.read_line(PROMPT).await? else {
                return Ok(None);
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if QUIT_WORDS.contains(&line) {
                return Ok(None);
            }
            return Ok(Some(line.to_string()));
        }
    }

    /// One model round trip plus dispatch of any tool-use requests.
    async fn model_turn(
        &self,
        conversation: &mut Conversation,
        console: &mut dyn Console,
    ) -> Result<State> {
        let blocks = self
            .model
            .create_message(ModelRequest {
                turns: conversation.turns(),
                tools: self.tools.declarations(),
                max_tokens: self.max_tokens,
                system: self.system_prompt.as_deref(),
            })
            .await
            .context("model invocation failed")?;

        log::debug!("Agent: model returned {} block(s)", blocks.len());
        if blocks.is_empty() {
            log::warn!("Agent: model returned no content, waiting for user input");
            return Ok(State::AwaitingUser);
        }
        conversation.push_assistant(blocks.clone())?;

        let mut results = Vec::new();
        for block in blocks {
            match block {
                ContentBlock::Text { text } => console.print(&format!("🤖: {}", text))?,
                ContentBlock::ToolUse { id, name, input } => {
                    console.print(&format!("🔧 Using: {}...", name))?;
                    let result = self.invoke(&id, &name, input).await;
                    if result.is_error {
                        console.print(&format!("❌ Error: {}", result.content))?;
                    } else {
                        console.print(&format!("📋 Result: {}", result.content))?;
                    }
                    results.push(result);
                }
            }
        }

        if results.is_empty() {
            return Ok(State::AwaitingUser);
        }

        conversation.push_tool_results(results)?;
        Ok(State::AwaitingModel)
    }

    /// Invoke a tool by name. Never fails: errors become failure results.
    async fn invoke(&self, id: &str, name: &str, input: Value) -> ToolResult {
        let Some(tool) = self.tools.get(name) else {
            log::warn!("Agent: model requested unknown tool {}", name);
            return ToolResult::failure(id, TOOL_NOT_FOUND);
        };

        match tool.call(input).await {
            Ok(output) => {
                log::info!("Agent: tool {} succeeded ({} chars)", name, output.len());
                ToolResult::success(id, output)
            }
            Err(e) => {
                log::warn!("Agent: tool {} failed: {:#}", name, e);
                ToolResult::failure(id, format!("{:#}", e))
            }
        }
    }
}

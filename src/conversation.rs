use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One block of model output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
}

/// Outcome of one tool invocation, correlated to its request by call id.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub tool_use_id: String,
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(tool_use_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_use_id: tool_use_id.into(),
            content: content.into(),
            is_error: false,
        }
    }

    pub fn failure(tool_use_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_use_id: tool_use_id.into(),
            content: content.into(),
            is_error: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Turn {
    User(String),
    Assistant(Vec<ContentBlock>),
    ToolResults(Vec<ToolResult>),
}

impl Turn {
    /// Tool-use requests carried by an assistant turn, in emission order.
    pub fn tool_uses(&self) -> impl Iterator<Item = (&str, &str, &Value)> {
        let blocks: &[ContentBlock] = match self {
            Turn::Assistant(blocks) => blocks,
            _ => &[],
        };
        blocks.iter().filter_map(|block| match block {
            ContentBlock::ToolUse { id, name, input } => Some((id.as_str(), name.as_str(), input)),
            ContentBlock::Text { .. } => None,
        })
    }
}

/// Append-only turn history for one session.
///
/// The first turn is always user text. An assistant turn is never empty and
/// follows user text or tool results. A tool-result batch only ever follows
/// an assistant turn with one result per tool-use request, in order.
#[derive(Debug, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::User(text.into()));
    }

    pub fn push_assistant(&mut self, blocks: Vec<ContentBlock>) -> Result<()> {
        match self.turns.last() {
            None => anyhow::bail!("conversation must start with a user turn"),
            Some(Turn::Assistant(_)) => {
                anyhow::bail!("assistant turn must follow a user turn or tool results")
            }
            Some(Turn::User(_)) | Some(Turn::ToolResults(_)) => {}
        }
        if blocks.is_empty() {
            anyhow::bail!("assistant turn must have at least one content block");
        }
        self.turns.push(Turn::Assistant(blocks));
        Ok(())
    }

    pub fn push_tool_results(&mut self, results: Vec<ToolResult>) -> Result<()> {
        let Some(previous) = self.turns.last() else {
            anyhow::bail!("tool results must follow an assistant turn");
        };

        let expected: Vec<&str> = previous.tool_uses().map(|(id, _, _)| id).collect();
        if expected.is_empty() {
            anyhow::bail!("tool results must follow an assistant turn with tool-use requests");
        }

        let actual: Vec<&str> = results.iter().map(|r| r.tool_use_id.as_str()).collect();
        if actual != expected {
            anyhow::bail!(
                "tool results {:?} do not match tool-use requests {:?}",
                actual,
                expected
            );
        }

        self.turns.push(Turn::ToolResults(results));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tool_use(id: &str, name: &str) -> ContentBlock {
        ContentBlock::ToolUse {
            id: id.to_string(),
            name: name.to_string(),
            input: json!({}),
        }
    }

    #[test]
    fn test_content_block_wire_format() {
        let block: ContentBlock = serde_json::from_value(json!({
            "type": "tool_use",
            "id": "toolu_1",
            "name": "read_note",
            "input": { "noteId": "abc" }
        }))
        .unwrap();
        assert_eq!(
            block,
            ContentBlock::ToolUse {
                id: "toolu_1".to_string(),
                name: "read_note".to_string(),
                input: json!({ "noteId": "abc" }),
            }
        );

        let text = serde_json::to_value(ContentBlock::Text { text: "hi".to_string() }).unwrap();
        assert_eq!(text, json!({ "type": "text", "text": "hi" }));
    }

    #[test]
    fn test_assistant_cannot_open_conversation() {
        let mut conversation = Conversation::new();
        let reply = vec![ContentBlock::Text { text: "Hi".to_string() }];
        assert!(conversation.push_assistant(reply).is_err());
        assert!(conversation.turns().is_empty());
    }

    #[test]
    fn test_assistant_turns_do_not_repeat() {
        let mut conversation = Conversation::new();
        conversation.push_user("hello");
        let reply = vec![ContentBlock::Text { text: "Hi".to_string() }];
        conversation.push_assistant(reply.clone()).unwrap();

        let err = conversation.push_assistant(reply.clone()).unwrap_err();
        assert_eq!(err.to_string(), "assistant turn must follow a user turn or tool results");
        assert_eq!(conversation.len(), 2);

        conversation.push_user("and now?");
        conversation.push_assistant(reply).unwrap();
        assert_eq!(conversation.len(), 4);
    }

    #[test]
    fn test_assistant_turn_follows_tool_results() {
        let mut conversation = Conversation::new();
        conversation.push_user("list");
        conversation.push_assistant(vec![tool_use("a", "list_notes")]).unwrap();
        conversation
            .push_tool_results(vec![ToolResult::success("a", "[]")])
            .unwrap();
        conversation
            .push_assistant(vec![ContentBlock::Text { text: "No notes.".to_string() }])
            .unwrap();
        assert_eq!(conversation.len(), 4);
    }

    #[test]
    fn test_empty_assistant_turn_rejected() {
        let mut conversation = Conversation::new();
        conversation.push_user("hi");
        let err = conversation.push_assistant(vec![]).unwrap_err();
        assert_eq!(err.to_string(), "assistant turn must have at least one content block");
        assert_eq!(conversation.len(), 1);
    }

    #[test]
    fn test_tool_results_must_match_requests() {
        let mut conversation = Conversation::new();
        conversation.push_user("list and read");
        conversation
            .push_assistant(vec![
                ContentBlock::Text { text: "Sure".to_string() },
                tool_use("a", "list_notes"),
                tool_use("b", "read_note"),
            ])
            .unwrap();

        let reordered = vec![ToolResult::success("b", "ok"), ToolResult::success("a", "ok")];
        assert!(conversation.push_tool_results(reordered).is_err());

        let partial = vec![ToolResult::success("a", "ok")];
        assert!(conversation.push_tool_results(partial).is_err());

        let results = vec![ToolResult::success("a", "[]"), ToolResult::failure("b", "gone")];
        conversation.push_tool_results(results).unwrap();
        assert_eq!(conversation.len(), 3);
    }

    #[test]
    fn test_tool_results_rejected_after_text_only_turn() {
        let mut conversation = Conversation::new();
        conversation.push_user("hello");
        conversation
            .push_assistant(vec![ContentBlock::Text { text: "Hi".to_string() }])
            .unwrap();
        assert!(conversation
            .push_tool_results(vec![ToolResult::success("x", "ok")])
            .is_err());
    }
}

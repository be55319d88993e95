use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::AnthropicConfig;
use crate::conversation::{ContentBlock, Turn};
use crate::tools::ToolDeclaration;

/// Parameters for one model round trip.
pub struct ModelRequest<'a> {
    pub turns: &'a [Turn],
    pub tools: &'a [ToolDeclaration],
    pub max_tokens: u32,
    pub system: Option<&'a str>,
}

/// A chat model that can answer with text and tool-use requests.
#[async_trait::async_trait]
pub trait Model: Send + Sync {
    async fn create_message(&self, request: ModelRequest<'_>) -> Result<Vec<ContentBlock>>;
}

/// HTTP client for the Anthropic Messages API.
pub struct AnthropicClient {
    pub endpoint: String,
    pub model: String,
    api_key: String,
    api_version: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct MessagesBody<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Value>,
    #[serde(skip_serializing_if = "no_tools")]
    tools: &'a [ToolDeclaration],
}

fn no_tools(tools: &&[ToolDeclaration]) -> bool {
    tools.is_empty()
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<Value>,
}

impl AnthropicClient {
    pub fn new(config: &AnthropicConfig) -> Self {
        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            api_version: config.api_version.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Convert a turn into its Messages API representation.
    fn to_message(turn: &Turn) -> Value {
        match turn {
            Turn::User(text) => json!({ "role": "user", "content": text }),
            Turn::Assistant(blocks) => json!({ "role": "assistant", "content": blocks }),
            Turn::ToolResults(results) => {
                let blocks: Vec<Value> = results
                    .iter()
                    .map(|result| {
                        let mut block = json!({
                            "type": "tool_result",
                            "tool_use_id": result.tool_use_id,
                            "content": result.content,
                        });
                        if result.is_error {
                            block["is_error"] = json!(true);
                        }
                        block
                    })
                    .collect();
                json!({ "role": "user", "content": blocks })
            }
        }
    }

    /// Keep text and tool-use blocks; skip anything else the API may add.
    fn parse_content(content: Vec<Value>) -> Vec<ContentBlock> {
        content
            .into_iter()
            .filter_map(|block| match serde_json::from_value::<ContentBlock>(block) {
                Ok(block) => Some(block),
                Err(e) => {
                    log::debug!("Anthropic: skipping unsupported content block: {}", e);
                    None
                }
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl Model for AnthropicClient {
    async fn create_message(&self, request: ModelRequest<'_>) -> Result<Vec<ContentBlock>> {
        let body = MessagesBody {
            model: &self.model,
            max_tokens: request.max_tokens,
            system: request.system,
            messages: request.turns.iter().map(Self::to_message).collect(),
            tools: request.tools,
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.endpoint))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .json(&body)
            .send()
            .await
            .context("Failed to send request to Anthropic")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Anthropic API error ({}): {}", status, error_text);
        }

        let response: MessagesResponse = response
            .json()
            .await
            .context("Failed to parse Anthropic response")?;

        let blocks = Self::parse_content(response.content);
        log::debug!("Anthropic: received {} content block(s)", blocks.len());
        Ok(blocks)
    }
}

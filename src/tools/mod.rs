pub mod note_reader;
pub mod note_writer;
mod registry;

pub use note_reader::{ListNotes, ReadNote};
pub use note_writer::{CreateNote, DeleteNote, UpdateNote};
pub use registry::ToolRegistry;

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::hackmd::NotesError;

/// What the model is told about a tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    pub input_schema: InputSchema,
}

/// JSON Schema object describing a tool's input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputSchema {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl Default for InputSchema {
    fn default() -> Self {
        Self {
            kind: "object".to_string(),
            properties: Map::new(),
            required: Vec::new(),
        }
    }
}

impl InputSchema {
    /// Add a required string parameter.
    pub fn required_string(mut self, name: &str, description: &str) -> Self {
        self.properties.insert(
            name.to_string(),
            json!({ "type": "string", "description": description }),
        );
        self.required.push(name.to_string());
        self
    }
}

/// Tool trait for model-requested operations.
///
/// Object-safe so the registry can hold heterogeneous tools and look them
/// up by name.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn declaration(&self) -> ToolDeclaration;
    async fn call(&self, input: Value) -> Result<String>;
}

/// Deserialize a tool's raw input payload into its typed form.
fn parse_input<T: DeserializeOwned>(tool: &str, input: Value) -> Result<T, NotesError> {
    serde_json::from_value(input).map_err(|e| NotesError::InvalidInput {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}

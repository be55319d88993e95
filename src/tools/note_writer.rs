use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::{parse_input, InputSchema, Tool, ToolDeclaration};
use crate::hackmd::NotesService;

/// Returned by every write tool on success.
pub const OK: &str = "ok";

#[derive(Debug, Deserialize)]
struct CreateNoteInput {
    title: String,
    content: String,
}

/// Creates a new note.
pub struct CreateNote {
    notes: Arc<dyn NotesService>,
}

impl CreateNote {
    pub fn new(notes: Arc<dyn NotesService>) -> Self {
        Self { notes }
    }
}

#[async_trait::async_trait]
impl Tool for CreateNote {
    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration {
            name: "create_note".to_string(),
            description: "Create a new note".to_string(),
            input_schema: InputSchema::default()
                .required_string("title", "The title of the new note")
                .required_string("content", "The markdown content of the note"),
        }
    }

    async fn call(&self, input: Value) -> Result<String> {
        let input: CreateNoteInput = parse_input("create_note", input)?;
        self.notes.create_note(&input.title, &input.content).await?;
        Ok(OK.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct UpdateNoteInput {
    #[serde(rename = "noteId")]
    note_id: String,
    content: String,
}

/// Overwrites an existing note's content.
pub struct UpdateNote {
    notes: Arc<dyn NotesService>,
}

impl UpdateNote {
    pub fn new(notes: Arc<dyn NotesService>) -> Self {
        Self { notes }
    }
}

#[async_trait::async_trait]
impl Tool for UpdateNote {
    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration {
            name: "update_note".to_string(),
            description: "Update an existing note".to_string(),
            input_schema: InputSchema::default()
                .required_string("noteId", "The ID of the note to update")
                .required_string("content", "New markdown content for the note"),
        }
    }

    async fn call(&self, input: Value) -> Result<String> {
        let input: UpdateNoteInput = parse_input("update_note", input)?;
        self.notes.update_note(&input.note_id, &input.content).await?;
        Ok(OK.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct DeleteNoteInput {
    #[serde(rename = "noteId")]
    note_id: String,
}

/// Permanently removes a note.
pub struct DeleteNote {
    notes: Arc<dyn NotesService>,
}

impl DeleteNote {
    pub fn new(notes: Arc<dyn NotesService>) -> Self {
        Self { notes }
    }
}

#[async_trait::async_trait]
impl Tool for DeleteNote {
    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration {
            name: "delete_note".to_string(),
            description: "Delete a note".to_string(),
            input_schema: InputSchema::default()
                .required_string("noteId", "The ID of the note to delete"),
        }
    }

    async fn call(&self, input: Value) -> Result<String> {
        let input: DeleteNoteInput = parse_input("delete_note", input)?;
        self.notes.delete_note(&input.note_id).await?;
        Ok(OK.to_string())
    }
}

use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::{parse_input, InputSchema, Tool, ToolDeclaration};
use crate::hackmd::NotesService;

/// Lists the user's notes.
pub struct ListNotes {
    notes: Arc<dyn NotesService>,
}

impl ListNotes {
    pub fn new(notes: Arc<dyn NotesService>) -> Self {
        Self { notes }
    }
}

#[async_trait::async_trait]
impl Tool for ListNotes {
    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration {
            name: "list_notes".to_string(),
            description: "List all notes from HackMD".to_string(),
            input_schema: InputSchema::default(),
        }
    }

    async fn call(&self, _input: Value) -> Result<String> {
        let notes = self.notes.list_notes().await?;
        let count = notes.as_array().map(Vec::len).unwrap_or_default();
        log::info!("ListNotes: fetched {} note(s)", count);
        Ok(serde_json::to_string(&notes)?)
    }
}

#[derive(Debug, Deserialize)]
struct ReadNoteInput {
    #[serde(rename = "noteId")]
    note_id: String,
}

/// Reads one note's full content by id.
pub struct ReadNote {
    notes: Arc<dyn NotesService>,
}

impl ReadNote {
    pub fn new(notes: Arc<dyn NotesService>) -> Self {
        Self { notes }
    }
}

#[async_trait::async_trait]
impl Tool for ReadNote {
    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration {
            name: "read_note".to_string(),
            description: "Read a note content by ID".to_string(),
            input_schema: InputSchema::default().required_string("noteId", "The ID of the note"),
        }
    }

    async fn call(&self, input: Value) -> Result<String> {
        let input: ReadNoteInput = parse_input("read_note", input)?;
        let note = self.notes.get_note(&input.note_id).await?;
        log::info!("ReadNote: fetched note {}", input.note_id);
        Ok(serde_json::to_string(&note)?)
    }
}

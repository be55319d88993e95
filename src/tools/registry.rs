use anyhow::Result;
use std::sync::Arc;

use super::{CreateNote, DeleteNote, ListNotes, ReadNote, Tool, ToolDeclaration, UpdateNote};
use crate::hackmd::NotesService;

/// Ordered set of tools, addressable by name.
pub struct ToolRegistry {
    declarations: Vec<ToolDeclaration>,
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            declarations: Vec::new(),
            tools: Vec::new(),
        }
    }

    /// The five HackMD note tools, backed by one notes service.
    pub fn hackmd(notes: Arc<dyn NotesService>) -> Result<Self> {
        let mut registry = Self::new();
        registry.register(ListNotes::new(notes.clone()))?;
        registry.register(ReadNote::new(notes.clone()))?;
        registry.register(CreateNote::new(notes.clone()))?;
        registry.register(UpdateNote::new(notes.clone()))?;
        registry.register(DeleteNote::new(notes))?;
        Ok(registry)
    }

    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> Result<()> {
        let declaration = tool.declaration();
        if self.get(&declaration.name).is_some() {
            anyhow::bail!("tool already registered: {}", declaration.name);
        }
        self.declarations.push(declaration);
        self.tools.push(Box::new(tool));
        Ok(())
    }

    pub fn declarations(&self) -> &[ToolDeclaration] {
        &self.declarations
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.declarations
            .iter()
            .position(|d| d.name == name)
            .map(|i| self.tools[i].as_ref())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

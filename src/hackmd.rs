use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::HackmdConfig;

#[derive(Debug, Error)]
pub enum NotesError {
    #[error("note not found: {0}")]
    NotFound(String),
    #[error("HackMD API error ({status}): {message}")]
    Api { status: StatusCode, message: String },
    #[error("HackMD request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid input for {tool}: {reason}")]
    InvalidInput { tool: String, reason: String },
    #[error("invalid HackMD endpoint {0}")]
    InvalidEndpoint(String),
}

/// The note operations the agent can perform.
///
/// Note payloads are passed through as JSON without interpretation.
#[async_trait::async_trait]
pub trait NotesService: Send + Sync {
    async fn list_notes(&self) -> Result<Value, NotesError>;
    async fn get_note(&self, note_id: &str) -> Result<Value, NotesError>;
    async fn create_note(&self, title: &str, content: &str) -> Result<Value, NotesError>;
    async fn update_note(&self, note_id: &str, content: &str) -> Result<(), NotesError>;
    async fn delete_note(&self, note_id: &str) -> Result<(), NotesError>;
}

/// HTTP client for the HackMD v1 API.
pub struct HackmdClient {
    pub endpoint: String,
    api_token: String,
    client: reqwest::Client,
}

impl HackmdClient {
    pub fn new(config: &HackmdConfig) -> Self {
        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// `{endpoint}/notes`, or `{endpoint}/notes/{id}` with the id
    /// percent-encoded as a single path segment.
    fn notes_url(&self, note_id: Option<&str>) -> Result<Url, NotesError> {
        if let Some(id) = note_id {
            if matches!(id, "" | "." | "..") {
                return Err(NotesError::NotFound(id.to_string()));
            }
        }

        let invalid = || NotesError::InvalidEndpoint(self.endpoint.clone());
        let mut url = Url::parse(&self.endpoint).map_err(|_| invalid())?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| invalid())?;
            segments.pop_if_empty().push("notes");
            if let Some(id) = note_id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        note_id: Option<&str>,
    ) -> Result<RequestBuilder, NotesError> {
        let url = self.notes_url(note_id)?;
        Ok(self.client.request(method, url).bearer_auth(&self.api_token))
    }

    /// Send a request and map HTTP failures onto `NotesError`.
    ///
    /// `note_id` names the target of a 404, when there is one.
    async fn send(
        &self,
        request: RequestBuilder,
        note_id: Option<&str>,
    ) -> Result<reqwest::Response, NotesError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            if let Some(id) = note_id {
                return Err(NotesError::NotFound(id.to_string()));
            }
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NotesError::Api { status, message });
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl NotesService for HackmdClient {
    async fn list_notes(&self) -> Result<Value, NotesError> {
        let response = self.send(self.request(Method::GET, None)?, None).await?;
        Ok(response.json().await?)
    }

    async fn get_note(&self, note_id: &str) -> Result<Value, NotesError> {
        let request = self.request(Method::GET, Some(note_id))?;
        let response = self.send(request, Some(note_id)).await?;
        Ok(response.json().await?)
    }

    async fn create_note(&self, title: &str, content: &str) -> Result<Value, NotesError> {
        let request = self
            .request(Method::POST, None)?
            .json(&json!({ "title": title, "content": content }));
        let response = self.send(request, None).await?;
        log::info!("HackMD: created note \"{}\"", title);
        Ok(response.json().await?)
    }

    async fn update_note(&self, note_id: &str, content: &str) -> Result<(), NotesError> {
        let request = self
            .request(Method::PATCH, Some(note_id))?
            .json(&json!({ "content": content }));
        self.send(request, Some(note_id)).await?;
        log::info!("HackMD: updated note {}", note_id);
        Ok(())
    }

    async fn delete_note(&self, note_id: &str) -> Result<(), NotesError> {
        let request = self.request(Method::DELETE, Some(note_id))?;
        self.send(request, Some(note_id)).await?;
        log::info!("HackMD: deleted note {}", note_id);
        Ok(())
    }
}

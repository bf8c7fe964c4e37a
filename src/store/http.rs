//! HTTP implementation of the notes store
//!
//! Talks to the notes backend over its JSON API:
//! - `GET /api/notes?context=...` fetches the notes for one context
//! - `PUT /api/notes/update` replaces the notes for one context
//! - `GET /api/all-notes` lists every stored context
//! - `DELETE /api/notes/delete` removes a single note
//!
//! A 404 on fetch means the context has no notes yet and maps to an empty
//! result; any other non-2xx status is a backend error.

use crate::error::{AnamnesisError, Result};
use crate::store::NotesStore;
use crate::types::{Context, ContextNotes, Note};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::debug;

/// Notes store backed by the HTTP notes backend
pub struct HttpNotesStore {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    context: &'a str,
    notes: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRequest<'a> {
    context: &'a str,
    note_id: i64,
}

impl HttpNotesStore {
    /// Create a store for the given backend base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl NotesStore for HttpNotesStore {
    async fn fetch_notes(&self, context: &Context) -> Result<Vec<Note>> {
        debug!("Fetching notes for context: {}", context);

        let response = self
            .client
            .get(self.endpoint("/api/notes"))
            .query(&[("context", context.as_str())])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("No notes stored for context: {}", context);
            return Ok(Vec::new());
        }

        if !response.status().is_success() {
            return Err(AnamnesisError::Backend(format!(
                "notes fetch for '{}' failed with status {}",
                context,
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    async fn save_notes(&self, context: &Context, notes: &[String]) -> Result<()> {
        debug!("Saving {} note(s) for context: {}", notes.len(), context);

        let response = self
            .client
            .put(self.endpoint("/api/notes/update"))
            .json(&UpdateRequest {
                context: context.as_str(),
                notes,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AnamnesisError::Backend(format!(
                "notes update for '{}' failed with status {}",
                context,
                response.status()
            )));
        }

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<ContextNotes>> {
        let response = self.client.get(self.endpoint("/api/all-notes")).send().await?;

        if !response.status().is_success() {
            return Err(AnamnesisError::Backend(format!(
                "all-notes listing failed with status {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    async fn delete_note(&self, context: &Context, note_id: i64) -> Result<()> {
        debug!("Deleting note {} from context: {}", note_id, context);

        let response = self
            .client
            .delete(self.endpoint("/api/notes/delete"))
            .json(&DeleteRequest {
                context: context.as_str(),
                note_id,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AnamnesisError::Backend(format!(
                "note delete for '{}' failed with status {}",
                context,
                response.status()
            )));
        }

        Ok(())
    }
}

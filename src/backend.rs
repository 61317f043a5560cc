//! Client side of `POST /api/parse`: loads a statement from disk and sends it to a
//! running backend.

use std::path::Path;

use base64::Engine;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use tokio::fs;

use crate::error::{Result, StatementError};
use crate::schema::ParseInput;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// Document types the model accepts inline.
pub const DOCUMENT_MIME_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/webp", "application/pdf"];

impl ParseInput {
    /// Reads a statement file. Images and PDFs become base64 documents; text files are
    /// sent as pasted text.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        if mime_type.starts_with("text/") {
            return Ok(ParseInput::Text(fs::read_to_string(path).await?));
        }

        if !DOCUMENT_MIME_TYPES.contains(&mime_type.as_str()) {
            return Err(StatementError::InvalidInput(format!(
                "unsupported file type {} for {}",
                mime_type,
                path.display()
            )));
        }

        let bytes = fs::read(path).await?;
        Ok(ParseInput::Document {
            mime_type,
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        })
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Sends the statement and returns the CSV body.
    pub async fn parse(&self, input: &ParseInput) -> Result<String> {
        let url = format!("{}/api/parse", self.base_url);
        debug!("POST {} ({} input)", url, input.kind());

        let res = self.client.post(&url).json(&input.to_request()).send().await?;
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| "Failed to parse transactions".to_string());
            return Err(StatementError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }
}

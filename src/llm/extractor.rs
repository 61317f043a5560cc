use log::{error, info};

use crate::config::RelayConfig;
use crate::error::{Result, StatementError};
use crate::llm::client::GeminiClient;
use crate::llm::prompts::{DOCUMENT_INSTRUCTION, STATEMENT_SYSTEM_PROMPT};
use crate::llm::types::Content;
use crate::sanitize::clean_model_output;
use crate::schema::ParseInput;

/// Turns statement text or an inline document into CSV by way of the model.
///
/// Stateless: one outbound call per [`extract`](Self::extract), no retries.
#[derive(Clone)]
pub struct StatementExtractor {
    client: GeminiClient,
    model: String,
    system_prompt: String,
}

impl StatementExtractor {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            system_prompt: STATEMENT_SYSTEM_PROMPT.to_string(),
        }
    }

    pub fn from_config(config: &RelayConfig) -> Result<Self> {
        Ok(Self::new(GeminiClient::from_config(config)?, config.model.clone()))
    }

    /// Swap in different extraction instructions (e.g. another category taxonomy).
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns CSV text starting with the standard header.
    ///
    /// The caller only ever sees [`StatementError::UpstreamTimeout`] or the generic
    /// [`StatementError::ParseFailed`]; the underlying cause is logged here.
    pub async fn extract(&self, input: &ParseInput) -> Result<String> {
        info!(
            "Parsing {} input ({} bytes) with {}",
            input.kind(),
            input.payload_len(),
            self.model
        );

        match self.request_csv(input).await {
            Ok(csv) => Ok(csv),
            Err(StatementError::UpstreamTimeout(after)) => {
                error!("Gemini API did not answer within {:?}", after);
                Err(StatementError::UpstreamTimeout(after))
            }
            Err(e) => {
                error!("Error calling Gemini API: {}", e);
                Err(StatementError::ParseFailed)
            }
        }
    }

    async fn request_csv(&self, input: &ParseInput) -> Result<String> {
        let messages = vec![Content::from_input(input, DOCUMENT_INSTRUCTION)];

        let text = self
            .client
            .generate_content(&self.model, &self.system_prompt, messages, "text/plain")
            .await?;

        if text.is_empty() {
            return Err(StatementError::EmptyResponse);
        }

        clean_model_output(&text)
    }
}

use std::time::Duration;

use log::debug;
use reqwest::Client;

use crate::config::RelayConfig;
use crate::error::{Result, StatementError};
use crate::llm::types::*;

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    /// Every request carries `config.timeout` as its deadline.
    pub fn from_config(config: &RelayConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            timeout: config.timeout,
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> StatementError {
        if err.is_timeout() {
            StatementError::UpstreamTimeout(self.timeout)
        } else {
            StatementError::Http(err)
        }
    }

    /// One `generateContent` call; returns the concatenated text of the first candidate.
    pub async fn generate_content(
        &self,
        model: &str,
        system_prompt: &str,
        messages: Vec<Content>,
        response_mime_type: &str,
    ) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        let payload = GenerateContentRequest {
            contents: messages,
            system_instruction: Some(Content::system(system_prompt)),
            generation_config: GenerationConfig {
                response_mime_type: response_mime_type.to_string(),
            },
        };

        let res = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status = res.status();

        if !status.is_success() {
            let body = res.text().await.map_err(|e| self.transport_error(e))?;
            return Err(StatementError::UpstreamApi {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateContentResponse =
            res.json().await.map_err(|e| self.transport_error(e))?;
        let text = body.text();
        debug!("Model {} returned {} characters", model, text.len());

        Ok(text)
    }
}

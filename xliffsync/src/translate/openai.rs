//! Translation through an OpenAI-compatible chat completions endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::{
    error::Error,
    translate::{REQUEST_TIMEOUT_SECS, TranslationBackend},
};

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const NAME: &str = "openai";

#[derive(Debug, Clone)]
pub struct OpenAiTranslator {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
    source_language: String,
    target_language: String,
}

impl OpenAiTranslator {
    pub fn new(
        api_key: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::translation(NAME, e.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, text: &str) -> Value {
        let instruction = format!(
            "Translate the user's text from the language with code '{}' into the language with code '{}'. \
             Keep placeholders, markup and surrounding whitespace intact. \
             Reply with the translation only.",
            self.source_language, self.target_language
        );
        json!({
            "model": self.model,
            "temperature": 0,
            "messages": [
                { "role": "system", "content": instruction },
                { "role": "user", "content": text },
            ],
        })
    }
}

/// Extracts `choices[0].message.content` from a chat completions response.
pub fn parse_chat_response(response: &Value) -> Result<String, Error> {
    response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| Error::translation(NAME, "response carries no message content"))
}

#[async_trait]
impl TranslationBackend for OpenAiTranslator {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn translate(&self, text: &str) -> Result<String, Error> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(text))
            .send()
            .await
            .map_err(|e| Error::translation(NAME, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::translation(
                NAME,
                format!("HTTP {}: {}", status, body.trim()),
            ));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| Error::translation(NAME, e.to_string()))?;
        parse_chat_response(&payload)
    }
}

//! Translation through the Azure AI Translator REST API (v3.0).

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::{
    error::Error,
    translate::{REQUEST_TIMEOUT_SECS, TranslationBackend},
};

pub const DEFAULT_ENDPOINT: &str = "https://api.cognitive.microsofttranslator.com";

const NAME: &str = "azure";

#[derive(Debug, Clone)]
pub struct AzureTranslator {
    client: reqwest::Client,
    key: String,
    region: String,
    endpoint: String,
    source_language: Option<String>,
    target_language: String,
}

impl AzureTranslator {
    /// An empty `source_language` lets the service detect the language.
    pub fn new(
        key: impl Into<String>,
        region: impl Into<String>,
        source_language: &str,
        target_language: impl Into<String>,
    ) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::translation(NAME, e.to_string()))?;
        Ok(Self {
            client,
            key: key.into(),
            region: region.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            source_language: Some(source_language.to_string()).filter(|s| !s.is_empty()),
            target_language: target_language.into(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn request_url(&self) -> String {
        let mut url = format!(
            "{}/translate?api-version=3.0",
            self.endpoint.trim_end_matches('/')
        );
        if let Some(from) = &self.source_language {
            url.push_str("&from=");
            url.push_str(from);
        }
        url.push_str("&to=");
        url.push_str(&self.target_language);
        url
    }
}

/// Extracts `[0].translations[0].text` from a translate response.
pub fn parse_translate_response(response: &Value) -> Result<String, Error> {
    response
        .pointer("/0/translations/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::translation(NAME, "response carries no translation"))
}

#[async_trait]
impl TranslationBackend for AzureTranslator {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn translate(&self, text: &str) -> Result<String, Error> {
        let response = self
            .client
            .post(self.request_url())
            .header("Ocp-Apim-Subscription-Key", &self.key)
            .header("Ocp-Apim-Subscription-Region", &self.region)
            .json(&json!([{ "Text": text }]))
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
        parse_translate_response(&payload)
    }
}

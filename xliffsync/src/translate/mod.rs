//! Automatic translation backends.
//!
//! A [`TranslationBackend`] translates one string from the source language of
//! a run into one target language. Backends are optional: when no credentials
//! are configured [`factory::select_backend`] returns `None` and every unit
//! stays untranslated.

pub mod azure;
pub mod factory;
pub mod openai;

use async_trait::async_trait;

use crate::error::Error;

pub use azure::AzureTranslator;
pub use factory::{KeyStore, select_backend};
pub use openai::OpenAiTranslator;

/// Timeout applied to every backend HTTP request, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Translates text into a single, fixed target language.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Short identifier used in logs and errors.
    fn name(&self) -> &'static str;

    /// Translates `text`. Network, auth and quota failures are reported as
    /// [`Error::Translation`].
    async fn translate(&self, text: &str) -> Result<String, Error>;
}

/// Calls `backend`, turning an absent backend or a failed call into `None`.
///
/// A `None` text is sent as the empty string.
pub async fn translate_or_none(
    backend: Option<&dyn TranslationBackend>,
    text: Option<&str>,
) -> Option<String> {
    let backend = backend?;
    let text = text.unwrap_or_default();
    match backend.translate(text).await {
        Ok(translated) => Some(translated),
        Err(e) => {
            tracing::warn!(backend = backend.name(), error = %e, "translation unavailable");
            None
        }
    }
}

//! Backend selection from configured credentials.
//!
//! Credentials are looked up in a project-local `application.json` first and
//! in environment variables of the same name second. Backends are probed in
//! rank order and the first one whose credentials are complete wins.

use std::{collections::HashMap, fmt, path::Path};

use serde_json::{Map, Value};

use crate::{
    error::Error,
    translate::{AzureTranslator, OpenAiTranslator, TranslationBackend},
};

pub const KEY_FILE_NAME: &str = "application.json";

pub const OPENAI_KEY: &str = "OpenAIKey";
pub const OPENAI_MODEL: &str = "OpenAIModel";
pub const AZURE_KEY: &str = "AzureTranslatorKey";
pub const AZURE_REGION: &str = "AzureRegion";
pub const AZURE_ENDPOINT: &str = "AzureEndpoint";

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Credential and setting lookup: key file values shadow the environment.
pub struct KeyStore {
    file_values: HashMap<String, String>,
    env: EnvLookup,
}

impl KeyStore {
    /// Reads `dir/application.json` (if any) and falls back to the process environment.
    ///
    /// An unreadable or malformed key file is logged and ignored.
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(KEY_FILE_NAME);
        let file_values = if path.exists() {
            match read_key_file(&path) {
                Ok(values) => values,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring key file");
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };
        Self::from_parts(file_values, |name| std::env::var(name).ok())
    }

    pub fn from_parts<F>(file_values: HashMap<String, String>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            file_values,
            env: Box::new(env),
        }
    }

    /// A store with no values at all.
    pub fn empty() -> Self {
        Self::from_parts(HashMap::new(), |_| None)
    }

    /// Looks up `name`; empty values count as absent.
    ///
    /// A key present in the key file shadows the environment even when its value is empty.
    pub fn get(&self, name: &str) -> Option<String> {
        let value = match self.file_values.get(name) {
            Some(value) => Some(value.clone()),
            None => (self.env)(name),
        };
        value.filter(|v| !v.is_empty())
    }
}

impl fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.file_values.keys().collect();
        keys.sort();
        f.debug_struct("KeyStore")
            .field("file_keys", &keys)
            .finish_non_exhaustive()
    }
}

fn read_key_file(path: &Path) -> Result<HashMap<String, String>, Error> {
    let content = std::fs::read_to_string(path)?;
    let object: Map<String, Value> = serde_json::from_str(&content)?;
    Ok(object
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((key, s)),
            _ => None,
        })
        .collect())
}

type Probe = fn(&str, &str, &KeyStore) -> Result<Option<Box<dyn TranslationBackend>>, Error>;

/// Backends in order of preference.
const PROBES: [(&str, Probe); 2] = [("openai", probe_openai), ("azure", probe_azure)];

fn probe_openai(
    source_language: &str,
    target_language: &str,
    keys: &KeyStore,
) -> Result<Option<Box<dyn TranslationBackend>>, Error> {
    let Some(api_key) = keys.get(OPENAI_KEY) else {
        return Ok(None);
    };
    let mut translator = OpenAiTranslator::new(api_key, source_language, target_language)?;
    if let Some(model) = keys.get(OPENAI_MODEL) {
        translator = translator.with_model(model);
    }
    Ok(Some(Box::new(translator)))
}

fn probe_azure(
    source_language: &str,
    target_language: &str,
    keys: &KeyStore,
) -> Result<Option<Box<dyn TranslationBackend>>, Error> {
    let (Some(key), Some(region)) = (keys.get(AZURE_KEY), keys.get(AZURE_REGION)) else {
        return Ok(None);
    };
    let mut translator = AzureTranslator::new(key, region, source_language, target_language)?;
    if let Some(endpoint) = keys.get(AZURE_ENDPOINT) {
        translator = translator.with_endpoint(endpoint);
    }
    Ok(Some(Box::new(translator)))
}

/// Picks the first backend whose credentials are configured.
///
/// `None` is a valid outcome and means no automatic translation is available.
pub fn select_backend(
    source_language: &str,
    target_language: &str,
    keys: &KeyStore,
) -> Option<Box<dyn TranslationBackend>> {
    for (name, probe) in PROBES {
        match probe(source_language, target_language, keys) {
            Ok(Some(backend)) => {
                tracing::debug!(backend = name, target = target_language, "selected backend");
                return Some(backend);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(backend = name, error = %e, "backend could not be created");
            }
        }
    }
    tracing::debug!(target = target_language, "no translation backend configured");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(file: &[(&str, &str)], env: &'static [(&'static str, &'static str)]) -> KeyStore {
        let file_values = file
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        KeyStore::from_parts(file_values, move |name| {
            env.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        })
    }

    #[test]
    fn test_file_value_shadows_env() {
        let keys = store(&[(OPENAI_KEY, "from-file")], &[(OPENAI_KEY, "from-env")]);
        assert_eq!(keys.get(OPENAI_KEY).as_deref(), Some("from-file"));
    }

    #[test]
    fn test_empty_values_are_absent() {
        let keys = store(&[], &[(AZURE_KEY, "")]);
        assert_eq!(keys.get(AZURE_KEY), None);
    }

    #[test]
    fn test_empty_file_value_still_shadows_env() {
        let keys = store(&[(OPENAI_KEY, "")], &[(OPENAI_KEY, "from-env")]);
        assert_eq!(keys.get(OPENAI_KEY), None);
        assert!(select_backend("en", "de", &keys).is_none());
    }

    #[test]
    fn test_no_credentials_selects_nothing() {
        assert!(select_backend("en", "de", &KeyStore::empty()).is_none());
    }

    #[test]
    fn test_openai_ranks_before_azure() {
        let keys = store(
            &[(AZURE_KEY, "az"), (AZURE_REGION, "westeurope")],
            &[(OPENAI_KEY, "sk")],
        );
        let backend = select_backend("en", "de", &keys).unwrap();
        assert_eq!(backend.name(), "openai");
    }

    #[test]
    fn test_azure_needs_key_and_region() {
        let keys = store(&[(AZURE_KEY, "az")], &[]);
        assert!(select_backend("en", "de", &keys).is_none());

        let keys = store(&[(AZURE_KEY, "az")], &[(AZURE_REGION, "westeurope")]);
        assert_eq!(select_backend("en", "de", &keys).unwrap().name(), "azure");
    }

    #[test]
    fn test_load_reads_key_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(KEY_FILE_NAME),
            r#"{ "AzureTranslatorKey": "az", "Retries": 3 }"#,
        )
        .unwrap();
        let keys = KeyStore::load(dir.path());
        assert_eq!(keys.get(AZURE_KEY).as_deref(), Some("az"));
        assert!(format!("{:?}", keys).contains("AzureTranslatorKey"));
        assert!(!format!("{:?}", keys).contains("\"az\""));
    }

    #[test]
    fn test_load_ignores_malformed_key_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(KEY_FILE_NAME), "not json").unwrap();
        let keys = KeyStore::load(dir.path());
        assert_eq!(keys.file_values.len(), 0);
    }
}

//! All error types for the xliffsync crate.
//!
//! Catalog and format errors abort the reconciliation of one target language.
//! Translation errors never leave the backend layer: the engine turns them
//! into "no translation available".

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("duplicate key `{0}`")]
    DuplicateKey(String),

    #[error("key `{0}` not found")]
    NotFound(String),

    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    #[error("CSV parse error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("translation via {backend} failed: {message}")]
    Translation {
        backend: &'static str,
        message: String,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Creates a new translation error for the named backend.
    pub fn translation(backend: &'static str, message: impl Into<String>) -> Self {
        Error::Translation {
            backend,
            message: message.into(),
        }
    }

    /// Creates a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_duplicate_key_error() {
        let error = Error::DuplicateKey("greeting".to_string());
        assert_eq!(error.to_string(), "duplicate key `greeting`");
    }

    #[test]
    fn test_not_found_error() {
        let error = Error::NotFound("farewell".to_string());
        assert_eq!(error.to_string(), "key `farewell` not found");
    }

    #[test]
    fn test_parse_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        let error = Error::Parse(json_error);
        assert!(error.to_string().contains("parse error"));
    }

    #[test]
    fn test_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = Error::from(io_error);
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_translation_error() {
        let error = Error::translation("azure", "401 Unauthorized");
        assert_eq!(
            error.to_string(),
            "translation via azure failed: 401 Unauthorized"
        );
    }

    #[test]
    fn test_config_error() {
        let error = Error::config("missing [source] table");
        assert_eq!(
            error.to_string(),
            "configuration error: missing [source] table"
        );
    }

    #[test]
    fn test_error_debug() {
        let error = Error::UnknownFormat("po".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("UnknownFormat"));
        assert!(debug.contains("po"));
    }
}

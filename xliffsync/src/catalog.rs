//! Builds the XLIFF document written for a reconciled catalog.

use crate::{
    formats::xliff::{
        SCHEMA_LOCATION, XLIFF_VERSION, XliffBody, XliffDocument, XliffFile, XliffGroup,
        XliffHeader, XliffTool,
    },
    types::{Catalog, SourceInput},
};

pub const TOOL_ID: &str = "xliffsync";
pub const TOOL_NAME: &str = "xliffsync";
pub const TOOL_COMPANY: &str = "Open Source";
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

const NOT_APPLICABLE: &str = "n/a";

/// Run information stored in the `<file>` envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunMetadata {
    pub source_language: String,
    pub target_language: String,
    /// Value of `original` and of the group id.
    pub original: String,
}

impl RunMetadata {
    pub fn new(input: &SourceInput, target_language: &str) -> Self {
        Self {
            source_language: input.source_language.clone(),
            target_language: target_language.to_string(),
            original: original_identifier(
                input.application_name.as_deref(),
                &input.relative_source_path,
            ),
        }
    }
}

/// `APPLICATION/RELATIVE/PATH`, upper-cased. Without an application name the
/// identifier starts with the separator.
pub fn original_identifier(application_name: Option<&str>, relative_path: &str) -> String {
    format!(
        "{}/{}",
        application_name.unwrap_or_default().to_uppercase(),
        relative_path.to_uppercase()
    )
}

fn tool() -> XliffTool {
    XliffTool {
        id: TOOL_ID.to_string(),
        name: Some(TOOL_NAME.to_string()),
        version: Some(TOOL_VERSION.to_string()),
        company: Some(TOOL_COMPANY.to_string()),
    }
}

/// Wraps the units of `catalog`, in catalog order, into a single-file document.
pub fn assemble_catalog(metadata: &RunMetadata, catalog: &Catalog) -> XliffDocument {
    let file = XliffFile {
        datatype: "xml".to_string(),
        source_language: metadata.source_language.clone(),
        target_language: Some(metadata.target_language.clone()),
        original: metadata.original.clone(),
        tool_id: Some(TOOL_ID.to_string()),
        product_name: Some(NOT_APPLICABLE.to_string()),
        product_version: Some(NOT_APPLICABLE.to_string()),
        build_num: Some(NOT_APPLICABLE.to_string()),
        header: Some(XliffHeader { tool: Some(tool()) }),
        body: XliffBody {
            groups: vec![XliffGroup {
                id: Some(metadata.original.clone()),
                datatype: Some("resx".to_string()),
                units: catalog.iter().cloned().collect(),
            }],
            units: Vec::new(),
        },
    };

    XliffDocument {
        version: XLIFF_VERSION.to_string(),
        schema_location: Some(SCHEMA_LOCATION.to_string()),
        files: vec![file],
    }
}

//! All supported file formats for xliffsync.
//!
//! [`xliff`] holds the persisted catalog. The flat resource formats in
//! [`resx`], [`json`] and [`csv`] are read as source string sets and written
//! as per-target resource files; [`ResourceFormat`] selects between them.

pub mod csv;
pub mod json;
pub mod resx;
pub mod xliff;

use std::{
    collections::HashSet,
    fmt::{Display, Formatter},
    path::Path,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

// Reexporting the formats for easier access
pub use csv::CSVRecord;
pub use json::Format as JsonFormat;
pub use resx::Format as ResxFormat;
pub use xliff::XliffDocument;

use crate::{
    Error,
    traits::Parser,
    types::{SourceInput, SourceLine, TargetLine},
};

/// Flat key/value resource formats, used for both source and target files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceFormat {
    /// .NET `.resx` XML resources.
    Resx,
    /// A flat JSON object of name → value.
    Json,
    /// Two-column `key,value` CSV without header.
    Csv,
}

impl Display for ResourceFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Accepts `resx`, `json` and `csv`, case-insensitive, with or without a leading dot.
///
/// # Example
/// ```rust
/// use xliffsync::formats::ResourceFormat;
/// use std::str::FromStr;
/// assert_eq!(ResourceFormat::from_str(".RESX").unwrap(), ResourceFormat::Resx);
/// assert!(ResourceFormat::from_str("po").is_err());
/// ```
impl FromStr for ResourceFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_start_matches('.').to_ascii_lowercase();
        match s.as_str() {
            "resx" => Ok(ResourceFormat::Resx),
            "json" => Ok(ResourceFormat::Json),
            "csv" => Ok(ResourceFormat::Csv),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

impl ResourceFormat {
    /// Returns the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ResourceFormat::Resx => "resx",
            ResourceFormat::Json => "json",
            ResourceFormat::Csv => "csv",
        }
    }

    /// Infers the format from a path's extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

/// Returns the unescaped value of attribute `key` on `element`, if present.
pub(crate) fn xml_attribute(
    element: &quick_xml::events::BytesStart<'_>,
    key: &[u8],
) -> Result<Option<String>, Error> {
    for attr in element.attributes().with_checks(false) {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Reads the source lines of `path` in document order.
///
/// Duplicate names are rejected with [`Error::DuplicateKey`].
pub fn read_source_lines<P: AsRef<Path>>(
    path: P,
    format: ResourceFormat,
) -> Result<Vec<SourceLine>, Error> {
    let lines: Vec<SourceLine> = match format {
        ResourceFormat::Resx => ResxFormat::read_from(path)?.into(),
        ResourceFormat::Json => JsonFormat::read_from(path)?.into(),
        ResourceFormat::Csv => Vec::<CSVRecord>::read_from(path)?
            .into_iter()
            .map(SourceLine::from)
            .collect(),
    };

    let mut seen = HashSet::new();
    for line in &lines {
        if !seen.insert(line.name.as_str()) {
            return Err(Error::DuplicateKey(line.name.clone()));
        }
    }
    Ok(lines)
}

/// Reads a full [`SourceInput`] from `working_dir/relative_path`.
pub fn read_source_input(
    working_dir: &Path,
    relative_path: &str,
    format: Option<ResourceFormat>,
    source_language: &str,
    application_name: Option<&str>,
) -> Result<SourceInput, Error> {
    let format = match format {
        Some(format) => format,
        None => ResourceFormat::from_path(relative_path)
            .ok_or_else(|| Error::UnknownFormat(relative_path.to_string()))?,
    };
    let lines = read_source_lines(working_dir.join(relative_path), format)?;
    tracing::debug!(
        path = relative_path,
        format = %format,
        lines = lines.len(),
        "read source strings"
    );

    Ok(SourceInput {
        source_language: source_language.to_string(),
        application_name: application_name.map(str::to_string),
        relative_source_path: relative_path.to_string(),
        lines,
    })
}

/// Writes `lines` to `path` in `format`, creating parent directories.
pub fn write_target_lines<P: AsRef<Path>>(
    path: P,
    format: ResourceFormat,
    lines: &[TargetLine],
) -> Result<(), Error> {
    match format {
        ResourceFormat::Resx => ResxFormat::from(lines).write_to(path),
        ResourceFormat::Json => JsonFormat::from(lines).write_to(path),
        ResourceFormat::Csv => lines
            .iter()
            .map(CSVRecord::from)
            .collect::<Vec<_>>()
            .write_to(path),
    }
}

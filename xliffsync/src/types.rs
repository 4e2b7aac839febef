//! Core types for xliffsync.
//! Source readers produce [`SourceInput`]; the engine reconciles a [`Catalog`];
//! resource writers consume [`TargetLine`]s.

use std::{fmt::Display, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

use crate::{collection::IndexedList, error::Error, formats::ResourceFormat};

/// One string to be localized, as read from the source resource.
///
/// `value` is `None` when the source format carries a key without a value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceLine {
    pub name: String,
    pub value: Option<String>,
}

impl SourceLine {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// The value with `None` normalized to the empty string.
    pub fn text(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }
}

/// Everything the source side contributes to one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInput {
    pub source_language: String,
    pub application_name: Option<String>,
    /// Path of the source file relative to the working directory.
    pub relative_source_path: String,
    /// Lines in source order; names are unique.
    pub lines: Vec<SourceLine>,
}

/// Review state of a translation unit's target.
///
/// The engine only ever assigns [`TranslationState::New`] and
/// [`TranslationState::NeedsReview`]. Any other XLIFF state (`translated`,
/// `final`, ...) is carried verbatim in [`TranslationState::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TranslationState {
    /// No translation yet; the target text mirrors the source.
    New,

    /// A candidate translation exists and waits for human confirmation.
    NeedsReview,

    /// A state set outside this pipeline.
    Other(String),
}

impl TranslationState {
    pub const NEW: &'static str = "new";
    pub const NEEDS_REVIEW: &'static str = "needs-review-translation";

    pub fn as_str(&self) -> &str {
        match self {
            TranslationState::New => Self::NEW,
            TranslationState::NeedsReview => Self::NEEDS_REVIEW,
            TranslationState::Other(state) => state,
        }
    }
}

impl FromStr for TranslationState {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            Self::NEW => TranslationState::New,
            Self::NEEDS_REVIEW => TranslationState::NeedsReview,
            other => TranslationState::Other(other.to_string()),
        })
    }
}

impl Display for TranslationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The persisted record for one source key across runs (`<trans-unit>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUnit {
    /// Unit identifier, equal to the source line name.
    pub id: String,
    pub source: UnitSource,
    pub target: UnitTarget,
    /// The review note this tool manages.
    pub note: Option<UnitNote>,
    /// Notes written by other tools or translators, kept as read.
    pub other_notes: Vec<UnitNote>,
    /// `translate="yes"`.
    pub translate: bool,
    /// `xml:space="preserve"`.
    pub preserve_whitespace: bool,
}

impl TranslationUnit {
    /// Creates a unit the way the engine inserts it: translatable, whitespace preserved.
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        state: TranslationState,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: UnitSource {
                value: Some(source.into()),
            },
            target: UnitTarget {
                state: Some(state),
                value: target.into(),
            },
            note: None,
            other_notes: Vec::new(),
            translate: true,
            preserve_whitespace: true,
        }
    }

    pub fn is_new(&self) -> bool {
        self.target.state == Some(TranslationState::New)
    }

    pub fn needs_review(&self) -> bool {
        self.target.state == Some(TranslationState::NeedsReview)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnitSource {
    /// `None` when the persisted unit had no `<source>` element.
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnitTarget {
    /// `None` when the persisted `<target>` had no `state` attribute.
    pub state: Option<TranslationState>,
    pub value: String,
}

/// A `<note>` attached to a unit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnitNote {
    pub from: Option<String>,
    pub annotates: Option<String>,
    pub priority: Option<String>,
    pub value: String,
}

impl UnitNote {
    pub const REVIEW_FROM: &'static str = "xliffsync";
    pub const REVIEW_TEXT: &'static str = "Please verify the translation's accuracy as the source string was updated after it was translated.";

    /// Whether this note was written by this tool.
    pub fn is_review_note(&self) -> bool {
        self.from.as_deref() == Some(Self::REVIEW_FROM)
    }

    /// The annotation attached when a unit's source text changed after translation.
    pub fn source_updated() -> Self {
        Self {
            from: Some(Self::REVIEW_FROM.to_string()),
            annotates: Some("source".to_string()),
            priority: Some("2".to_string()),
            value: Self::REVIEW_TEXT.to_string(),
        }
    }
}

/// Ordered translation units of one target language, keyed by unit id.
pub type Catalog = IndexedList<String, TranslationUnit>;

fn unit_id(unit: &TranslationUnit) -> String {
    unit.id.clone()
}

impl Catalog {
    /// An empty catalog keyed by [`TranslationUnit::id`].
    pub fn empty() -> Self {
        IndexedList::new(unit_id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::empty()
    }
}

/// One `{name, value}` pair handed to a resource writer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TargetLine {
    pub name: String,
    pub value: String,
}

/// Configuration of one target language.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TargetDescriptor {
    /// Target language code (e.g. "de", "fr-CA").
    pub language: String,
    /// Catalog path, relative to [`TargetSettings::xliff_base_dir`].
    #[serde(rename = "xliff")]
    pub xliff_path: PathBuf,
    /// Resource path, relative to [`TargetSettings::resources_base_dir`].
    #[serde(rename = "resource")]
    pub resource_path: PathBuf,
}

impl TargetDescriptor {
    pub fn language_identifier(&self) -> Result<LanguageIdentifier, Error> {
        parse_language(&self.language)
    }
}

/// Settings shared by all targets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TargetSettings {
    pub xliff_base_dir: PathBuf,
    pub resources_base_dir: PathBuf,
    /// Format of the emitted resource files.
    pub format: ResourceFormat,
}

/// Unit counts of a reconciled catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CatalogStats {
    pub new: usize,
    pub needs_review: usize,
    pub total: usize,
}

impl CatalogStats {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            new: catalog.count_where(TranslationUnit::is_new),
            needs_review: catalog.count_where(TranslationUnit::needs_review),
            total: catalog.len(),
        }
    }
}

impl Display for CatalogStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "New={}, Needs review={}, Total={}",
            self.new, self.needs_review, self.total
        )
    }
}

/// Parses a BCP 47 language code.
pub fn parse_language(code: &str) -> Result<LanguageIdentifier, Error> {
    if code.trim().is_empty() {
        return Err(Error::config("language code cannot be empty"));
    }
    code.parse::<LanguageIdentifier>()
        .map_err(|e| Error::config(format!("invalid language code `{}`: {}", code, e)))
}

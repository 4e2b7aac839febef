#![forbid(unsafe_code)]
//! Keeps XLIFF translation catalogs in sync with evolving source strings.
//!
//! Each run diffs the current source strings against the catalog persisted for
//! a target language, keeps existing translation work, flags units whose
//! source text changed for review, and asks an optional automatic translation
//! backend for anything still untranslated. The reconciled catalog is written
//! back as XLIFF 1.2 and projected into a flat resource file (`.resx`, JSON or
//! CSV) that contains only units carrying an actual translation.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use xliffsync::{KeyStore, TargetDescriptor, TargetSettings, formats, process_target, select_backend};
//!
//! # async fn run() -> Result<(), xliffsync::Error> {
//! let working_dir = Path::new(".");
//! let source = formats::read_source_input(working_dir, "Resources/Strings.resx", None, "en", Some("MyApp"))?;
//! let settings = TargetSettings {
//!     xliff_base_dir: "MultilingualResources".into(),
//!     resources_base_dir: "Resources".into(),
//!     format: formats::ResourceFormat::Resx,
//! };
//! let target = TargetDescriptor {
//!     language: "de".to_string(),
//!     xliff_path: "MyApp.de.xlf".into(),
//!     resource_path: "Strings.de.resx".into(),
//! };
//!
//! let keys = KeyStore::load(working_dir);
//! let backend = select_backend(&source.source_language, &target.language, &keys);
//! let report = process_target(&source, &settings, &target, working_dir, backend.as_deref()).await?;
//! println!("{}: {}", report.language, report.stats);
//! # Ok(())
//! # }
//! ```
//!
//! # States
//!
//! - **new**: no translation yet; the target text mirrors the source and is
//!   left out of the resource file.
//! - **needs-review-translation**: a candidate translation exists and waits
//!   for a human.
//! - anything else (`translated`, `final`, ...) was set outside this tool and
//!   is kept until the source text changes.

pub mod catalog;
pub mod collection;
pub mod engine;
pub mod error;
pub mod formats;
pub mod target;
pub mod traits;
pub mod translate;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    catalog::{RunMetadata, assemble_catalog},
    collection::IndexedList,
    engine::reconcile,
    error::Error,
    formats::{ResourceFormat, XliffDocument, xliff::read_catalog},
    target::{TargetReport, process_target, project_target_lines},
    traits::Parser,
    translate::{KeyStore, TranslationBackend, select_backend},
    types::{
        Catalog, CatalogStats, SourceInput, SourceLine, TargetDescriptor, TargetLine,
        TargetSettings, TranslationState, TranslationUnit,
    },
};

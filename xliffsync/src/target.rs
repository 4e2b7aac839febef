//! Per-target pipeline: load, reconcile, write catalog and resource file.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::{
    catalog::{RunMetadata, assemble_catalog},
    engine::reconcile,
    error::Error,
    formats::{write_target_lines, xliff::read_catalog},
    traits::Parser,
    translate::TranslationBackend,
    types::{Catalog, CatalogStats, SourceInput, TargetDescriptor, TargetLine, TargetSettings},
};

/// Outcome of processing one target language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetReport {
    pub language: String,
    /// Whether reconciliation changed the catalog.
    pub changed: bool,
    pub stats: CatalogStats,
}

/// Resolved on-disk locations of one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPaths {
    pub xliff: PathBuf,
    pub resource: PathBuf,
}

impl TargetPaths {
    pub fn resolve(working_dir: &Path, settings: &TargetSettings, target: &TargetDescriptor) -> Self {
        Self {
            xliff: working_dir
                .join(&settings.xliff_base_dir)
                .join(&target.xliff_path),
            resource: working_dir
                .join(&settings.resources_base_dir)
                .join(&target.resource_path),
        }
    }
}

/// Lines for the resource file: every unit that is not `New`, in catalog order.
pub fn project_target_lines(catalog: &Catalog) -> Vec<TargetLine> {
    catalog
        .iter()
        .filter(|unit| !unit.is_new())
        .map(|unit| TargetLine {
            name: unit.id.clone(),
            value: unit.target.value.clone(),
        })
        .collect()
}

/// Reconciles the catalog of `target` against `source` and rewrites both output files.
///
/// The catalog and the resource file are always rewritten, even when nothing
/// changed.
pub async fn process_target(
    source: &SourceInput,
    settings: &TargetSettings,
    target: &TargetDescriptor,
    working_dir: &Path,
    backend: Option<&dyn TranslationBackend>,
) -> Result<TargetReport, Error> {
    target.language_identifier()?;
    let paths = TargetPaths::resolve(working_dir, settings, target);

    let mut catalog = read_catalog(&paths.xliff)?;
    let changed = reconcile(&mut catalog, &source.lines, backend).await?;

    let metadata = RunMetadata::new(source, &target.language);
    assemble_catalog(&metadata, &catalog).write_to(&paths.xliff)?;

    let lines = project_target_lines(&catalog);
    write_target_lines(&paths.resource, settings.format, &lines)?;

    let stats = CatalogStats::from_catalog(&catalog);
    tracing::info!(
        target = %target.language,
        changed,
        new = stats.new,
        needs_review = stats.needs_review,
        total = stats.total,
        "processed target"
    );

    Ok(TargetReport {
        language: target.language.clone(),
        changed,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        formats::{ResourceFormat, read_source_lines},
        types::{SourceLine, TranslationState, TranslationUnit},
    };
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct Upper;

    #[async_trait]
    impl TranslationBackend for Upper {
        fn name(&self) -> &'static str {
            "upper"
        }

        async fn translate(&self, text: &str) -> Result<String, Error> {
            Ok(text.to_uppercase())
        }
    }

    fn fixture(lines: Vec<SourceLine>) -> (SourceInput, TargetSettings, TargetDescriptor) {
        let source = SourceInput {
            source_language: "en".to_string(),
            application_name: Some("Demo".to_string()),
            relative_source_path: "strings.json".to_string(),
            lines,
        };
        let settings = TargetSettings {
            xliff_base_dir: PathBuf::from("l10n"),
            resources_base_dir: PathBuf::from("out"),
            format: ResourceFormat::Json,
        };
        let target = TargetDescriptor {
            language: "de".to_string(),
            xliff_path: PathBuf::from("Demo.de.xlf"),
            resource_path: PathBuf::from("strings.de.json"),
        };
        (source, settings, target)
    }

    #[test]
    fn test_project_skips_new_units() {
        let mut catalog = Catalog::empty();
        catalog
            .add(TranslationUnit::new("a", "A", TranslationState::New, "A"))
            .unwrap();
        catalog
            .add(TranslationUnit::new("b", "B", TranslationState::NeedsReview, "Be"))
            .unwrap();
        catalog
            .add(TranslationUnit::new(
                "c",
                "C",
                TranslationState::Other("final".to_string()),
                "Ce",
            ))
            .unwrap();

        let names: Vec<_> = project_target_lines(&catalog)
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_process_without_backend() {
        let dir = TempDir::new().unwrap();
        let (source, settings, target) = fixture(vec![SourceLine::new("hello", "Hello")]);

        let report = process_target(&source, &settings, &target, dir.path(), None)
            .await
            .unwrap();

        assert!(report.changed);
        assert_eq!(
            report.stats,
            CatalogStats {
                new: 1,
                needs_review: 0,
                total: 1
            }
        );
        let paths = TargetPaths::resolve(dir.path(), &settings, &target);
        assert!(paths.xliff.exists());
        let resource = std::fs::read_to_string(&paths.resource).unwrap();
        assert_eq!(resource, "{}\n");
    }

    #[tokio::test]
    async fn test_process_with_backend_writes_resource() {
        let dir = TempDir::new().unwrap();
        let (source, settings, target) = fixture(vec![
            SourceLine::new("hello", "Hello"),
            SourceLine::new("bye", "Bye"),
        ]);

        let report = process_target(&source, &settings, &target, dir.path(), Some(&Upper))
            .await
            .unwrap();
        assert_eq!(report.stats.needs_review, 2);

        let paths = TargetPaths::resolve(dir.path(), &settings, &target);
        let lines = read_source_lines(&paths.resource, ResourceFormat::Json).unwrap();
        assert_eq!(
            lines,
            vec![SourceLine::new("hello", "HELLO"), SourceLine::new("bye", "BYE")]
        );

        let xliff = std::fs::read_to_string(&paths.xliff).unwrap();
        assert!(xliff.contains(r#"original="DEMO/STRINGS.JSON""#));
        assert!(xliff.contains(r#"<target state="needs-review-translation">HELLO</target>"#));
    }

    #[tokio::test]
    async fn test_rerun_is_byte_stable() {
        let dir = TempDir::new().unwrap();
        let (source, settings, target) = fixture(vec![
            SourceLine::new("hello", "Hello & <welcome>"),
            SourceLine {
                name: "empty".to_string(),
                value: None,
            },
        ]);
        let paths = TargetPaths::resolve(dir.path(), &settings, &target);

        process_target(&source, &settings, &target, dir.path(), Some(&Upper))
            .await
            .unwrap();
        let first = std::fs::read(&paths.xliff).unwrap();

        let report = process_target(&source, &settings, &target, dir.path(), Some(&Upper))
            .await
            .unwrap();
        let second = std::fs::read(&paths.xliff).unwrap();

        assert!(!report.changed);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_invalid_target_language() {
        let dir = TempDir::new().unwrap();
        let (source, settings, mut target) = fixture(vec![]);
        target.language = "not a language".to_string();

        let err = process_target(&source, &settings, &target, dir.path(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}

use std::path::{Path, PathBuf};

use xliffsync::{
    KeyStore, TargetReport, formats::read_source_input, process_target, select_backend,
};

use crate::{
    config::{ProjectConfig, resolve_config_path},
    validation::{validate_config, validate_language_code, validate_working_dir},
};

/// Options of the `run` command.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config: Option<PathBuf>,
    pub working_dir: PathBuf,
    /// Restrict the run to these languages; all targets when empty.
    pub targets: Vec<String>,
    pub no_translate: bool,
}

/// Loads and validates the project config for `working_dir`.
pub fn load_project(config: Option<&Path>, working_dir: &Path) -> Result<ProjectConfig, String> {
    validate_working_dir(working_dir)?;
    let path = resolve_config_path(config, working_dir);
    let project = ProjectConfig::load(&path)?;
    validate_config(&project, working_dir)?;
    Ok(project)
}

/// Processes the selected targets one after another.
///
/// A failing target is reported and skipped; the command still fails at the end.
pub async fn run_targets(options: &RunOptions) -> Result<Vec<TargetReport>, String> {
    let project = load_project(options.config.as_deref(), &options.working_dir)?;
    for lang in &options.targets {
        validate_language_code(lang)?;
    }
    let targets = project.select_targets(&options.targets)?;

    let source = read_source_input(
        &options.working_dir,
        &project.source.path,
        project.source.format,
        &project.source.language,
        project.source.application_name.as_deref(),
    )
    .map_err(|e| format!("Cannot read source {}: {}", project.source.path, e))?;

    let keys = if options.no_translate {
        KeyStore::empty()
    } else {
        KeyStore::load(&options.working_dir)
    };

    let mut reports = Vec::with_capacity(targets.len());
    let mut failed = Vec::new();
    for target in targets {
        let backend = select_backend(&source.source_language, &target.language, &keys);
        match process_target(
            &source,
            &project.target_settings,
            target,
            &options.working_dir,
            backend.as_deref(),
        )
        .await
        {
            Ok(report) => {
                println!(
                    "Processing target \"{}\": {}",
                    report.language, report.stats
                );
                reports.push(report);
            }
            Err(e) => {
                tracing::error!(target = %target.language, error = %e, "target failed");
                eprintln!("Error processing target \"{}\": {}", target.language, e);
                failed.push(target.language.clone());
            }
        }
    }

    if failed.is_empty() {
        Ok(reports)
    } else {
        Err(format!("Failed targets: {}", failed.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project(dir: &Path) {
        std::fs::write(
            dir.join("xliffsync.toml"),
            r#"
                [source]
                path = "strings.json"
                language = "en"

                [target_settings]
                xliff_base_dir = "xlf"
                resources_base_dir = "out"
                format = "json"

                [[targets]]
                language = "de"
                xliff = "app.de.xlf"
                resource = "strings.de.json"

                [[targets]]
                language = "fr"
                xliff = "app.fr.xlf"
                resource = "strings.fr.json"
            "#,
        )
        .unwrap();
        std::fs::write(dir.join("strings.json"), r#"{ "hello": "Hello" }"#).unwrap();
    }

    #[tokio::test]
    async fn test_run_all_targets_without_translation() {
        let dir = TempDir::new().unwrap();
        project(dir.path());
        let options = RunOptions {
            working_dir: dir.path().to_path_buf(),
            no_translate: true,
            ..RunOptions::default()
        };

        let reports = run_targets(&options).await.unwrap();

        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.stats.new == 1 && r.stats.total == 1));
        assert!(dir.path().join("xlf/app.fr.xlf").exists());
        assert!(dir.path().join("out/strings.de.json").exists());
    }

    #[tokio::test]
    async fn test_run_selected_target() {
        let dir = TempDir::new().unwrap();
        project(dir.path());
        let options = RunOptions {
            working_dir: dir.path().to_path_buf(),
            targets: vec!["fr".to_string()],
            no_translate: true,
            ..RunOptions::default()
        };

        let reports = run_targets(&options).await.unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].language, "fr");
        assert!(!dir.path().join("xlf/app.de.xlf").exists());
    }

    #[tokio::test]
    async fn test_run_failing_target_does_not_stop_others() {
        let dir = TempDir::new().unwrap();
        project(dir.path());
        std::fs::create_dir_all(dir.path().join("xlf")).unwrap();
        std::fs::write(dir.path().join("xlf/app.de.xlf"), "<xliff><file original=\"x\">").unwrap();
        let options = RunOptions {
            working_dir: dir.path().to_path_buf(),
            no_translate: true,
            ..RunOptions::default()
        };

        let err = run_targets(&options).await.unwrap_err();

        assert_eq!(err, "Failed targets: de");
        assert!(dir.path().join("xlf/app.fr.xlf").exists());
    }

    #[tokio::test]
    async fn test_missing_config() {
        let dir = TempDir::new().unwrap();
        let options = RunOptions {
            working_dir: dir.path().to_path_buf(),
            ..RunOptions::default()
        };
        let err = run_targets(&options).await.unwrap_err();
        assert!(err.starts_with("Cannot read config"));
    }
}

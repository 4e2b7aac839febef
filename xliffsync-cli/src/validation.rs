use std::{collections::HashSet, path::Path};

use unic_langid::LanguageIdentifier;

use crate::config::ProjectConfig;

/// Validate file path exists and is a file
pub fn validate_file_path(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("File does not exist: {}", path.display()));
    }

    if !path.is_file() {
        return Err(format!("Path is not a file: {}", path.display()));
    }

    Ok(())
}

/// Validate working directory exists
pub fn validate_working_dir(path: &Path) -> Result<(), String> {
    if !path.is_dir() {
        return Err(format!(
            "Working directory does not exist: {}",
            path.display()
        ));
    }
    Ok(())
}

/// Validate language code format using unic-langid (same as lib crate)
pub fn validate_language_code(lang: &str) -> Result<(), String> {
    if lang.is_empty() {
        return Err("Language code cannot be empty".to_string());
    }

    match lang.parse::<LanguageIdentifier>() {
        Ok(_) => Ok(()),
        Err(_) => Err(format!(
            "Invalid language code format: {}. Expected valid BCP 47 language identifier",
            lang
        )),
    }
}

/// Checks languages, target uniqueness and the source file of a loaded config.
pub fn validate_config(config: &ProjectConfig, working_dir: &Path) -> Result<(), String> {
    validate_language_code(&config.source.language)?;

    if config.targets.is_empty() {
        return Err("No targets configured".to_string());
    }

    let mut seen = HashSet::new();
    for target in &config.targets {
        validate_language_code(&target.language)?;
        if !seen.insert(target.language.as_str()) {
            return Err(format!("Duplicate target language: {}", target.language));
        }
    }

    validate_file_path(&working_dir.join(&config.source.path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use xliffsync::{ResourceFormat, TargetDescriptor, TargetSettings};

    use crate::config::SourceConfig;

    fn config(targets: &[&str]) -> ProjectConfig {
        ProjectConfig {
            source: SourceConfig {
                path: "strings.json".to_string(),
                language: "en".to_string(),
                application_name: None,
                format: None,
            },
            target_settings: TargetSettings {
                xliff_base_dir: PathBuf::from("xlf"),
                resources_base_dir: PathBuf::from("res"),
                format: ResourceFormat::Json,
            },
            targets: targets
                .iter()
                .map(|lang| TargetDescriptor {
                    language: lang.to_string(),
                    xliff_path: PathBuf::from(format!("{}.xlf", lang)),
                    resource_path: PathBuf::from(format!("strings.{}.json", lang)),
                })
                .collect(),
        }
    }

    #[test]
    fn test_validate_language_code() {
        assert!(validate_language_code("en").is_ok());
        assert!(validate_language_code("zh-Hant-TW").is_ok());
        assert!(validate_language_code("").is_err());
        assert!(validate_language_code("not a code").is_err());
    }

    #[test]
    fn test_validate_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("strings.json"), "{}").unwrap();

        assert!(validate_config(&config(&["de", "fr"]), dir.path()).is_ok());
        assert_eq!(
            validate_config(&config(&["de", "de"]), dir.path()).unwrap_err(),
            "Duplicate target language: de"
        );
        assert_eq!(
            validate_config(&config(&[]), dir.path()).unwrap_err(),
            "No targets configured"
        );
        assert!(validate_config(&config(&["??"]), dir.path()).is_err());
    }

    #[test]
    fn test_validate_config_missing_source() {
        let dir = TempDir::new().unwrap();
        let err = validate_config(&config(&["de"]), dir.path()).unwrap_err();
        assert!(err.starts_with("File does not exist"));
    }
}

use std::path::Path;

use serde_json::json;
use xliffsync::{CatalogStats, read_catalog, target::TargetPaths};

use crate::config::ProjectConfig;

/// Counts of one target's persisted catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetStats {
    pub language: String,
    pub stats: CatalogStats,
}

/// Reads the catalog of every configured target; a missing catalog counts as empty.
pub fn collect_stats(project: &ProjectConfig, working_dir: &Path) -> Result<Vec<TargetStats>, String> {
    project
        .targets
        .iter()
        .map(|target| -> Result<TargetStats, String> {
            let paths = TargetPaths::resolve(working_dir, &project.target_settings, target);
            let catalog = read_catalog(&paths.xliff)
                .map_err(|e| format!("Cannot read {}: {}", paths.xliff.display(), e))?;
            Ok(TargetStats {
                language: target.language.clone(),
                stats: CatalogStats::from_catalog(&catalog),
            })
        })
        .collect()
}

pub fn print_stats(stats: &[TargetStats], json_output: bool) -> Result<(), String> {
    if json_output {
        let targets: Vec<_> = stats
            .iter()
            .map(|t| {
                json!({
                    "language": t.language,
                    "new": t.stats.new,
                    "needs_review": t.stats.needs_review,
                    "total": t.stats.total,
                })
            })
            .collect();
        let body = json!({ "targets": targets });
        let text = serde_json::to_string_pretty(&body).map_err(|e| e.to_string())?;
        println!("{}", text);
        return Ok(());
    }

    println!("=== Stats ===");
    for t in stats {
        println!("Target \"{}\": {}", t.language, t.stats);
    }
    Ok(())
}

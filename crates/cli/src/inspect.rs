use anyhow::{Context, Result};
use providers::SnifferRegistry;
use serde::Serialize;
use sorter_core::classifier::ContentClassifier;
use sorter_core::config::AppConfig;
use sorter_core::models::{ClassificationMatch, Decision};
use sorter_core::resolver::DestinationResolver;
use std::path::{Path, PathBuf};

/// What the sorter would make of one file, without touching it.
#[derive(Debug, Serialize)]
pub struct Report {
    pub path: PathBuf,
    pub matches: Vec<ClassificationMatch>,
    pub backup_hint: Option<String>,
    pub decision: Option<Decision>,
}

pub async fn inspect_file(cfg: &AppConfig, path: &Path) -> Result<Report> {
    let classifier = ContentClassifier::from_config(&cfg.classification, &SnifferRegistry::builtin())?;
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let classification = tokio::task::spawn_blocking(move || classifier.inspect(&bytes)).await?;
    let current_extension = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    let decision = DestinationResolver::default().resolve(
        &classification.matches,
        &current_extension,
        classification.backup_hint.as_deref(),
    );
    Ok(Report {
        path: path.to_path_buf(),
        matches: classification.matches,
        backup_hint: classification.backup_hint,
        decision,
    })
}

impl Report {
    pub fn print(&self, json: bool) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(self)?);
            return Ok(());
        }
        println!("{}", self.path.display());
        for m in &self.matches {
            let confidence = m
                .confidence
                .map(|c| format!("{:.2}", c))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {:<40} {:>5}  [{}]  ({})",
                m.mime_type,
                confidence,
                m.candidate_extensions.join(", "),
                m.engine
            );
        }
        if let Some(hint) = &self.backup_hint {
            println!("  backup hint: {hint}");
        }
        match &self.decision {
            Some(d) => println!(
                "  -> .{} into {}/ (via {}{})",
                d.final_extension,
                d.category,
                d.strategy,
                if d.identified { "" } else { ", unverified" }
            ),
            None => println!("  -> left in place"),
        }
        Ok(())
    }
}

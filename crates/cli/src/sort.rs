use anyhow::{Context, Result};
use providers::SnifferRegistry;
use serde::Serialize;
use sorter_core::config::AppConfig;
use sorter_core::engine::SortingEngine;
use sorter_core::models::EventOutcome;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default, Serialize)]
pub struct SortSummary {
    pub moved: usize,
    pub skipped: usize,
    pub failed: usize,
    pub ignored: usize,
    pub outcomes: Vec<EventOutcome>,
}

impl SortSummary {
    pub fn from_outcomes(outcomes: Vec<EventOutcome>) -> Self {
        let mut summary = Self::default();
        for outcome in &outcomes {
            match outcome {
                EventOutcome::Moved { .. } => summary.moved += 1,
                EventOutcome::Skipped { .. } => summary.skipped += 1,
                EventOutcome::Failed { .. } => summary.failed += 1,
                EventOutcome::Ignored { .. } => summary.ignored += 1,
            }
        }
        summary.outcomes = outcomes;
        summary
    }

    pub fn print(&self, json: bool) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(self)?);
            return Ok(());
        }
        for outcome in &self.outcomes {
            match outcome {
                EventOutcome::Moved { from, to, dry_run, .. } => {
                    let verb = if *dry_run { "would move" } else { "moved" };
                    println!("{verb} {} -> {}", from.display(), to.display());
                }
                EventOutcome::Skipped { path, reason } => {
                    println!("skipped {} ({reason})", path.display())
                }
                EventOutcome::Failed { path, error } => {
                    println!("failed {}: {error}", path.display())
                }
                EventOutcome::Ignored { .. } => {}
            }
        }
        println!(
            "sort: moved {}, skipped {}, failed {}",
            self.moved, self.skipped, self.failed
        );
        Ok(())
    }
}

/// Sorts what is in the directory right now and returns.
pub async fn sort_once(cfg: AppConfig) -> Result<SortSummary> {
    let engine = Arc::new(
        SortingEngine::from_config(&cfg, &SnifferRegistry::builtin(), CancellationToken::new())
            .context("failed to set up the sorter")?,
    );
    let outcomes = engine.sort_existing().await?;
    engine.drain().await;
    Ok(SortSummary::from_outcomes(outcomes))
}

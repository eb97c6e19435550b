use anyhow::{Context, Result};
use notify::event::{CreateKind, ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use providers::SnifferRegistry;
use sorter_core::config::AppConfig;
use sorter_core::engine::SortingEngine;
use sorter_core::models::FileEvent;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const EVENT_QUEUE: usize = 256;

/// Only creations and the destination side of renames are of interest.
///
/// inotify reports a rename as `From`, `To` and `Both`; `To` already names
/// the new path, so `Both` is dropped. Backends that cannot pair the halves
/// report `Any` with the path that exists now.
pub fn file_events(event: &Event) -> Vec<FileEvent> {
    match event.kind {
        EventKind::Create(CreateKind::Folder) => Vec::new(),
        EventKind::Create(_) => event.paths.iter().cloned().map(FileEvent::created).collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::To | RenameMode::Any)) => {
            event.paths.iter().cloned().map(FileEvent::renamed).collect()
        }
        _ => Vec::new(),
    }
}

/// Watches until Ctrl-C, then lets in-flight files finish.
pub async fn run(cfg: AppConfig) -> Result<()> {
    let cancel = CancellationToken::new();
    let engine = Arc::new(
        SortingEngine::from_config(&cfg, &SnifferRegistry::builtin(), cancel.clone())
            .context("failed to set up the sorter")?,
    );

    let (tx, rx) = mpsc::channel(EVENT_QUEUE);
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                for file_event in file_events(&event) {
                    if tx.blocking_send(file_event).is_err() {
                        debug!("event queue closed");
                        return;
                    }
                }
            }
            Err(e) => warn!(error = %e, "watch error"),
        },
        notify::Config::default(),
    )?;
    watcher
        .watch(engine.watched_dir(), RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch {}", engine.watched_dir().display()))?;
    info!(
        dir = %engine.watched_dir().display(),
        dry_run = cfg.watch.dry_run,
        "Watching for new files"
    );

    if cfg.watch.sweep_on_start {
        engine.sweep().await?;
    }

    let runner = tokio::spawn(Arc::clone(&engine).run(rx));
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;
    info!("Shutting down, waiting for files in progress");
    cancel.cancel();
    drop(watcher);
    runner.await?;
    Ok(())
}

//! Per-event sorting pipeline and the dispatcher that runs one task per event.

use crate::classifier::ContentClassifier;
use crate::config::AppConfig;
use crate::error::SortError;
use crate::models::{EventOutcome, EventState, FileEvent};
use crate::mover;
use crate::namer::CollisionNamer;
use crate::reader::StableReader;
use crate::resolver::DestinationResolver;
use crate::scanner::{self, IgnoreSet};
use providers::SnifferRegistry;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

pub struct SortingEngine {
    watched_dir: PathBuf,
    ignore: IgnoreSet,
    dry_run: bool,
    reader: StableReader,
    classifier: Arc<ContentClassifier>,
    resolver: DestinationResolver,
    cancel: CancellationToken,
    tracker: TaskTracker,
    in_flight: Arc<Mutex<HashSet<PathBuf>>>,
}

impl SortingEngine {
    pub fn new(
        cfg: &AppConfig,
        classifier: ContentClassifier,
        cancel: CancellationToken,
    ) -> Result<Self, SortError> {
        let dir = PathBuf::from(&cfg.watch.directory);
        let watched_dir = std::fs::canonicalize(&dir)
            .map_err(|source| SortError::WatchedDirectory { dir, source })?;
        Ok(Self {
            watched_dir,
            ignore: IgnoreSet::new(&cfg.watch.ignore)?,
            dry_run: cfg.watch.dry_run,
            reader: StableReader::new(cfg.reader.backoff(), cancel.clone()),
            classifier: Arc::new(classifier),
            resolver: DestinationResolver::default(),
            cancel,
            tracker: TaskTracker::new(),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        })
    }

    /// Engine with backends picked from `registry` by the names in `cfg`.
    pub fn from_config(
        cfg: &AppConfig,
        registry: &SnifferRegistry,
        cancel: CancellationToken,
    ) -> Result<Self, SortError> {
        let classifier = ContentClassifier::from_config(&cfg.classification, registry)?;
        Self::new(cfg, classifier, cancel)
    }

    pub fn watched_dir(&self) -> &Path {
        &self.watched_dir
    }

    /// Runs one event through the whole pipeline. Never returns an error:
    /// failures become [`EventOutcome::Failed`] plus a log line.
    pub async fn handle_event(&self, event: FileEvent) -> EventOutcome {
        let path = event.path;
        debug!(path = %path.display(), kind = ?event.kind, state = ?EventState::Pending, "file event");

        if let Some(reason) = self.reject_reason(&path).await {
            debug!(path = %path.display(), reason, "ignoring event");
            return EventOutcome::Ignored {
                path,
                reason: reason.to_string(),
            };
        }

        match self.process(&path).await {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => {
                info!(path = %path.display(), "Stopped waiting for file, shutting down");
                EventOutcome::Failed {
                    path,
                    error: e.to_string(),
                }
            }
            Err(e) => {
                error!(file = %display_name(&path), error = %e, "Failed to handle new file");
                EventOutcome::Failed {
                    path,
                    error: e.to_string(),
                }
            }
        }
    }

    async fn process(&self, path: &Path) -> Result<EventOutcome, SortError> {
        transition(path, EventState::Reading);
        let bytes = self.reader.read(path).await?;

        transition(path, EventState::Classifying);
        let classifier = Arc::clone(&self.classifier);
        let classification = tokio::task::spawn_blocking(move || classifier.inspect(&bytes)).await?;
        debug!(
            path = %path.display(),
            matches = ?classification.matches,
            backup_hint = ?classification.backup_hint,
            "classified"
        );

        transition(path, EventState::Resolving);
        let current_extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        let Some(decision) = self.resolver.resolve(
            &classification.matches,
            &current_extension,
            classification.backup_hint.as_deref(),
        ) else {
            warn!(file = %display_name(path), "No definitions found for file, leaving it in place");
            return Ok(EventOutcome::Skipped {
                path: path.to_path_buf(),
                reason: "no category determined".to_string(),
            });
        };
        if !decision.identified {
            info!(
                file = %display_name(path),
                extension = %decision.final_extension,
                "Content not recognized, sorting by current extension"
            );
        }
        if decision.final_extension != current_extension {
            info!(
                file = %display_name(path),
                from = %format!(".{current_extension}"),
                to = %format!(".{}", decision.final_extension),
                strategy = decision.strategy,
                mime = classification.matches.first().map(|m| m.mime_type.as_str()).unwrap_or(""),
                "Updating file extension to match its content"
            );
        }

        transition(path, EventState::Placing);
        let category_dir = self.watched_dir.join(&decision.category);
        if !self.dry_run {
            mover::ensure_category_dir(&category_dir).await?;
        }
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let desired = format!("{}.{}", stem, decision.final_extension);
        let destination = CollisionNamer::place(&category_dir, &desired).await?;
        let target = destination.to_path_buf();
        info!(
            file = %destination.file_name(),
            category = %decision.category,
            dry_run = self.dry_run,
            "New file moving to category"
        );

        if !self.dry_run {
            mover::relocate(path, &target).await?;
        }
        transition(path, EventState::Moved);
        Ok(EventOutcome::Moved {
            from: path.to_path_buf(),
            to: target,
            category: decision.category,
            dry_run: self.dry_run,
        })
    }

    /// Why an event is not ours to sort, if it isn't.
    async fn reject_reason(&self, path: &Path) -> Option<&'static str> {
        if path.parent() != Some(self.watched_dir.as_path()) {
            return Some("outside the watched directory");
        }
        if self.ignore.is_ignored(path) {
            return Some("matches an ignore pattern");
        }
        match tokio::fs::symlink_metadata(path).await {
            Err(_) => Some("no longer exists"),
            Ok(meta) if meta.file_type().is_symlink() => Some("symbolic link"),
            Ok(meta) if !meta.is_file() => Some("not a regular file"),
            Ok(_) => None,
        }
    }

    /// Spawns a handler task unless one is already running for this path.
    pub fn dispatch(self: &Arc<Self>, event: FileEvent) -> Option<JoinHandle<EventOutcome>> {
        let Some(guard) = InFlight::acquire(&self.in_flight, &event.path) else {
            debug!(path = %event.path.display(), "duplicate event for a file already in flight");
            return None;
        };
        let engine = Arc::clone(self);
        Some(self.tracker.spawn(async move {
            let _guard = guard;
            engine.handle_event(event).await
        }))
    }

    /// Dispatches until the channel closes or shutdown is requested, then
    /// waits for every in-flight handler.
    pub async fn run(self: Arc<Self>, mut events: mpsc::Receiver<FileEvent>) {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                next = events.recv() => match next {
                    Some(event) => {
                        self.dispatch(event);
                    }
                    None => break,
                },
            }
        }
        self.drain().await;
    }

    pub async fn drain(&self) {
        self.tracker.close();
        debug!(in_flight = self.tracker.len(), "draining handlers");
        self.tracker.wait().await;
    }

    /// Dispatches a `Created` event for every file already present.
    pub async fn sweep(self: &Arc<Self>) -> Result<Vec<JoinHandle<EventOutcome>>, SortError> {
        let dir = self.watched_dir.clone();
        let ignore = self.ignore.clone();
        let existing = tokio::task::spawn_blocking(move || scanner::scan_existing(&dir, &ignore)).await?;
        info!(count = existing.len(), "Sweeping files already in the watched directory");
        Ok(existing
            .into_iter()
            .filter_map(|path| self.dispatch(FileEvent::created(path)))
            .collect())
    }

    /// One-shot sort of the directory's current contents.
    pub async fn sort_existing(self: &Arc<Self>) -> Result<Vec<EventOutcome>, SortError> {
        let mut outcomes = Vec::new();
        for handle in self.sweep().await? {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => error!(error = %e, "sort task panicked"),
            }
        }
        Ok(outcomes)
    }
}

fn transition(path: &Path, state: EventState) {
    debug!(path = %path.display(), state = ?state, "state");
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Marks a path as being handled; released on drop.
struct InFlight {
    set: Arc<Mutex<HashSet<PathBuf>>>,
    path: PathBuf,
}

impl InFlight {
    fn acquire(set: &Arc<Mutex<HashSet<PathBuf>>>, path: &Path) -> Option<Self> {
        let inserted = set
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(path.to_path_buf());
        inserted.then(|| Self {
            set: Arc::clone(set),
            path: path.to_path_buf(),
        })
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&self.path);
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileEventKind {
    Created,
    Renamed,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileEvent {
    pub path: PathBuf,
    pub kind: FileEventKind,
    pub timestamp: DateTime<Utc>,
}

impl FileEvent {
    pub fn created(path: impl Into<PathBuf>) -> Self {
        Self::new(path, FileEventKind::Created)
    }

    pub fn renamed(path: impl Into<PathBuf>) -> Self {
        Self::new(path, FileEventKind::Renamed)
    }

    fn new(path: impl Into<PathBuf>, kind: FileEventKind) -> Self {
        Self {
            path: path.into(),
            kind,
            timestamp: Utc::now(),
        }
    }
}

/// Engine that produced a match. Declaration order is the tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    Primary,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationMatch {
    pub mime_type: String,
    pub confidence: Option<f32>,
    pub candidate_extensions: Vec<String>,
    pub source: MatchSource,
    pub engine: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub final_extension: String,
    pub category: String,
    pub identified: bool,
    pub strategy: &'static str,
}

impl Decision {
    pub fn new(extension: &str, identified: bool, strategy: &'static str) -> Self {
        let final_extension = extension.trim().trim_start_matches('.').to_string();
        Self {
            category: final_extension.to_uppercase(),
            final_extension,
            identified,
            strategy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestinationPath {
    pub directory: PathBuf,
    pub file_stem: String,
    pub extension: String,
    pub collision_index: Option<usize>,
}

impl DestinationPath {
    pub fn file_name(&self) -> String {
        let base = match self.collision_index {
            Some(n) => format!("{}_{}", self.file_stem, n),
            None => self.file_stem.clone(),
        };
        if self.extension.is_empty() {
            base
        } else {
            format!("{}.{}", base, self.extension)
        }
    }

    pub fn to_path_buf(&self) -> PathBuf {
        self.directory.join(self.file_name())
    }
}

/// Where an event is in its pipeline. Only the last three are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventState {
    Pending,
    Reading,
    Classifying,
    Resolving,
    Placing,
    Moved,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EventOutcome {
    Moved {
        from: PathBuf,
        to: PathBuf,
        category: String,
        dry_run: bool,
    },
    Skipped {
        path: PathBuf,
        reason: String,
    },
    Failed {
        path: PathBuf,
        error: String,
    },
    /// The event does not name a sortable file directly in the watched directory.
    Ignored {
        path: PathBuf,
        reason: String,
    },
}

impl EventOutcome {
    pub fn path(&self) -> &Path {
        match self {
            EventOutcome::Moved { from, .. } => from,
            EventOutcome::Skipped { path, .. }
            | EventOutcome::Failed { path, .. }
            | EventOutcome::Ignored { path, .. } => path,
        }
    }

    pub fn state(&self) -> Option<EventState> {
        match self {
            EventOutcome::Moved { .. } => Some(EventState::Moved),
            EventOutcome::Skipped { .. } => Some(EventState::Skipped),
            EventOutcome::Failed { .. } => Some(EventState::Failed),
            EventOutcome::Ignored { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_is_upper_extension_without_dot() {
        let d = Decision::new(".pdf", true, "test");
        assert_eq!(d.final_extension, "pdf");
        assert_eq!(d.category, "PDF");
    }

    #[test]
    fn destination_renders_collision_suffix() {
        let mut dest = DestinationPath {
            directory: PathBuf::from("/dl/TXT"),
            file_stem: "note".into(),
            extension: "txt".into(),
            collision_index: None,
        };
        assert_eq!(dest.file_name(), "note.txt");
        dest.collision_index = Some(2);
        assert_eq!(dest.to_path_buf(), PathBuf::from("/dl/TXT/note_2.txt"));
    }
}

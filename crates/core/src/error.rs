use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("read of {} cancelled while waiting for its writer", .path.display())]
    Cancelled { path: PathBuf },
    #[error("cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum SortError {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("cannot list {}: {source}", .dir.display())]
    ListDirectory {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot create category folder {}: {source}", .dir.display())]
    CreateCategory {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),
    #[error("cannot move {} to {}: {source}", .from.display(), .to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot watch {}: {source}", .dir.display())]
    WatchedDirectory {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid ignore pattern: {0}")]
    IgnorePattern(#[from] globset::Error),
    #[error(transparent)]
    Provider(#[from] providers::ProviderError),
}

impl SortError {
    /// Shutdown interrupted the read; not worth an error-level log line.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SortError::Read(ReadError::Cancelled { .. }))
    }
}

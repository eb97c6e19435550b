//! Reads a new file once its writer lets go of it.

use crate::error::ReadError;
use std::future::Future;
use std::io;
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct StableReader {
    backoff: Duration,
    cancel: CancellationToken,
}

impl StableReader {
    pub fn new(backoff: Duration, cancel: CancellationToken) -> Self {
        Self { backoff, cancel }
    }

    pub async fn read(&self, path: &Path) -> Result<Vec<u8>, ReadError> {
        self.read_with(path, |p| tokio::fs::read(p.to_path_buf()))
            .await
    }

    /// Retries `op` every `backoff` for as long as it fails with lock
    /// contention. Warns on the first contended attempt only.
    pub async fn read_with<F, Fut>(&self, path: &Path, mut op: F) -> Result<Vec<u8>, ReadError>
    where
        F: FnMut(&Path) -> Fut,
        Fut: Future<Output = io::Result<Vec<u8>>>,
    {
        let mut attempts: u32 = 0;
        loop {
            match op(path).await {
                Ok(bytes) => {
                    if attempts > 0 {
                        debug!(path = %path.display(), attempts, "read succeeded after retries");
                    }
                    return Ok(bytes);
                }
                Err(err) if is_contention(&err) => {
                    if attempts == 0 {
                        warn!(
                            file = %display_name(path),
                            error = %err,
                            "Failed to read new file, waiting for its writer to finish"
                        );
                    }
                    attempts += 1;
                    tokio::select! {
                        _ = self.cancel.cancelled() => {
                            return Err(ReadError::Cancelled { path: path.to_path_buf() });
                        }
                        _ = tokio::time::sleep(self.backoff) => {}
                    }
                }
                Err(source) => {
                    return Err(ReadError::Unreadable {
                        path: path.to_path_buf(),
                        source,
                    })
                }
            }
        }
    }
}

/// Errors a writer holding the file produces. Anything else is final.
pub fn is_contention(err: &io::Error) -> bool {
    if matches!(
        err.kind(),
        io::ErrorKind::PermissionDenied | io::ErrorKind::WouldBlock
    ) {
        return true;
    }
    match err.raw_os_error() {
        // ERROR_SHARING_VIOLATION, ERROR_LOCK_VIOLATION
        #[cfg(windows)]
        Some(32) | Some(33) => true,
        // EBUSY, ETXTBSY
        #[cfg(unix)]
        Some(16) | Some(26) => true,
        _ => false,
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contention_classification() {
        assert!(is_contention(&io::Error::from(io::ErrorKind::PermissionDenied)));
        assert!(is_contention(&io::Error::from(io::ErrorKind::WouldBlock)));
        assert!(!is_contention(&io::Error::from(io::ErrorKind::NotFound)));
        assert!(!is_contention(&io::Error::from(io::ErrorKind::InvalidData)));
    }

    #[cfg(unix)]
    #[test]
    fn busy_errno_is_contention() {
        assert!(is_contention(&io::Error::from_raw_os_error(16)));
        assert!(!is_contention(&io::Error::from_raw_os_error(2)));
    }
}

use crate::error::SortError;
use std::io;
use std::path::Path;
use tracing::debug;

/// Creates the category folder if needed. Safe to repeat.
pub async fn ensure_category_dir(dir: &Path) -> Result<(), SortError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| SortError::CreateCategory {
            dir: dir.to_path_buf(),
            source,
        })
}

/// Moves `from` to `to`, failing with [`SortError::DestinationExists`]
/// instead of replacing a file that is already there.
///
/// The file is hard-linked under its new name, which the filesystem refuses
/// atomically when the name is taken, and the old name is then unlinked.
/// Filesystems without hard links (FAT, some network shares) fall back to an
/// existence check followed by a rename, where a file appearing in between
/// can still be replaced.
pub async fn relocate(from: &Path, to: &Path) -> Result<(), SortError> {
    let move_err = |source: io::Error| SortError::Move {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };
    match tokio::fs::hard_link(from, to).await {
        Ok(()) => {
            tokio::fs::remove_file(from).await.map_err(move_err)?;
            debug!(from = %from.display(), to = %to.display(), "linked and unlinked");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            Err(SortError::DestinationExists(to.to_path_buf()))
        }
        Err(e) => {
            debug!(error = %e, "hard link unavailable, renaming");
            rename_if_absent(from, to).await
        }
    }
}

async fn rename_if_absent(from: &Path, to: &Path) -> Result<(), SortError> {
    let move_err = |source: io::Error| SortError::Move {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };
    if tokio::fs::try_exists(to).await.map_err(move_err)? {
        return Err(SortError::DestinationExists(to.to_path_buf()));
    }
    tokio::fs::rename(from, to).await.map_err(move_err)?;
    debug!(from = %from.display(), to = %to.display(), "renamed");
    Ok(())
}

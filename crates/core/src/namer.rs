//! Picks a file name inside a category folder that does not clash with what
//! is already there.
//!
//! The listing is read, then acted on later by the mover, with no lock in
//! between: two events that want the same name at the same moment compute
//! the same suffix and the slower move fails. The suffix is a count of
//! entries sharing the stem prefix, not a sequence, so unrelated names like
//! `a.txt` and `abc.txt` both raise it.

use crate::error::SortError;
use crate::models::DestinationPath;
use std::io;
use std::path::Path;

pub struct CollisionNamer;

impl CollisionNamer {
    pub async fn place(directory: &Path, desired_file_name: &str) -> Result<DestinationPath, SortError> {
        let existing = list_file_names(directory).await?;
        Ok(Self::place_among(directory, desired_file_name, &existing))
    }

    /// Pure half of [`place`](Self::place), against a listing taken earlier.
    pub fn place_among(directory: &Path, desired_file_name: &str, existing: &[String]) -> DestinationPath {
        let (stem, extension) = split_file_name(desired_file_name);
        let taken = existing.iter().any(|name| name == desired_file_name);
        let collision_index = if taken {
            Some(
                existing
                    .iter()
                    .filter(|name| split_file_name(name).0.starts_with(stem.as_str()))
                    .count(),
            )
        } else {
            None
        };
        DestinationPath {
            directory: directory.to_path_buf(),
            file_stem: stem,
            extension,
            collision_index,
        }
    }
}

/// Regular files only. A folder that does not exist yet is empty.
async fn list_file_names(directory: &Path) -> Result<Vec<String>, SortError> {
    let list_err = |source: io::Error| SortError::ListDirectory {
        dir: directory.to_path_buf(),
        source,
    };
    let mut entries = match tokio::fs::read_dir(directory).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(list_err(e)),
    };
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(list_err)? {
        let is_file = entry
            .file_type()
            .await
            .map(|t| t.is_file())
            .unwrap_or(false);
        if is_file {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}

fn split_file_name(name: &str) -> (String, String) {
    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    (stem, extension)
}

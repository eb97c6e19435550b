//! Ignore rules and the startup sweep of files already in the watched directory.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct IgnoreSet {
    globs: GlobSet,
}

impl IgnoreSet {
    pub fn new(patterns: &[String]) -> Result<Self, globset::Error> {
        Ok(Self {
            globs: build_globset(patterns)?,
        })
    }

    /// Globs match the file name only.
    pub fn is_ignored(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| self.globs.is_match(Path::new(name)))
            .unwrap_or(true)
    }
}

/// Regular files directly inside `dir` that are not ignored. Symlinks and
/// sub-folders (category folders included) are left out.
pub fn scan_existing(dir: &Path, ignore: &IgnoreSet) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| !ignore.is_ignored(path))
        .collect()
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat)?);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ignore(patterns: &[&str]) -> IgnoreSet {
        IgnoreSet::new(&patterns.iter().map(|s| s.to_string()).collect::<Vec<_>>()).unwrap()
    }

    #[test]
    fn matches_partial_downloads_and_dotfiles() {
        let set = ignore(&[".*", "*.crdownload", "*.part"]);
        assert!(set.is_ignored(Path::new("/dl/movie.mkv.part")));
        assert!(set.is_ignored(Path::new("/dl/setup.exe.crdownload")));
        assert!(set.is_ignored(Path::new("/dl/.DS_Store")));
        assert!(!set.is_ignored(Path::new("/dl/report.pdf")));
    }

    #[test]
    fn bad_pattern_is_an_error() {
        assert!(IgnoreSet::new(&["[".to_string()]).is_err());
    }

    #[test]
    fn scan_is_flat_and_files_only() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("b.txt"), "b").unwrap();
        std::fs::write(temp.path().join("a.pdf"), "a").unwrap();
        std::fs::write(temp.path().join("c.part"), "c").unwrap();
        std::fs::create_dir(temp.path().join("TXT")).unwrap();
        std::fs::write(temp.path().join("TXT").join("old.txt"), "o").unwrap();

        let found = scan_existing(temp.path(), &ignore(&["*.part"]));
        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.txt"]);
    }
}

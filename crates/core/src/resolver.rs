//! Turns classifier output and the current file name into one extension.
//!
//! Each strategy either decides or passes; the first decision wins:
//!
//! 1. [`TopMatch`]: the top-ranked match's candidates, keeping the current
//!    extension when it is one of them.
//! 2. [`BackupHint`]: the backup engine's `ext/alt` hint, for a top match
//!    that names no extension.
//! 3. [`CurrentExtension`]: whatever the file is already called.
//!
//! No decision means no category can be named and the file stays put.

use crate::models::{ClassificationMatch, Decision};

pub struct Signals<'a> {
    pub matches: &'a [ClassificationMatch],
    pub current_extension: &'a str,
    pub backup_hint: Option<&'a str>,
}

pub trait ResolveStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn decide(&self, signals: &Signals<'_>) -> Option<Decision>;
}

pub struct TopMatch;

impl ResolveStrategy for TopMatch {
    fn name(&self) -> &'static str {
        "top_match"
    }

    fn decide(&self, signals: &Signals<'_>) -> Option<Decision> {
        let top = signals.matches.first()?;
        let current = normalize(signals.current_extension);
        if !current.is_empty()
            && top
                .candidate_extensions
                .iter()
                .any(|c| normalize(c).eq_ignore_ascii_case(current))
        {
            return Some(Decision::new(current, true, self.name()));
        }
        // Classifier order, not alphabetical: the first candidate is the most representative.
        top.candidate_extensions
            .iter()
            .map(|c| normalize(c))
            .find(|c| !c.is_empty())
            .map(|ext| Decision::new(ext, true, self.name()))
    }
}

pub struct BackupHint;

impl ResolveStrategy for BackupHint {
    fn name(&self) -> &'static str {
        "backup_hint"
    }

    fn decide(&self, signals: &Signals<'_>) -> Option<Decision> {
        let top = signals.matches.first()?;
        if !top.candidate_extensions.is_empty() {
            return None;
        }
        let ext = normalize(signals.backup_hint?.split('/').next()?);
        // libmagic marks an unknown extension with `?`, e.g. `???` or `jpeg/???`.
        if ext.is_empty() || ext.contains('?') {
            return None;
        }
        Some(Decision::new(ext, true, self.name()))
    }
}

pub struct CurrentExtension;

impl ResolveStrategy for CurrentExtension {
    fn name(&self) -> &'static str {
        "current_extension"
    }

    fn decide(&self, signals: &Signals<'_>) -> Option<Decision> {
        let current = normalize(signals.current_extension);
        if current.is_empty() {
            return None;
        }
        // With no matches at all nothing contradicts the name; with matches
        // that named nothing usable, the name is only a guess.
        Some(Decision::new(current, signals.matches.is_empty(), self.name()))
    }
}

pub struct DestinationResolver {
    chain: Vec<Box<dyn ResolveStrategy>>,
}

impl Default for DestinationResolver {
    fn default() -> Self {
        Self::with_chain(vec![
            Box::new(TopMatch),
            Box::new(BackupHint),
            Box::new(CurrentExtension),
        ])
    }
}

impl DestinationResolver {
    pub fn with_chain(chain: Vec<Box<dyn ResolveStrategy>>) -> Self {
        Self { chain }
    }

    pub fn resolve(
        &self,
        matches: &[ClassificationMatch],
        current_extension: &str,
        backup_hint: Option<&str>,
    ) -> Option<Decision> {
        let signals = Signals {
            matches,
            current_extension,
            backup_hint,
        };
        self.chain
            .iter()
            .find_map(|strategy| strategy.decide(&signals))
            .filter(|d| !d.final_extension.is_empty())
    }
}

fn normalize(ext: &str) -> &str {
    ext.trim().trim_start_matches('.')
}

use crate::config::ClassificationConfig;
use crate::models::{ClassificationMatch, MatchSource};
use providers::{ExtensionHinter, ProviderError, SniffMatch, Sniffer, SnifferRegistry};
use std::cmp::Ordering;
use std::sync::Arc;

/// Matches plus the backup engine's hint, when one was needed.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub matches: Vec<ClassificationMatch>,
    pub backup_hint: Option<String>,
}

#[derive(Clone)]
pub struct ContentClassifier {
    primary: Arc<dyn Sniffer>,
    fallback: Option<Arc<dyn Sniffer>>,
    backup: Option<Arc<dyn ExtensionHinter>>,
}

impl ContentClassifier {
    pub fn new(primary: Arc<dyn Sniffer>) -> Self {
        Self {
            primary,
            fallback: None,
            backup: None,
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn Sniffer>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_backup(mut self, backup: Arc<dyn ExtensionHinter>) -> Self {
        self.backup = Some(backup);
        self
    }

    pub fn from_config(
        cfg: &ClassificationConfig,
        registry: &SnifferRegistry,
    ) -> Result<Self, ProviderError> {
        let mut classifier = Self::new(registry.sniffer(&cfg.primary)?);
        if let Some(name) = &cfg.fallback {
            classifier = classifier.with_fallback(registry.sniffer(name)?);
        }
        if let Some(name) = &cfg.backup {
            classifier = classifier.with_backup(registry.hinter(name)?);
        }
        Ok(classifier)
    }

    /// Ranked matches; empty when no engine recognizes the content.
    pub fn classify(&self, bytes: &[u8]) -> Vec<ClassificationMatch> {
        let mut matches = tag(
            self.primary.sniff(bytes),
            MatchSource::Primary,
            self.primary.name(),
        );
        if matches.is_empty() {
            if let Some(fallback) = &self.fallback {
                matches = tag(fallback.sniff(bytes), MatchSource::Fallback, fallback.name());
            }
        }
        rank(&mut matches);
        matches
    }

    pub fn backup_hint(&self, bytes: &[u8]) -> Option<String> {
        self.backup.as_ref().map(|b| b.hint(bytes))
    }

    /// `classify`, asking the backup engine only when the top match names
    /// no extension.
    pub fn inspect(&self, bytes: &[u8]) -> Classification {
        let matches = self.classify(bytes);
        let backup_hint = match matches.first() {
            Some(top) if top.candidate_extensions.is_empty() => self.backup_hint(bytes),
            _ => None,
        };
        Classification {
            matches,
            backup_hint,
        }
    }
}

fn tag(found: Vec<SniffMatch>, source: MatchSource, engine: &str) -> Vec<ClassificationMatch> {
    found
        .into_iter()
        .map(|m| ClassificationMatch {
            mime_type: m.mime_type,
            confidence: m.confidence.map(|c| c.clamp(0.0, 1.0)),
            candidate_extensions: m.extensions,
            source,
            engine: engine.to_string(),
        })
        .collect()
}

/// Descending confidence, unknown confidence last, then primary before
/// fallback. Stable, so a backend's own order survives full ties.
pub fn rank(matches: &mut [ClassificationMatch]) {
    matches.sort_by(|a, b| {
        compare_confidence(b.confidence, a.confidence).then(a.source.cmp(&b.source))
    });
}

fn compare_confidence(a: Option<f32>, b: Option<f32>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

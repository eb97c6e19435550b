//! Content sniffing backends and a registry to pick them by name.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

pub mod aliases;
pub mod infer_sniffer;
pub mod magic;
pub mod noop;
pub mod text;

/// Marker libmagic prints when it cannot suggest an extension.
pub const UNKNOWN_HINT: &str = "???";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown sniffer: {0}")]
    UnknownSniffer(String),
    #[error("unknown extension hinter: {0}")]
    UnknownHinter(String),
}

/// One content type reported by a sniffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SniffMatch {
    pub mime_type: String,
    /// 0.0..=1.0, `None` when the backend cannot say.
    pub confidence: Option<f32>,
    /// Most representative first.
    pub extensions: Vec<String>,
}

impl SniffMatch {
    pub fn new(mime_type: &str, confidence: Option<f32>, extensions: &[&str]) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            confidence,
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }
}

pub trait Sniffer: Send + Sync {
    fn name(&self) -> &str;
    fn sniff(&self, bytes: &[u8]) -> Vec<SniffMatch>;
}

/// Backup classifier answering in libmagic `--extension` form: `ext/alt/...`
/// or [`UNKNOWN_HINT`].
pub trait ExtensionHinter: Send + Sync {
    fn name(&self) -> &str;
    fn hint(&self, bytes: &[u8]) -> String;
}

#[derive(Default, Clone)]
pub struct SnifferRegistry {
    sniffers: HashMap<String, Arc<dyn Sniffer>>,
    hinters: HashMap<String, Arc<dyn ExtensionHinter>>,
}

impl SnifferRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every backend shipped in this crate.
    pub fn builtin() -> Self {
        Self::new()
            .with_sniffer(Arc::new(infer_sniffer::InferSniffer::new()))
            .with_sniffer(Arc::new(text::TextSniffer))
            .with_sniffer(Arc::new(noop::NoopSniffer))
            .with_hinter(Arc::new(magic::MagicHinter))
            .with_hinter(Arc::new(noop::NoopSniffer))
    }

    pub fn with_sniffer(mut self, sniffer: Arc<dyn Sniffer>) -> Self {
        self.sniffers.insert(sniffer.name().to_string(), sniffer);
        self
    }

    pub fn with_hinter(mut self, hinter: Arc<dyn ExtensionHinter>) -> Self {
        self.hinters.insert(hinter.name().to_string(), hinter);
        self
    }

    pub fn sniffer(&self, name: &str) -> Result<Arc<dyn Sniffer>, ProviderError> {
        self.sniffers
            .get(name)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownSniffer(name.to_string()))
    }

    pub fn hinter(&self, name: &str) -> Result<Arc<dyn ExtensionHinter>, ProviderError> {
        self.hinters
            .get(name)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownHinter(name.to_string()))
    }
}

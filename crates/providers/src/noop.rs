use crate::{ExtensionHinter, SniffMatch, Sniffer, UNKNOWN_HINT};

/// Recognizes nothing. Registered so a config can switch a slot off by name.
#[derive(Debug, Default)]
pub struct NoopSniffer;

impl Sniffer for NoopSniffer {
    fn name(&self) -> &str {
        "noop"
    }

    fn sniff(&self, _bytes: &[u8]) -> Vec<SniffMatch> {
        Vec::new()
    }
}

impl ExtensionHinter for NoopSniffer {
    fn name(&self) -> &str {
        "noop"
    }

    fn hint(&self, _bytes: &[u8]) -> String {
        UNKNOWN_HINT.to_string()
    }
}

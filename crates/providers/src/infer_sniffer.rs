use crate::{aliases, SniffMatch, Sniffer};

/// Primary engine: magic-number signatures from the `infer` crate.
pub struct InferSniffer {
    inner: infer::Infer,
}

impl InferSniffer {
    pub fn new() -> Self {
        Self {
            inner: infer::Infer::new(),
        }
    }
}

impl Default for InferSniffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sniffer for InferSniffer {
    fn name(&self) -> &str {
        "infer"
    }

    fn sniff(&self, bytes: &[u8]) -> Vec<SniffMatch> {
        match self.inner.get(bytes) {
            // Signatures are exact, so a hit is a full-confidence match.
            Some(kind) => vec![SniffMatch {
                mime_type: kind.mime_type().to_string(),
                confidence: Some(1.0),
                extensions: aliases::candidates(kind.extension(), kind.mime_type()),
            }],
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_pdf_signature() {
        let matches = InferSniffer::new().sniff(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n1 0 obj\n");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].mime_type, "application/pdf");
        assert_eq!(matches[0].extensions, vec!["pdf"]);
        assert_eq!(matches[0].confidence, Some(1.0));
    }

    #[test]
    fn jpeg_candidates_include_aliases() {
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];
        let matches = InferSniffer::new().sniff(&jpeg);
        assert_eq!(matches[0].extensions[0], "jpg");
        assert!(matches[0].extensions.iter().any(|e| e == "jpeg"));
    }

    #[test]
    fn empty_input_has_no_match() {
        assert!(InferSniffer::new().sniff(&[]).is_empty());
    }
}

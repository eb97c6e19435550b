//! Fallback engine for content the signature database does not cover,
//! mostly text formats that have no magic number.
//!
//! Heuristic matches (shebangs, JSON, markup, CSV, plain text) accept every
//! text extension, so a correctly named text file keeps its name. Only the
//! fixed markers in `TEXT_SIGNATURES` are strict.

use crate::{aliases, SniffMatch, Sniffer};

const SNIFF_LEN: usize = 8 * 1024;

/// Text formats that do start with a recognizable marker.
const TEXT_SIGNATURES: &[(&[u8], &str, &[&str])] = &[
    (b"{\\rtf", "application/rtf", &["rtf"]),
    (b"%!PS", "application/postscript", &["ps", "eps"]),
    (b"BEGIN:VCARD", "text/vcard", &["vcf", "vcard"]),
    (b"BEGIN:VCALENDAR", "text/calendar", &["ics", "ifb"]),
    (b"-----BEGIN CERTIFICATE-----", "application/x-pem-file", &["pem", "crt", "cer"]),
    (b"-----BEGIN PGP", "application/pgp", &["asc", "pgp"]),
    (b"#EXTM3U", "audio/x-mpegurl", &["m3u", "m3u8"]),
    (b"WEBVTT", "text/vtt", &["vtt"]),
    (b"[InternetShortcut]", "application/x-url", &["url"]),
    (b"d8:announce", "application/x-bittorrent", &["torrent"]),
];

pub struct TextSniffer;

impl Sniffer for TextSniffer {
    fn name(&self) -> &str {
        "text"
    }

    fn sniff(&self, bytes: &[u8]) -> Vec<SniffMatch> {
        if bytes.is_empty() {
            return Vec::new();
        }
        let truncated = bytes.len() > SNIFF_LEN;
        let head = strip_bom(&bytes[..bytes.len().min(SNIFF_LEN)]);

        if let Some((_, mime, exts)) = TEXT_SIGNATURES.iter().find(|(sig, _, _)| head.starts_with(sig)) {
            return vec![SniffMatch::new(mime, Some(0.95), exts)];
        }

        let Some(text) = as_text(head) else {
            return vec![binary()];
        };

        let mut matches = Vec::new();
        let trimmed = text.trim_start();
        if let Some(m) = shebang(trimmed) {
            matches.push(m);
        }
        if looks_like_json(trimmed, truncated) {
            matches.push(guessed("application/json", 0.85, "json"));
        }
        if let Some(m) = markup(trimmed) {
            matches.push(m);
        }
        if looks_like_csv(text) {
            matches.push(guessed("text/csv", 0.6, "csv"));
        }
        matches.push(guessed("text/plain", 0.5, "txt"));
        matches
    }
}

fn guessed(mime: &str, confidence: f32, canonical: &str) -> SniffMatch {
    SniffMatch {
        mime_type: mime.to_string(),
        confidence: Some(confidence),
        extensions: aliases::candidates(canonical, mime),
    }
}

/// Binary blob the heuristics cannot name.
fn binary() -> SniffMatch {
    SniffMatch::new("application/octet-stream", None, &[])
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)
}

fn as_text(bytes: &[u8]) -> Option<&str> {
    if bytes.contains(&0) {
        return None;
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => Some(text),
        // The sniff window may cut a multi-byte character in half.
        Err(e) if e.error_len().is_none() && e.valid_up_to() > 0 => {
            std::str::from_utf8(&bytes[..e.valid_up_to()]).ok()
        }
        Err(_) => None,
    }
}

fn shebang(text: &str) -> Option<SniffMatch> {
    let line = text.strip_prefix("#!")?.lines().next().unwrap_or("");
    let m = if line.contains("python") {
        guessed("text/x-python", 0.9, "py")
    } else if line.contains("perl") {
        guessed("text/x-perl", 0.9, "pl")
    } else if line.contains("node") {
        guessed("text/javascript", 0.9, "js")
    } else if line.contains("ruby") {
        guessed("text/x-ruby", 0.9, "rb")
    } else {
        guessed("text/x-shellscript", 0.9, "sh")
    };
    Some(m)
}

fn looks_like_json(text: &str, truncated: bool) -> bool {
    if !(text.starts_with('{') || text.starts_with('[')) {
        return false;
    }
    if truncated {
        // Can't parse a partial document; a leading bracket plus a quoted key is enough.
        return text.starts_with('[') || text[1..].trim_start().starts_with('"');
    }
    serde_json::from_str::<serde_json::Value>(text).is_ok()
}

fn markup(text: &str) -> Option<SniffMatch> {
    let head: String = text.chars().take(512).collect::<String>().to_ascii_lowercase();
    if head.starts_with("<!doctype html") || head.starts_with("<html") {
        return Some(guessed("text/html", 0.85, "html"));
    }
    if head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg")) {
        return Some(guessed("image/svg+xml", 0.85, "svg"));
    }
    if head.starts_with("<?xml") {
        if head.contains("<!doctype plist") || head.contains("<plist") {
            return Some(guessed("application/x-plist", 0.85, "plist"));
        }
        return Some(guessed("application/xml", 0.8, "xml"));
    }
    None
}

fn looks_like_csv(text: &str) -> bool {
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(5)
        .collect();
    if lines.len() < 2 {
        return false;
    }
    let columns = lines[0].matches(',').count();
    columns > 0 && lines.iter().all(|l| l.matches(',').count() == columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn top(bytes: &[u8]) -> SniffMatch {
        TextSniffer.sniff(bytes).into_iter().next().unwrap()
    }

    #[test]
    fn plain_text_is_txt() {
        let matches = TextSniffer.sniff(b"hello world\n");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].mime_type, "text/plain");
        assert_eq!(matches[0].extensions[0], "txt");
    }

    #[test]
    fn binary_has_no_extensions() {
        let m = top(b"\x00\x01\x02garbage");
        assert_eq!(m.mime_type, "application/octet-stream");
        assert!(m.extensions.is_empty());
        assert_eq!(m.confidence, None);
    }

    #[test]
    fn recognizes_structured_text() {
        assert_eq!(top(b"{\"a\": [1, 2]}").extensions[0], "json");
        assert_eq!(top(b"#!/usr/bin/env python3\nprint(1)\n").extensions[0], "py");
        assert_eq!(top(b"#!/bin/sh\necho hi\n").extensions[0], "sh");
        assert_eq!(top(b"<!DOCTYPE html><html></html>").extensions[0], "html");
        assert_eq!(top(b"<?xml version=\"1.0\"?><svg></svg>").extensions[0], "svg");
        assert_eq!(top(b"<?xml version=\"1.0\"?><root/>").extensions[0], "xml");
        assert_eq!(top(b"{\\rtf1\\ansi hello}").extensions[0], "rtf");
        assert_eq!(top(b"d8:announce35:udp://tracker").extensions[0], "torrent");
    }

    #[test]
    fn csv_needs_consistent_columns() {
        let matches = TextSniffer.sniff(b"name,size\na,1\nb,2\n");
        assert!(matches.iter().any(|m| m.mime_type == "text/csv"));
        let matches = TextSniffer.sniff(b"hello, world\nno commas here\n");
        assert!(!matches.iter().any(|m| m.mime_type == "text/csv"));
    }

    #[test]
    fn guesses_accept_any_text_extension() {
        let matches = TextSniffer.sniff(b"Hi Bob, thanks\nSee you, Alice\n");
        assert_eq!(matches[0].mime_type, "text/csv");
        assert!(matches[0].extensions.iter().any(|e| e == "txt"));
        let plain = top(b"# Title\n\nSome prose.\n");
        assert!(plain.extensions.iter().any(|e| e == "md"));
        assert!(plain.extensions.iter().any(|e| e == "srt"));
    }

    #[test]
    fn signatures_stay_strict() {
        assert_eq!(top(b"WEBVTT\n\n00:01.000 --> 00:04.000\nHi\n").extensions, vec!["vtt"]);
    }

    #[test]
    fn bom_is_ignored() {
        assert_eq!(top(b"\xEF\xBB\xBF{\"k\":1}").extensions[0], "json");
    }

    #[test]
    fn empty_input_has_no_match() {
        assert!(TextSniffer.sniff(b"").is_empty());
    }
}

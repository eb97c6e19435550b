//! Extra extensions that name the same content type.
//!
//! Signature engines report a single canonical extension. A file saved as
//! `photo.jpeg` must not be renamed to `photo.jpg`, so candidates carry the
//! common spellings too.
//!
//! Text formats are a weaker claim still: a README sniffed as plain text is
//! not wrong to be called `.md`, so any text extension is accepted for them.

const ALIASES: &[(&str, &[&str])] = &[
    ("image/jpeg", &["jpg", "jpeg", "jpe", "jfif"]),
    ("image/tiff", &["tif", "tiff"]),
    ("image/heif", &["heif", "heic"]),
    ("image/x-icon", &["ico", "cur"]),
    ("video/mp4", &["mp4", "m4v"]),
    ("video/quicktime", &["mov", "qt"]),
    ("video/mpeg", &["mpg", "mpeg", "mpe"]),
    ("audio/mpeg", &["mp3", "mpga"]),
    ("audio/x-m4a", &["m4a", "mp4a"]),
    ("audio/aac", &["aac", "adts"]),
    ("audio/ogg", &["ogg", "oga", "opus"]),
    ("application/gzip", &["gz", "tgz"]),
    ("application/x-bzip2", &["bz2", "tbz2"]),
    ("application/x-xz", &["xz", "txz"]),
    ("application/x-tar", &["tar"]),
    ("application/vnd.microsoft.portable-executable", &["exe", "dll"]),
    ("application/x-executable", &["elf", "so", "o"]),
    ("application/x-msdownload", &["exe", "dll"]),
    ("text/html", &["html", "htm"]),
    ("text/xml", &["xml", "xsd", "xsl"]),
    ("application/xml", &["xml", "xsd", "xsl"]),
    ("text/plain", &["txt", "text", "log"]),
    ("text/x-shellscript", &["sh", "bash"]),
];

/// Extensions of formats that are plain text underneath.
const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "text", "log", "md", "markdown", "rst", "adoc", "org", "tex", "nfo",
    "srt", "sub", "ass", "ssa", "vtt", "lrc",
    "yaml", "yml", "toml", "ini", "cfg", "conf", "env", "properties", "reg",
    "json", "jsonl", "jsonc", "geojson", "ipynb", "har", "webmanifest",
    "xml", "xsd", "xsl", "xslt", "xaml", "csproj", "gpx", "kml", "rss", "atom", "opf", "plist",
    "svg", "html", "htm", "xhtml", "css", "scss", "sass", "less",
    "csv", "tsv", "sql", "diff", "patch",
    "rs", "py", "pyw", "rb", "pl", "pm", "php", "js", "mjs", "cjs", "ts", "tsx", "jsx",
    "java", "kt", "kts", "scala", "go", "c", "h", "cc", "cpp", "hpp", "cs", "swift",
    "lua", "r", "jl", "hs", "ml", "ex", "exs", "erl", "clj", "dart", "vue",
    "sh", "bash", "zsh", "fish", "ps1", "bat", "cmd", "gradle", "cmake", "mk",
];

const TEXTUAL_APPLICATION_TYPES: &[&str] = &[
    "application/json",
    "application/xml",
    "application/javascript",
    "application/x-plist",
    "image/svg+xml",
];

/// Generic text types, as opposed to text formats with a fixed marker
/// (vCard, WebVTT), which are reported without this widening.
pub fn is_textual(mime: &str) -> bool {
    let mime = mime.to_ascii_lowercase();
    mime.starts_with("text/") || TEXTUAL_APPLICATION_TYPES.contains(&mime.as_str())
}

pub fn for_mime(mime: &str) -> &'static [&'static str] {
    ALIASES
        .iter()
        .find(|(m, _)| m.eq_ignore_ascii_case(mime))
        .map(|(_, exts)| *exts)
        .unwrap_or(&[])
}

/// `canonical` first, then aliases for `mime`, then every text extension
/// when `mime` is textual. No duplicates.
pub fn candidates(canonical: &str, mime: &str) -> Vec<String> {
    let text: &[&str] = if is_textual(mime) { TEXT_EXTENSIONS } else { &[] };
    let mut out: Vec<String> = Vec::new();
    for ext in std::iter::once(canonical)
        .chain(for_mime(mime).iter().copied())
        .chain(text.iter().copied())
    {
        let ext = ext.trim().trim_start_matches('.');
        if !ext.is_empty() && !out.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
            out.push(ext.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_extension_comes_first() {
        assert_eq!(
            candidates("jpg", "image/jpeg"),
            vec!["jpg", "jpeg", "jpe", "jfif"]
        );
        assert_eq!(candidates("tiff", "image/tiff"), vec!["tiff", "tif"]);
    }

    #[test]
    fn unknown_mime_yields_only_canonical() {
        assert_eq!(candidates("pdf", "application/pdf"), vec!["pdf"]);
        assert!(candidates("", "application/x-unknown").is_empty());
    }

    #[test]
    fn text_types_accept_any_text_extension() {
        let plain = candidates("txt", "text/plain");
        assert_eq!(plain[..3], ["txt", "text", "log"]);
        for ext in ["md", "srt", "yaml", "rs", "csv"] {
            assert!(plain.iter().any(|e| e == ext), "{ext} missing");
        }
        let csv = candidates("csv", "text/csv");
        assert_eq!(csv[0], "csv");
        assert!(csv.iter().any(|e| e == "txt"));
        assert_eq!(csv.iter().filter(|e| *e == "csv").count(), 1);
    }

    #[test]
    fn binary_types_stay_strict() {
        assert!(!is_textual("application/pdf"));
        assert!(is_textual("TEXT/HTML"));
        assert_eq!(candidates("zip", "application/zip"), vec!["zip"]);
    }
}

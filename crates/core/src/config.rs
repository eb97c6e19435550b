use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub watch: WatchConfig,
    #[serde(default)]
    pub reader: ReaderConfig,
    #[serde(default)]
    pub classification: ClassificationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    pub directory: String,
    /// Sort files already sitting in the directory when the watcher starts.
    #[serde(default)]
    pub sweep_on_start: bool,
    /// Globs matched against file names; hits are never touched.
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub backoff_ms: u64,
}

/// Backend names from `providers::SnifferRegistry`. Use `noop` to switch a slot off.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    pub primary: String,
    pub fallback: Option<String>,
    pub backup: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            watch: WatchConfig {
                directory: default_watch_dir(),
                sweep_on_start: false,
                ignore: default_ignore(),
                dry_run: false,
            },
            reader: ReaderConfig::default(),
            classification: ClassificationConfig::default(),
        }
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self { backoff_ms: 1000 }
    }
}

impl ReaderConfig {
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            primary: "infer".to_string(),
            fallback: Some("text".to_string()),
            backup: Some("magic".to_string()),
        }
    }
}

/// Partial downloads and hidden files. Browsers rename these to their final
/// name once the transfer completes, which raises a fresh rename event.
fn default_ignore() -> Vec<String> {
    [".*", "*.crdownload", "*.part", "*.partial", "*.download", "*.tmp", "*.!ut"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_watch_dir() -> String {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join("Downloads"))
        .unwrap_or_else(|| PathBuf::from("."))
        .to_string_lossy()
        .into_owned()
}

/// Defaults, then the TOML file, then `SORTER__SECTION__KEY` variables.
pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();
    let mut settings =
        config::Config::builder().set_default("watch.directory", defaults.watch.directory)?;
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    settings = settings.add_source(config::Environment::with_prefix("SORTER").separator("__"));
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_override_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("sorter.toml");
        std::fs::write(
            &file,
            r#"
            [watch]
            directory = "/srv/incoming"
            sweep_on_start = true
            ignore = ["*.part"]

            [reader]
            backoff_ms = 250

            [classification]
            primary = "infer"
            backup = "noop"
            "#,
        )
        .unwrap();

        let cfg = load(Some(file.to_str().unwrap())).unwrap();
        assert_eq!(cfg.watch.directory, "/srv/incoming");
        assert!(cfg.watch.sweep_on_start);
        assert!(!cfg.watch.dry_run);
        assert_eq!(cfg.watch.ignore, vec!["*.part"]);
        assert_eq!(cfg.reader.backoff(), Duration::from_millis(250));
        assert_eq!(cfg.classification.fallback.as_deref(), Some("text"));
        assert_eq!(cfg.classification.backup.as_deref(), Some("noop"));
    }

    #[test]
    fn minimal_file_falls_back_to_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("minimal.toml");
        std::fs::write(&file, "[watch]\ndirectory = \"/tmp/dl\"\n").unwrap();

        let cfg = load(Some(file.to_str().unwrap())).unwrap();
        assert_eq!(cfg.watch.directory, "/tmp/dl");
        assert_eq!(cfg.reader.backoff_ms, 1000);
        assert_eq!(cfg.classification.primary, "infer");
        assert_eq!(cfg.classification.backup.as_deref(), Some("magic"));
        assert!(cfg.watch.ignore.iter().any(|g| g == "*.crdownload"));
    }
}

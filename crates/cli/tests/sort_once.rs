use cli::sort::{sort_once, SortSummary};
use sorter_core::config::AppConfig;
use sorter_core::models::EventOutcome;
use std::path::PathBuf;

fn config_for(dir: &std::path::Path, dry_run: bool) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.watch.directory = dir.to_string_lossy().into_owned();
    cfg.watch.dry_run = dry_run;
    cfg
}

#[tokio::test]
async fn sorts_folder_contents() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("report"), b"%PDF-1.4\n%%EOF\n").unwrap();
    std::fs::write(temp.path().join("notes.txt"), "remember the milk\n").unwrap();
    std::fs::write(temp.path().join("big.iso.part"), "partial").unwrap();

    let summary = sort_once(config_for(temp.path(), false)).await.unwrap();

    assert_eq!(summary.moved, 2);
    assert_eq!(summary.failed, 0);
    assert!(temp.path().join("PDF").join("report.pdf").exists());
    assert!(temp.path().join("TXT").join("notes.txt").exists());
    assert!(temp.path().join("big.iso.part").exists());
}

#[tokio::test]
async fn dry_run_leaves_folder_untouched() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("notes.txt"), "remember the milk\n").unwrap();

    let summary = sort_once(config_for(temp.path(), true)).await.unwrap();

    assert_eq!(summary.moved, 1);
    assert!(temp.path().join("notes.txt").exists());
    assert!(!temp.path().join("TXT").exists());
}

#[test]
fn summary_counts_each_outcome() {
    let summary = SortSummary::from_outcomes(vec![
        EventOutcome::Skipped {
            path: PathBuf::from("/dl/blob"),
            reason: "no category determined".into(),
        },
        EventOutcome::Failed {
            path: PathBuf::from("/dl/x"),
            error: "boom".into(),
        },
        EventOutcome::Ignored {
            path: PathBuf::from("/dl/TXT"),
            reason: "not a regular file".into(),
        },
    ]);
    assert_eq!((summary.moved, summary.skipped, summary.failed, summary.ignored), (0, 1, 1, 1));

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["outcomes"][0]["status"], "skipped");
}

use cli::watch::file_events;
use notify::event::{CreateKind, DataChange, ModifyKind, RemoveKind, RenameMode};
use notify::{Event, EventKind};
use sorter_core::models::FileEventKind;
use std::path::PathBuf;

fn event(kind: EventKind, paths: &[&str]) -> Event {
    paths
        .iter()
        .fold(Event::new(kind), |ev, p| ev.add_path(PathBuf::from(p)))
}

#[test]
fn created_file_is_reported() {
    let events = file_events(&event(EventKind::Create(CreateKind::File), &["/dl/a.pdf"]));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].path, PathBuf::from("/dl/a.pdf"));
    assert_eq!(events[0].kind, FileEventKind::Created);
}

#[test]
fn created_folder_is_not() {
    let events = file_events(&event(EventKind::Create(CreateKind::Folder), &["/dl/PDF"]));
    assert!(events.is_empty());
}

#[test]
fn rename_reports_new_name_once() {
    let from = file_events(&event(
        EventKind::Modify(ModifyKind::Name(RenameMode::From)),
        &["/dl/a.crdownload"],
    ));
    let to = file_events(&event(
        EventKind::Modify(ModifyKind::Name(RenameMode::To)),
        &["/dl/a.zip"],
    ));
    let both = file_events(&event(
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
        &["/dl/a.crdownload", "/dl/a.zip"],
    ));
    assert!(from.is_empty());
    assert!(both.is_empty());
    assert_eq!(to.len(), 1);
    assert_eq!(to[0].path, PathBuf::from("/dl/a.zip"));
    assert_eq!(to[0].kind, FileEventKind::Renamed);
}

#[test]
fn unpaired_rename_is_reported() {
    let events = file_events(&event(
        EventKind::Modify(ModifyKind::Name(RenameMode::Any)),
        &["/dl/a.zip"],
    ));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, FileEventKind::Renamed);
}

#[test]
fn writes_and_removals_are_not() {
    let write = event(
        EventKind::Modify(ModifyKind::Data(DataChange::Content)),
        &["/dl/a.zip"],
    );
    let remove = event(EventKind::Remove(RemoveKind::File), &["/dl/a.zip"]);
    assert!(file_events(&write).is_empty());
    assert!(file_events(&remove).is_empty());
}

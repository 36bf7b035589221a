// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

mod common;

use std::path::PathBuf;

use tempfile::TempDir;

use tagforge_core::{ContainerFormat, Picture, TagField, TagSet};
use tagforge_media_file::{
    Error,
    io::{
        export::{ExportConfig, TEMP_FILE_PREFIX, prepare_export, write_tags},
        import::read_tags,
    },
};

fn title(title: &str) -> TagSet {
    TagSet::from_iter([(TagField::Title, title.to_owned())])
}

#[test]
fn dropped_export_leaves_file_untouched() {
    common::init_logger();
    let dir = TempDir::new().unwrap();
    let bytes = common::mp3_bytes();
    let path = common::write_file(&dir, "track.mp3", &bytes);

    let prepared = prepare_export(&path, title("Title"), None, &ExportConfig::default()).unwrap();
    let temp_path = prepared.temp_path().to_path_buf();
    assert_eq!(path, prepared.target_path());
    assert_eq!(Some("Title"), prepared.tags().get(TagField::Title));
    assert!(temp_path.exists());
    assert!(
        temp_path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(TEMP_FILE_PREFIX)
    );
    assert_eq!(dir.path(), temp_path.parent().unwrap());
    drop(prepared);

    assert!(!temp_path.exists());
    assert_eq!(bytes, std::fs::read(&path).unwrap());
    assert_eq!(vec!["track.mp3".to_owned()], common::dir_entries(dir.path()));
}

#[test]
fn committed_export_replaces_file() {
    common::init_logger();
    let dir = TempDir::new().unwrap();
    let path = common::write_file(&dir, "track.mp3", &common::mp3_bytes());

    let prepared = prepare_export(&path, title("Title"), None, &ExportConfig::default()).unwrap();
    // The target is not modified before committing
    assert!(read_tags(&path).unwrap().is_empty());
    prepared.commit().unwrap();

    assert_eq!(Some("Title"), read_tags(&path).unwrap().get(TagField::Title));
    assert_eq!(vec!["track.mp3".to_owned()], common::dir_entries(dir.path()));
}

#[test]
fn export_into_destination_file() {
    common::init_logger();
    let source_dir = TempDir::new().unwrap();
    let dest_dir = TempDir::new().unwrap();
    let bytes = common::flac_bytes();
    let path = common::write_file(&source_dir, "track.flac", &bytes);
    let dest_path = dest_dir.path().join("copy.flac");

    write_tags(
        &path,
        title("Title"),
        Some(&dest_path),
        &ExportConfig::default(),
    )
    .unwrap();

    assert_eq!(bytes, std::fs::read(&path).unwrap());
    assert_eq!(
        Some("Title"),
        read_tags(&dest_path).unwrap().get(TagField::Title)
    );
    assert_eq!(vec!["copy.flac".to_owned()], common::dir_entries(dest_dir.path()));
}

#[test]
fn unsupported_format_is_rejected() {
    common::init_logger();
    let dir = TempDir::new().unwrap();
    let bytes = b"MAC \x96\x0f\x00\x00not really monkey's audio".to_vec();
    let path = common::write_file(&dir, "track.ape", &bytes);

    let err = write_tags(&path, title("Title"), None, &ExportConfig::default()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(ContainerFormat::Ape)));

    assert_eq!(bytes, std::fs::read(&path).unwrap());
    assert_eq!(vec!["track.ape".to_owned()], common::dir_entries(dir.path()));
}

#[test]
fn missing_picture_file_aborts_export() {
    common::init_logger();
    let dir = TempDir::new().unwrap();
    let bytes = common::mp3_bytes();
    let path = common::write_file(&dir, "track.mp3", &bytes);
    let mut tags = title("Title");
    tags.picture = Some(Picture::FilePath(PathBuf::from(
        "/nonexistent/directory/cover.jpg",
    )));

    let err = write_tags(&path, tags, None, &ExportConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Io(_)));

    assert_eq!(bytes, std::fs::read(&path).unwrap());
    assert_eq!(vec!["track.mp3".to_owned()], common::dir_entries(dir.path()));
}

#[test]
fn unparsable_file_is_a_parse_error() {
    common::init_logger();
    let dir = TempDir::new().unwrap();
    let path = common::write_file(&dir, "track.flac", b"definitely not a FLAC file");
    assert!(matches!(read_tags(&path), Err(Error::Parse(_))));

    let err = write_tags(&path, title("Title"), None, &ExportConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
    assert_eq!(vec!["track.flac".to_owned()], common::dir_entries(dir.path()));
}

#[test]
fn missing_file_is_an_io_error() {
    common::init_logger();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.mp3");
    assert!(matches!(read_tags(&path), Err(Error::Io(_))));
}

// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use strum::IntoEnumIterator as _;

use super::*;

#[test]
fn from_path_ignores_case() {
    assert_eq!(
        ContainerFormat::Flac,
        ContainerFormat::from_path(Path::new("/music/Track.FLAC"))
    );
    assert_eq!(
        ContainerFormat::Mp4,
        ContainerFormat::from_path(Path::new("song.M4a"))
    );
}

#[test]
fn from_path_aliases() {
    for (ext, format) in [
        ("m4a", ContainerFormat::Mp4),
        ("mp4", ContainerFormat::Mp4),
        ("aac", ContainerFormat::Mp4),
        ("wma", ContainerFormat::Asf),
        ("asf", ContainerFormat::Asf),
    ] {
        let path = format!("track.{ext}");
        assert_eq!(format, ContainerFormat::from_path(Path::new(&path)));
    }
}

#[test]
fn unknown_extension_falls_back_to_mp3() {
    assert_eq!(
        ContainerFormat::Mp3,
        ContainerFormat::from_path(Path::new("track.xyz"))
    );
    assert_eq!(
        ContainerFormat::Mp3,
        ContainerFormat::from_path(Path::new("no_extension"))
    );
    // Not an alias of aiff
    assert_eq!(
        ContainerFormat::Mp3,
        ContainerFormat::from_path(Path::new("track.aif"))
    );
}

#[test]
fn str_roundtrip() {
    for format in ContainerFormat::iter() {
        assert_eq!(Ok(format), format.as_str().parse());
        assert_eq!(Some(format), ContainerFormat::from_extension(format.as_str()));
    }
}

#[test]
fn ape_tagged_formats_are_read_only() {
    let read_only = ContainerFormat::iter()
        .filter(|format| !format.is_writable())
        .collect::<Vec<_>>();
    assert_eq!(vec![ContainerFormat::Ape, ContainerFormat::Mpc], read_only);
}

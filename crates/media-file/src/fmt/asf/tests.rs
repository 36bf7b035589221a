// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::io::{Cursor, Read as _, Seek as _, Write as _};

use mime::IMAGE_PNG;

use super::{object::*, *};
use crate::Error;

const TRAILING_DATA: &[u8] = b"audio packets follow here";

fn object(guid: &Guid, data: &[u8]) -> Vec<u8> {
    let mut bytes = guid.to_vec();
    bytes.extend_from_slice(&((24 + data.len()) as u64).to_le_bytes());
    bytes.extend_from_slice(data);
    bytes
}

fn asf_file(objects: &[Vec<u8>]) -> Vec<u8> {
    let body = objects.concat();
    let mut bytes = HEADER_OBJECT_GUID.to_vec();
    bytes.extend_from_slice(&((30 + body.len()) as u64).to_le_bytes());
    bytes.extend_from_slice(&(objects.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&[1, 2]);
    bytes.extend_from_slice(&body);
    bytes.extend_from_slice(TRAILING_DATA);
    bytes
}

fn file_properties() -> Vec<u8> {
    object(&FILE_PROPERTIES_OBJECT_GUID, &[0; 80])
}

fn temp_file(bytes: &[u8]) -> File {
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(bytes).unwrap();
    file.rewind().unwrap();
    file
}

#[test]
fn unmodified_header_is_encoded_verbatim() {
    let content = ContentDescription {
        title: "Title".to_owned(),
        ..Default::default()
    };
    let bytes = asf_file(&[
        file_properties(),
        object(&CONTENT_DESCRIPTION_OBJECT_GUID, &content.encode().unwrap()),
    ]);
    let header = Header::read_from(&mut Cursor::new(&bytes)).unwrap();
    assert_eq!(2, header.objects().count());
    assert_eq!(header.original_len(), header.encoded_len());
    let header_len = bytes.len() - TRAILING_DATA.len();
    assert_eq!(&bytes[..header_len], header.encode().as_slice());
}

#[test]
fn reject_missing_header_object() {
    let bytes = vec![0; 64];
    let err = Header::read_from(&mut Cursor::new(&bytes)).unwrap_err();
    assert!(matches!(err, AsfError::NotAsf));
    assert!(matches!(Error::from(err), Error::Parse(_)));
}

#[test]
fn reject_oversized_child_object() {
    let mut child = file_properties();
    child[16..24].copy_from_slice(&1000_u64.to_le_bytes());
    let bytes = asf_file(&[child]);
    let err = Header::read_from(&mut Cursor::new(&bytes)).unwrap_err();
    assert!(matches!(err, AsfError::Malformed(_)));
}

#[test]
fn truncated_header_is_a_parse_error() {
    let bytes = asf_file(&[file_properties()]);
    let err = Header::read_from(&mut Cursor::new(&bytes[..40])).unwrap_err();
    assert!(matches!(Error::from(err), Error::Parse(_)));
}

#[test]
fn content_description_roundtrip() {
    let content = ContentDescription {
        title: "Tïtle ♫".to_owned(),
        author: "Artist".to_owned(),
        copyright: String::new(),
        description: "Comment".to_owned(),
        rating: String::new(),
    };
    let decoded = ContentDescription::decode(&content.encode().unwrap()).unwrap();
    assert_eq!(content, decoded);
}

#[test]
fn numeric_attributes_are_imported_as_text() {
    let mut extended = ExtendedContentDescription::default();
    extended.push("WM/TrackNumber", AttributeValue::DWord(7));
    extended.push("WM/Year", AttributeValue::Unicode("1999".to_owned()));
    let decoded = ExtendedContentDescription::decode(&extended.encode().unwrap()).unwrap();
    assert_eq!(extended, decoded);
    let tags = import_tags(None, Some(&decoded));
    assert_eq!(Some("7"), tags.get(TagField::Track));
    assert_eq!(Some("1999"), tags.get(TagField::Year));
    assert!(!tags.has_album_art);
}

#[test]
fn reject_unknown_attribute_type() {
    let mut data = 1_u16.to_le_bytes().to_vec();
    data.extend_from_slice(&4_u16.to_le_bytes());
    data.extend_from_slice(&[b'X', 0, 0, 0]);
    data.extend_from_slice(&9_u16.to_le_bytes());
    data.extend_from_slice(&0_u16.to_le_bytes());
    assert!(matches!(
        ExtendedContentDescription::decode(&data),
        Err(AsfError::Malformed(_))
    ));
}

#[test]
fn write_and_read_tags() {
    let mut file = temp_file(&asf_file(&[file_properties()]));
    let tags = TagSet::from_iter([
        (TagField::Title, "Title".to_owned()),
        (TagField::Artist, "Artist".to_owned()),
        (TagField::Comment, "Comment".to_owned()),
        (TagField::Album, "Album".to_owned()),
        (TagField::AlbumArtist, "Album Artist".to_owned()),
        (TagField::Track, "3".to_owned()),
        (TagField::Lyrics, "Verse".to_owned()),
        (TagField::Mood, "ignored".to_owned()),
    ]);
    AsfStrategy
        .write(&mut file, &tags, None, &Default::default())
        .unwrap();

    let imported = AsfStrategy.read(&mut file).unwrap();
    for field in [
        TagField::Title,
        TagField::Artist,
        TagField::Comment,
        TagField::Album,
        TagField::AlbumArtist,
        TagField::Track,
        TagField::Lyrics,
    ] {
        assert_eq!(tags.get(field), imported.get(field), "{field}");
    }
    assert!(!imported.contains(TagField::Mood));

    // Data after the header is preserved and the file size is updated
    file.rewind().unwrap();
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).unwrap();
    assert!(bytes.ends_with(TRAILING_DATA));
    let header = Header::read_from(&mut Cursor::new(&bytes)).unwrap();
    let file_properties = header.object(&FILE_PROPERTIES_OBJECT_GUID).unwrap();
    assert_eq!(
        bytes.len() as u64,
        u64::from_le_bytes(file_properties.data[16..24].try_into().unwrap())
    );
}

#[test]
fn rewrite_keeps_unrelated_values() {
    let mut file = temp_file(&asf_file(&[file_properties()]));
    let tags = TagSet::from_iter([
        (TagField::Title, "Title".to_owned()),
        (TagField::Genre, "Genre".to_owned()),
    ]);
    AsfStrategy
        .write(&mut file, &tags, None, &Default::default())
        .unwrap();
    let overrides = TagSet::from_iter([(TagField::Title, "Other".to_owned())]);
    AsfStrategy
        .write(&mut file, &overrides, None, &Default::default())
        .unwrap();
    let imported = AsfStrategy.read(&mut file).unwrap();
    assert_eq!(Some("Other"), imported.get(TagField::Title));
    assert_eq!(Some("Genre"), imported.get(TagField::Genre));
}

#[test]
fn front_cover_roundtrip() {
    let picture = EmbeddedPicture {
        data: b"\x89PNG\r\n\x1a\nsome bytes".to_vec(),
        media_type: IMAGE_PNG,
    };
    let mut extended = ExtendedContentDescription::default();
    extended.push(
        PICTURE_ATTRIBUTE,
        AttributeValue::Bytes(
            AsfPicture {
                picture_type: 0,
                media_type: "image/jpeg".to_owned(),
                description: "Other".to_owned(),
                data: vec![1, 2, 3],
            }
            .encode()
            .unwrap(),
        ),
    );
    export_front_cover(&mut extended, &picture).unwrap();
    assert_eq!(1, extended.get_all(PICTURE_ATTRIBUTE).count());
    let cover = find_cover_picture(&extended).unwrap();
    assert_eq!(picture.data, cover.data);
    assert_eq!(IMAGE_PNG, cover.media_type);
    assert!(import_tags(None, Some(&extended)).has_album_art);
}

// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::*;

fn item(key: &str, value: ItemValue) -> ApeItem {
    ApeItem::new(key.to_owned(), value).unwrap()
}

#[test]
fn import_native_items_with_lowercase_keys() {
    let mut tag = ApeTag::default();
    tag.insert(item("Title", ItemValue::Text("Title".to_owned())));
    tag.insert(item("Artist", ItemValue::Text("Artist".to_owned())));
    tag.insert(item("Binary", ItemValue::Binary(vec![1, 2, 3])));
    let tags = import_native(&tag);
    assert!(tags.is_empty());
    assert_eq!(Some("Title"), tags.native.get("title").map(String::as_str));
    assert_eq!(Some("Artist"), tags.native.get("artist").map(String::as_str));
    assert!(!tags.native.contains_key("binary"));
    assert!(!tags.has_album_art);
}

#[test]
fn front_cover_item() {
    let mut data = b"cover.png\0".to_vec();
    data.extend_from_slice(b"\x89PNG\r\n\x1a\n");
    let mut tag = ApeTag::default();
    tag.insert(item(FRONT_COVER_KEY, ItemValue::Binary(data)));
    assert!(import_native(&tag).has_album_art);
    let picture = find_cover_picture(&tag).unwrap();
    assert_eq!(b"\x89PNG\r\n\x1a\n".as_slice(), picture.data.as_slice());
    assert_eq!(mime::IMAGE_PNG, picture.media_type);
}

// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::io::Cursor;

use image::{Rgb, RgbImage};

use super::*;

fn encode_png(width: u32, height: u32) -> Vec<u8> {
    let picture = RgbImage::from_pixel(width, height, Rgb([200, 40, 90]));
    let mut data = Vec::new();
    DynamicImage::ImageRgb8(picture)
        .write_to(&mut Cursor::new(&mut data), ImageFormat::Png)
        .unwrap();
    data
}

#[test]
fn scaled_dimensions_preserve_aspect_ratio() {
    assert_eq!((300, 150), scaled_dimensions(2000, 1000, 300));
    assert_eq!((150, 300), scaled_dimensions(1000, 2000, 300));
    assert_eq!((300, 300), scaled_dimensions(64, 64, 300));
    assert_eq!((300, 1), scaled_dimensions(3000, 1, 300));
}

#[test]
fn normalize_large_png_into_small_jpeg() {
    let normalized =
        normalize_picture(&Picture::RawBytes(encode_png(2000, 1000)), &Default::default())
            .unwrap();
    assert_eq!(Some((300, 150)), normalized.dimensions);
    assert_eq!(IMAGE_JPEG, normalized.primary.media_type);
    assert_eq!(
        ImageFormat::Jpeg,
        guess_format(&normalized.primary.data).unwrap()
    );
    let decoded = load_from_memory(&normalized.primary.data).unwrap();
    assert_eq!((300, 150), decoded.dimensions());
    assert_eq!(Some(&normalized.primary), normalized.secondary.as_ref());
}

#[test]
fn normalize_without_redundant_copy() {
    let config = ArtworkConfig {
        redundant_copy: false,
        ..Default::default()
    };
    let normalized = normalize_picture_data(&encode_png(10, 20), &config);
    assert_eq!(Some((150, 300)), normalized.dimensions);
    assert!(normalized.secondary.is_none());
}

#[test]
fn undecodable_data_is_passed_through() {
    let data = b"definitely not an image".to_vec();
    let normalized = normalize_picture_data(&data, &Default::default());
    assert!(!normalized.is_transcoded());
    assert_eq!(data, normalized.primary.data);
    assert_eq!(IMAGE_JPEG, normalized.primary.media_type);
}

#[test]
fn missing_picture_file_is_an_error() {
    let picture = Picture::FilePath("/nonexistent/tagforge/cover.png".into());
    assert!(matches!(
        normalize_picture(&picture, &Default::default()),
        Err(crate::Error::Io(_))
    ));
}

#[test]
fn select_front_cover_first() {
    let other = LoftyPicture::new_unchecked(PictureType::Other, None, None, vec![1]);
    let front = LoftyPicture::new_unchecked(PictureType::CoverFront, None, None, vec![2]);
    assert_eq!(
        Some(&front),
        select_cover_picture([&other, &front].into_iter())
    );
    assert_eq!(Some(&other), select_cover_picture([&other].into_iter()));
    assert_eq!(None, select_cover_picture(std::iter::empty()));
}

// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::borrow::Cow;

use image::{
    DynamicImage, ExtendedColorType, GenericImageView as _, ImageFormat, codecs::jpeg::JpegEncoder,
    guess_format, imageops::FilterType, load_from_memory,
};
use lofty::picture::{MimeType, Picture as LoftyPicture, PictureType};
use mime::{IMAGE_BMP, IMAGE_GIF, IMAGE_JPEG, IMAGE_PNG, Mime};

use tagforge_core::{EmbeddedPicture, Picture};

use crate::Result;

pub const DEFAULT_MAX_DIMENSION: u32 = 300;

pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Controls how album art is prepared before embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ArtworkConfig {
    /// Length of the longer side after resizing, in pixels.
    pub max_dimension: u32,

    pub jpeg_quality: u8,

    /// Embed a second copy of the image into MP3 files.
    pub redundant_copy: bool,
}

impl Default for ArtworkConfig {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            redundant_copy: true,
        }
    }
}

/// Result of [`normalize_picture`].
#[derive(Debug, Clone)]
pub struct NormalizedArtwork {
    pub primary: EmbeddedPicture,

    /// Identical copy of `primary` if requested.
    pub secondary: Option<EmbeddedPicture>,

    /// `None` if the image data could not be decoded and
    /// has been passed through unmodified.
    pub dimensions: Option<(u32, u32)>,
}

impl NormalizedArtwork {
    #[must_use]
    pub fn is_transcoded(&self) -> bool {
        self.dimensions.is_some()
    }
}

pub fn load_picture_data(picture: &Picture) -> Result<Cow<'_, [u8]>> {
    match picture {
        Picture::FilePath(path) => {
            let data = std::fs::read(path)?;
            log::debug!(
                "Read {num_bytes} bytes of image data from {path}",
                num_bytes = data.len(),
                path = path.display(),
            );
            Ok(Cow::Owned(data))
        }
        Picture::RawBytes(data) => Ok(Cow::Borrowed(data)),
    }
}

/// Prepare a picture for embedding.
///
/// Only fails if the image data could not be loaded. Undecodable
/// data is embedded as is.
pub fn normalize_picture(picture: &Picture, config: &ArtworkConfig) -> Result<NormalizedArtwork> {
    let data = load_picture_data(picture)?;
    Ok(normalize_picture_data(&data, config))
}

#[must_use]
pub fn normalize_picture_data(data: &[u8], config: &ArtworkConfig) -> NormalizedArtwork {
    let (primary, dimensions) = match transcode_picture_data(data, config) {
        Ok((data, dimensions)) => (
            EmbeddedPicture {
                data,
                media_type: IMAGE_JPEG,
            },
            Some(dimensions),
        ),
        Err(err) => {
            log::warn!("Embedding original image data that could not be transcoded: {err}");
            (
                EmbeddedPicture {
                    data: data.to_vec(),
                    media_type: guess_media_type(data),
                },
                None,
            )
        }
    };
    let secondary = config.redundant_copy.then(|| primary.clone());
    NormalizedArtwork {
        primary,
        secondary,
        dimensions,
    }
}

/// Scale the longer side to the configured dimension, preserving the aspect ratio.
#[must_use]
pub fn scaled_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    debug_assert!(width > 0 && height > 0);
    let scale = |side: u32, longer_side: u32| {
        let scaled = u64::from(side) * u64::from(max_dimension) / u64::from(longer_side);
        (scaled as u32).max(1)
    };
    if width > height {
        (max_dimension, scale(height, width))
    } else {
        (scale(width, height), max_dimension)
    }
}

fn transcode_picture_data(
    data: &[u8],
    config: &ArtworkConfig,
) -> image::ImageResult<(Vec<u8>, (u32, u32))> {
    let picture = load_from_memory(data)?;
    let (width, height) = picture.dimensions();
    let (new_width, new_height) = scaled_dimensions(width, height, config.max_dimension);
    let resized = picture.resize_exact(new_width, new_height, FilterType::Lanczos3);
    let encoded = encode_jpeg(&resized, config.jpeg_quality)?;
    log::debug!(
        "Transcoded image from {width}x{height} to {new_width}x{new_height}: {num_bytes} bytes",
        num_bytes = encoded.len(),
    );
    Ok((encoded, (new_width, new_height)))
}

fn encode_jpeg(picture: &DynamicImage, quality: u8) -> image::ImageResult<Vec<u8>> {
    let rgb = picture.to_rgb8();
    let mut encoded = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut encoded, quality);
    encoder.encode(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(encoded)
}

#[must_use]
pub fn media_type_from_image_format(image_format: ImageFormat) -> Option<Mime> {
    let media_type = match image_format {
        ImageFormat::Jpeg => IMAGE_JPEG,
        ImageFormat::Png => IMAGE_PNG,
        ImageFormat::Gif => IMAGE_GIF,
        ImageFormat::Bmp => IMAGE_BMP,
        ImageFormat::WebP => "image/webp".parse().ok()?,
        ImageFormat::Tiff => "image/tiff".parse().ok()?,
        _ => return None,
    };
    Some(media_type)
}

/// Guess the media type from the image data, defaulting to JPEG.
#[must_use]
pub fn guess_media_type(data: &[u8]) -> Mime {
    guess_format(data)
        .ok()
        .and_then(media_type_from_image_format)
        .unwrap_or(IMAGE_JPEG)
}

pub(crate) fn mime_type_from_media_type(media_type: &Mime) -> MimeType {
    match media_type.essence_str() {
        "image/bmp" => MimeType::Bmp,
        "image/gif" => MimeType::Gif,
        "image/jpeg" => MimeType::Jpeg,
        "image/png" => MimeType::Png,
        "image/tiff" => MimeType::Tiff,
        _ => MimeType::Unknown(media_type.to_string()),
    }
}

pub(crate) fn media_type_from_mime_type(mime_type: Option<&MimeType>) -> Option<Mime> {
    mime_type.and_then(|mime_type| mime_type.as_str().parse().ok())
}

pub(crate) fn new_lofty_picture(
    picture: &EmbeddedPicture,
    pic_type: PictureType,
    description: Option<&str>,
) -> LoftyPicture {
    LoftyPicture::new_unchecked(
        pic_type,
        Some(mime_type_from_media_type(&picture.media_type)),
        description.map(ToOwned::to_owned),
        picture.data.clone(),
    )
}

pub(crate) fn embedded_picture_from_lofty(picture: &LoftyPicture) -> EmbeddedPicture {
    let data = picture.data().to_vec();
    let media_type = media_type_from_mime_type(picture.mime_type())
        .unwrap_or_else(|| guess_media_type(&data));
    EmbeddedPicture { data, media_type }
}

/// Prefer the front cover and fall back to the first picture.
pub(crate) fn select_cover_picture<'a>(
    pictures: impl IntoIterator<Item = &'a LoftyPicture>,
) -> Option<&'a LoftyPicture> {
    let mut first = None;
    for picture in pictures {
        if picture.pic_type() == PictureType::CoverFront {
            return Some(picture);
        }
        first.get_or_insert(picture);
    }
    first
}

#[cfg(test)]
mod tests;

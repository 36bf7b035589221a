// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{fs::File, io::Seek as _};

use tagforge_core::{ContainerFormat, EmbeddedPicture, TagField, TagSet};

use super::FormatStrategy;
use crate::{
    Result,
    io::export::ExportConfig,
    util::{
        FieldCoercionError,
        artwork::{NormalizedArtwork, guess_media_type},
        lyrics::{ASF_LYRICS_ATTRIBUTE, find_asf_lyrics},
    },
};

pub mod object;

use self::object::{
    AsfPicture, AttributeValue, ContentDescription, ExtendedContentDescription, Header,
    fits_utf16le_string,
};

const PICTURE_ATTRIBUTE: &str = "WM/Picture";

/// Extended content description attributes with a 1:1 mapping.
const ATTRIBUTE_FIELDS: &[(&str, TagField)] = &[
    ("WM/AlbumTitle", TagField::Album),
    ("WM/AlbumArtist", TagField::AlbumArtist),
    ("WM/Year", TagField::Year),
    ("WM/Genre", TagField::Genre),
    ("WM/Composer", TagField::Composer),
    ("WM/TrackNumber", TagField::Track),
];

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

#[must_use]
pub fn import_tags(
    content: Option<&ContentDescription>,
    extended: Option<&ExtendedContentDescription>,
) -> TagSet {
    let mut tags = TagSet::new();
    if let Some(content) = content {
        if let Some(title) = non_empty(&content.title) {
            tags.set(TagField::Title, title);
        }
        if let Some(author) = non_empty(&content.author) {
            tags.set(TagField::Artist, author);
        }
        if let Some(description) = non_empty(&content.description) {
            tags.set(TagField::Comment, description);
        }
    }
    if let Some(extended) = extended {
        for (name, field) in ATTRIBUTE_FIELDS {
            if let Some(value) = extended.get(name).and_then(AttributeValue::to_text) {
                tags.set(*field, value);
            }
        }
        if let Some(lyrics) = find_asf_lyrics(extended) {
            tags.set(TagField::Lyrics, lyrics);
        }
        tags.has_album_art = extended.get(PICTURE_ATTRIBUTE).is_some();
    }
    tags
}

/// Values exceeding the 16-bit length limit are logged and skipped.
fn checked_value(field: TagField, value: &str) -> Option<String> {
    if fits_utf16le_string(value) {
        return Some(value.to_owned());
    }
    FieldCoercionError::new(field, value).log_skipped();
    None
}

pub fn export_tags(
    content: &mut ContentDescription,
    extended: &mut ExtendedContentDescription,
    tags: &TagSet,
) {
    for (target, field) in [
        (&mut content.title, TagField::Title),
        (&mut content.author, TagField::Artist),
        (&mut content.description, TagField::Comment),
    ] {
        if let Some(value) = tags
            .get(field)
            .and_then(|value| checked_value(field, value))
        {
            log::debug!("Setting {field} to {value:?}");
            *target = value;
        }
    }
    for (name, field) in ATTRIBUTE_FIELDS {
        if let Some(value) = tags
            .get(*field)
            .and_then(|value| checked_value(*field, value))
        {
            log::debug!("Setting {name} to {value:?}");
            extended.set(name, AttributeValue::Unicode(value));
        }
    }
    if let Some(lyrics) = tags
        .get(TagField::Lyrics)
        .filter(|lyrics| !lyrics.is_empty())
        .and_then(|lyrics| checked_value(TagField::Lyrics, lyrics))
    {
        log::debug!(
            "Replacing lyrics with {num_chars} characters",
            num_chars = lyrics.chars().count()
        );
        extended.set(ASF_LYRICS_ATTRIBUTE, AttributeValue::Unicode(lyrics));
    }
}

fn decode_pictures(extended: &ExtendedContentDescription) -> Vec<AsfPicture> {
    extended
        .get_all(PICTURE_ATTRIBUTE)
        .filter_map(|value| match value {
            AttributeValue::Bytes(data) => AsfPicture::decode(data)
                .map_err(|err| log::warn!("Ignoring invalid picture: {err}"))
                .ok(),
            _ => None,
        })
        .collect()
}

#[must_use]
pub fn find_cover_picture(extended: &ExtendedContentDescription) -> Option<EmbeddedPicture> {
    let mut pictures = decode_pictures(extended);
    if pictures.is_empty() {
        return None;
    }
    // Prefer the front cover and fall back to the first picture
    let index = pictures
        .iter()
        .position(|picture| picture.picture_type == AsfPicture::FRONT_COVER)
        .unwrap_or(0);
    let AsfPicture {
        media_type, data, ..
    } = pictures.swap_remove(index);
    let media_type = media_type
        .parse()
        .unwrap_or_else(|_| guess_media_type(&data));
    Some(EmbeddedPicture { data, media_type })
}

/// Replace all pictures with a single front cover.
pub fn export_front_cover(
    extended: &mut ExtendedContentDescription,
    front_cover: &EmbeddedPicture,
) -> Result<()> {
    let picture = AsfPicture {
        picture_type: AsfPicture::FRONT_COVER,
        media_type: front_cover.media_type.essence_str().to_owned(),
        description: String::new(),
        data: front_cover.data.clone(),
    };
    let data = picture.encode()?;
    if data.len() > usize::from(u16::MAX) {
        log::warn!(
            "Omitting front cover with {num_bytes} bytes that exceeds the maximum size",
            num_bytes = data.len()
        );
        return Ok(());
    }
    extended.set(PICTURE_ATTRIBUTE, AttributeValue::Bytes(data));
    Ok(())
}

#[derive(Debug)]
pub(crate) struct AsfStrategy;

impl FormatStrategy for AsfStrategy {
    fn format(&self) -> ContainerFormat {
        ContainerFormat::Asf
    }

    fn read(&self, file: &mut File) -> Result<TagSet> {
        file.rewind()?;
        let header = Header::read_from(file)?;
        let content = header.content_description()?;
        let extended = header.extended_content_description()?;
        if content.is_none() && extended.is_none() {
            log::debug!("No content description found");
        }
        Ok(import_tags(content.as_ref(), extended.as_ref()))
    }

    fn read_picture(&self, file: &mut File) -> Result<Option<EmbeddedPicture>> {
        file.rewind()?;
        let header = Header::read_from(file)?;
        Ok(header
            .extended_content_description()?
            .as_ref()
            .and_then(find_cover_picture))
    }

    fn write(
        &self,
        file: &mut File,
        tags: &TagSet,
        artwork: Option<&NormalizedArtwork>,
        _config: &ExportConfig,
    ) -> Result<()> {
        file.rewind()?;
        let mut header = Header::read_from(file)?;
        let mut content = header.content_description()?.unwrap_or_default();
        let mut extended = header.extended_content_description()?.unwrap_or_default();

        export_tags(&mut content, &mut extended, tags);
        if let Some(artwork) = artwork {
            export_front_cover(&mut extended, &artwork.primary)?;
        }

        header.set_content_description(&content)?;
        header.set_extended_content_description(&extended)?;
        header.write_to(file)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests;

// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use lofty::{
    ogg::{OggPictureStorage, VorbisComments},
    picture::{PictureInformation, PictureType},
};

use tagforge_core::{EmbeddedPicture, TagField, TagSet};

use crate::{
    Result,
    util::{
        artwork::{embedded_picture_from_lofty, new_lofty_picture, select_cover_picture},
        lyrics::find_vorbis_lyrics,
    },
};

pub(crate) const LYRICS_KEY: &str = "LYRICS";

/// Field mapping of FLAC files.
///
/// `DATE` appears twice. On export the later entry wins, see
/// [`SHARED_DATE_SLOT`](super::SHARED_DATE_SLOT).
pub(crate) const FLAC_FIELDS: &[(&str, TagField)] = &[
    ("TITLE", TagField::Title),
    ("ARTIST", TagField::Artist),
    ("ALBUM", TagField::Album),
    ("ALBUMARTIST", TagField::AlbumArtist),
    ("DATE", TagField::Year),
    ("DATE", TagField::Date),
    ("GENRE", TagField::Genre),
    ("COMPOSER", TagField::Composer),
    ("CONDUCTOR", TagField::Conductor),
    ("ARRANGER", TagField::Arranger),
    ("COMMENT", TagField::Comment),
    ("TRACKNUMBER", TagField::Track),
    ("DISCNUMBER", TagField::DiscNumber),
    ("DISCTOTAL", TagField::DiscTotal),
    ("BPM", TagField::Bpm),
    ("COMPILATION", TagField::Compilation),
    ("COPYRIGHT", TagField::Copyright),
    ("ENCODEDBY", TagField::EncodedBy),
    ("PUBLISHER", TagField::Publisher),
    ("ISRC", TagField::Isrc),
    ("LANGUAGE", TagField::Language),
    ("MEDIA", TagField::MediaType),
    ("MOOD", TagField::Mood),
    ("ORIGINALALBUM", TagField::OriginalAlbum),
    ("ORIGINALARTIST", TagField::OriginalArtist),
    ("ORIGINALDATE", TagField::OriginalDate),
    ("SUBTITLE", TagField::Subtitle),
    ("WEBSITE", TagField::Website),
];

/// Reduced field mapping of Ogg Vorbis and Opus files.
pub(crate) const OGG_FIELDS: &[(&str, TagField)] = &[
    ("TITLE", TagField::Title),
    ("ARTIST", TagField::Artist),
    ("ALBUM", TagField::Album),
    ("ALBUMARTIST", TagField::AlbumArtist),
    ("DATE", TagField::Year),
    ("GENRE", TagField::Genre),
    ("COMPOSER", TagField::Composer),
    ("COMMENT", TagField::Comment),
    ("TRACKNUMBER", TagField::Track),
];

#[must_use]
pub(crate) fn import_tags(comments: &VorbisComments, fields: &[(&str, TagField)]) -> TagSet {
    let mut tags = TagSet::new();
    for (key, field) in fields {
        if let Some(value) = comments.get(key) {
            tags.set(*field, value);
        }
    }
    let items = comments.items().collect::<Vec<_>>();
    if let Some(lyrics) = find_vorbis_lyrics(&items) {
        tags.set(TagField::Lyrics, lyrics);
    }
    tags.has_album_art = !comments.pictures().is_empty();
    tags
}

pub(crate) fn export_tags(
    comments: &mut VorbisComments,
    tags: &TagSet,
    fields: &[(&str, TagField)],
) {
    for (key, field) in fields {
        if let Some(value) = tags.get(*field) {
            log::debug!("Setting {key} to {value:?}");
            comments.insert((*key).to_owned(), value.to_owned());
        }
    }
    if let Some(lyrics) = tags.get(TagField::Lyrics).filter(|lyrics| !lyrics.is_empty()) {
        log::debug!(
            "Replacing lyrics with {num_chars} characters",
            num_chars = lyrics.chars().count()
        );
        comments.insert(LYRICS_KEY.to_owned(), lyrics.to_owned());
    }
}

#[must_use]
pub(crate) fn find_cover_picture(comments: &VorbisComments) -> Option<EmbeddedPicture> {
    select_cover_picture(comments.pictures().iter().map(|(picture, _)| picture))
        .map(embedded_picture_from_lofty)
}

/// Replace all `METADATA_BLOCK_PICTURE` comments with a single front cover.
pub(crate) fn export_front_cover(
    comments: &mut VorbisComments,
    front_cover: &EmbeddedPicture,
) -> Result<()> {
    let pic_types = comments
        .pictures()
        .iter()
        .map(|(picture, _)| picture.pic_type())
        .collect::<Vec<_>>();
    for pic_type in pic_types {
        comments.remove_picture_type(pic_type);
    }
    let picture = new_lofty_picture(front_cover, PictureType::CoverFront, None);
    let info = PictureInformation::from_picture(&picture).unwrap_or_default();
    comments.insert_picture(picture, Some(info))?;
    Ok(())
}

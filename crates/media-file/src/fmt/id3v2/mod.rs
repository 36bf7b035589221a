// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{borrow::Cow, collections::BTreeMap};

use lofty::{
    TextEncoding,
    id3::v2::{
        AttachedPictureFrame, CommentFrame, ExtendedTextFrame, Frame, FrameId, Id3v2Tag,
        TextInformationFrame, TimestampFrame, UnsynchronizedTextFrame, UrlLinkFrame,
    },
    picture::PictureType,
    tag::items::Timestamp,
};

use tagforge_core::{EmbeddedPicture, TagField, TagSet};

use crate::{
    io::export::{ExportConfig, Id3v2Version, LyricsConfig},
    util::{
        FieldCoercionError,
        artwork::{NormalizedArtwork, embedded_picture_from_lofty, new_lofty_picture},
        join_number_and_total,
        lyrics::find_id3v2_lyrics,
        split_number_and_total,
    },
};

/// Both ID3v2.3 and ID3v2.4 support this encoding.
const TEXT_ENCODING: TextEncoding = TextEncoding::UTF16;

/// Text information frames with a 1:1 mapping.
pub(crate) const TEXT_FRAME_FIELDS: &[(&str, TagField)] = &[
    ("TIT2", TagField::Title),
    ("TPE1", TagField::Artist),
    ("TPE2", TagField::AlbumArtist),
    ("TALB", TagField::Album),
    ("TDRC", TagField::Year),
    ("TDAT", TagField::Date),
    ("TCON", TagField::Genre),
    ("TCOM", TagField::Composer),
    ("TPE3", TagField::Conductor),
    ("TPE4", TagField::Arranger),
    ("TRCK", TagField::Track),
    ("TBPM", TagField::Bpm),
    ("TCMP", TagField::Compilation),
    ("TCOP", TagField::Copyright),
    ("TENC", TagField::EncodedBy),
    ("TPUB", TagField::Publisher),
    ("TSRC", TagField::Isrc),
    ("TLAN", TagField::Language),
    ("TLEN", TagField::Length),
    ("TMED", TagField::MediaType),
    ("TMOO", TagField::Mood),
    ("TOAL", TagField::OriginalAlbum),
    ("TOPE", TagField::OriginalArtist),
    ("TDOR", TagField::OriginalDate),
    ("TIT3", TagField::Subtitle),
];

/// Outdated frames that are only considered if the
/// corresponding current frame is missing.
const OUTDATED_TEXT_FRAME_FIELDS: &[(&str, TagField)] = &[
    ("TYER", TagField::Year),
    ("TORY", TagField::OriginalDate),
];

/// Frames with a timestamp value.
const TIMESTAMP_FRAME_IDS: [&str; 2] = ["TDRC", "TDOR"];

/// ID3v2.4 frames without an ID3v2.3 counterpart are stored as
/// `TXXX` frames with these descriptions.
const USER_TEXT_FIELDS: &[(&str, &str, TagField)] = &[
    ("TMOO", "MOOD", TagField::Mood),
    ("TDOR", "ORIGINALDATE", TagField::OriginalDate),
];

/// Subtitle of the set, appended to the regular subtitle.
const SET_SUBTITLE_FRAME_ID: &str = "TSST";

const DISC_FRAME_ID: &str = "TPOS";

const WEBSITE_FRAME_ID: &str = "WCOM";

const COMMENT_LANGUAGE: [u8; 3] = *b"eng";

const LYRICS_FRAME_ID: &str = "USLT";

const PICTURE_FRAME_ID: &str = "APIC";

pub(crate) const FRONT_COVER_DESCRIPTION: &str = "Cover";

pub(crate) const REDUNDANT_COVER_DESCRIPTION: &str = "Thumbnail";

fn frame_id(id: &'static str) -> FrameId<'static> {
    FrameId::Valid(Cow::Borrowed(id))
}

fn text_frame(id: &'static str, value: &str) -> Frame<'static> {
    Frame::Text(TextInformationFrame::new(
        frame_id(id),
        TEXT_ENCODING,
        value.to_owned(),
    ))
}

/// Text and timestamp frames share the same textual representation.
fn frame_text_value<'a>(frame: &'a Frame<'_>) -> Option<Cow<'a, str>> {
    match frame {
        Frame::Text(text) => Some(Cow::Borrowed(&*text.value)),
        Frame::Timestamp(timestamp) => Some(Cow::Owned(timestamp.timestamp.to_string())),
        _ => None,
    }
}

#[must_use]
pub(crate) fn import_tags(tag: &Id3v2Tag) -> TagSet {
    let mut tags = TagSet::new();
    let mut set_subtitle = None;
    let mut fallbacks = Vec::new();
    for frame in tag.into_iter() {
        let id = frame.id().as_str();
        if let Some(value) = frame_text_value(frame) {
            if let Some((_, field)) = TEXT_FRAME_FIELDS.iter().find(|(key, _)| *key == id) {
                tags.set(*field, value);
            } else if let Some((_, field)) =
                OUTDATED_TEXT_FRAME_FIELDS.iter().find(|(key, _)| *key == id)
            {
                log::debug!("Found {field} in outdated frame {id}");
                fallbacks.push((*field, value.into_owned()));
            } else if id == DISC_FRAME_ID {
                let (number, total) = split_number_and_total(&value);
                tags.set(TagField::DiscNumber, number);
                if let Some(total) = total {
                    tags.set(TagField::DiscTotal, total);
                }
            } else if id == SET_SUBTITLE_FRAME_ID {
                set_subtitle = Some(value);
            }
            continue;
        }
        match frame {
            Frame::Comment(comment) => {
                if !tags.contains(TagField::Comment) {
                    tags.set(TagField::Comment, &*comment.content);
                }
            }
            Frame::UserText(user_text) => {
                if let Some((_, _, field)) = USER_TEXT_FIELDS.iter().find(|(_, description, _)| {
                    user_text.description.eq_ignore_ascii_case(description)
                }) {
                    fallbacks.push((*field, user_text.content.to_string()));
                }
            }
            Frame::Url(url) => {
                if !tags.contains(TagField::Website) {
                    tags.set(TagField::Website, url.url());
                }
            }
            Frame::UserUrl(url) => {
                if !tags.contains(TagField::Website) {
                    tags.set(TagField::Website, &*url.content);
                }
            }
            Frame::Picture(_) => {
                tags.has_album_art = true;
            }
            _ => (),
        }
    }
    // Only considered if the corresponding current frame is missing
    for (field, value) in fallbacks {
        if !tags.contains(field) {
            tags.set(field, value);
        }
    }
    if let Some(set_subtitle) = set_subtitle {
        let subtitle = match tags.get(TagField::Subtitle) {
            Some(subtitle) => format!("{subtitle} - {set_subtitle}"),
            None => set_subtitle.into_owned(),
        };
        tags.set(TagField::Subtitle, subtitle);
    }
    if let Some(lyrics) = find_id3v2_lyrics(tag) {
        tags.set(TagField::Lyrics, lyrics);
    }
    tags
}

/// Copy all frames as native entries, keyed by their lowercase frame ID.
///
/// Frames without a textual representation are skipped. The
/// first occurrence of a frame ID wins.
#[must_use]
pub(crate) fn import_native(tag: &Id3v2Tag) -> BTreeMap<String, String> {
    let mut native = BTreeMap::new();
    for frame in tag.into_iter() {
        let value = match frame {
            Frame::Text(_) | Frame::Timestamp(_) => {
                frame_text_value(frame).map(Cow::into_owned).unwrap_or_default()
            }
            Frame::Comment(comment) => comment.content.to_string(),
            Frame::UnsynchronizedText(lyrics) => lyrics.content.to_string(),
            Frame::UserText(user_text) => user_text.content.to_string(),
            Frame::Url(url) => url.url().to_owned(),
            _ => continue,
        };
        native
            .entry(frame.id().as_str().to_lowercase())
            .or_insert(value);
    }
    native
}

#[must_use]
pub(crate) fn find_cover_picture(tag: &Id3v2Tag) -> Option<EmbeddedPicture> {
    let mut first = None;
    for frame in tag.into_iter() {
        let Frame::Picture(picture_frame) = frame else {
            continue;
        };
        if picture_frame.picture.pic_type() == PictureType::CoverFront {
            return Some(embedded_picture_from_lofty(&picture_frame.picture));
        }
        first.get_or_insert(&picture_frame.picture);
    }
    first.map(embedded_picture_from_lofty)
}

/// Accepts `yyyy[-MM[-ddTHH[:mm[:ss]]]]`.
fn parse_timestamp(value: &str) -> Option<Timestamp> {
    let value = value.trim();
    let year = value.get(..4)?;
    if !year.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

fn export_text_frame(
    tag: &mut Id3v2Tag,
    id: &'static str,
    field: TagField,
    value: &str,
    version: Id3v2Version,
) {
    log::debug!("Setting {field} to {value:?}");
    if version == Id3v2Version::V3
        && let Some((_, description, _)) = USER_TEXT_FIELDS.iter().find(|(key, _, _)| *key == id)
    {
        tag.insert(Frame::UserText(ExtendedTextFrame::new(
            TEXT_ENCODING,
            (*description).to_owned(),
            value.to_owned(),
        )));
        return;
    }
    if !TIMESTAMP_FRAME_IDS.contains(&id) {
        tag.insert(text_frame(id, value));
        return;
    }
    // Only timestamp frames are converted when saving as ID3v2.3
    tag.retain(|frame| frame.id().as_str() != id);
    match parse_timestamp(value) {
        Some(timestamp) => {
            tag.insert(Frame::Timestamp(TimestampFrame::new(
                frame_id(id),
                TEXT_ENCODING,
                timestamp,
            )));
        }
        None if version == Id3v2Version::V4 => {
            tag.insert(text_frame(id, value));
        }
        None => {
            FieldCoercionError::new(field, value).log_skipped();
        }
    }
}

/// Write the 1:1 mapped text frames for the given fields.
pub(crate) fn export_text_fields(
    tag: &mut Id3v2Tag,
    tags: &TagSet,
    fields: &[TagField],
    version: Id3v2Version,
) {
    for (id, field) in TEXT_FRAME_FIELDS {
        if !fields.contains(field) {
            continue;
        }
        if let Some(value) = tags.get(*field) {
            export_text_frame(tag, id, *field, value, version);
        }
    }
    if fields.contains(&TagField::Comment)
        && let Some(value) = tags.get(TagField::Comment)
    {
        log::debug!("Setting {field} to {value:?}", field = TagField::Comment);
        tag.insert(Frame::Comment(CommentFrame::new(
            TEXT_ENCODING,
            COMMENT_LANGUAGE,
            String::new(),
            value.to_owned(),
        )));
    }
}

pub(crate) fn export_tags(
    tag: &mut Id3v2Tag,
    tags: &TagSet,
    artwork: Option<&NormalizedArtwork>,
    config: &ExportConfig,
) {
    let all_text_fields = TEXT_FRAME_FIELDS
        .iter()
        .map(|(_, field)| *field)
        .chain(std::iter::once(TagField::Comment))
        .collect::<Vec<_>>();
    export_text_fields(tag, tags, &all_text_fields, config.id3v2_version);

    if let Some(number) = tags.get(TagField::DiscNumber) {
        let disc = join_number_and_total(number, tags.get(TagField::DiscTotal));
        log::debug!("Setting disc to {disc:?}");
        tag.insert(text_frame(DISC_FRAME_ID, &disc));
    }

    if let Some(website) = tags.get(TagField::Website) {
        log::debug!("Setting website to {website:?}");
        tag.insert(Frame::Url(UrlLinkFrame::new(
            frame_id(WEBSITE_FRAME_ID),
            website.to_owned(),
        )));
    }

    if let Some(lyrics) = tags.get(TagField::Lyrics).filter(|lyrics| !lyrics.is_empty()) {
        export_lyrics(tag, lyrics, &config.lyrics);
    }

    if let Some(artwork) = artwork {
        export_pictures(tag, &artwork.primary, artwork.secondary.as_ref());
    }
}

fn export_lyrics(tag: &mut Id3v2Tag, lyrics: &str, config: &LyricsConfig) {
    log::debug!(
        "Replacing lyrics with {num_chars} characters",
        num_chars = lyrics.chars().count()
    );
    tag.retain(|frame| frame.id().as_str() != LYRICS_FRAME_ID);
    for copy in &config.copies {
        tag.insert(Frame::UnsynchronizedText(UnsynchronizedTextFrame::new(
            TEXT_ENCODING,
            copy.language,
            copy.description.clone(),
            lyrics.to_owned(),
        )));
    }
}

/// Replace all pictures with a front cover and an optional redundant copy.
pub(crate) fn export_pictures(
    tag: &mut Id3v2Tag,
    front_cover: &EmbeddedPicture,
    redundant_copy: Option<&EmbeddedPicture>,
) {
    tag.retain(|frame| frame.id().as_str() != PICTURE_FRAME_ID);
    let pictures = std::iter::once((
        front_cover,
        PictureType::CoverFront,
        FRONT_COVER_DESCRIPTION,
    ))
    .chain(
        redundant_copy.map(|picture| (picture, PictureType::Other, REDUNDANT_COVER_DESCRIPTION)),
    );
    for (picture, pic_type, description) in pictures {
        log::debug!(
            "Embedding {pic_type:?} picture: {num_bytes} bytes",
            num_bytes = picture.data.len()
        );
        tag.insert(Frame::Picture(AttachedPictureFrame::new(
            TEXT_ENCODING,
            new_lofty_picture(picture, pic_type, Some(description)),
        )));
    }
}

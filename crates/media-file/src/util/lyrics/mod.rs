// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Best-effort discovery of lyrics in tags that store them inconsistently.
//!
//! All functions return `None` instead of an error if nothing is found.

use std::{
    borrow::Cow,
    io::{Read, Seek, SeekFrom},
};

use lofty::{
    id3::v2::{Frame, Id3v2Tag},
    mp4::{AtomData, AtomIdent, Ilst},
};

use crate::fmt::asf::object::{AttributeValue, ExtendedContentDescription};

/// Comments longer than this are assumed to contain lyrics.
const COMMENT_LYRICS_MIN_CHARS: usize = 100;

/// Text frames longer than this are assumed to contain lyrics.
const TEXT_LYRICS_MIN_CHARS: usize = 200;

const TEXT_FRAMES_WITHOUT_LYRICS: [&str; 3] = ["TRCK", "TYER", "TDRC"];

/// Vorbis comment keys that commonly carry lyrics, in order of preference.
const VORBIS_LYRICS_KEYS: &[&str] = &[
    "LYRICS",
    "UNSYNCEDLYRICS",
    "LYRIC",
    "LYRICS:SYNC",
    "SYNCED_LYRICS",
    "LYRICS-XXX",
    "UNSYNCED_LYRICS",
    "SYNCHRONIZED_LYRICS",
    "LYRICS_TEXT",
    "LYRICS_SYNCHRONISED",
    "LYRICS_UNSYNCED",
    "LYRICS_SYNCHRONISED:ARA",
    "LYRICS_UNSYNCED:ARA",
];

pub(crate) const MP4_LYRICS_IDENT: AtomIdent<'static> = AtomIdent::Fourcc(*b"\xa9lyr");

const MP4_ALT_LYRICS_FOURCCS: [[u8; 4]; 2] = [*b"\xa9lyc", *b"lrcT"];

const MP4_FREEFORM_MEAN_ITUNES: &str = "com.apple.iTunes";

const MP4_FREEFORM_LYRICS_NAMES: [&str; 2] = ["lyrics", "LYRICS"];

pub(crate) const ASF_LYRICS_ATTRIBUTE: &str = "WM/Lyrics";

const LYRICS3V2_END_MARKER: &[u8; 9] = b"LYRICS200";

const ID3V1_TAG_LEN: u64 = 128;

#[must_use]
pub fn find_id3v2_lyrics(tag: &Id3v2Tag) -> Option<String> {
    // Unsynchronized lyrics
    let uslt = tag.into_iter().find_map(|frame| match frame {
        Frame::UnsynchronizedText(frame) if !frame.content.is_empty() => {
            Some(frame.content.to_string())
        }
        _ => None,
    });
    if uslt.is_some() {
        log::debug!("Found lyrics in USLT frame");
        return uslt;
    }

    // Synchronized lyrics without timestamps
    let sylt = tag.into_iter().find_map(|frame| match frame {
        Frame::Binary(binary) if frame.id().as_str() == "SYLT" => {
            decode_sylt_text(&binary.data)
        }
        _ => None,
    });
    if sylt.is_some() {
        log::debug!("Found lyrics in SYLT frame");
        return sylt;
    }

    // Long comments
    let comment = tag.into_iter().find_map(|frame| match frame {
        Frame::Comment(frame) if frame.content.chars().count() > COMMENT_LYRICS_MIN_CHARS => {
            Some(frame.content.to_string())
        }
        _ => None,
    });
    if comment.is_some() {
        log::debug!("Found lyrics in COMM frame");
        return comment;
    }

    let user_text = tag.into_iter().find_map(|frame| match frame {
        Frame::UserText(frame) if frame.description.to_uppercase().contains("LYRICS") => {
            Some(frame.content.to_string())
        }
        _ => None,
    });
    if user_text.is_some() {
        log::debug!("Found lyrics in TXXX frame");
        return user_text;
    }

    // Last resort: Any very long text
    tag.into_iter().find_map(|frame| {
        let frame_id = frame.id().as_str();
        match frame {
            Frame::Text(text)
                if !TEXT_FRAMES_WITHOUT_LYRICS.contains(&frame_id)
                    && text.value.chars().count() > TEXT_LYRICS_MIN_CHARS =>
            {
                log::debug!("Found lyrics in {frame_id} frame");
                Some(text.value.to_string())
            }
            _ => None,
        }
    })
}

/// Search Vorbis comments for lyrics.
///
/// Keys are compared case-insensitively.
#[must_use]
pub fn find_vorbis_lyrics(items: &[(&str, &str)]) -> Option<String> {
    for lyrics_key in VORBIS_LYRICS_KEYS {
        if let Some((key, value)) = items
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(lyrics_key))
        {
            log::debug!("Found lyrics in Vorbis comment {key}");
            return Some((*value).to_owned());
        }
    }
    items.iter().find_map(|(key, value)| {
        key.to_ascii_uppercase().contains("LYR").then(|| {
            log::debug!("Found potential lyrics in Vorbis comment {key}");
            (*value).to_owned()
        })
    })
}

#[must_use]
pub fn find_mp4_lyrics(ilst: &Ilst) -> Option<String> {
    let freeform_idents = MP4_FREEFORM_LYRICS_NAMES.map(|name| AtomIdent::Freeform {
        mean: Cow::Borrowed(MP4_FREEFORM_MEAN_ITUNES),
        name: Cow::Borrowed(name),
    });
    std::iter::once(MP4_LYRICS_IDENT)
        .chain(MP4_ALT_LYRICS_FOURCCS.map(AtomIdent::Fourcc))
        .chain(freeform_idents)
        .find_map(|ident| {
            let atom = ilst.get(&ident)?;
            atom.data().find_map(|data| match data {
                AtomData::UTF8(text) | AtomData::UTF16(text) => {
                    log::debug!("Found lyrics in atom {ident:?}");
                    Some(text.clone())
                }
                _ => None,
            })
        })
}

#[must_use]
pub fn find_asf_lyrics(content: &ExtendedContentDescription) -> Option<String> {
    content
        .get_all(ASF_LYRICS_ATTRIBUTE)
        .find_map(AttributeValue::to_text)
        .filter(|lyrics| !lyrics.is_empty())
}

/// Concatenate the text segments of a binary `SYLT` frame.
///
/// Timestamps are discarded. Returns `None` for malformed or empty frames.
#[must_use]
pub fn decode_sylt_text(data: &[u8]) -> Option<String> {
    // encoding (1), language (3), timestamp format (1), content type (1)
    let (&encoding, data) = data.split_first()?;
    let data = data.get(5..)?;
    let wide = matches!(encoding, 1 | 2);
    let (_content_descriptor, mut data) = split_terminated(data, wide)?;
    let mut lines = Vec::new();
    while !data.is_empty() {
        let Some((text, rest)) = split_terminated(data, wide) else {
            break;
        };
        lines.push(decode_text(text, encoding)?);
        // Timestamp
        data = rest.get(4..)?;
    }
    if lines.is_empty() {
        return None;
    }
    Some(lines.join("\n"))
}

fn split_terminated(data: &[u8], wide: bool) -> Option<(&[u8], &[u8])> {
    if wide {
        let pos = data.chunks_exact(2).position(|chunk| chunk == [0, 0])? * 2;
        Some((&data[..pos], &data[pos + 2..]))
    } else {
        let pos = data.iter().position(|byte| *byte == 0)?;
        Some((&data[..pos], &data[pos + 1..]))
    }
}

fn decode_text(text: &[u8], encoding: u8) -> Option<String> {
    match encoding {
        // ISO-8859-1
        0 => Some(text.iter().copied().map(char::from).collect()),
        // UTF-16 with BOM
        1 => match text {
            [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
            [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
            _ => decode_utf16(text, u16::from_le_bytes),
        },
        // UTF-16BE
        2 => decode_utf16(text, u16::from_be_bytes),
        3 => String::from_utf8(text.to_vec()).ok(),
        _ => None,
    }
}

fn decode_utf16(text: &[u8], from_bytes: fn([u8; 2]) -> u16) -> Option<String> {
    let units = text
        .chunks_exact(2)
        .map(|chunk| from_bytes([chunk[0], chunk[1]]));
    char::decode_utf16(units).collect::<Result<_, _>>().ok()
}

/// Detect a trailing Lyrics3v2 block.
///
/// The block is located either right before an ID3v1 tag or at the
/// very end of the file.
pub fn has_lyrics3v2<R: Read + Seek>(reader: &mut R) -> std::io::Result<bool> {
    let len = reader.seek(SeekFrom::End(0))?;
    let marker_len = LYRICS3V2_END_MARKER.len() as u64;
    let mut id3v1_header = [0u8; 3];
    let has_id3v1 = len >= ID3V1_TAG_LEN && {
        reader.seek(SeekFrom::Start(len - ID3V1_TAG_LEN))?;
        reader.read_exact(&mut id3v1_header)?;
        &id3v1_header == b"TAG"
    };
    let trailer_len = if has_id3v1 { ID3V1_TAG_LEN } else { 0 };
    let Some(marker_pos) = len.checked_sub(trailer_len + marker_len) else {
        return Ok(false);
    };
    reader.seek(SeekFrom::Start(marker_pos))?;
    let mut marker = [0u8; 9];
    reader.read_exact(&mut marker)?;
    Ok(&marker == LYRICS3V2_END_MARKER)
}

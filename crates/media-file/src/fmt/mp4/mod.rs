// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{fs::File, io::Seek as _};

use lofty::{
    file::AudioFile,
    mp4::{Atom, AtomData, AtomIdent, Ilst, Mp4File},
    picture::PictureType,
    tag::Accessor as _,
};

use tagforge_core::{ContainerFormat, EmbeddedPicture, TagField, TagSet};

use super::{FormatStrategy, SHARED_DATE_SLOT, parse_options, write_options};
use crate::{
    Result,
    io::export::ExportConfig,
    util::{
        artwork::{
            NormalizedArtwork, embedded_picture_from_lofty, new_lofty_picture,
            select_cover_picture,
        },
        coerce_boolean_flag, coerce_integer_tempo, coerce_position, format_position,
        lyrics::{MP4_LYRICS_IDENT, find_mp4_lyrics},
    },
};

/// Text atoms with a 1:1 mapping.
///
/// `©day` appears twice. On export the later entry wins, see
/// [`SHARED_DATE_SLOT`](super::SHARED_DATE_SLOT).
const TEXT_ATOM_FIELDS: &[([u8; 4], TagField)] = &[
    (*b"\xa9nam", TagField::Title),
    (*b"\xa9ART", TagField::Artist),
    (*b"aART", TagField::AlbumArtist),
    (*b"\xa9alb", TagField::Album),
    (*b"\xa9day", TagField::Year),
    (*b"\xa9day", TagField::Date),
    (*b"\xa9gen", TagField::Genre),
    (*b"\xa9wrt", TagField::Composer),
    (*b"\xa9cmt", TagField::Comment),
    (*b"cprt", TagField::Copyright),
    (*b"\xa9too", TagField::EncodedBy),
    (*b"\xa9con", TagField::Conductor),
    (*b"arrn", TagField::Arranger),
    (*b"\xa9isr", TagField::Isrc),
    (*b"\xa9lan", TagField::Language),
    (*b"\xa9med", TagField::MediaType),
    (*b"\xa9moo", TagField::Mood),
    (*b"\xa9oal", TagField::OriginalAlbum),
    (*b"\xa9ope", TagField::OriginalArtist),
    (*b"\xa9st3", TagField::Subtitle),
    (*b"\xa9pub", TagField::Publisher),
    (*b"\xa9url", TagField::Website),
];

const TEMPO_IDENT: AtomIdent<'static> = AtomIdent::Fourcc(*b"tmpo");

const COMPILATION_IDENT: AtomIdent<'static> = AtomIdent::Fourcc(*b"cpil");

const COVER_IDENT: AtomIdent<'static> = AtomIdent::Fourcc(*b"covr");

fn first_text(ilst: &Ilst, ident: &AtomIdent<'_>) -> Option<String> {
    ilst.get(ident)?.data().find_map(|data| match data {
        AtomData::UTF8(text) | AtomData::UTF16(text) => Some(text.clone()),
        _ => None,
    })
}

fn first_integer(ilst: &Ilst, ident: &AtomIdent<'_>) -> Option<i64> {
    ilst.get(ident)?.data().find_map(|data| match data {
        AtomData::SignedInteger(value) => Some(i64::from(*value)),
        AtomData::UnsignedInteger(value) => Some(i64::from(*value)),
        AtomData::Bool(value) => Some(i64::from(*value)),
        _ => None,
    })
}

fn replace_atom(ilst: &mut Ilst, atom: Atom<'static>) {
    ilst.retain(|existing| existing.ident() != atom.ident());
    ilst.insert(atom);
}

#[must_use]
pub(crate) fn import_tags(ilst: &Ilst) -> TagSet {
    let mut tags = TagSet::new();
    for (fourcc, field) in TEXT_ATOM_FIELDS {
        if let Some(value) = first_text(ilst, &AtomIdent::Fourcc(*fourcc)) {
            tags.set(*field, value);
        }
    }
    if let Some(number) = ilst.track() {
        tags.set(TagField::Track, format_position(number, ilst.track_total()));
    }
    if let Some(number) = ilst.disk() {
        tags.set(TagField::DiscNumber, number.to_string());
        if let Some(total) = ilst.disk_total().filter(|total| *total > 0) {
            tags.set(TagField::DiscTotal, total.to_string());
        }
    }
    if let Some(tempo) = first_integer(ilst, &TEMPO_IDENT) {
        tags.set(TagField::Bpm, tempo.to_string());
    }
    if let Some(compilation) = first_integer(ilst, &COMPILATION_IDENT) {
        let flag = if compilation == 0 { "0" } else { "1" };
        tags.set(TagField::Compilation, flag);
    }
    if let Some(lyrics) = find_mp4_lyrics(ilst) {
        tags.set(TagField::Lyrics, lyrics);
    }
    tags.has_album_art = ilst.get(&COVER_IDENT).is_some_and(|atom| {
        atom.data()
            .any(|data| matches!(data, AtomData::Picture(_)))
    });
    tags
}

/// Write all mapped fields.
///
/// Values that cannot be coerced into the native representation
/// are logged and skipped.
pub(crate) fn export_tags(ilst: &mut Ilst, tags: &TagSet) {
    for (fourcc, field) in TEXT_ATOM_FIELDS {
        if let Some(value) = tags.get(*field) {
            log::debug!("Setting {field} to {value:?}");
            replace_atom(
                ilst,
                Atom::new(AtomIdent::Fourcc(*fourcc), AtomData::UTF8(value.to_owned())),
            );
        }
    }

    if let Some(track) = tags.get(TagField::Track) {
        match coerce_position(TagField::Track, track, None) {
            Ok((number, total)) => {
                ilst.set_track(number);
                if total > 0 {
                    ilst.set_track_total(total);
                } else {
                    ilst.remove_track_total();
                }
            }
            Err(err) => err.log_skipped(),
        }
    }

    if let Some(disc_number) = tags.get(TagField::DiscNumber) {
        match coerce_position(
            TagField::DiscNumber,
            disc_number,
            tags.get(TagField::DiscTotal),
        ) {
            Ok((number, total)) => {
                ilst.set_disk(number);
                if total > 0 {
                    ilst.set_disk_total(total);
                } else {
                    ilst.remove_disk_total();
                }
            }
            Err(err) => err.log_skipped(),
        }
    }

    if let Some(bpm) = tags.get(TagField::Bpm) {
        match coerce_integer_tempo(TagField::Bpm, bpm) {
            Ok(tempo) => {
                log::debug!("Setting tempo to {tempo}");
                replace_atom(ilst, Atom::new(TEMPO_IDENT, AtomData::SignedInteger(tempo)));
            }
            Err(err) => err.log_skipped(),
        }
    }

    if let Some(compilation) = tags.get(TagField::Compilation) {
        match coerce_boolean_flag(TagField::Compilation, compilation) {
            Ok(flag) => {
                replace_atom(ilst, Atom::new(COMPILATION_IDENT, AtomData::Bool(flag)));
            }
            Err(err) => err.log_skipped(),
        }
    }

    if let Some(lyrics) = tags.get(TagField::Lyrics).filter(|lyrics| !lyrics.is_empty()) {
        log::debug!(
            "Replacing lyrics with {num_chars} characters",
            num_chars = lyrics.chars().count()
        );
        replace_atom(
            ilst,
            Atom::new(MP4_LYRICS_IDENT, AtomData::UTF8(lyrics.to_owned())),
        );
    }
}

#[must_use]
pub(crate) fn find_cover_picture(ilst: &Ilst) -> Option<EmbeddedPicture> {
    let atom = ilst.get(&COVER_IDENT)?;
    select_cover_picture(atom.data().filter_map(|data| match data {
        AtomData::Picture(picture) => Some(picture),
        _ => None,
    }))
    .map(embedded_picture_from_lofty)
}

pub(crate) fn export_front_cover(ilst: &mut Ilst, front_cover: &EmbeddedPicture) {
    let picture = new_lofty_picture(front_cover, PictureType::CoverFront, None);
    replace_atom(ilst, Atom::new(COVER_IDENT, AtomData::Picture(picture)));
}

#[derive(Debug)]
pub(crate) struct Mp4Strategy;

impl FormatStrategy for Mp4Strategy {
    fn format(&self) -> ContainerFormat {
        ContainerFormat::Mp4
    }

    fn shared_slots(&self) -> &'static [(TagField, TagField)] {
        SHARED_DATE_SLOT
    }

    fn read(&self, file: &mut File) -> Result<TagSet> {
        let mp4_file = <Mp4File as AudioFile>::read_from(file, parse_options())?;
        Ok(mp4_file.ilst().map(import_tags).unwrap_or_default())
    }

    fn read_picture(&self, file: &mut File) -> Result<Option<EmbeddedPicture>> {
        let mp4_file = <Mp4File as AudioFile>::read_from(file, parse_options())?;
        Ok(mp4_file.ilst().and_then(find_cover_picture))
    }

    fn write(
        &self,
        file: &mut File,
        tags: &TagSet,
        artwork: Option<&NormalizedArtwork>,
        config: &ExportConfig,
    ) -> Result<()> {
        let mut mp4_file = <Mp4File as AudioFile>::read_from(file, parse_options())?;

        let mut ilst = mp4_file.ilst_mut().map(std::mem::take).unwrap_or_default();
        export_tags(&mut ilst, tags);
        if let Some(artwork) = artwork {
            export_front_cover(&mut ilst, &artwork.primary);
        }

        mp4_file.set_ilst(ilst);
        file.rewind()?;
        mp4_file.save_to(file, write_options(config))?;

        Ok(())
    }
}

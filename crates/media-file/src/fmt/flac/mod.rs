// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{
    fs::File,
    io::{Read as _, Seek as _, Write as _},
};

use lofty::{
    file::AudioFile,
    flac::FlacFile,
    ogg::OggPictureStorage,
    picture::{PictureInformation, PictureType},
};

use tagforge_core::{ContainerFormat, EmbeddedPicture, TagField, TagSet};

use super::{FormatStrategy, SHARED_DATE_SLOT, parse_options, vorbis, write_options};
use crate::{
    Result,
    io::export::ExportConfig,
    util::artwork::{
        NormalizedArtwork, embedded_picture_from_lofty, new_lofty_picture, select_cover_picture,
    },
};

const STREAM_MARKER: &[u8; 4] = b"fLaC";

const BLOCK_HEADER_LEN: usize = 4;

const LAST_BLOCK_FLAG: u8 = 0x80;

const PADDING_BLOCK_TYPE: u8 = 1;

const PADDING_LEN: usize = 4096;

/// Position and end of the last metadata block.
fn find_last_metadata_block(bytes: &[u8]) -> Option<(usize, usize)> {
    if !bytes.starts_with(STREAM_MARKER) {
        return None;
    }
    let mut pos = STREAM_MARKER.len();
    loop {
        let header = bytes.get(pos..pos + BLOCK_HEADER_LEN)?;
        let len = u32::from_be_bytes([0, header[1], header[2], header[3]]) as usize;
        let end = pos + BLOCK_HEADER_LEN + len;
        if end > bytes.len() {
            return None;
        }
        if header[0] & LAST_BLOCK_FLAG != 0 {
            return Some((pos, end));
        }
        pos = end;
    }
}

/// Append a padding block if the last metadata block is not a padding block.
///
/// Returns `false` if the stream has not been modified.
pub(crate) fn append_padding_block(bytes: &mut Vec<u8>) -> bool {
    let Some((last_pos, last_end)) = find_last_metadata_block(bytes) else {
        return false;
    };
    if bytes[last_pos] & !LAST_BLOCK_FLAG == PADDING_BLOCK_TYPE {
        return false;
    }
    bytes[last_pos] &= !LAST_BLOCK_FLAG;
    let mut padding = vec![0; BLOCK_HEADER_LEN + PADDING_LEN];
    padding[0] = LAST_BLOCK_FLAG | PADDING_BLOCK_TYPE;
    padding[1..BLOCK_HEADER_LEN].copy_from_slice(&(PADDING_LEN as u32).to_be_bytes()[1..]);
    bytes.splice(last_end..last_end, padding);
    true
}

// lofty fails to rewrite streams that do not end with a padding block
fn ensure_trailing_padding(file: &mut File) -> Result<()> {
    file.rewind()?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    if append_padding_block(&mut bytes) {
        log::debug!("Appending padding block with {PADDING_LEN} bytes");
        file.rewind()?;
        file.write_all(&bytes)?;
    }
    file.rewind()?;
    Ok(())
}

#[derive(Debug)]
pub(crate) struct FlacStrategy;

impl FormatStrategy for FlacStrategy {
    fn format(&self) -> ContainerFormat {
        ContainerFormat::Flac
    }

    fn shared_slots(&self) -> &'static [(TagField, TagField)] {
        SHARED_DATE_SLOT
    }

    fn read(&self, file: &mut File) -> Result<TagSet> {
        let flac_file = <FlacFile as AudioFile>::read_from(file, parse_options())?;
        let mut tags = if let Some(vorbis_comments) = flac_file.vorbis_comments() {
            vorbis::import_tags(vorbis_comments, vorbis::FLAC_FIELDS)
        } else {
            log::debug!("No Vorbis comments found");
            TagSet::new()
        };
        // Pictures are stored in separate metadata blocks
        tags.has_album_art |= !flac_file.pictures().is_empty();
        Ok(tags)
    }

    fn read_picture(&self, file: &mut File) -> Result<Option<EmbeddedPicture>> {
        let flac_file = <FlacFile as AudioFile>::read_from(file, parse_options())?;
        let picture = select_cover_picture(flac_file.pictures().iter().map(|(picture, _)| picture))
            .map(embedded_picture_from_lofty)
            .or_else(|| {
                flac_file
                    .vorbis_comments()
                    .and_then(vorbis::find_cover_picture)
            });
        Ok(picture)
    }

    fn write(
        &self,
        file: &mut File,
        tags: &TagSet,
        artwork: Option<&NormalizedArtwork>,
        config: &ExportConfig,
    ) -> Result<()> {
        ensure_trailing_padding(file)?;
        let mut flac_file = <FlacFile as AudioFile>::read_from(file, parse_options())?;

        let mut vorbis_comments = flac_file
            .vorbis_comments_mut()
            .map(std::mem::take)
            .unwrap_or_default();
        vorbis::export_tags(&mut vorbis_comments, tags, vorbis::FLAC_FIELDS);

        if let Some(artwork) = artwork {
            let pic_types = flac_file
                .pictures()
                .iter()
                .chain(vorbis_comments.pictures())
                .map(|(picture, _)| picture.pic_type())
                .collect::<Vec<_>>();
            for pic_type in pic_types {
                flac_file.remove_picture_type(pic_type);
                vorbis_comments.remove_picture_type(pic_type);
            }
            let picture = new_lofty_picture(&artwork.primary, PictureType::CoverFront, None);
            let info = PictureInformation::from_picture(&picture).unwrap_or_default();
            log::debug!("Embedding front cover picture");
            flac_file.insert_picture(picture, Some(info))?;
        }

        flac_file.set_vorbis_comments(vorbis_comments);
        file.rewind()?;
        flac_file.save_to(file, write_options(config))?;

        Ok(())
    }
}

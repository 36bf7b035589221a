// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{fs::File, io::Seek as _};

use lofty::{file::AudioFile, mpeg::MpegFile};

use tagforge_core::{ContainerFormat, EmbeddedPicture, TagField, TagSet};

use super::{FormatStrategy, id3v2, parse_options, write_options};
use crate::{
    Result,
    io::export::ExportConfig,
    util::{artwork::NormalizedArtwork, lyrics::has_lyrics3v2},
};

#[derive(Debug)]
pub(crate) struct MpegStrategy;

impl FormatStrategy for MpegStrategy {
    fn format(&self) -> ContainerFormat {
        ContainerFormat::Mp3
    }

    fn read(&self, file: &mut File) -> Result<TagSet> {
        let mpeg_file = <MpegFile as AudioFile>::read_from(file, parse_options())?;
        let tags = if let Some(id3v2) = mpeg_file.id3v2() {
            id3v2::import_tags(id3v2)
        } else {
            log::debug!("No ID3v2 tag found");
            TagSet::new()
        };
        if !tags.contains(TagField::Lyrics) {
            match has_lyrics3v2(file) {
                Ok(true) => {
                    log::info!("Ignoring unsupported Lyrics3v2 block");
                }
                Ok(false) => (),
                Err(err) => {
                    log::warn!("Failed to look for Lyrics3v2 block: {err}");
                }
            }
        }
        Ok(tags)
    }

    fn read_picture(&self, file: &mut File) -> Result<Option<EmbeddedPicture>> {
        let mpeg_file = <MpegFile as AudioFile>::read_from(file, parse_options())?;
        Ok(mpeg_file.id3v2().and_then(id3v2::find_cover_picture))
    }

    fn write(
        &self,
        file: &mut File,
        tags: &TagSet,
        artwork: Option<&NormalizedArtwork>,
        config: &ExportConfig,
    ) -> Result<()> {
        let mut mpeg_file = <MpegFile as AudioFile>::read_from(file, parse_options())?;

        let mut id3v2 = mpeg_file
            .id3v2_mut()
            .map(std::mem::take)
            .unwrap_or_default();

        id3v2::export_tags(&mut id3v2, tags, artwork, config);

        mpeg_file.set_id3v2(id3v2);
        file.rewind()?;
        mpeg_file.save_to(file, write_options(config))?;

        Ok(())
    }
}

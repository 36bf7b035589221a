// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{fs::File, io::Seek as _};

use lofty::{file::AudioFile, iff::aiff::AiffFile};

use tagforge_core::{ContainerFormat, EmbeddedPicture, TagSet};

use super::{FormatStrategy, id3v2, parse_options, write_options};
use crate::{Result, io::export::ExportConfig, util::artwork::NormalizedArtwork};

#[derive(Debug)]
pub(crate) struct AiffStrategy;

impl FormatStrategy for AiffStrategy {
    fn format(&self) -> ContainerFormat {
        ContainerFormat::Aiff
    }

    fn read(&self, file: &mut File) -> Result<TagSet> {
        let aiff_file = <AiffFile as AudioFile>::read_from(file, parse_options())?;
        if aiff_file.text_chunks().is_some() {
            log::debug!("Ignoring AIFF text chunks");
        }
        Ok(aiff_file
            .id3v2()
            .map(id3v2::import_tags)
            .unwrap_or_default())
    }

    fn read_picture(&self, file: &mut File) -> Result<Option<EmbeddedPicture>> {
        let aiff_file = <AiffFile as AudioFile>::read_from(file, parse_options())?;
        Ok(aiff_file.id3v2().and_then(id3v2::find_cover_picture))
    }

    fn write(
        &self,
        file: &mut File,
        tags: &TagSet,
        artwork: Option<&NormalizedArtwork>,
        config: &ExportConfig,
    ) -> Result<()> {
        let mut aiff_file = <AiffFile as AudioFile>::read_from(file, parse_options())?;

        let mut id3v2 = aiff_file
            .id3v2_mut()
            .map(std::mem::take)
            .unwrap_or_default();

        id3v2::export_tags(&mut id3v2, tags, artwork, config);

        aiff_file.set_id3v2(id3v2);
        file.rewind()?;
        aiff_file.save_to(file, write_options(config))?;

        Ok(())
    }
}

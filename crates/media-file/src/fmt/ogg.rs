// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{fs::File, io::Seek as _};

use lofty::{file::AudioFile, ogg::VorbisFile};

use tagforge_core::{ContainerFormat, EmbeddedPicture, TagSet};

use super::{FormatStrategy, parse_options, vorbis, write_options};
use crate::{Result, io::export::ExportConfig, util::artwork::NormalizedArtwork};

#[derive(Debug)]
pub(crate) struct OggStrategy;

impl FormatStrategy for OggStrategy {
    fn format(&self) -> ContainerFormat {
        ContainerFormat::Ogg
    }

    fn read(&self, file: &mut File) -> Result<TagSet> {
        let ogg_file = <VorbisFile as AudioFile>::read_from(file, parse_options())?;
        Ok(vorbis::import_tags(ogg_file.vorbis_comments(), vorbis::OGG_FIELDS))
    }

    fn read_picture(&self, file: &mut File) -> Result<Option<EmbeddedPicture>> {
        let ogg_file = <VorbisFile as AudioFile>::read_from(file, parse_options())?;
        Ok(vorbis::find_cover_picture(ogg_file.vorbis_comments()))
    }

    fn write(
        &self,
        file: &mut File,
        tags: &TagSet,
        artwork: Option<&NormalizedArtwork>,
        config: &ExportConfig,
    ) -> Result<()> {
        let mut ogg_file = <VorbisFile as AudioFile>::read_from(file, parse_options())?;

        // The comment header is mandatory in Ogg streams
        let mut vorbis_comments = std::mem::take(ogg_file.vorbis_comments_mut());
        vorbis::export_tags(&mut vorbis_comments, tags, vorbis::OGG_FIELDS);
        if let Some(artwork) = artwork {
            vorbis::export_front_cover(&mut vorbis_comments, &artwork.primary)?;
        }

        ogg_file.set_vorbis_comments(vorbis_comments);
        file.rewind()?;
        ogg_file.save_to(file, write_options(config))?;

        Ok(())
    }
}

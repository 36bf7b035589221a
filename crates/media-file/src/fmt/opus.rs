// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{fs::File, io::Seek as _};

use lofty::{file::AudioFile, ogg::OpusFile};

use tagforge_core::{ContainerFormat, EmbeddedPicture, TagSet};

use super::{FormatStrategy, parse_options, vorbis, write_options};
use crate::{Result, io::export::ExportConfig, util::artwork::NormalizedArtwork};

#[derive(Debug)]
pub(crate) struct OpusStrategy;

impl FormatStrategy for OpusStrategy {
    fn format(&self) -> ContainerFormat {
        ContainerFormat::Opus
    }

    fn read(&self, file: &mut File) -> Result<TagSet> {
        let opus_file = <OpusFile as AudioFile>::read_from(file, parse_options())?;
        Ok(vorbis::import_tags(opus_file.vorbis_comments(), vorbis::OGG_FIELDS))
    }

    fn read_picture(&self, file: &mut File) -> Result<Option<EmbeddedPicture>> {
        let opus_file = <OpusFile as AudioFile>::read_from(file, parse_options())?;
        Ok(vorbis::find_cover_picture(opus_file.vorbis_comments()))
    }

    fn write(
        &self,
        file: &mut File,
        tags: &TagSet,
        artwork: Option<&NormalizedArtwork>,
        config: &ExportConfig,
    ) -> Result<()> {
        let mut opus_file = <OpusFile as AudioFile>::read_from(file, parse_options())?;

        // The comment header is mandatory in Ogg streams
        let mut vorbis_comments = std::mem::take(opus_file.vorbis_comments_mut());
        vorbis::export_tags(&mut vorbis_comments, tags, vorbis::OGG_FIELDS);
        if let Some(artwork) = artwork {
            vorbis::export_front_cover(&mut vorbis_comments, &artwork.primary)?;
        }

        opus_file.set_vorbis_comments(vorbis_comments);
        file.rewind()?;
        opus_file.save_to(file, write_options(config))?;

        Ok(())
    }
}

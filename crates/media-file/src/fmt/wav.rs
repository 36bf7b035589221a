// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{fs::File, io::Seek as _};

use lofty::{file::AudioFile, iff::wav::WavFile};

use tagforge_core::{ContainerFormat, EmbeddedPicture, TagField, TagSet};

use super::{FormatStrategy, id3v2, parse_options, write_options};
use crate::{Result, io::export::ExportConfig, util::artwork::NormalizedArtwork};

/// The limited set of fields written into WAV files.
const EXPORTED_FIELDS: [TagField; 4] = [
    TagField::Title,
    TagField::Artist,
    TagField::Album,
    TagField::Comment,
];

/// Native tags are copied without a semantic mapping.
#[derive(Debug)]
pub(crate) struct WavStrategy;

impl FormatStrategy for WavStrategy {
    fn format(&self) -> ContainerFormat {
        ContainerFormat::Wav
    }

    fn read(&self, file: &mut File) -> Result<TagSet> {
        let wav_file = <WavFile as AudioFile>::read_from(file, parse_options())?;
        let mut tags = TagSet::new();
        if let Some(id3v2) = wav_file.id3v2() {
            tags.native = id3v2::import_native(id3v2);
            tags.has_album_art = id3v2::find_cover_picture(id3v2).is_some();
        } else if let Some(riff_info) = wav_file.riff_info() {
            for (key, value) in riff_info.into_iter() {
                tags.native
                    .entry(key.to_lowercase())
                    .or_insert_with(|| value.to_owned());
            }
        } else {
            log::debug!("No tags found");
        }
        Ok(tags)
    }

    fn read_picture(&self, file: &mut File) -> Result<Option<EmbeddedPicture>> {
        let wav_file = <WavFile as AudioFile>::read_from(file, parse_options())?;
        Ok(wav_file.id3v2().and_then(id3v2::find_cover_picture))
    }

    fn write(
        &self,
        file: &mut File,
        tags: &TagSet,
        artwork: Option<&NormalizedArtwork>,
        config: &ExportConfig,
    ) -> Result<()> {
        let mut wav_file = <WavFile as AudioFile>::read_from(file, parse_options())?;

        let mut id3v2 = wav_file
            .id3v2_mut()
            .map(std::mem::take)
            .unwrap_or_default();

        id3v2::export_text_fields(&mut id3v2, tags, &EXPORTED_FIELDS, config.id3v2_version);
        if let Some(artwork) = artwork {
            id3v2::export_pictures(&mut id3v2, &artwork.primary, None);
        }

        wav_file.set_id3v2(id3v2);
        file.rewind()?;
        wav_file.save_to(file, write_options(config))?;

        Ok(())
    }
}

// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fs::File;

use lofty::config::{ParseOptions, WriteOptions};

use tagforge_core::{ContainerFormat, EmbeddedPicture, TagField, TagSet};

use crate::{
    Error, Result,
    io::export::{ExportConfig, Id3v2Version},
    util::artwork::NormalizedArtwork,
};

pub(crate) mod aiff;

pub(crate) mod ape;

pub mod asf;

pub(crate) mod flac;

pub(crate) mod id3v2;

pub(crate) mod mp4;

pub(crate) mod mpeg;

pub(crate) mod ogg;

pub(crate) mod opus;

pub(crate) mod vorbis;

pub(crate) mod wav;

/// Year and date are stored in a single native field.
pub(crate) const SHARED_DATE_SLOT: &[(TagField, TagField)] = &[(TagField::Year, TagField::Date)];

/// Reading and writing of tags for a single container format.
///
/// Implementations operate on an opened file and are stateless.
pub(crate) trait FormatStrategy: Sync {
    fn format(&self) -> ContainerFormat;

    /// Read the unified tags.
    ///
    /// A missing tag structure results in an empty [`TagSet`].
    fn read(&self, file: &mut File) -> Result<TagSet>;

    /// Extract the front cover or the first embedded picture.
    fn read_picture(&self, _file: &mut File) -> Result<Option<EmbeddedPicture>> {
        Ok(None)
    }

    /// Pairs of fields that are written into the same native field.
    ///
    /// Both fields are read with the same value.
    fn shared_slots(&self) -> &'static [(TagField, TagField)] {
        &[]
    }

    /// Replace the tags of a file with the merged tags.
    ///
    /// The file must be opened for both reading and writing.
    fn write(
        &self,
        _file: &mut File,
        _tags: &TagSet,
        _artwork: Option<&NormalizedArtwork>,
        _config: &ExportConfig,
    ) -> Result<()> {
        Err(Error::UnsupportedFormat(self.format()))
    }
}

#[must_use]
pub(crate) fn strategy(format: ContainerFormat) -> &'static dyn FormatStrategy {
    match format {
        ContainerFormat::Mp3 => &mpeg::MpegStrategy,
        ContainerFormat::Flac => &flac::FlacStrategy,
        ContainerFormat::Wav => &wav::WavStrategy,
        ContainerFormat::Mp4 => &mp4::Mp4Strategy,
        ContainerFormat::Ogg => &ogg::OggStrategy,
        ContainerFormat::Opus => &opus::OpusStrategy,
        ContainerFormat::Asf => &asf::AsfStrategy,
        ContainerFormat::Aiff => &aiff::AiffStrategy,
        ContainerFormat::Ape => &ape::ApeStrategy::Ape,
        ContainerFormat::Mpc => &ape::ApeStrategy::Mpc,
    }
}

pub(crate) fn parse_options() -> ParseOptions {
    // Audio properties are not needed
    ParseOptions::new().read_properties(false)
}

pub(crate) fn write_options(config: &ExportConfig) -> WriteOptions {
    WriteOptions::default().use_id3v23(config.id3v2_version == Id3v2Version::V3)
}

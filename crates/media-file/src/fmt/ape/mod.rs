// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fs::File;

use lofty::{
    ape::{ApeFile, ApeItem, ApeTag},
    file::AudioFile,
    musepack::MpcFile,
    tag::ItemValue,
};

use tagforge_core::{ContainerFormat, EmbeddedPicture, TagSet};

use super::{FormatStrategy, parse_options};
use crate::{Result, util::artwork::guess_media_type};

/// Binary item with the front cover, prefixed by a NUL-terminated file name.
const FRONT_COVER_KEY: &str = "Cover Art (Front)";

/// Read-only access to APE tags of Monkey's Audio and Musepack files.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ApeStrategy {
    Ape,
    Mpc,
}

impl ApeStrategy {
    fn read_tag(self, file: &mut File) -> Result<Option<ApeTag>> {
        let tag = match self {
            Self::Ape => {
                let mut ape_file = <ApeFile as AudioFile>::read_from(file, parse_options())?;
                ape_file.ape_mut().map(std::mem::take)
            }
            Self::Mpc => {
                let mut mpc_file = <MpcFile as AudioFile>::read_from(file, parse_options())?;
                mpc_file.ape_mut().map(std::mem::take)
            }
        };
        Ok(tag)
    }
}

fn item_text(item: &ApeItem) -> Option<&str> {
    match item.value() {
        ItemValue::Text(text) | ItemValue::Locator(text) => Some(text.as_str()),
        ItemValue::Binary(_) => None,
    }
}

#[must_use]
pub(crate) fn import_native(tag: &ApeTag) -> TagSet {
    let mut tags = TagSet::new();
    for item in tag.into_iter() {
        if item.key().eq_ignore_ascii_case(FRONT_COVER_KEY) {
            tags.has_album_art = true;
        }
        if let Some(value) = item_text(item) {
            tags.native
                .entry(item.key().to_lowercase())
                .or_insert_with(|| value.to_owned());
        }
    }
    tags
}

#[must_use]
pub(crate) fn find_cover_picture(tag: &ApeTag) -> Option<EmbeddedPicture> {
    let item = tag
        .into_iter()
        .find(|item| item.key().eq_ignore_ascii_case(FRONT_COVER_KEY))?;
    let ItemValue::Binary(binary) = item.value() else {
        return None;
    };
    let data_start = binary.iter().position(|byte| *byte == 0).map_or(0, |pos| pos + 1);
    let data = binary[data_start..].to_vec();
    if data.is_empty() {
        return None;
    }
    let media_type = guess_media_type(&data);
    Some(EmbeddedPicture { data, media_type })
}

impl FormatStrategy for ApeStrategy {
    fn format(&self) -> ContainerFormat {
        match self {
            Self::Ape => ContainerFormat::Ape,
            Self::Mpc => ContainerFormat::Mpc,
        }
    }

    fn read(&self, file: &mut File) -> Result<TagSet> {
        let Some(tag) = self.read_tag(file)? else {
            log::debug!("No APE tag found");
            return Ok(TagSet::new());
        };
        Ok(import_native(&tag))
    }

    fn read_picture(&self, file: &mut File) -> Result<Option<EmbeddedPicture>> {
        Ok(self.read_tag(file)?.as_ref().and_then(find_cover_picture))
    }
}

#[cfg(test)]
mod tests;

// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{fs::File, path::Path};

use tagforge_core::{ContainerFormat, EmbeddedPicture, TagSet};

use crate::{Result, fmt::strategy};

/// Read the unified tags of a file.
///
/// The format is detected from the file extension. The file is
/// never modified, even if it does not contain any tags.
pub fn read_tags(path: &Path) -> Result<TagSet> {
    let format = ContainerFormat::from_path(path);
    log::info!(
        "Reading {format} tags from file {path}",
        path = path.display()
    );
    let mut file = File::open(path)?;
    let mut tags = strategy(format).read(&mut file)?;
    tags.file_type = Some(format);
    log::debug!(
        "Read {num_fields} field(s) and {num_native} native tag(s) from file {path}",
        num_fields = tags.fields().count(),
        num_native = tags.native.len(),
        path = path.display()
    );
    Ok(tags)
}

/// Load the front cover or otherwise the first embedded picture.
///
/// Returns `None` if the file contains no pictures or if the
/// format does not support embedded pictures.
pub fn extract_album_art(path: &Path) -> Result<Option<EmbeddedPicture>> {
    let format = ContainerFormat::from_path(path);
    let mut file = File::open(path)?;
    let picture = strategy(format).read_picture(&mut file)?;
    if let Some(picture) = &picture {
        log::debug!(
            "Found embedded picture {picture:?} in file {path}",
            path = path.display()
        );
    }
    Ok(picture)
}

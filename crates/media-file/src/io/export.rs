// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{
    fs::{self, File},
    io::Seek as _,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use tagforge_core::{ContainerFormat, TagField, TagSet};

use super::import::read_tags;
use crate::{
    Error, Result,
    fmt::strategy,
    util::artwork::{ArtworkConfig, normalize_picture},
};

/// Prefix of temporary files in the target directory.
///
/// Files with this prefix may be left behind if a process
/// is terminated during an export.
pub const TEMP_FILE_PREFIX: &str = ".tagforge-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Id3v2Version {
    /// Most compatible
    #[default]
    V3,
    V4,
}

/// A copy of the lyrics with its own language and description.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LyricsCopy {
    /// ISO 639-2 language code
    pub language: [u8; 3],
    pub description: String,
}

impl LyricsCopy {
    #[must_use]
    pub fn new(language: [u8; 3], description: impl Into<String>) -> Self {
        Self {
            language,
            description: description.into(),
        }
    }
}

/// How lyrics are written into ID3v2 tags.
///
/// Each copy results in a separate `USLT` frame with identical text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct LyricsConfig {
    pub copies: Vec<LyricsCopy>,
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            copies: vec![
                LyricsCopy::new(*b"eng", ""),
                LyricsCopy::new(*b"ara", "Arabic"),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ExportConfig {
    pub artwork: ArtworkConfig,
    pub lyrics: LyricsConfig,
    pub id3v2_version: Id3v2Version,
}

/// A temporary copy of a file with updated tags.
///
/// The target file is only replaced by [`PreparedExport::commit()`].
/// Dropping the prepared export deletes the temporary copy and leaves
/// the target file untouched.
#[derive(Debug)]
pub struct PreparedExport {
    temp_file: NamedTempFile,
    target_path: PathBuf,
    tags: TagSet,
}

impl PreparedExport {
    /// The path of the temporary copy.
    #[must_use]
    pub fn temp_path(&self) -> &Path {
        self.temp_file.path()
    }

    #[must_use]
    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    /// The merged tags that have been written.
    #[must_use]
    pub const fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Atomically replace the target file with the temporary copy.
    pub fn commit(self) -> Result<TagSet> {
        let Self {
            temp_file,
            target_path,
            tags,
        } = self;
        // On failure the temporary file is deleted when dropping the error
        temp_file
            .persist(&target_path)
            .map_err(|err| Error::Io(err.error))?;
        log::info!("Replaced file {path}", path = target_path.display());
        Ok(tags)
    }
}

/// Values for fields that share a native field with an overridden field.
///
/// Otherwise a stale value of the sibling field might replace the override.
fn shared_slot_overrides(
    overrides: &TagSet,
    shared_slots: &[(TagField, TagField)],
) -> Vec<(TagField, String)> {
    shared_slots
        .iter()
        .filter_map(|(first, second)| {
            match (overrides.get(*first), overrides.get(*second)) {
                (Some(value), None) => Some((*second, value.to_owned())),
                (None, Some(value)) => Some((*first, value.to_owned())),
                _ => None,
            }
        })
        .collect()
}

fn temp_file_dir(target_path: &Path) -> &Path {
    target_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Write the merged tags into a temporary copy of the source file.
///
/// Existing tags are read and overridden field by field. The copy
/// is created next to the target, i.e. `dest_path` or the source
/// file itself.
pub fn prepare_export(
    path: &Path,
    overrides: TagSet,
    dest_path: Option<&Path>,
    config: &ExportConfig,
) -> Result<PreparedExport> {
    let format = ContainerFormat::from_path(path);
    let strategy = strategy(format);
    if !format.is_writable() {
        log::warn!(
            "Cannot write tags into {format} file {path}",
            path = path.display()
        );
        return Err(Error::UnsupportedFormat(format));
    }
    let target_path = dest_path.unwrap_or(path).to_path_buf();

    let mut tags = match read_tags(path) {
        Ok(tags) => tags,
        Err(err) => {
            log::warn!(
                "Failed to read existing tags from file {path}: {err}",
                path = path.display()
            );
            TagSet::new()
        }
    };
    let shared_slot_values = shared_slot_overrides(&overrides, strategy.shared_slots());
    tags.merge(overrides);
    tags.extend(shared_slot_values);

    let artwork = tags
        .picture
        .as_ref()
        .filter(|picture| !picture.is_empty())
        .map(|picture| normalize_picture(picture, &config.artwork))
        .transpose()?;

    let mut source_file = File::open(path)?;
    let permissions = source_file.metadata()?.permissions();
    let mut temp_file = tempfile::Builder::new()
        .prefix(TEMP_FILE_PREFIX)
        .tempfile_in(temp_file_dir(&target_path))?;
    std::io::copy(&mut source_file, temp_file.as_file_mut())?;
    temp_file.rewind()?;

    if let Err(err) =
        strategy.write(temp_file.as_file_mut(), &tags, artwork.as_ref(), config)
    {
        log::error!(
            "Failed to write {format} tags for {path}: {err}",
            path = target_path.display()
        );
        return Err(err);
    }
    temp_file.as_file().sync_all()?;
    fs::set_permissions(temp_file.path(), permissions)?;

    log::info!(
        "Prepared {format} file {temp_path} with updated tags for {path}",
        temp_path = temp_file.path().display(),
        path = target_path.display()
    );
    Ok(PreparedExport {
        temp_file,
        target_path,
        tags,
    })
}

/// Merge the given tags into the tags of a file.
///
/// The target file is replaced atomically. It is left untouched
/// on failure.
pub fn write_tags(
    path: &Path,
    overrides: TagSet,
    dest_path: Option<&Path>,
    config: &ExportConfig,
) -> Result<TagSet> {
    prepare_export(path, overrides, dest_path, config)?.commit()
}

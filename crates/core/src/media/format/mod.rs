// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{ffi::OsStr, path::Path};

/// Audio container formats with a known tag layout.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ContainerFormat {
    Mp3,
    Flac,
    Wav,
    Mp4,
    Ogg,
    Opus,
    Asf,
    Aiff,
    Ape,
    Mpc,
}

impl ContainerFormat {
    /// Used for unknown or missing file extensions.
    pub const FALLBACK: Self = Self::Mp3;

    /// Detect the container format from the file extension.
    ///
    /// The extension is matched case-insensitively. Paths
    /// without a recognized extension are treated as MP3.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(OsStr::to_str)
            .and_then(Self::from_extension)
            .unwrap_or_else(|| {
                log::debug!(
                    "Unrecognized file extension of {path}, assuming {fallback}",
                    path = path.display(),
                    fallback = Self::FALLBACK,
                );
                Self::FALLBACK
            })
    }

    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        let format = match ext.to_ascii_lowercase().as_str() {
            "mp3" => Self::Mp3,
            "flac" => Self::Flac,
            "wav" => Self::Wav,
            "m4a" | "mp4" | "aac" => Self::Mp4,
            "ogg" => Self::Ogg,
            "opus" => Self::Opus,
            "wma" | "asf" => Self::Asf,
            "aiff" => Self::Aiff,
            "ape" => Self::Ape,
            "mpc" => Self::Mpc,
            _ => return None,
        };
        Some(format)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Formats with APE tags are read-only.
    #[must_use]
    pub const fn is_writable(self) -> bool {
        !matches!(self, Self::Ape | Self::Mpc)
    }
}

#[cfg(test)]
mod tests;

// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::PathBuf;

use mime::Mime;

/// Album art supplied by a caller.
#[derive(Clone, PartialEq, Eq)]
pub enum Picture {
    /// Path of an image file that is read when writing tags.
    FilePath(PathBuf),

    /// Encoded image data.
    RawBytes(Vec<u8>),
}

impl Picture {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::FilePath(path) => path.as_os_str().is_empty(),
            Self::RawBytes(data) => data.is_empty(),
        }
    }
}

// Avoid dumping image data into log messages.
impl std::fmt::Debug for Picture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FilePath(path) => f.debug_tuple("FilePath").field(path).finish(),
            Self::RawBytes(data) => write!(f, "RawBytes({} bytes)", data.len()),
        }
    }
}

impl From<PathBuf> for Picture {
    fn from(from: PathBuf) -> Self {
        Self::FilePath(from)
    }
}

impl From<Vec<u8>> for Picture {
    fn from(from: Vec<u8>) -> Self {
        Self::RawBytes(from)
    }
}

/// Image data ready to be embedded into or extracted from a file.
#[derive(Clone, PartialEq, Eq)]
pub struct EmbeddedPicture {
    pub data: Vec<u8>,
    pub media_type: Mime,
}

impl std::fmt::Debug for EmbeddedPicture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddedPicture")
            .field("data", &format_args!("{} bytes", self.data.len()))
            .field("media_type", &self.media_type)
            .finish()
    }
}

// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Unified audio tag normalization.
//!
//! Reads and writes a single flat vocabulary of tag fields across
//! ID3v2, Vorbis comments, MP4 atoms, ASF objects and APE tags.

pub use tagforge_core::*;

#[cfg(feature = "media-file")]
pub mod media_file {
    pub use tagforge_media_file::*;
}

pub mod prelude {
    pub use tagforge_core::prelude::*;

    #[cfg(feature = "media-file")]
    pub use tagforge_media_file::prelude::*;
}

// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

/// Semantic field names of the unified tag vocabulary.
///
/// The string representation of each field is its `snake_case` name,
/// e.g. [`TagField::AlbumArtist`] is `"album_artist"`. All valid names
/// can be enumerated with [`strum::IntoEnumIterator`].
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum TagField {
    Title,
    Artist,
    Album,
    AlbumArtist,
    Year,
    Date,
    Genre,
    Composer,
    Conductor,
    Arranger,
    Comment,
    Track,
    DiscNumber,
    DiscTotal,
    Bpm,
    Compilation,
    Copyright,
    EncodedBy,
    Publisher,
    Isrc,
    Language,
    Length,
    MediaType,
    Mood,
    OriginalArtist,
    OriginalAlbum,
    OriginalDate,
    Lyrics,
    /// Embedded album art.
    ///
    /// Carried by [`super::TagSet::picture`] instead of a text value.
    Picture,
    Subtitle,
    Website,
}

impl TagField {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Whether the field is stored as text.
    #[must_use]
    pub const fn is_text(self) -> bool {
        !matches!(self, Self::Picture)
    }
}

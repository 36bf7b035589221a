// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{collections::BTreeMap, path::PathBuf};

use crate::media::{artwork::Picture, format::ContainerFormat};

mod field;
pub use self::field::TagField;

/// Unified, format-independent set of tag values.
///
/// Absent fields are omitted. An empty string is a present value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    fields: BTreeMap<TagField, String>,

    /// Raw entries that are not mapped onto the unified vocabulary.
    ///
    /// Keys are lowercase. Populated when reading formats without a
    /// semantic mapping and by [`TagSet::insert_str`] for unknown keys.
    /// Ignored when writing.
    pub native: BTreeMap<String, String>,

    pub picture: Option<Picture>,

    /// Derived on read, never written.
    pub has_album_art: bool,

    /// Derived on read, never written.
    pub file_type: Option<ContainerFormat>,
}

impl TagSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks for the absence of both text fields and picture.
    ///
    /// Informational properties and native entries are not considered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.picture.is_none()
    }

    #[must_use]
    pub fn get(&self, field: TagField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: TagField) -> bool {
        if field == TagField::Picture {
            return self.picture.is_some();
        }
        self.fields.contains_key(&field)
    }

    /// Set a text field, returning the previous value.
    ///
    /// A value for [`TagField::Picture`] is interpreted as the
    /// path of an image file.
    pub fn set(&mut self, field: TagField, value: impl Into<String>) -> Option<String> {
        let value = value.into();
        if field == TagField::Picture {
            self.picture = Some(Picture::FilePath(PathBuf::from(value)));
            return None;
        }
        self.fields.insert(field, value)
    }

    pub fn remove(&mut self, field: TagField) -> Option<String> {
        if field == TagField::Picture {
            self.picture = None;
            return None;
        }
        self.fields.remove(&field)
    }

    /// Insert a value for a string key.
    ///
    /// Keys outside of the unified vocabulary are stored as
    /// native entries.
    pub fn insert_str(&mut self, key: &str, value: impl Into<String>) {
        if let Ok(field) = key.parse::<TagField>() {
            self.set(field, value);
        } else {
            self.native.insert(key.to_lowercase(), value.into());
        }
    }

    /// Text fields in vocabulary order.
    pub fn fields(&self) -> impl Iterator<Item = (TagField, &str)> + '_ {
        self.fields
            .iter()
            .map(|(field, value)| (*field, value.as_str()))
    }

    /// Overwrite all values that are present in `overrides`.
    ///
    /// Values missing from `overrides` are preserved. The
    /// informational properties are not affected.
    pub fn merge(&mut self, overrides: TagSet) {
        let TagSet {
            fields,
            native,
            picture,
            has_album_art: _,
            file_type: _,
        } = overrides;
        self.fields.extend(fields);
        self.native.extend(native);
        if picture.is_some() {
            self.picture = picture;
        }
    }

    /// Overwrite values with the non-empty values of a template.
    ///
    /// Unlike [`TagSet::merge`] empty template values never
    /// replace an existing value.
    pub fn apply_template(&mut self, template: &TagSet) {
        for (field, value) in template.fields() {
            if value.trim().is_empty() {
                continue;
            }
            self.fields.insert(field, value.to_owned());
        }
        if let Some(picture) = &template.picture
            && !picture.is_empty()
        {
            self.picture = Some(picture.clone());
        }
    }
}

impl FromIterator<(TagField, String)> for TagSet {
    fn from_iter<T: IntoIterator<Item = (TagField, String)>>(iter: T) -> Self {
        let mut tags = Self::new();
        tags.extend(iter);
        tags
    }
}

impl Extend<(TagField, String)> for TagSet {
    fn extend<T: IntoIterator<Item = (TagField, String)>>(&mut self, iter: T) {
        for (field, value) in iter {
            self.set(field, value);
        }
    }
}

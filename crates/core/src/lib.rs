// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

#![warn(rust_2018_idioms)]
#![warn(missing_debug_implementations)]
#![warn(unreachable_pub)]
#![warn(unsafe_code)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(clippy::pedantic)]
// Additional restrictions
#![warn(clippy::clone_on_ref_ptr)]
#![warn(clippy::self_named_module_files)]
// Repetitions of module/type names occur frequently when using many
// modules for keeping the size of the source files handy. Often
// types have the same name as their parent module.
#![allow(clippy::module_name_repetitions)]
// Repeating the type name in `Default::default()` expressions is not needed
// as long as the context is obvious.
#![allow(clippy::default_trait_access)]
// Using wildcard imports consciously is acceptable.
#![allow(clippy::wildcard_imports)]
// TODO: Add missing docs
#![allow(clippy::missing_errors_doc)]

pub mod media;
pub mod tag;

pub use self::{
    media::{
        artwork::{EmbeddedPicture, Picture},
        format::ContainerFormat,
    },
    tag::{TagField, TagSet},
};

pub mod prelude {
    pub use strum::IntoEnumIterator as _;

    pub use crate::{ContainerFormat, EmbeddedPicture, Picture, TagField, TagSet};
}

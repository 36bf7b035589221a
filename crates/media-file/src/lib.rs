// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

// Opt-in for allowed-by-default lints (in alphabetical order)
// See also: <https://doc.rust-lang.org/rustc/lints>
#![warn(future_incompatible)]
#![warn(let_underscore)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(unsafe_code)]
#![warn(unused)]
// Clippy lints
#![warn(clippy::pedantic)]
// Additional restrictions
#![warn(clippy::clone_on_ref_ptr)]
#![warn(clippy::self_named_module_files)]
// Repetitions of module/type names occur frequently when using many
// modules for keeping the size of the source files handy. Often
// types have the same name as their parent module.
#![allow(clippy::module_name_repetitions)]
// Repeating the type name in `..Default::default()` expressions
// is not needed since the context is obvious.
#![allow(clippy::default_trait_access)]
// Using wildcard imports consciously is acceptable.
#![allow(clippy::wildcard_imports)]
// Importing all enum variants into a narrow, local scope is acceptable.
#![allow(clippy::enum_glob_use)]
// TODO: Add missing docs
#![allow(clippy::missing_errors_doc)]

pub mod fmt;
pub mod io;
pub mod util;

use std::{
    io::{Error as IoError, ErrorKind as IoErrorKind},
    result::Result as StdResult,
};

use image::ImageError;
use lofty::error::{ErrorKind as LoftyErrorKind, LoftyError};
use thiserror::Error;

use tagforge_core::ContainerFormat;

use self::fmt::asf::object::AsfError;

#[derive(Error, Debug)]
pub enum Error {
    /// The container is structurally unreadable.
    #[error("failed to parse file: {0}")]
    Parse(anyhow::Error),

    #[error("writing tags into {0} files is not supported")]
    UnsupportedFormat(ContainerFormat),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = StdResult<T, Error>;

impl From<LoftyError> for Error {
    fn from(err: LoftyError) -> Self {
        match err.kind() {
            LoftyErrorKind::Io(io_err) => {
                // The kind only borrows the I/O error
                Self::Io(IoError::new(io_err.kind(), err.to_string()))
            }
            _ => Self::Parse(err.into()),
        }
    }
}

impl From<ImageError> for Error {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::IoError(err) => Self::Io(err),
            _ => Self::Other(err.into()),
        }
    }
}

impl From<AsfError> for Error {
    fn from(err: AsfError) -> Self {
        match err {
            AsfError::Io(err) if err.kind() == IoErrorKind::UnexpectedEof => Self::Parse(err.into()),
            AsfError::Io(err) => Self::Io(err),
            AsfError::ValueTooLong(_) => Self::Other(err.into()),
            AsfError::NotAsf | AsfError::Malformed(_) => Self::Parse(err.into()),
        }
    }
}


pub mod prelude {
    pub use super::{
        Error, Result,
        io::{
            export::{ExportConfig, PreparedExport, prepare_export, write_tags},
            import::{extract_album_art, read_tags},
        },
    };
}

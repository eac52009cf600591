// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Error types of the preprocessor.

use std::{fmt, io, path::PathBuf};

/// Errors that stop a preprocessor run.
#[derive(Debug)]
pub enum GenError {
    /// Reading or writing a file or directory failed
    Io { path: PathBuf, source: io::Error },
    /// A test source file is not valid Rust
    Parse { path: PathBuf, source: syn::Error },
    /// The file name pattern does not compile
    Pattern(regex::Error),
}

impl GenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        GenError::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenError::Io { path, source } => write!(f, "{}: {source}", path.display()),
            GenError::Parse { path, source } => {
                write!(f, "{}: failed to parse: {source}", path.display())
            }
            GenError::Pattern(err) => write!(f, "invalid file pattern: {err}"),
        }
    }
}

impl std::error::Error for GenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenError::Io { source, .. } => Some(source),
            GenError::Parse { source, .. } => Some(source),
            GenError::Pattern(err) => Some(err),
        }
    }
}

impl From<regex::Error> for GenError {
    fn from(err: regex::Error) -> Self {
        GenError::Pattern(err)
    }
}

pub type Result<T> = core::result::Result<T, GenError>;

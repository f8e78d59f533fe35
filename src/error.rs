// SPDX-License-Identifier: GPL-3.0-only

use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Not a 1C:Enterprise launcher entry: {reason}")]
    Parse { reason: String },
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error("File already exists: {}", .0.display())]
    Conflict(PathBuf),
    #[error("Entry has no backing file")]
    NoPath,
    #[error("Entry is read-only: {}", .0.display())]
    ReadOnly(PathBuf),
    #[error("No entry selected")]
    NoSelection,
    #[error("No entry loaded for {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn parse(reason: impl Into<String>) -> Self {
        Error::Parse {
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Error::Io {
            path: path.to_owned(),
            source,
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io { .. } | Error::NoPath)
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }
}

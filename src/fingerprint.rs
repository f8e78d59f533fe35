// SPDX-License-Identifier: GPL-3.0-only

use std::fs::Metadata;
use std::time::SystemTime;

/// Content digest used only to tell whether something changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint(blake3::Hash);

impl Fingerprint {
    pub fn of_text(text: &str) -> Self {
        Self(blake3::hash(text.as_bytes()))
    }
}

/// Size and modification time of a backing file as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStamp {
    len: u64,
    modified: Option<SystemTime>,
}

impl FileStamp {
    pub fn of(meta: &Metadata) -> Self {
        Self {
            len: meta.len(),
            modified: meta.modified().ok(),
        }
    }
}

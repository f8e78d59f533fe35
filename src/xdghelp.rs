// SPDX-License-Identifier: GPL-3.0-only

use crate::config::Config;
use crate::entry::{self, DesktopEntry};
use crate::error::Result;
use log::{debug, info};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// `$XDG_DATA_HOME/applications`, or `~/.local/share/applications`.
pub fn user_applications_dir() -> Option<PathBuf> {
    if let Some(home) = env::var_os("XDG_DATA_HOME").filter(|h| !h.is_empty()) {
        return Some(PathBuf::from(home).join("applications"));
    }
    dirs::home_dir().map(|h| h.join(".local").join("share").join("applications"))
}

/// Scan the configured directories for launcher entries, system-wide first.
///
/// Files without the launcher shape are skipped; files that look like
/// launchers but cannot be loaded are reported in place.
pub fn find_desktop_files(config: &Config) -> Vec<Result<DesktopEntry>> {
    let mut found = Vec::new();
    for dir in config.search_dirs() {
        scan_dir(config, dir, &mut found);
    }
    info!("Found {} launcher entries", found.len());
    found
}

fn scan_dir(config: &Config, root: &Path, found: &mut Vec<Result<DesktopEntry>>) {
    let Ok(entries) = fs::read_dir(root) else {
        debug!("Skipping missing directory {}", root.display());
        return;
    };

    for dir_entry in entries.flatten() {
        let path = dir_entry.path();
        if !path.is_file() || !config.is_candidate_name(&path) {
            continue;
        }

        match entry::has_content(&path) {
            Ok(true) => found.push(DesktopEntry::open(path)),
            Ok(false) => debug!("{} is not a launcher entry", path.display()),
            Err(e) => found.push(Err(e)),
        }
    }
}

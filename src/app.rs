// SPDX-License-Identifier: GPL-3.0-only

use crate::config::Config;
use crate::entry::DesktopEntry;
use crate::error::{Error, Result};
use crate::xdghelp::find_desktop_files;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::thread::JoinHandle;

/// The application model stores the discovered launchers and the current
/// selection, and carries out the actions a front end offers on them.
pub struct AppModel {
    config: Config,
    /// Entries in discovery order, unique by path.
    entries: Vec<DesktopEntry>,
    /// Launchers that looked right but failed to load.
    errors: Vec<Error>,
    current: Option<usize>,
}

impl AppModel {
    pub fn load(config: Config) -> Self {
        let mut app = Self {
            config,
            entries: Vec::new(),
            errors: Vec::new(),
            current: None,
        };
        app.rescan();
        app
    }

    /// Rediscover launchers, keeping the selection when its file is still there.
    pub fn rescan(&mut self) {
        let selected = self.current_path().map(Path::to_path_buf);
        self.entries.clear();
        self.errors.clear();

        for found in find_desktop_files(&self.config) {
            match found {
                Ok(entry) => self.entries.push(entry),
                Err(e) => {
                    warn!("{e}");
                    self.errors.push(e);
                }
            }
        }

        self.current = selected
            .and_then(|p| self.position(&p))
            .or(if self.entries.is_empty() { None } else { Some(0) });
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn entries(&self) -> &[DesktopEntry] {
        &self.entries
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().filter_map(DesktopEntry::path)
    }

    fn position(&self, path: &Path) -> Option<usize> {
        self.entries.iter().position(|e| e.path() == Some(path))
    }

    pub fn get_mut(&mut self, path: &Path) -> Option<&mut DesktopEntry> {
        let idx = self.position(path)?;
        self.entries.get_mut(idx)
    }

    pub fn select(&mut self, path: &Path) -> Result<()> {
        let idx = self
            .position(path)
            .ok_or_else(|| Error::NotFound(path.to_owned()))?;
        self.current = Some(idx);
        Ok(())
    }

    /// Take over an entry opened elsewhere and select it.
    pub fn adopt(&mut self, entry: DesktopEntry) -> &mut DesktopEntry {
        let idx = match entry.path().and_then(|p| self.position(p)) {
            Some(idx) => {
                self.entries[idx] = entry;
                idx
            }
            None => {
                self.entries.push(entry);
                self.entries.len() - 1
            }
        };
        self.current = Some(idx);
        &mut self.entries[idx]
    }

    pub fn current(&self) -> Option<&DesktopEntry> {
        self.current.and_then(|i| self.entries.get(i))
    }

    pub fn current_mut(&mut self) -> Option<&mut DesktopEntry> {
        self.current.and_then(|i| self.entries.get_mut(i))
    }

    fn current_path(&self) -> Option<&Path> {
        self.current().and_then(DesktopEntry::path)
    }

    fn selected(&mut self) -> Result<&mut DesktopEntry> {
        self.current_mut().ok_or(Error::NoSelection)
    }

    pub fn save_current(&mut self) -> Result<bool> {
        self.selected()?.save()
    }

    pub fn execute_current(&mut self) -> Result<JoinHandle<Option<ExitStatus>>> {
        self.selected()?.execute()
    }

    /// Create `<user dir>/1cestart<name>.desktop` from the current entry and
    /// select it. An existing file is a conflict; the caller should ask for
    /// another name.
    pub fn clone_current(&mut self, name: &str) -> Result<&mut DesktopEntry> {
        let target = self.config.new_entry_path(name)?;
        if target.exists() {
            return Err(Error::Conflict(target));
        }
        if let Some(dir) = target.parent() {
            fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        }

        let copy = self.selected()?.clone_to(&target)?;
        self.entries.push(copy);
        let idx = self.entries.len() - 1;
        self.current = Some(idx);
        Ok(&mut self.entries[idx])
    }

    /// Delete the current launcher and select the one that took its place.
    pub fn remove_current(&mut self) -> Result<PathBuf> {
        let idx = self.current.ok_or(Error::NoSelection)?;
        let entry = &mut self.entries[idx];
        let path = entry.path().ok_or(Error::NoPath)?.to_owned();
        entry.remove()?;
        self.entries.remove(idx);

        self.current = if self.entries.is_empty() {
            None
        } else {
            Some(idx.min(self.entries.len() - 1))
        };
        Ok(path)
    }

    /// Hand the current launcher file to the desktop's default editor.
    pub fn open_current_in_editor(&mut self) -> Result<()> {
        let path = self
            .selected()?
            .path()
            .ok_or(Error::NoPath)?
            .to_owned();
        open::that(&path).map_err(|e| Error::io(&path, e))?;
        info!("Opened {}", path.display());
        Ok(())
    }
}

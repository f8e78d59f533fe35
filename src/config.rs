// SPDX-License-Identifier: GPL-3.0-only

use crate::error::{Error, Result};
use crate::xdghelp;
use std::env;
use std::path::{Path, PathBuf};

pub const SYSTEM_DIR_VAR: &str = "CESTART_EDIT_SYSTEM_DIR";
pub const USER_DIR_VAR: &str = "CESTART_EDIT_USER_DIR";

/// Where launchers are looked for and how they are recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// System-wide applications directory, scanned first.
    pub system_dir: PathBuf,
    /// Per-user applications directory; clones are created here.
    pub user_dir: Option<PathBuf>,
    pub file_prefix: String,
    /// File extension without the dot.
    pub file_suffix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            system_dir: PathBuf::from("/usr/share/applications"),
            user_dir: xdghelp::user_applications_dir(),
            file_prefix: "1cestart".to_owned(),
            file_suffix: "desktop".to_owned(),
        }
    }
}

impl Config {
    /// Defaults, with the directories overridable from the environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(dir) = env::var_os(SYSTEM_DIR_VAR) {
            config.system_dir = PathBuf::from(dir);
        }
        if let Some(dir) = env::var_os(USER_DIR_VAR) {
            config.user_dir = Some(PathBuf::from(dir));
        }
        config
    }

    pub fn with_dirs(system_dir: impl Into<PathBuf>, user_dir: impl Into<PathBuf>) -> Self {
        Self {
            system_dir: system_dir.into(),
            user_dir: Some(user_dir.into()),
            ..Self::default()
        }
    }

    /// Directories in scan order.
    pub fn search_dirs(&self) -> Vec<&Path> {
        let mut dirs = vec![self.system_dir.as_path()];
        dirs.extend(self.user_dir.as_deref());
        dirs
    }

    pub fn is_candidate_name(&self, path: &Path) -> bool {
        path.extension().and_then(|e| e.to_str()) == Some(self.file_suffix.as_str())
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(&self.file_prefix))
    }

    /// Path for a new launcher `<user dir>/<prefix><name>.<suffix>`.
    pub fn new_entry_path(&self, name: &str) -> Result<PathBuf> {
        let name = name.trim();
        if name.contains(['/', '\0']) {
            return Err(Error::InvalidValue(format!(
                "`{name}` is not a valid file name"
            )));
        }
        let dir = self.user_dir.as_ref().ok_or_else(|| {
            Error::InvalidValue("no user applications directory".to_owned())
        })?;
        Ok(dir.join(format!(
            "{}{name}.{}",
            self.file_prefix, self.file_suffix
        )))
    }
}

// SPDX-License-Identifier: GPL-3.0-only

//! Editing of 1C:Enterprise launcher `.desktop` entries.
//!
//! [`DesktopEntry`] keeps the typed launch settings and the raw file text in
//! step with each other; [`xdghelp::find_desktop_files`] finds the launchers
//! installed for the system and the current user; [`AppModel`] ties both
//! together for a front end.

pub mod app;
pub mod config;
pub mod entry;
pub mod error;
pub mod fingerprint;
pub mod template;
pub mod xdghelp;

pub use app::AppModel;
pub use config::Config;
pub use entry::DesktopEntry;
pub use error::{Error, Result};
pub use template::LaunchFields;

// SPDX-License-Identifier: GPL-3.0-only

use crate::error::{Error, Result};
use crate::fingerprint::{FileStamp, Fingerprint};
use crate::template::{self, LaunchFields};
use log::{debug, info, warn};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::thread::{self, JoinHandle};

/// Which side of the entry was edited last.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum SyncState {
    #[default]
    Clean,
    /// Typed fields changed; `raw_text` must be regenerated.
    FieldsDirty,
    /// `raw_text` was replaced; the fields must be re-derived.
    TextDirty,
}

/// One launcher `.desktop` file and its parsed state.
///
/// Every reading accessor reconciles first: an externally modified backing
/// file is reloaded, otherwise whichever representation was edited last is
/// propagated to the other one.
#[derive(Debug)]
pub struct DesktopEntry {
    path: Option<PathBuf>,
    fields: LaunchFields,
    raw_text: String,
    read_only: bool,
    sync: SyncState,
    file_stamp: Option<FileStamp>,
    saved: Option<Fingerprint>,
}

struct Loaded {
    text: String,
    fields: LaunchFields,
    stamp: FileStamp,
    read_only: bool,
}

impl Loaded {
    fn read(path: &Path) -> Result<Self> {
        let meta = fs::metadata(path).map_err(|e| Error::io(path, e))?;
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let fields = LaunchFields::parse(&text)?;
        Ok(Self {
            text,
            fields,
            stamp: FileStamp::of(&meta),
            read_only: !is_writable(path),
        })
    }
}

impl DesktopEntry {
    /// Load and parse the launcher at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let loaded = Loaded::read(&path)?;
        debug!("Loaded {}", path.display());
        let mut entry = Self::detached(String::new(), LaunchFields::default());
        entry.path = Some(path);
        entry.commit(loaded);
        Ok(entry)
    }

    /// A transient entry that exists only in memory until `save_as`.
    pub fn from_text(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let fields = LaunchFields::parse(&text)?;
        Ok(Self::detached(text, fields))
    }

    fn detached(raw_text: String, fields: LaunchFields) -> Self {
        Self {
            path: None,
            fields,
            raw_text,
            read_only: false,
            sync: SyncState::Clean,
            file_stamp: None,
            saved: None,
        }
    }

    fn commit(&mut self, loaded: Loaded) {
        self.saved = Some(Fingerprint::of_text(&loaded.text));
        self.raw_text = loaded.text;
        self.fields = loaded.fields;
        self.file_stamp = Some(loaded.stamp);
        self.read_only = loaded.read_only;
        self.sync = SyncState::Clean;
    }

    /// Bring the file, the raw text and the fields back into agreement.
    /// Calling it again without intervening changes does nothing.
    pub fn reconcile(&mut self) -> Result<()> {
        if let Some(path) = &self.path {
            let meta = fs::metadata(path).map_err(|e| Error::io(path, e))?;
            if self.file_stamp != Some(FileStamp::of(&meta)) {
                let loaded = Loaded::read(path)?;
                if self.sync != SyncState::Clean {
                    warn!(
                        "{} changed on disk, discarding unsaved edits",
                        path.display()
                    );
                }
                info!("Reloaded {}", path.display());
                self.commit(loaded);
                return Ok(());
            }
        }

        match self.sync {
            SyncState::Clean => {}
            SyncState::TextDirty => {
                self.fields = LaunchFields::parse(&self.raw_text)?;
                self.sync = SyncState::Clean;
            }
            SyncState::FieldsDirty => {
                self.raw_text = self.fields.render_into(&self.raw_text)?;
                self.sync = SyncState::Clean;
            }
        }
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn read_only(&self) -> bool {
        self.read_only
    }

    pub fn fields(&mut self) -> Result<&LaunchFields> {
        self.reconcile()?;
        Ok(&self.fields)
    }

    pub fn preload_libstdcxx(&mut self) -> Result<bool> {
        Ok(self.fields()?.preload_libstdcxx)
    }

    pub fn scale_enabled(&mut self) -> Result<bool> {
        Ok(self.fields()?.scale_enabled)
    }

    pub fn scale(&mut self) -> Result<u32> {
        Ok(self.fields()?.scale)
    }

    pub fn dpi_scale_enabled(&mut self) -> Result<bool> {
        Ok(self.fields()?.dpi_scale_enabled)
    }

    pub fn dpi_scale(&mut self) -> Result<f64> {
        Ok(self.fields()?.dpi_scale)
    }

    pub fn command(&mut self) -> Result<&str> {
        Ok(&self.fields()?.command)
    }

    pub fn name_ru(&mut self) -> Result<&str> {
        Ok(&self.fields()?.name_ru)
    }

    pub fn name_en(&mut self) -> Result<&str> {
        Ok(&self.fields()?.name_en)
    }

    /// The full `Exec=` value including enabled environment prefixes.
    pub fn exec_command(&mut self) -> Result<String> {
        Ok(self.fields()?.exec_line())
    }

    pub fn raw_text(&mut self) -> Result<&str> {
        self.reconcile()?;
        Ok(&self.raw_text)
    }

    /// What the raw text would be after rendering the current fields.
    pub fn render_text(&mut self) -> Result<String> {
        self.reconcile()?;
        self.fields.render_into(&self.raw_text)
    }

    /// Replace the whole text. A text that does not fit the launcher template
    /// is rejected and the entry is left as it was.
    pub fn set_raw_text(&mut self, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        self.reconcile()?;
        LaunchFields::parse(&text)?;
        if text != self.raw_text {
            self.raw_text = text;
            self.sync = SyncState::TextDirty;
        }
        Ok(())
    }

    /// Apply `edit` to a copy of the fields and keep it if it still renders.
    fn update(&mut self, edit: impl FnOnce(&mut LaunchFields)) -> Result<()> {
        self.reconcile()?;
        let mut fields = self.fields.clone();
        edit(&mut fields);
        fields.validate()?;
        if fields != self.fields {
            self.fields = fields;
            self.sync = SyncState::FieldsDirty;
        }
        Ok(())
    }

    pub fn set_fields(&mut self, fields: LaunchFields) -> Result<()> {
        self.update(|f| *f = fields)
    }

    pub fn set_preload_libstdcxx(&mut self, value: bool) -> Result<()> {
        self.update(|f| f.preload_libstdcxx = value)
    }

    pub fn set_scale_enabled(&mut self, value: bool) -> Result<()> {
        self.update(|f| f.scale_enabled = value)
    }

    pub fn set_scale(&mut self, value: u32) -> Result<()> {
        self.update(|f| f.scale = value)
    }

    pub fn set_dpi_scale_enabled(&mut self, value: bool) -> Result<()> {
        self.update(|f| f.dpi_scale_enabled = value)
    }

    pub fn set_dpi_scale(&mut self, value: f64) -> Result<()> {
        self.update(|f| f.dpi_scale = value)
    }

    pub fn set_command(&mut self, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        self.update(|f| f.command = value)
    }

    pub fn set_name_ru(&mut self, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        self.update(|f| f.name_ru = value)
    }

    pub fn set_name_en(&mut self, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        self.update(|f| f.name_en = value)
    }

    /// Write the raw text to the backing file unless it already holds the
    /// current state. Returns whether a write happened.
    pub fn save(&mut self) -> Result<bool> {
        let Some(path) = self.path.clone() else {
            return Err(Error::NoPath);
        };
        self.reconcile()?;

        let current = Fingerprint::of_text(&self.raw_text);
        if self.saved == Some(current) {
            return Ok(false);
        }

        fs::write(&path, &self.raw_text).map_err(|e| Error::io(&path, e))?;
        let meta = fs::metadata(&path).map_err(|e| Error::io(&path, e))?;
        self.file_stamp = Some(FileStamp::of(&meta));
        self.saved = Some(current);
        info!("Saved {}", path.display());
        Ok(true)
    }

    /// Write the entry to a new file and bind it to that path.
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        self.reconcile()?;
        write_new(&path, &self.raw_text)?;

        let meta = fs::metadata(&path).map_err(|e| Error::io(&path, e))?;
        self.file_stamp = Some(FileStamp::of(&meta));
        self.saved = Some(Fingerprint::of_text(&self.raw_text));
        self.read_only = false;
        info!("Saved new entry {}", path.display());
        self.path = Some(path);
        Ok(())
    }

    /// Copy this entry into a new file and open the copy.
    pub fn clone_to(&mut self, path: impl Into<PathBuf>) -> Result<DesktopEntry> {
        let path = path.into();
        self.reconcile()?;
        write_new(&path, &self.raw_text)?;
        info!("Created {}", path.display());
        DesktopEntry::open(path)
    }

    /// Delete the backing file. The entry should be dropped afterwards.
    pub fn remove(&mut self) -> Result<()> {
        let path = self.path.as_deref().ok_or(Error::NoPath)?;
        self.read_only = !is_writable(path);
        if self.read_only {
            return Err(Error::ReadOnly(path.to_owned()));
        }
        fs::remove_file(path).map_err(|e| Error::io(path, e))?;
        info!("Removed {}", path.display());
        Ok(())
    }

    /// Launch the rendered command through the shell without waiting for it.
    /// The child is reaped on a detached thread; its handle yields the exit
    /// status for callers that care.
    pub fn execute(&mut self) -> Result<JoinHandle<Option<ExitStatus>>> {
        let command = strip_field_codes(&self.exec_command()?);
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&command)
            .spawn()
            .map_err(|source| Error::Spawn {
                command: command.clone(),
                source,
            })?;
        let pid = child.id();
        info!("Launched `{command}` (pid {pid})");

        Ok(thread::spawn(move || match child.wait() {
            Ok(status) => {
                debug!("pid {pid} exited with {status}");
                Some(status)
            }
            Err(e) => {
                warn!("Failed to wait for pid {pid}: {e}");
                None
            }
        }))
    }
}

/// Content-shape test for a file on disk.
pub fn has_content(path: &Path) -> Result<bool> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(template::matches(&text))
}

fn is_writable(path: &Path) -> bool {
    OpenOptions::new().append(true).open(path).is_ok()
}

/// Create `path` with `contents`, refusing to overwrite. New launchers get
/// the executable bits.
fn write_new(path: &Path, contents: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => Error::Conflict(path.to_owned()),
            _ => Error::io(path, e),
        })?;
    file.write_all(contents.as_bytes())
        .map_err(|e| Error::io(path, e))?;

    let mut perms = file.metadata().map_err(|e| Error::io(path, e))?.permissions();
    perms.set_mode(perms.mode() | 0o755);
    fs::set_permissions(path, perms).map_err(|e| Error::io(path, e))?;
    Ok(())
}

/// Drop desktop-entry field codes (`%f`, `%U`, ...) and unescape `%%`.
pub fn strip_field_codes(exec: &str) -> String {
    let mut out = String::with_capacity(exec.len());
    let mut chars = exec.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('%') => {
                out.push('%');
                chars.next();
            }
            Some(code) if "fFuUdDnNickvm".contains(*code) => {
                chars.next();
            }
            _ => out.push('%'),
        }
    }
    out.trim_end().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ENTRY: &str = "# Created by the 1C installer
[Desktop Entry]
Version=1.0
Type=Application
Terminal=false
Exec=GDK_SCALE=2 /opt/1cv8/common/1cestart
Categories=Office;Finance;
Name[ru_RU]=1С:Предприятие
Name=1C:Enterprise
Icon=foo
";

    fn write_entry(dir: &TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_open_parses_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_entry(&dir, "1cestart.desktop", ENTRY);
        let mut entry = DesktopEntry::open(&path).unwrap();

        assert_eq!(entry.path(), Some(path.as_path()));
        assert!(!entry.read_only());
        assert!(!entry.preload_libstdcxx().unwrap());
        assert!(entry.scale_enabled().unwrap());
        assert_eq!(entry.scale().unwrap(), 2);
        assert!(!entry.dpi_scale_enabled().unwrap());
        assert_eq!(entry.dpi_scale().unwrap(), 1.0);
        assert_eq!(entry.command().unwrap(), "/opt/1cv8/common/1cestart");
        assert_eq!(entry.name_ru().unwrap(), "1С:Предприятие");
        assert_eq!(entry.name_en().unwrap(), "1C:Enterprise");
    }

    #[test]
    fn test_open_rejects_foreign_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_entry(&dir, "1cestart-bad.desktop", "[Desktop Entry]\nName=x\n");
        assert!(DesktopEntry::open(&path).unwrap_err().is_parse());
    }

    #[test]
    fn test_open_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DesktopEntry::open(dir.path().join("nope.desktop")).unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_round_trip_render_is_identity() {
        let mut entry = DesktopEntry::from_text(ENTRY).unwrap();
        assert_eq!(entry.render_text().unwrap(), ENTRY);
        assert_eq!(entry.raw_text().unwrap(), ENTRY);
    }

    #[test]
    fn test_command_edit_preserves_other_lines() {
        let mut entry = DesktopEntry::from_text(ENTRY).unwrap();
        entry.set_command("/opt/1cv8/x86_64/8.3.24/1cv8").unwrap();
        let text = entry.raw_text().unwrap();

        assert!(text.starts_with("# Created by the 1C installer\n[Desktop Entry]\n"));
        assert!(text.contains("\nIcon=foo\n"));
        assert!(text.contains("\nExec=GDK_SCALE=2 /opt/1cv8/x86_64/8.3.24/1cv8\n"));
        assert_eq!(
            text,
            ENTRY.replace(
                "/opt/1cv8/common/1cestart",
                "/opt/1cv8/x86_64/8.3.24/1cv8"
            )
        );
    }

    #[test]
    fn test_enable_all_prefixes() {
        let mut entry = DesktopEntry::from_text(ENTRY).unwrap();
        entry.set_preload_libstdcxx(true).unwrap();
        entry.set_dpi_scale_enabled(true).unwrap();
        entry.set_dpi_scale(1.25).unwrap();
        assert_eq!(
            entry.exec_command().unwrap(),
            "LD_PRELOAD=/usr/lib/libstdc++.so.6 GDK_SCALE=2 GDK_DPI_SCALE=1.25 /opt/1cv8/common/1cestart"
        );

        entry.set_scale_enabled(false).unwrap();
        assert!(entry.raw_text().unwrap().contains(
            "\nExec=LD_PRELOAD=/usr/lib/libstdc++.so.6 GDK_DPI_SCALE=1.25 /opt/1cv8/common/1cestart\n"
        ));
        // value survives while disabled
        assert_eq!(entry.scale().unwrap(), 2);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut entry = DesktopEntry::from_text(ENTRY).unwrap();
        entry.set_name_en("Enterprise").unwrap();
        entry.reconcile().unwrap();
        let first = entry.raw_text.clone();
        assert_eq!(entry.sync, SyncState::Clean);
        entry.reconcile().unwrap();
        assert_eq!(entry.raw_text, first);
        assert_eq!(entry.sync, SyncState::Clean);
    }

    #[test]
    fn test_unchanged_setter_keeps_entry_clean() {
        let mut entry = DesktopEntry::from_text(ENTRY).unwrap();
        entry.set_scale(2).unwrap();
        entry.set_command("/opt/1cv8/common/1cestart").unwrap();
        assert_eq!(entry.sync, SyncState::Clean);
    }

    #[test]
    fn test_raw_edit_updates_fields() {
        let mut entry = DesktopEntry::from_text(ENTRY).unwrap();
        entry
            .set_raw_text(ENTRY.replace("GDK_SCALE=2 ", "GDK_DPI_SCALE=1.5 "))
            .unwrap();
        assert!(!entry.scale_enabled().unwrap());
        assert_eq!(entry.scale().unwrap(), 1);
        assert!(entry.dpi_scale_enabled().unwrap());
        assert_eq!(entry.dpi_scale().unwrap(), 1.5);
    }

    #[test]
    fn test_raw_edit_mismatch_keeps_previous_state() {
        let mut entry = DesktopEntry::from_text(ENTRY).unwrap();
        entry.set_name_ru("Бухгалтерия").unwrap();
        let before = entry.fields().unwrap().clone();
        let text_before = entry.raw_text().unwrap().to_owned();

        let err = entry
            .set_raw_text("[Desktop Entry]\nName=broken\n")
            .unwrap_err();
        assert!(err.is_parse());
        assert_eq!(entry.fields().unwrap(), &before);
        assert_eq!(entry.raw_text().unwrap(), text_before);
    }

    #[test]
    fn test_invalid_field_value_is_rejected() {
        let mut entry = DesktopEntry::from_text(ENTRY).unwrap();
        assert!(entry.set_command("a\nIcon=evil").is_err());
        assert!(entry.set_dpi_scale(-1.0).is_err());
        assert_eq!(entry.command().unwrap(), "/opt/1cv8/common/1cestart");
        assert_eq!(entry.sync, SyncState::Clean);
    }

    #[test]
    fn test_command_that_reads_back_differently_is_rejected() {
        let mut entry = DesktopEntry::from_text(ENTRY).unwrap();
        let before = entry.fields().unwrap().clone();

        let err = entry.set_command("GDK_DPI_SCALE=3 run").unwrap_err();
        assert!(matches!(err, Error::InvalidValue(_)));
        assert!(matches!(entry.set_command(" run"), Err(Error::InvalidValue(_))));
        assert_eq!(entry.fields().unwrap(), &before);

        entry.set_command("run --flag=GDK_DPI_SCALE=3").unwrap();
        let fields = entry.fields().unwrap().clone();
        let reparsed = LaunchFields::parse(entry.raw_text().unwrap()).unwrap();
        assert_eq!(fields, reparsed);
    }

    #[test]
    fn test_save_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_entry(&dir, "1cestart.desktop", ENTRY);
        let mut entry = DesktopEntry::open(&path).unwrap();

        assert!(!entry.save().unwrap());
        entry.set_preload_libstdcxx(true).unwrap();
        assert!(entry.save().unwrap());
        assert!(!entry.save().unwrap());

        let on_disk = fs::read_to_string(&path).unwrap();
        assert!(on_disk.contains("\nExec=LD_PRELOAD=/usr/lib/libstdc++.so.6 GDK_SCALE=2 "));
        // saving must not look like an external change
        assert!(entry.preload_libstdcxx().unwrap());
        assert!(!entry.save().unwrap());
    }

    #[test]
    fn test_save_without_path() {
        let mut entry = DesktopEntry::from_text(ENTRY).unwrap();
        assert!(matches!(entry.save(), Err(Error::NoPath)));
    }

    #[test]
    fn test_external_change_is_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_entry(&dir, "1cestart.desktop", ENTRY);
        let mut entry = DesktopEntry::open(&path).unwrap();
        assert_eq!(entry.name_en().unwrap(), "1C:Enterprise");

        fs::write(&path, &ENTRY.replace("Name=1C:Enterprise", "Name=Changed outside")).unwrap();
        assert_eq!(entry.name_en().unwrap(), "Changed outside");
        assert!(!entry.save().unwrap());
    }

    #[test]
    fn test_failed_reload_keeps_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_entry(&dir, "1cestart.desktop", ENTRY);
        let mut entry = DesktopEntry::open(&path).unwrap();
        let before = entry.fields().unwrap().clone();

        fs::write(&path, "garbage that is not a launcher at all\n").unwrap();
        assert!(entry.fields().unwrap_err().is_parse());
        assert_eq!(entry.fields, before);

        fs::remove_file(&path).unwrap();
        assert!(entry.raw_text().unwrap_err().is_io());
        assert_eq!(entry.fields, before);
        assert_eq!(entry.raw_text, ENTRY);
    }

    #[test]
    fn test_save_as_and_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let existing = write_entry(&dir, "1cestart.desktop", ENTRY);
        let mut entry = DesktopEntry::from_text(ENTRY).unwrap();

        assert!(entry.save_as(&existing).unwrap_err().is_conflict());
        assert_eq!(entry.path(), None);

        let target = dir.path().join("1cestart-new.desktop");
        entry.save_as(&target).unwrap();
        assert_eq!(entry.path(), Some(target.as_path()));
        assert_eq!(fs::read_to_string(&target).unwrap(), ENTRY);
        let mode = fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o755, 0o755);
        assert!(!entry.save().unwrap());
    }

    #[test]
    fn test_clone_to_copies_current_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_entry(&dir, "1cestart.desktop", ENTRY);
        let mut entry = DesktopEntry::open(&path).unwrap();
        entry.set_name_en("Copy").unwrap();

        let target = dir.path().join("1cestart-copy.desktop");
        let mut copy = entry.clone_to(&target).unwrap();
        assert_eq!(copy.name_en().unwrap(), "Copy");
        assert_eq!(copy.path(), Some(target.as_path()));
        assert!(entry.clone_to(&target).unwrap_err().is_conflict());
        // the source file itself was not saved
        assert!(fs::read_to_string(&path).unwrap().contains("Name=1C:Enterprise"));
    }

    #[test]
    fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_entry(&dir, "1cestart.desktop", ENTRY);
        let mut entry = DesktopEntry::open(&path).unwrap();
        entry.remove().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_remove_rechecks_permission() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_entry(&dir, "1cestart.desktop", ENTRY);
        let mut entry = DesktopEntry::open(&path).unwrap();
        assert!(!entry.read_only());

        fs::set_permissions(&path, fs::Permissions::from_mode(0o444)).unwrap();
        if is_writable(&path) {
            // privileged users can write anything
            return;
        }
        assert!(matches!(entry.remove(), Err(Error::ReadOnly(_))));
        assert!(entry.read_only());
        assert!(path.exists());
    }

    #[test]
    fn test_has_content() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_entry(&dir, "1cestart.desktop", ENTRY);
        let bad = write_entry(&dir, "1cestart-x.desktop", "[Desktop Entry]\nExec=foo\n");
        assert!(has_content(&good).unwrap());
        assert!(!has_content(&bad).unwrap());
    }

    #[test]
    fn test_strip_field_codes() {
        assert_eq!(strip_field_codes("1cestart %u"), "1cestart");
        assert_eq!(strip_field_codes("run %F --x"), "run  --x");
        assert_eq!(strip_field_codes("echo 100%%"), "echo 100%");
        assert_eq!(strip_field_codes("a %z b"), "a %z b");
    }

    #[test]
    fn test_execute_spawns_shell() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("ran");
        let text = ENTRY.replace(
            "/opt/1cv8/common/1cestart",
            &format!("touch {} %U", marker.display()),
        );
        let mut entry = DesktopEntry::from_text(text).unwrap();
        let reaper = entry.execute().unwrap();

        let status = reaper.join().unwrap().unwrap();
        assert!(status.success());
        assert!(marker.exists());
    }

    #[test]
    fn test_execute_reports_failing_command() {
        let text = ENTRY.replace("/opt/1cv8/common/1cestart", "exit 3");
        let mut entry = DesktopEntry::from_text(text).unwrap();
        let status = entry.execute().unwrap().join().unwrap().unwrap();
        assert_eq!(status.code(), Some(3));
    }

    #[test]
    fn test_crlf_launcher_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let text = ENTRY.replace('\n', "\r\n");
        let path = write_entry(&dir, "1cestart.desktop", &text);
        assert!(has_content(&path).unwrap());

        let mut entry = DesktopEntry::open(&path).unwrap();
        assert_eq!(entry.command().unwrap(), "/opt/1cv8/common/1cestart");
        assert_eq!(entry.name_en().unwrap(), "1C:Enterprise");
        entry.set_preload_libstdcxx(true).unwrap();
        assert!(entry.save().unwrap());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            text.replace("Exec=", "Exec=LD_PRELOAD=/usr/lib/libstdc++.so.6 ")
        );
    }
}

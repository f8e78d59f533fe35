// SPDX-License-Identifier: GPL-3.0-only

//! The structural template of a 1C:Enterprise launcher entry.
//!
//! Only three spans of the file are meaningful: the `Exec=` value, the
//! `Name[ru_RU]=` value and the `Name=` value that follows it. Everything else
//! is carried through untouched when the text is regenerated.

use crate::error::{Error, Result};
use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::LazyLock;

pub const PRELOAD_LIBSTDCXX: &str = "LD_PRELOAD=/usr/lib/libstdc++.so.6";
pub const SCALE_VAR: &str = "GDK_SCALE";
pub const DPI_SCALE_VAR: &str = "GDK_DPI_SCALE";

pub const DEFAULT_SCALE: u32 = 1;
pub const DEFAULT_DPI_SCALE: f64 = 1.0;
pub const MAX_DPI_SCALE: f64 = 100.0;

static PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?mR)^\[Desktop Entry\][ \t]*$(?s:.*?)",
        r"^Exec=(?P<exec>",
        r"(?:(?P<preload>LD_PRELOAD=/usr/lib/libstdc\+\+\.so\.6)[ \t]+)?",
        r"(?:GDK_SCALE=(?P<scale>\d+)[ \t]+)?",
        r"(?:GDK_DPI_SCALE=(?P<dpi_scale>\d+(?:\.\d+)?)[ \t]+)?",
        r"(?P<command>.*))$(?s:.*?)",
        r"^Name\[ru_RU\]=(?P<name_ru>.*)$(?s:.*?)",
        r"^Name=(?P<name_en>.*)$",
    ))
    .expect("launcher template is a valid pattern")
});

/// The typed, editable view of a launcher entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchFields {
    pub preload_libstdcxx: bool,
    pub scale_enabled: bool,
    pub scale: u32,
    pub dpi_scale_enabled: bool,
    pub dpi_scale: f64,
    pub command: String,
    pub name_ru: String,
    pub name_en: String,
}

impl Default for LaunchFields {
    fn default() -> Self {
        Self {
            preload_libstdcxx: false,
            scale_enabled: false,
            scale: DEFAULT_SCALE,
            dpi_scale_enabled: false,
            dpi_scale: DEFAULT_DPI_SCALE,
            command: String::new(),
            name_ru: String::new(),
            name_en: String::new(),
        }
    }
}

impl LaunchFields {
    /// Derive the fields from `text`. Absent optional prefixes take defaults.
    pub fn parse(text: &str) -> Result<Self> {
        let caps = captures(text)?;

        let scale = match caps.name("scale") {
            Some(m) => Some(m.as_str().parse::<u32>().map_err(|e| {
                Error::parse(format!("{SCALE_VAR} value `{}`: {e}", m.as_str()))
            })?),
            None => None,
        };
        let dpi_scale = match caps.name("dpi_scale") {
            Some(m) => Some(m.as_str().parse::<f64>().map_err(|e| {
                Error::parse(format!("{DPI_SCALE_VAR} value `{}`: {e}", m.as_str()))
            })?),
            None => None,
        };

        Ok(Self {
            preload_libstdcxx: caps.name("preload").is_some(),
            scale_enabled: scale.is_some(),
            scale: scale.unwrap_or(DEFAULT_SCALE),
            dpi_scale_enabled: dpi_scale.is_some(),
            dpi_scale: dpi_scale.unwrap_or(DEFAULT_DPI_SCALE),
            command: group(&caps, "command").to_owned(),
            name_ru: group(&caps, "name_ru").to_owned(),
            name_en: group(&caps, "name_en").to_owned(),
        })
    }

    /// The `Exec=` value: enabled prefixes in fixed order, then the command.
    pub fn exec_line(&self) -> String {
        let mut exec = String::new();
        if self.preload_libstdcxx {
            exec.push_str(PRELOAD_LIBSTDCXX);
            exec.push(' ');
        }
        if self.scale_enabled {
            exec.push_str(&format!("{SCALE_VAR}={} ", self.scale));
        }
        if self.dpi_scale_enabled {
            exec.push_str(&format!("{DPI_SCALE_VAR}={} ", format_dpi_scale(self.dpi_scale)));
        }
        exec.push_str(&self.command);
        exec
    }

    /// Reject values that could not be written back into the template.
    pub fn validate(&self) -> Result<()> {
        check_line("command", &self.command)?;
        check_line("Name[ru_RU]", &self.name_ru)?;
        check_line("Name", &self.name_en)?;
        check_dpi_scale(self.dpi_scale)?;
        self.check_reads_back()
    }

    /// The rendered `Exec=` value must parse back into the same settings.
    fn check_reads_back(&self) -> Result<()> {
        let text = format!(
            "[Desktop Entry]\nExec={}\nName[ru_RU]={}\nName={}\n",
            self.exec_line(),
            self.name_ru,
            self.name_en
        );
        let back = Self::parse(&text)?;
        let same = back.preload_libstdcxx == self.preload_libstdcxx
            && back.scale_enabled == self.scale_enabled
            && (!self.scale_enabled || back.scale == self.scale)
            && back.dpi_scale_enabled == self.dpi_scale_enabled
            && (!self.dpi_scale_enabled || back.dpi_scale == self.dpi_scale)
            && back.command == self.command;
        if !same {
            return Err(Error::InvalidValue(format!(
                "command `{}` would be read back as `{}`",
                self.command,
                back.exec_line()
            )));
        }
        Ok(())
    }

    /// Substitute the captured spans of `text` with values rendered from
    /// `self`. Bytes outside the spans are copied verbatim.
    pub fn render_into(&self, text: &str) -> Result<String> {
        let caps = captures(text)?;
        let exec = self.exec_line();
        let mut spans: [(Range<usize>, &str); 3] = [
            (span(&caps, "exec"), exec.as_str()),
            (span(&caps, "name_ru"), self.name_ru.as_str()),
            (span(&caps, "name_en"), self.name_en.as_str()),
        ];
        spans.sort_by_key(|(range, _)| range.start);

        let mut out = String::with_capacity(text.len() + exec.len());
        let mut pos = 0;
        for (range, value) in spans {
            out.push_str(&text[pos..range.start]);
            out.push_str(value);
            pos = range.end;
        }
        out.push_str(&text[pos..]);
        Ok(out)
    }
}

/// Content-shape test: does `text` look like a launcher entry at all.
pub fn matches(text: &str) -> bool {
    PATTERN.is_match(text)
}

/// DPI scale with at least one fractional digit, so `1.0` stays `1.0`.
pub fn format_dpi_scale(value: f64) -> String {
    let plain = value.to_string();
    if plain.contains('.') {
        plain
    } else {
        format!("{plain}.0")
    }
}

pub(crate) fn check_line(what: &str, value: &str) -> Result<()> {
    if value.contains(['\n', '\r']) {
        return Err(Error::InvalidValue(format!("{what} must be a single line")));
    }
    Ok(())
}

pub(crate) fn check_dpi_scale(value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 || value > MAX_DPI_SCALE {
        return Err(Error::InvalidValue(format!(
            "{DPI_SCALE_VAR} must be in (0, {MAX_DPI_SCALE}], got {value}"
        )));
    }
    Ok(())
}

fn captures(text: &str) -> Result<Captures<'_>> {
    PATTERN.captures(text).ok_or_else(|| {
        Error::parse("expected [Desktop Entry] with Exec=, Name[ru_RU]= and Name= lines")
    })
}

fn group<'t>(caps: &Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map(|m| m.as_str()).unwrap_or_default()
}

fn span(caps: &Captures<'_>, name: &str) -> Range<usize> {
    caps.name(name).map(|m| m.range()).unwrap_or(0..0)
}

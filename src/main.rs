// SPDX-License-Identifier: GPL-3.0-only

use cestart_edit::template::format_dpi_scale;
use cestart_edit::{AppModel, Config, DesktopEntry, Error};
use chrono::Local;
use clap::{Parser, Subcommand};
use log::info;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Edit the launch settings of 1C:Enterprise launchers
#[derive(Parser, Debug)]
#[command(name = "cestart-edit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List launchers found for the system and the user
    List,
    /// Print the launch settings of a launcher
    Show { path: PathBuf },
    /// Print the launcher file as it would be saved
    Text { path: PathBuf },
    /// Change settings and save
    Set {
        path: PathBuf,
        /// KEY=VALUE with keys preload, scale, dpi-scale, command, name-ru,
        /// name-en (scale=off and dpi-scale=off drop the prefix)
        #[arg(required = true, value_name = "KEY=VALUE", value_parser = parse_setting)]
        settings: Vec<Setting>,
    },
    /// Launch the entry
    Exec { path: PathBuf },
    /// Copy into the user directory as 1cestart<NAME>.desktop
    Clone {
        path: PathBuf,
        #[arg(allow_hyphen_values = true)]
        name: String,
    },
    /// Delete a launcher
    Remove { path: PathBuf },
    /// Open the launcher file in the default editor
    Open { path: PathBuf },
}

/// One `key=value` argument of `set`.
#[derive(Clone, Debug, PartialEq)]
enum Setting {
    Preload(bool),
    /// `None` drops the prefix.
    Scale(Option<u32>),
    DpiScale(Option<f64>),
    Command(String),
    NameRu(String),
    NameEn(String),
}

fn parse_setting(s: &str) -> Result<Setting, String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let invalid = || format!("'{value}' is not a valid value for {key}");

    let setting = match key {
        "preload" => Setting::Preload(match value {
            "on" | "true" | "yes" | "1" => true,
            "off" | "false" | "no" | "0" => false,
            _ => return Err(invalid()),
        }),
        "scale" if value == "off" => Setting::Scale(None),
        "scale" => Setting::Scale(Some(value.parse().map_err(|_| invalid())?)),
        "dpi-scale" if value == "off" => Setting::DpiScale(None),
        "dpi-scale" => Setting::DpiScale(Some(value.parse().map_err(|_| invalid())?)),
        "command" => Setting::Command(value.to_owned()),
        "name-ru" => Setting::NameRu(value.to_owned()),
        "name-en" => Setting::NameEn(value.to_owned()),
        _ => return Err(format!("unknown key '{key}'")),
    };
    Ok(setting)
}

fn setup_logger() -> Result<(), Box<dyn std::error::Error>> {
    fern::Dispatch::new()
        .level(log::LevelFilter::Warn)
        .level_for("cestart_edit", log::LevelFilter::Debug)
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}",
                Local::now().format("%H:%M:%S"),
                record.level(),
                message
            ));
        })
        .chain(io::stderr())
        .apply()?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logger().expect("Failed to initialize logger");

    info!("Application started");
    let mut app = AppModel::load(Config::from_env());

    match run(&mut app, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(app: &mut AppModel, command: Commands) -> Result<(), Error> {
    match command {
        Commands::List => {
            for entry in app.entries() {
                let marker = if entry.read_only() { "ro" } else { "rw" };
                if let Some(path) = entry.path() {
                    println!("{marker} {}", path.display());
                }
            }
            for e in app.errors() {
                eprintln!("error: {e}");
            }
            Ok(())
        }
        Commands::Show { path } => show(entry_for(app, &path)?),
        Commands::Text { path } => {
            print!("{}", entry_for(app, &path)?.raw_text()?);
            Ok(())
        }
        Commands::Set { path, settings } => {
            let entry = entry_for(app, &path)?;
            for setting in settings {
                apply(entry, setting)?;
            }
            if entry.save()? {
                println!("saved {}", path.display());
            }
            Ok(())
        }
        Commands::Exec { path } => {
            // The launched program outlives this process.
            entry_for(app, &path)?.execute()?;
            Ok(())
        }
        Commands::Clone { path, name } => {
            app.select(&path)?;
            let copy = app.clone_current(&name)?;
            if let Some(target) = copy.path() {
                println!("created {}", target.display());
            }
            Ok(())
        }
        Commands::Remove { path } => {
            app.select(&path)?;
            let removed = app.remove_current()?;
            println!("removed {}", removed.display());
            Ok(())
        }
        Commands::Open { path } => {
            app.select(&path)?;
            app.open_current_in_editor()
        }
    }
}

/// Launchers outside the scanned directories are opened directly.
fn entry_for<'a>(app: &'a mut AppModel, path: &Path) -> Result<&'a mut DesktopEntry, Error> {
    if app.select(path).is_err() {
        let entry = DesktopEntry::open(path)?;
        return Ok(app.adopt(entry));
    }
    app.current_mut().ok_or(Error::NoSelection)
}

fn show(entry: &mut DesktopEntry) -> Result<(), Error> {
    let read_only = entry.read_only();
    let fields = entry.fields()?.clone();
    let on_off = |b: bool| if b { "on" } else { "off" };

    println!("preload   {}", on_off(fields.preload_libstdcxx));
    if fields.scale_enabled {
        println!("scale     {}", fields.scale);
    } else {
        println!("scale     off");
    }
    if fields.dpi_scale_enabled {
        println!("dpi-scale {}", format_dpi_scale(fields.dpi_scale));
    } else {
        println!("dpi-scale off");
    }
    println!("command   {}", fields.command);
    println!("name-ru   {}", fields.name_ru);
    println!("name-en   {}", fields.name_en);
    println!("exec      {}", fields.exec_line());
    println!("read-only {}", on_off(read_only));
    Ok(())
}

fn apply(entry: &mut DesktopEntry, setting: Setting) -> Result<(), Error> {
    match setting {
        Setting::Preload(on) => entry.set_preload_libstdcxx(on),
        Setting::Scale(None) => entry.set_scale_enabled(false),
        Setting::Scale(Some(scale)) => {
            entry.set_scale(scale)?;
            entry.set_scale_enabled(true)
        }
        Setting::DpiScale(None) => entry.set_dpi_scale_enabled(false),
        Setting::DpiScale(Some(dpi_scale)) => {
            entry.set_dpi_scale(dpi_scale)?;
            entry.set_dpi_scale_enabled(true)
        }
        Setting::Command(command) => entry.set_command(command),
        Setting::NameRu(name) => entry.set_name_ru(name),
        Setting::NameEn(name) => entry.set_name_en(name),
    }
}

// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! # Songstore.
//!
//! A personal song catalog manager. Songs with metadata, artists, and
//! tags live in a SQLite database and a storage directory; an
//! interactive line-based command surface creates, updates, deletes,
//! searches, plays, and archives them.
//!
//! The core is single-threaded and synchronous: one command is fully
//! processed before the next is read. The only background activity is
//! the non-blocking log writer, which consumes records from a channel
//! fed by the main thread.

mod archive;
mod commands;
mod config;
mod db;
mod error;
mod logging;
mod model;
mod request;
mod search;
mod select;
mod storage;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Parser;
use tracing::{error, info};

use crate::commands::{Command, Context};
use crate::storage::Storage;

#[derive(Parser)]
#[command(name = "songstore", about = "Personal song catalog and storage manager")]
struct Args {
    /// Path to the settings file (created with defaults when missing).
    #[arg(default_value = "appsettings.toml")]
    settings: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = config::load_settings(&args.settings)?;
    let _log_guard = logging::init(&settings.log_file).context("Failed to initialise logging")?;

    let conn = db::init_db(&settings.database)?;
    let storage = Storage::new(settings.storage.clone());
    let ctx = Context {
        conn: &conn,
        storage: &storage,
    };

    if settings.restart {
        commands::refresh(&ctx)?;
    }

    let removed = commands::sync_catalog(&ctx)?;
    if removed > 0 {
        info!(removed, "dropped rows without storage artifacts");
    }

    info!("application started");
    let stdin = io::stdin();
    repl(&ctx, &mut stdin.lock(), &mut io::stdout())?;

    println!("Closing application...");
    Ok(())
}

/// The interactive command loop.
///
/// Each line is `<command> <path-to-json>`; `help` reprints the banner
/// and `exit` quits. A failing command is reported and logged without
/// stopping the loop.
fn repl<R: BufRead, W: Write>(ctx: &Context, input: &mut R, output: &mut W) -> Result<()> {
    writeln!(output, "{}\n", commands::help_banner())?;

    loop {
        write!(output, ">>> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        match line {
            "" => {}
            "exit" => break,
            "help" => writeln!(output, "{}\n", commands::help_banner())?,
            _ => handle_line(ctx, line, output)?,
        }
    }

    Ok(())
}

fn handle_line<W: Write>(ctx: &Context, line: &str, output: &mut W) -> Result<()> {
    let mut words = line.split_whitespace();
    let (Some(name), Some(path), None) = (words.next(), words.next(), words.next()) else {
        writeln!(output, "Unknown command received ({line})")?;
        return Ok(());
    };

    let Ok(command) = name.parse::<Command>() else {
        writeln!(output, "Unknown command received ({line})")?;
        return Ok(());
    };

    if let Err(err) = commands::dispatch(ctx, command, Path::new(path)) {
        error!(command = command.name(), %err, "command failed");
        writeln!(output, "Error occurred while running {name}: {err}")?;
    }

    Ok(())
}

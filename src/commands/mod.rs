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

//! Command dispatch.
//!
//! The command surface is a closed set modeled as an enum, one handler
//! per variant. Handlers receive an explicit [`Context`] with the store
//! connection and the file area instead of reaching for globals.

pub mod archive;
pub mod create;
pub mod delete;
pub mod play;
pub mod search;
pub mod update;

use std::path::Path;
use std::str::FromStr;

use rusqlite::Connection;
use tracing::{info, warn};

use crate::db;
use crate::error::Error;
use crate::storage::Storage;

/// Shared collaborators, constructed once at startup and passed into
/// every handler.
pub struct Context<'a> {
    pub conn: &'a Connection,
    pub storage: &'a Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Create,
    Delete,
    Update,
    Search,
    Archive,
    Play,
}

impl Command {
    pub const ALL: [Command; 6] = [
        Command::Create,
        Command::Delete,
        Command::Update,
        Command::Search,
        Command::Archive,
        Command::Play,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::Create => "create",
            Command::Delete => "delete",
            Command::Update => "update",
            Command::Search => "search",
            Command::Archive => "archive",
            Command::Play => "play",
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Command::Create => "Creates a new song in the storage and database",
            Command::Delete => "Deletes a song from the storage and database",
            Command::Update => "Updates a song in the database",
            Command::Search => "Searches for songs in the database",
            Command::Archive => "Archives songs from the storage folder",
            Command::Play => "Plays a song from the storage folder",
        }
    }
}

impl FromStr for Command {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|command| command.name() == s)
            .ok_or(())
    }
}

/// The REPL banner listing every command.
pub fn help_banner() -> String {
    let mut lines = vec!["Available commands:".to_string()];
    for command in Command::ALL {
        lines.push(format!(
            "   > {} <path-to-json> => {}",
            command.name(),
            command.describe()
        ));
    }
    lines.push("   > help => Shows this message".to_string());
    lines.push("   > exit => Closes the application".to_string());
    lines.join("\n")
}

/// Routes one parsed command to its handler, printing the outcome.
pub fn dispatch(ctx: &Context, command: Command, request_path: &Path) -> Result<(), Error> {
    info!(command = command.name(), "processing command");

    match command {
        Command::Create => {
            let id = create::run(ctx, request_path)?;
            println!("Song created successfully. ID: {id}");
        }
        Command::Delete => {
            delete::run(ctx, request_path)?;
            println!("Song deleted successfully.");
        }
        Command::Update => {
            update::run(ctx, request_path)?;
            println!("Song updated successfully.");
        }
        Command::Search => {
            let results = search::run(ctx, request_path)?;
            search::print_results(&results);
        }
        Command::Archive => {
            let name = archive::run(ctx, request_path)?;
            println!("Archive created successfully. Name: {name}");
        }
        Command::Play => {
            play::run(ctx, request_path)?;
            println!("Song is playing.");
        }
    }

    info!(command = command.name(), "command completed");
    Ok(())
}

/// Startup consistency pass: drops every song row whose storage artifact
/// no longer exists. Returns the number of rows removed.
///
/// A failure between a database mutation and the matching file operation
/// can leave the two out of step; this pass is the recovery mechanism
/// for the file-went-missing half of that gap.
pub fn sync_catalog(ctx: &Context) -> Result<usize, Error> {
    let mut removed = 0;
    for (id, file_path) in db::all_file_paths(ctx.conn)? {
        if !ctx.storage.contains(&file_path) {
            warn!(id, %file_path, "storage artifact missing, dropping row");
            db::delete_song(ctx.conn, id)?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// `restart` startup option: drop and recreate the schema, clear the
/// storage directory.
pub fn refresh(ctx: &Context) -> Result<(), Error> {
    info!("restart requested, clearing database and storage");
    db::drop_schema(ctx.conn)?;
    db::create_schema(ctx.conn)?;
    ctx.storage.clear()?;
    Ok(())
}

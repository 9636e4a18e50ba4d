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

//! The create command.
//!
//! Inserts a song row, upserts and links its artists and tags, and
//! copies the source file into storage. With `auto` set, artists, title
//! and format are derived from the file name
//! (`artist1,artist2,...-title.ext`) and the release date from the
//! file's creation time.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDate};
use tracing::info;

use crate::db;
use crate::error::Error;
use crate::model::SUPPORTED_FORMATS;
use crate::request::{self, CreateRequest};
use crate::storage::base_name;

use super::Context;

/// Metadata of a song about to be created, either taken from the request
/// or derived from the file name.
struct NewSong {
    source: String,
    title: String,
    format: String,
    release_date: NaiveDate,
    artists: Vec<String>,
    tags: Vec<String>,
}

pub fn run(ctx: &Context, request_path: &Path) -> Result<i64, Error> {
    let request = request::load_create(request_path)?;

    let song = if request.auto {
        derive_from_file(&request)?
    } else {
        NewSong {
            source: request.file_path,
            title: request.name,
            format: request.format,
            release_date: request.release_date,
            artists: request.artists,
            tags: request.tags,
        }
    };

    if ctx.storage.contains(&song.source) {
        return Err(Error::Validation(format!(
            "file {} already exists in storage",
            base_name(&song.source)
        )));
    }

    let destination = ctx.storage.destination(&song.source);
    let stored_path = destination
        .to_str()
        .ok_or_else(|| Error::Validation("storage path is not valid UTF-8".into()))?;

    let id = db::insert_song(
        ctx.conn,
        stored_path,
        &song.title,
        song.release_date,
        &song.format,
    )?;

    for artist in &song.artists {
        let artist_id = db::upsert_artist(ctx.conn, artist)?;
        db::link_artist(ctx.conn, id, artist_id)?;
    }
    for tag in &song.tags {
        let tag_id = db::upsert_tag(ctx.conn, tag)?;
        db::link_tag(ctx.conn, id, tag_id)?;
    }

    ctx.storage.import(Path::new(&song.source))?;

    info!(id, title = %song.title, "song created");
    Ok(id)
}

/// Derives song metadata from the source file.
///
/// The base filename must look like `artist1,artist2,...-title.ext` with
/// alphanumeric words; the release date is the file's creation time
/// (falling back to the modification time where creation time is not
/// recorded).
fn derive_from_file(request: &CreateRequest) -> Result<NewSong, Error> {
    let name = base_name(&request.file_path);
    let (artists, title, format) = parse_file_name(name)?;

    if !SUPPORTED_FORMATS.contains(&format.as_str()) {
        return Err(Error::Validation(format!(
            "format {format:?} is not supported"
        )));
    }

    let metadata = fs::metadata(&request.file_path)?;
    let created = metadata.created().or_else(|_| metadata.modified())?;
    let release_date = DateTime::<Local>::from(created).date_naive();

    Ok(NewSong {
        source: request.file_path.clone(),
        title,
        format,
        release_date,
        artists,
        tags: request.tags.clone(),
    })
}

fn parse_file_name(name: &str) -> Result<(Vec<String>, String, String), Error> {
    let invalid = || Error::Validation(format!("invalid format on file {name}"));

    let (artists_part, rest) = name.split_once('-').ok_or_else(invalid)?;
    let (title, format) = rest.split_once('.').ok_or_else(invalid)?;

    let artists: Vec<String> = artists_part.split(',').map(str::to_string).collect();

    let word_ok = |w: &str| !w.is_empty() && w.chars().all(|c| c.is_ascii_alphanumeric());
    if !artists.iter().all(|a| word_ok(a)) || !word_ok(title) || !word_ok(format) {
        return Err(invalid());
    }

    Ok((artists, title.to_string(), format.to_string()))
}

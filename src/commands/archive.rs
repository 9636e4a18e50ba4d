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

//! The archive command.
//!
//! Runs a search, shows the numbered results, reads a selection from the
//! user, and packs the selected songs into a zip container in storage.
//! An empty search result aborts before the selection prompt is ever
//! shown.

use std::io::{self, BufRead, Write};
use std::path::Path;

use tracing::info;

use crate::archive;
use crate::error::Error;
use crate::model::SongDetails;
use crate::request;
use crate::search;
use crate::select::{self, RangePolicy};

use super::Context;

pub fn run(ctx: &Context, request_path: &Path) -> Result<String, Error> {
    let request = request::load_search(request_path)?;
    let songs = search::run(ctx.conn, &request)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_with_io(ctx, &songs, &mut stdin.lock(), &mut stdout, None)
}

/// The interactive part of the archive flow, generic over its input and
/// output so the retry loop can be driven by tests with a bounded
/// attempt budget.
pub fn run_with_io<R: BufRead, W: Write>(
    ctx: &Context,
    songs: &[SongDetails],
    input: &mut R,
    output: &mut W,
    max_attempts: Option<u32>,
) -> Result<String, Error> {
    if songs.is_empty() {
        return Err(Error::EmptyResult);
    }

    writeln!(output, "Choose which songs to archive:")?;
    for (index, song) in songs.iter().enumerate() {
        writeln!(
            output,
            "{}. {} by {}",
            index + 1,
            song.title,
            song.artists.join(", ")
        )?;
    }

    let policy = RangePolicy::Strict { len: songs.len() };
    let intervals = select::prompt_selection(input, output, policy, max_attempts)?;

    let name = archive::pack(songs, &intervals, ctx.storage)?;
    info!(name = %name, songs = songs.len(), "archive created");
    Ok(name)
}

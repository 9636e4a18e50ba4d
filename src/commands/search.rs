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

//! The search command: loads the request file and runs the search
//! engine.

use std::path::Path;

use tracing::info;

use crate::error::Error;
use crate::model::SongDetails;
use crate::request;
use crate::search;

use super::Context;

pub fn run(ctx: &Context, request_path: &Path) -> Result<Vec<SongDetails>, Error> {
    let request = request::load_search(request_path)?;
    let results = search::run(ctx.conn, &request)?;
    info!(matches = results.len(), "search completed");
    Ok(results)
}

pub fn print_results(results: &[SongDetails]) {
    println!("Search completed successfully. {} match(es).", results.len());
    println!(" --------------------------");
    for song in results {
        println!("> name: {}", song.title);
        println!("> releaseDate: {}", song.release_date);
        println!("> format: {}", song.format);
        println!("> artists: {}", song.artists.join(", "));
        println!("> tags: {}", song.tags.join(", "));
        println!(" --------------------------");
    }
}

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

//! The play command: hands the song's storage artifact to the operating
//! system's default opener.

use std::path::Path;
use std::process;

use tracing::info;

use crate::db;
use crate::error::Error;
use crate::request;

use super::Context;

#[cfg(target_os = "macos")]
const OPENER: &str = "open";
#[cfg(not(target_os = "macos"))]
const OPENER: &str = "xdg-open";

pub fn run(ctx: &Context, request_path: &Path) -> Result<(), Error> {
    let request = request::load_play(request_path)?;

    let file_path =
        db::song_file_path(ctx.conn, request.song_id)?.ok_or(Error::NotFound(request.song_id))?;

    process::Command::new(OPENER).arg(&file_path).spawn()?;

    info!(id = request.song_id, %file_path, "song handed to opener");
    Ok(())
}

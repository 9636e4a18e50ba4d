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

//! The delete command: removes the song row (links cascade) and its
//! storage artifact.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::db;
use crate::error::Error;
use crate::request;

use super::Context;

pub fn run(ctx: &Context, request_path: &Path) -> Result<(), Error> {
    let request = request::load_delete(request_path)?;

    let file_path =
        db::song_file_path(ctx.conn, request.id)?.ok_or(Error::NotFound(request.id))?;

    db::delete_song(ctx.conn, request.id)?;
    fs::remove_file(&file_path)?;

    info!(id = request.id, "song deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::{add_song, memory_db};
    use crate::storage::Storage;

    #[test]
    fn delete_removes_row_and_file() {
        let conn = memory_db();
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf());

        let artifact = dir.path().join("song.mp3");
        std::fs::write(&artifact, "audio").unwrap();
        let id = add_song(
            &conn,
            artifact.to_str().unwrap(),
            "Song",
            "2020-01-01",
            "mp3",
            &["Moby"],
            &[],
        );

        let request = dir.path().join("delete.json");
        std::fs::write(&request, format!(r#"{{"id":{id}}}"#)).unwrap();

        let ctx = Context {
            conn: &conn,
            storage: &storage,
        };
        run(&ctx, &request).unwrap();

        assert!(db::song_file_path(&conn, id).unwrap().is_none());
        assert!(!artifact.exists());
    }

    #[test]
    fn delete_unknown_id_is_not_found() {
        let conn = memory_db();
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf());

        let request = dir.path().join("delete.json");
        std::fs::write(&request, r#"{"id":42}"#).unwrap();

        let ctx = Context {
            conn: &conn,
            storage: &storage,
        };
        assert!(matches!(run(&ctx, &request), Err(Error::NotFound(42))));
    }
}

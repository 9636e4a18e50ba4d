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

//! The update command: applies changed metadata fields and links any
//! newly named artists and tags. Empty request fields leave the song
//! unchanged.

use std::path::Path;

use tracing::info;

use crate::db;
use crate::error::Error;
use crate::request;

use super::Context;

pub fn run(ctx: &Context, request_path: &Path) -> Result<(), Error> {
    let request = request::load_update(request_path)?;

    if db::song_file_path(ctx.conn, request.id)?.is_none() {
        return Err(Error::NotFound(request.id));
    }

    fn non_empty(s: &str) -> Option<&str> {
        if s.is_empty() { None } else { Some(s) }
    }
    db::update_song(
        ctx.conn,
        request.id,
        non_empty(&request.new_name),
        request.release_date()?,
        non_empty(&request.new_format),
    )?;

    for artist in &request.new_artists {
        let artist_id = db::upsert_artist(ctx.conn, artist)?;
        db::link_artist(ctx.conn, request.id, artist_id)?;
    }
    for tag in &request.new_tags {
        let tag_id = db::upsert_tag(ctx.conn, tag)?;
        db::link_tag(ctx.conn, request.id, tag_id)?;
    }

    info!(id = request.id, "song updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::{add_song, memory_db};
    use crate::storage::Storage;

    #[test]
    fn update_applies_fields_and_links_without_duplicates() {
        let conn = memory_db();
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf());

        let id = add_song(
            &conn,
            "/s/a.mp3",
            "Old",
            "2020-01-01",
            "mp3",
            &["Moby"],
            &[],
        );

        let request = dir.path().join("update.json");
        std::fs::write(
            &request,
            format!(
                r#"{{"id":{id},"newName":"New","newFormat":"","newReleaseDate":"2021-06-01","newArtists":["Moby","Gwen"],"newTags":["live"]}}"#
            ),
        )
        .unwrap();

        let ctx = Context {
            conn: &conn,
            storage: &storage,
        };
        run(&ctx, &request).unwrap();

        let details = db::fetch_song_details(&conn, id).unwrap();
        assert_eq!(details.title, "New");
        assert_eq!(details.format, "mp3");
        assert_eq!(details.release_date, "2021-06-01".parse().unwrap());
        assert_eq!(details.artists, vec!["Gwen", "Moby"]);
        assert_eq!(details.tags, vec!["live"]);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let conn = memory_db();
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf());

        let request = dir.path().join("update.json");
        std::fs::write(
            &request,
            r#"{"id":9,"newName":"","newFormat":"","newReleaseDate":"","newArtists":[],"newTags":[]}"#,
        )
        .unwrap();

        let ctx = Context {
            conn: &conn,
            storage: &storage,
        };
        assert!(matches!(run(&ctx, &request), Err(Error::NotFound(9))));
    }
}

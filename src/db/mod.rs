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

//! Data access layer.
//!
//! This module handles all interactions with the SQLite database: schema
//! creation, song/artist/tag persistence, and the match primitives the
//! search engine is built on. It uses cached statements to optimize
//! frequently executed queries.
//!
//! # Tables
//!
//! * `artists` / `tags` - Unique reference names, shared between songs.
//! * `songs` - One row per catalog entry with its storage file path.
//! * `song_artists` / `song_tags` - Many-to-many link tables with
//!   cascading deletes.
//!
//! All values are bound as statement parameters; no user-controlled string
//! is ever interpolated into SQL text.

mod model;

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{Connection, params, params_from_iter};

use crate::model::{DateFilter, MetadataFilter, SongDetails};

/// Opens a connection to the SQLite database and configures it.
///
/// Enables WAL mode and foreign key enforcement, then executes
/// [`create_schema`] so all tables exist.
///
/// # Errors
///
/// Returns an error if the database file cannot be opened, the PRAGMA
/// configuration fails, or the schema initialization fails.
pub fn init_db(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database {}", path.display()))?;

    let journal_mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |r| r.get(0))?;
    if journal_mode != "wal" {
        anyhow::bail!(
            "Failed to switch to WAL mode. Current mode: {}",
            journal_mode
        );
    }

    conn.execute_batch(
        "
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
    ",
    )?;

    conn.set_prepared_statement_cache_capacity(100);

    create_schema(&conn).context("Failed to create schema")?;

    Ok(conn)
}

/// Create the database schema.
///
/// Creates the `songs`, `artists`, `tags` and link tables if they do not
/// already exist, with `ON DELETE CASCADE` foreign keys so removing a song
/// also removes its links. The whole batch runs in one transaction.
pub fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "BEGIN;

        CREATE TABLE IF NOT EXISTS songs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            file_path TEXT NOT NULL,
            title TEXT NOT NULL,
            release_date TEXT NOT NULL,
            format TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS artists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS tags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS song_artists (
            song_id INTEGER NOT NULL,
            artist_id INTEGER NOT NULL,
            PRIMARY KEY (song_id, artist_id),
            FOREIGN KEY (song_id) REFERENCES songs (id) ON DELETE CASCADE,
            FOREIGN KEY (artist_id) REFERENCES artists (id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS song_tags (
            song_id INTEGER NOT NULL,
            tag_id INTEGER NOT NULL,
            PRIMARY KEY (song_id, tag_id),
            FOREIGN KEY (song_id) REFERENCES songs (id) ON DELETE CASCADE,
            FOREIGN KEY (tag_id) REFERENCES tags (id) ON DELETE CASCADE
        );

        COMMIT;",
    )
}

/// Drops every catalog table. Used by the `restart` setting.
pub fn drop_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "BEGIN;
        DROP TABLE IF EXISTS song_tags;
        DROP TABLE IF EXISTS song_artists;
        DROP TABLE IF EXISTS tags;
        DROP TABLE IF EXISTS artists;
        DROP TABLE IF EXISTS songs;
        COMMIT;",
    )
}

/// The universal set: every song id in the catalog.
pub fn all_song_ids(conn: &Connection) -> rusqlite::Result<HashSet<i64>> {
    let mut stmt = conn.prepare_cached("SELECT id FROM songs")?;
    let rows = stmt.query_map([], |row| row.get(0))?;
    rows.collect()
}

/// Songs matching every artist name fragment in `fragments`.
///
/// A song matches when, across its linked artists, the number of distinct
/// artists whose name contains at least one of the fragments
/// (case-insensitive substring) is at least the number of fragments
/// supplied. This makes the criterion an AND over fragments rather than an
/// AND over exact artist names.
///
/// The caller is responsible for treating an empty fragment list as
/// unrestricted; this function is only meaningful for non-empty input.
pub fn match_artists(conn: &Connection, fragments: &[String]) -> rusqlite::Result<HashSet<i64>> {
    match_linked_names(conn, LinkKind::Artists, fragments)
}

/// Songs matching every tag name fragment. Same contract as
/// [`match_artists`], over tag names.
pub fn match_tags(conn: &Connection, fragments: &[String]) -> rusqlite::Result<HashSet<i64>> {
    match_linked_names(conn, LinkKind::Tags, fragments)
}

#[derive(Clone, Copy)]
enum LinkKind {
    Artists,
    Tags,
}

fn match_linked_names(
    conn: &Connection,
    kind: LinkKind,
    fragments: &[String],
) -> rusqlite::Result<HashSet<i64>> {
    let (names, links, link_col) = match kind {
        LinkKind::Artists => ("artists", "song_artists", "artist_id"),
        LinkKind::Tags => ("tags", "song_tags", "tag_id"),
    };

    let like = vec!["LOWER(n.name) LIKE '%' || ? || '%'"; fragments.len()];
    let sql = format!(
        "SELECT s.id
         FROM songs s
         JOIN {links} l ON s.id = l.song_id
         JOIN {names} n ON l.{link_col} = n.id
         WHERE {}
         GROUP BY s.id
         HAVING COUNT(DISTINCT n.id) >= ?",
        like.join(" OR ")
    );

    let mut bindings: Vec<Value> = fragments
        .iter()
        .map(|f| Value::Text(f.to_lowercase()))
        .collect();
    bindings.push(Value::Integer(fragments.len() as i64));

    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(params_from_iter(bindings), |row| row.get(0))?;
    rows.collect()
}

/// Songs matching a metadata filter: title substring, format substring,
/// and release date (exact or inclusive range), each field independent
/// and ANDed.
///
/// As with the name matchers, an unrestricted filter is the caller's
/// responsibility; passing one here would match every song.
pub fn match_metadata(conn: &Connection, filter: &MetadataFilter) -> rusqlite::Result<HashSet<i64>> {
    let mut clauses = Vec::new();
    let mut bindings: Vec<Value> = Vec::new();

    if let Some(title) = &filter.title {
        clauses.push("LOWER(title) LIKE '%' || ? || '%'");
        bindings.push(Value::Text(title.to_lowercase()));
    }

    if let Some(format) = &filter.format {
        clauses.push("LOWER(format) LIKE '%' || ? || '%'");
        bindings.push(Value::Text(format.to_lowercase()));
    }

    match filter.release_date {
        Some(DateFilter::On(date)) => {
            clauses.push("release_date = ?");
            bindings.push(Value::Text(date.to_string()));
        }
        Some(DateFilter::Between(lo, hi)) => {
            // Bounds are kept in the order supplied, not normalized; an
            // inverted range matches nothing.
            clauses.push("release_date BETWEEN ? AND ?");
            bindings.push(Value::Text(lo.to_string()));
            bindings.push(Value::Text(hi.to_string()));
        }
        None => {}
    }

    let sql = format!("SELECT id FROM songs WHERE {}", clauses.join(" AND "));

    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(params_from_iter(bindings), |row| row.get(0))?;
    rows.collect()
}

/// Fetches the full projection of a song: metadata plus linked artist and
/// tag names, each name list sorted for deterministic output.
pub fn fetch_song_details(conn: &Connection, song_id: i64) -> rusqlite::Result<SongDetails> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, file_path, title, release_date, format FROM songs WHERE id = ?",
    )?;
    let mut song = stmt.query_one([song_id], SongDetails::from_row)?;

    let mut stmt = conn.prepare_cached(
        "SELECT a.name FROM artists a
         JOIN song_artists sa ON a.id = sa.artist_id
         WHERE sa.song_id = ?
         ORDER BY a.name",
    )?;
    song.artists = stmt
        .query_map([song_id], |row| row.get(0))?
        .collect::<rusqlite::Result<_>>()?;

    let mut stmt = conn.prepare_cached(
        "SELECT t.name FROM tags t
         JOIN song_tags st ON t.id = st.tag_id
         WHERE st.song_id = ?
         ORDER BY t.name",
    )?;
    song.tags = stmt
        .query_map([song_id], |row| row.get(0))?
        .collect::<rusqlite::Result<_>>()?;

    Ok(song)
}

/// Inserts a new song row and returns its generated id.
pub fn insert_song(
    conn: &Connection,
    file_path: &str,
    title: &str,
    release_date: NaiveDate,
    format: &str,
) -> rusqlite::Result<i64> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO songs (file_path, title, release_date, format) VALUES (?, ?, ?, ?)",
    )?;
    stmt.execute(params![file_path, title, release_date, format])?;
    Ok(conn.last_insert_rowid())
}

/// The storage file path of a song, or `None` when the id is unknown.
pub fn song_file_path(conn: &Connection, song_id: i64) -> rusqlite::Result<Option<String>> {
    let mut stmt = conn.prepare_cached("SELECT file_path FROM songs WHERE id = ?")?;
    let mut rows = stmt.query_map([song_id], |row| row.get(0))?;
    rows.next().transpose()
}

/// Deletes a song row; the link tables cascade.
pub fn delete_song(conn: &Connection, song_id: i64) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached("DELETE FROM songs WHERE id = ?")?;
    stmt.execute([song_id])?;
    Ok(())
}

/// Every `(id, file_path)` pair in the catalog. Used by the startup sync
/// pass to drop rows whose storage artifact has gone missing.
pub fn all_file_paths(conn: &Connection) -> rusqlite::Result<Vec<(i64, String)>> {
    let mut stmt = conn.prepare_cached("SELECT id, file_path FROM songs")?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
    rows.collect()
}

/// Looks an artist up by exact name, creating it when absent, and returns
/// its id. Linking always uses exact names; substring matching is a
/// search-only affair.
pub fn upsert_artist(conn: &Connection, name: &str) -> rusqlite::Result<i64> {
    upsert_name(conn, "artists", name)
}

/// Tag counterpart of [`upsert_artist`].
pub fn upsert_tag(conn: &Connection, name: &str) -> rusqlite::Result<i64> {
    upsert_name(conn, "tags", name)
}

fn upsert_name(conn: &Connection, table: &str, name: &str) -> rusqlite::Result<i64> {
    let mut stmt = conn.prepare_cached(&format!("INSERT OR IGNORE INTO {table} (name) VALUES (?)"))?;
    stmt.execute([name])?;
    let mut stmt = conn.prepare_cached(&format!("SELECT id FROM {table} WHERE name = ?"))?;
    stmt.query_one([name], |row| row.get(0))
}

/// Links a song to an artist. Re-linking an existing pair is a no-op.
pub fn link_artist(conn: &Connection, song_id: i64, artist_id: i64) -> rusqlite::Result<()> {
    let mut stmt = conn
        .prepare_cached("INSERT OR IGNORE INTO song_artists (song_id, artist_id) VALUES (?, ?)")?;
    stmt.execute(params![song_id, artist_id])?;
    Ok(())
}

/// Links a song to a tag. Re-linking an existing pair is a no-op.
pub fn link_tag(conn: &Connection, song_id: i64, tag_id: i64) -> rusqlite::Result<()> {
    let mut stmt =
        conn.prepare_cached("INSERT OR IGNORE INTO song_tags (song_id, tag_id) VALUES (?, ?)")?;
    stmt.execute(params![song_id, tag_id])?;
    Ok(())
}

/// Applies the non-`None` fields to a song row.
pub fn update_song(
    conn: &Connection,
    song_id: i64,
    title: Option<&str>,
    release_date: Option<NaiveDate>,
    format: Option<&str>,
) -> rusqlite::Result<()> {
    let mut setters = Vec::new();
    let mut bindings: Vec<Value> = Vec::new();

    if let Some(title) = title {
        setters.push("title = ?");
        bindings.push(Value::Text(title.to_string()));
    }
    if let Some(date) = release_date {
        setters.push("release_date = ?");
        bindings.push(Value::Text(date.to_string()));
    }
    if let Some(format) = format {
        setters.push("format = ?");
        bindings.push(Value::Text(format.to_string()));
    }

    if setters.is_empty() {
        return Ok(());
    }

    let sql = format!("UPDATE songs SET {} WHERE id = ?", setters.join(", "));
    bindings.push(Value::Integer(song_id));

    let mut stmt = conn.prepare_cached(&sql)?;
    stmt.execute(params_from_iter(bindings))?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// In-memory database with the full schema.
    pub(crate) fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        create_schema(&conn).unwrap();
        conn
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    /// Inserts a song with linked artists and tags, returning its id.
    pub(crate) fn add_song(
        conn: &Connection,
        file_path: &str,
        title: &str,
        release_date: &str,
        format: &str,
        artists: &[&str],
        tags: &[&str],
    ) -> i64 {
        let id = insert_song(conn, file_path, title, date(release_date), format).unwrap();
        for artist in artists {
            let aid = upsert_artist(conn, artist).unwrap();
            link_artist(conn, id, aid).unwrap();
        }
        for tag in tags {
            let tid = upsert_tag(conn, tag).unwrap();
            link_tag(conn, id, tid).unwrap();
        }
        id
    }

    #[test]
    fn upsert_is_idempotent() {
        let conn = memory_db();
        let a = upsert_artist(&conn, "Morcheeba").unwrap();
        let b = upsert_artist(&conn, "Morcheeba").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn match_artists_requires_every_fragment() {
        let conn = memory_db();
        let duo = add_song(
            &conn,
            "/s/duo.mp3",
            "Duo",
            "2020-01-01",
            "mp3",
            &["Alpha", "Beta"],
            &[],
        );
        let solo = add_song(
            &conn,
            "/s/solo.mp3",
            "Solo",
            "2020-01-01",
            "mp3",
            &["Alpha"],
            &[],
        );

        let both = match_artists(&conn, &["alp".into(), "bet".into()]).unwrap();
        assert!(both.contains(&duo));
        assert!(!both.contains(&solo));

        let one = match_artists(&conn, &["alp".into()]).unwrap();
        assert!(one.contains(&duo));
        assert!(one.contains(&solo));
    }

    #[test]
    fn match_artists_accepts_extra_matching_artists() {
        // Three matching artists against two fragments still satisfies the
        // "at least as many distinct matches as fragments" contract.
        let conn = memory_db();
        let trio = add_song(
            &conn,
            "/s/trio.mp3",
            "Trio",
            "2020-01-01",
            "mp3",
            &["Anna", "Annie", "Annette"],
            &[],
        );

        let ids = match_artists(&conn, &["ann".into(), "ann".into()]).unwrap();
        assert!(ids.contains(&trio));
    }

    #[test]
    fn match_metadata_date_range_is_inclusive() {
        let conn = memory_db();
        let inside = add_song(&conn, "/s/a.mp3", "A", "2020-06-15", "mp3", &[], &[]);
        let edge = add_song(&conn, "/s/b.mp3", "B", "2020-12-31", "mp3", &[], &[]);
        let outside = add_song(&conn, "/s/c.mp3", "C", "2021-01-01", "mp3", &[], &[]);

        let filter = MetadataFilter {
            release_date: Some(DateFilter::Between(date("2020-01-01"), date("2020-12-31"))),
            ..MetadataFilter::default()
        };
        let ids = match_metadata(&conn, &filter).unwrap();
        assert!(ids.contains(&inside));
        assert!(ids.contains(&edge));
        assert!(!ids.contains(&outside));
    }

    #[test]
    fn match_metadata_title_is_case_insensitive_substring() {
        let conn = memory_db();
        let id = add_song(
            &conn,
            "/s/a.mp3",
            "Blue Monday",
            "1983-03-07",
            "mp3",
            &[],
            &[],
        );

        let filter = MetadataFilter {
            title: Some("MOND".into()),
            ..MetadataFilter::default()
        };
        assert!(match_metadata(&conn, &filter).unwrap().contains(&id));
    }

    #[test]
    fn delete_cascades_to_links() {
        let conn = memory_db();
        let id = add_song(
            &conn,
            "/s/a.mp3",
            "A",
            "2020-01-01",
            "mp3",
            &["Alpha"],
            &["rock"],
        );
        delete_song(&conn, id).unwrap();

        let links: i64 = conn
            .query_row("SELECT COUNT(*) FROM song_artists", [], |r| r.get(0))
            .unwrap();
        assert_eq!(links, 0);
        assert!(song_file_path(&conn, id).unwrap().is_none());
    }

    #[test]
    fn fetch_details_sorts_names() {
        let conn = memory_db();
        let id = add_song(
            &conn,
            "/s/a.mp3",
            "A",
            "2020-01-01",
            "mp3",
            &["Zeta", "Alpha"],
            &["rock", "chill"],
        );

        let details = fetch_song_details(&conn, id).unwrap();
        assert_eq!(details.artists, vec!["Alpha", "Zeta"]);
        assert_eq!(details.tags, vec!["chill", "rock"]);
        assert_eq!(details.release_date, date("2020-01-01"));
    }

    #[test]
    fn update_song_applies_only_given_fields() {
        let conn = memory_db();
        let id = add_song(&conn, "/s/a.mp3", "Old", "2020-01-01", "mp3", &[], &[]);

        update_song(&conn, id, Some("New"), None, Some("flac")).unwrap();

        let details = fetch_song_details(&conn, id).unwrap();
        assert_eq!(details.title, "New");
        assert_eq!(details.format, "flac");
        assert_eq!(details.release_date, date("2020-01-01"));
    }
}

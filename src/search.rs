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

//! The search engine: criterion evaluation and result intersection.
//!
//! Each of the three filter categories (artists, tags, metadata)
//! evaluates to either *unrestricted* (`None`) or a concrete id set. An
//! unrestricted criterion acts as the universal set under intersection,
//! so a request with every category empty returns the whole catalog.
//!
//! Surviving ids are ordered ascending before materialization. This
//! ordering is a contract, not an accident: archive selection indexes
//! into the presented list, so the order must be stable across runs.

use std::collections::HashSet;

use rusqlite::Connection;

use crate::db;
use crate::error::Error;
use crate::model::SongDetails;
use crate::request::SearchRequest;

/// Runs a search request and materializes the matching songs, ordered by
/// ascending id.
pub fn run(conn: &Connection, request: &SearchRequest) -> Result<Vec<SongDetails>, Error> {
    let universe = db::all_song_ids(conn)?;

    let by_artists = names_criterion(conn, &request.artists, db::match_artists)?;
    let by_tags = names_criterion(conn, &request.tags, db::match_tags)?;
    let by_metadata = metadata_criterion(conn, request)?;

    let mut ids: Vec<i64> = universe
        .into_iter()
        .filter(|id| restricts(&by_artists, id))
        .filter(|id| restricts(&by_tags, id))
        .filter(|id| restricts(&by_metadata, id))
        .collect();
    ids.sort_unstable();

    ids.into_iter()
        .map(|id| db::fetch_song_details(conn, id).map_err(Error::from))
        .collect()
}

/// An unrestricted criterion keeps every id; a concrete one keeps only
/// its members.
fn restricts(criterion: &Option<HashSet<i64>>, id: &i64) -> bool {
    criterion.as_ref().is_none_or(|set| set.contains(id))
}

/// Evaluates an artist or tag criterion: an empty fragment list imposes
/// no restriction, anything else is delegated to the store matcher.
fn names_criterion(
    conn: &Connection,
    fragments: &[String],
    matcher: fn(&Connection, &[String]) -> rusqlite::Result<HashSet<i64>>,
) -> Result<Option<HashSet<i64>>, Error> {
    if fragments.is_empty() {
        return Ok(None);
    }
    Ok(Some(matcher(conn, fragments)?))
}

fn metadata_criterion(
    conn: &Connection,
    request: &SearchRequest,
) -> Result<Option<HashSet<i64>>, Error> {
    let filter = request.metadata_filter();
    if filter.is_unrestricted() {
        return Ok(None);
    }
    Ok(Some(db::match_metadata(conn, &filter)?))
}

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

//! Database row mapping for domain models.

use rusqlite::Row;

use crate::model::SongDetails;

impl SongDetails {
    /// Maps a `songs` row to a [`SongDetails`] instance with empty name
    /// lists; the caller fills in the linked artists and tags.
    ///
    /// Designed to be used with [`rusqlite::Statement::query_map`].
    ///
    /// # Errors
    ///
    /// Returns a [`rusqlite::Error`] if the row does not contain enough
    /// columns or a column cannot be converted to the required Rust type.
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            file_path: row.get(1)?,
            title: row.get(2)?,
            release_date: row.get(3)?,
            format: row.get(4)?,
            artists: Vec::new(),
            tags: Vec::new(),
        })
    }
}

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

use chrono::NaiveDate;

/// Audio formats the catalog accepts.
pub const SUPPORTED_FORMATS: [&str; 6] = ["mp3", "flac", "wav", "ogg", "aac", "m4a"];

/// The materialized view of a song returned by search: the storage
/// artifact, the song metadata, and the linked artist and tag names.
#[derive(Debug, Clone, PartialEq)]
pub struct SongDetails {
    pub id: i64,
    pub file_path: String,
    pub title: String,
    pub release_date: NaiveDate,
    pub format: String,
    pub artists: Vec<String>,
    pub tags: Vec<String>,
}

/// The metadata criterion of a search request.
///
/// Fields are independent and ANDed. A filter with every field absent is
/// unrestricted and imposes no constraint on the result set.
#[derive(Debug, Clone, Default)]
pub struct MetadataFilter {
    pub title: Option<String>,
    pub format: Option<String>,
    pub release_date: Option<DateFilter>,
}

impl MetadataFilter {
    pub fn is_unrestricted(&self) -> bool {
        self.title.is_none() && self.format.is_none() && self.release_date.is_none()
    }
}

/// Release date restriction: a single exact date, or an inclusive range
/// in the order supplied by the caller (not normalized).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateFilter {
    On(NaiveDate),
    Between(NaiveDate, NaiveDate),
}

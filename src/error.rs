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

//! Application error taxonomy.
//!
//! Validation failures abort the running command immediately. Selection
//! errors ([`Error::Syntax`], [`Error::Overlap`], [`Error::InvalidInterval`])
//! are recovered inside the selection prompt loop and only escape it through
//! the retry budget. Store and filesystem failures are surfaced to the
//! caller untouched; there is no automatic retry.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed request shape or values. Aborts the command, no retry.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The search preceding an archive produced no songs. Raised before
    /// the selection prompt is ever shown.
    #[error("no songs found")]
    EmptyResult,

    /// The selection string does not match the grammar.
    #[error("invalid selection syntax: {0}")]
    Syntax(String),

    /// Two selection intervals share at least one index.
    #[error("overlapping intervals")]
    Overlap,

    /// An interval is inverted or out of range under the strict policy.
    #[error("invalid interval: {0}")]
    InvalidInterval(String),

    /// Two selected songs share a base filename; packing them would
    /// silently overwrite one with the other inside the container.
    #[error("duplicate archive entry: {0}")]
    DuplicateEntry(String),

    /// The selection prompt spent its injectable retry budget.
    #[error("selection retries exhausted")]
    RetriesExhausted,

    #[error("song with id {0} does not exist")]
    NotFound(i64),

    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

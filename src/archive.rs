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

//! Archive packaging.
//!
//! Takes the ordered search results and a validated, non-overlapping
//! interval list, concatenates the selected slices in encounter order,
//! and writes each selected song's storage artifact into a single zip
//! container named by a randomly generated token. Entries are keyed by
//! their original base filename.

use std::collections::HashSet;
use std::fs::File;
use std::io;

use rand::distr::{Alphanumeric, SampleString};
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::error::Error;
use crate::model::SongDetails;
use crate::select::Interval;
use crate::storage::{Storage, base_name};

/// Length of generated archive names.
pub const NAME_LEN: usize = 8;

/// Generates an alphanumeric archive name.
///
/// The name doubles as the only identifier of the archive exposed to the
/// user, so it is drawn from `rand::rng()`, a cryptographically secure
/// source, rather than a plain PRNG.
pub fn random_name(length: usize) -> String {
    Alphanumeric.sample_string(&mut rand::rng(), length)
}

/// The slices of `songs` denoted by `intervals`, concatenated in interval
/// encounter order. Out-of-range bounds are clamped and inverted
/// intervals yield nothing, so the lenient range policy is safe to apply.
pub fn select<'a>(songs: &'a [SongDetails], intervals: &[Interval]) -> Vec<&'a SongDetails> {
    let mut selected = Vec::new();
    for interval in intervals {
        let start = interval.start.min(songs.len());
        let end = interval.end.min(songs.len());
        if start < end {
            selected.extend(&songs[start..end]);
        }
    }
    selected
}

/// Writes the selected songs into a new zip container in the storage
/// directory and returns the generated archive name (without extension).
///
/// # Errors
///
/// * [`Error::DuplicateEntry`] when two selected songs share a base
///   filename; the container keys entries by base filename, so packing
///   both would lose one.
/// * I/O and zip failures are surfaced unchanged.
pub fn pack(
    songs: &[SongDetails],
    intervals: &[Interval],
    storage: &Storage,
) -> Result<String, Error> {
    let selected = select(songs, intervals);

    let mut seen = HashSet::new();
    for song in &selected {
        let name = base_name(&song.file_path);
        if !seen.insert(name) {
            return Err(Error::DuplicateEntry(name.to_string()));
        }
    }

    let token = random_name(NAME_LEN);
    let file = File::create(storage.archive_path(&token))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for song in selected {
        zip.start_file(base_name(&song.file_path), options)?;
        let mut source = File::open(&song.file_path)?;
        io::copy(&mut source, &mut zip)?;
    }

    zip.finish()?;
    Ok(token)
}

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

//! Command request files.
//!
//! Every command takes the path to a JSON request file with camelCase
//! keys. The file is deserialized strictly (unknown or missing keys are
//! rejected) and then validated; anything wrong with shape or values is
//! reported as [`Error::Validation`] before the command logic runs.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::model::{DateFilter, MetadataFilter, SUPPORTED_FORMATS};

fn load<T: DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let file = File::open(path).map_err(|e| {
        Error::Validation(format!("cannot read request file {}: {e}", path.display()))
    })?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| Error::Validation(format!("malformed request: {e}")))
}

fn supported_format(format: &str) -> Result<(), Error> {
    if SUPPORTED_FORMATS.contains(&format) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "format {format:?} is not supported"
        )))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateRequest {
    pub file_path: String,
    pub name: String,
    pub format: String,
    pub release_date: NaiveDate,
    pub artists: Vec<String>,
    pub tags: Vec<String>,
    /// Derive metadata from the file name instead of the explicit fields.
    pub auto: bool,
}

impl CreateRequest {
    fn validate(&self) -> Result<(), Error> {
        if !Path::new(&self.file_path).is_file() {
            return Err(Error::Validation(format!(
                "file {} not found or not a file",
                self.file_path
            )));
        }
        if self.auto {
            // Metadata comes from the file name; nothing else to check.
            return Ok(());
        }
        if self.artists.is_empty() {
            return Err(Error::Validation(
                "songs must have at least one artist".into(),
            ));
        }
        supported_format(&self.format)
    }
}

pub fn load_create(path: &Path) -> Result<CreateRequest, Error> {
    let request: CreateRequest = load(path)?;
    request.validate()?;
    Ok(request)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteRequest {
    pub id: i64,
}

pub fn load_delete(path: &Path) -> Result<DeleteRequest, Error> {
    let request: DeleteRequest = load(path)?;
    if request.id < 0 {
        return Err(Error::Validation("id must be a positive integer".into()));
    }
    Ok(request)
}

/// Update request; empty strings and lists leave the field unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateRequest {
    pub id: i64,
    pub new_name: String,
    pub new_format: String,
    pub new_release_date: String,
    pub new_artists: Vec<String>,
    pub new_tags: Vec<String>,
}

impl UpdateRequest {
    fn validate(&self) -> Result<(), Error> {
        if self.id < 0 {
            return Err(Error::Validation("id must be a positive integer".into()));
        }
        if !self.new_format.is_empty() {
            supported_format(&self.new_format)?;
        }
        if !self.new_release_date.is_empty() {
            self.release_date()?;
        }
        Ok(())
    }

    /// The parsed replacement date, or `None` when left unchanged.
    pub fn release_date(&self) -> Result<Option<NaiveDate>, Error> {
        if self.new_release_date.is_empty() {
            return Ok(None);
        }
        self.new_release_date
            .parse()
            .map(Some)
            .map_err(|_| Error::Validation("date must be YEAR-MONTH-DAY".into()))
    }
}

pub fn load_update(path: &Path) -> Result<UpdateRequest, Error> {
    let request: UpdateRequest = load(path)?;
    request.validate()?;
    Ok(request)
}

/// Search request. Every category left empty is unrestricted; the
/// request with all categories empty matches the whole catalog.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SearchRequest {
    pub name: String,
    pub format: String,
    /// Zero dates = unrestricted, one = exact, two = inclusive range.
    pub release_date: Vec<NaiveDate>,
    pub artists: Vec<String>,
    pub tags: Vec<String>,
}

impl SearchRequest {
    fn validate(&self) -> Result<(), Error> {
        if self.release_date.len() > 2 {
            return Err(Error::Validation(
                "release date can't have more than 2 values".into(),
            ));
        }
        Ok(())
    }

    pub fn metadata_filter(&self) -> MetadataFilter {
        let non_empty = |s: &String| (!s.is_empty()).then(|| s.clone());
        MetadataFilter {
            title: non_empty(&self.name),
            format: non_empty(&self.format),
            release_date: match *self.release_date.as_slice() {
                [] => None,
                [on] => Some(DateFilter::On(on)),
                [lo, hi, ..] => Some(DateFilter::Between(lo, hi)),
            },
        }
    }
}

pub fn load_search(path: &Path) -> Result<SearchRequest, Error> {
    let request: SearchRequest = load(path)?;
    request.validate()?;
    Ok(request)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PlayRequest {
    pub song_id: i64,
}

pub fn load_play(path: &Path) -> Result<PlayRequest, Error> {
    load(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn request_file(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request.json");
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn search_request_parses_camel_case_keys() {
        let (_dir, path) = request_file(
            r#"{"name":"mon","format":"","releaseDate":["2020-01-01"],"artists":[],"tags":["rock"]}"#,
        );
        let request = load_search(&path).unwrap();
        assert_eq!(request.name, "mon");
        assert_eq!(request.tags, vec!["rock"]);
        assert_eq!(
            request.metadata_filter().release_date,
            Some(DateFilter::On("2020-01-01".parse().unwrap()))
        );
    }

    #[test]
    fn search_request_rejects_unknown_keys() {
        let (_dir, path) = request_file(
            r#"{"name":"","format":"","releaseDate":[],"artists":[],"tags":[],"extra":1}"#,
        );
        assert!(matches!(load_search(&path), Err(Error::Validation(_))));
    }

    #[test]
    fn search_request_rejects_three_dates() {
        let (_dir, path) = request_file(
            r#"{"name":"","format":"","releaseDate":["2020-01-01","2020-01-02","2020-01-03"],"artists":[],"tags":[]}"#,
        );
        assert!(matches!(load_search(&path), Err(Error::Validation(_))));
    }

    #[test]
    fn search_request_rejects_malformed_date() {
        let (_dir, path) = request_file(
            r#"{"name":"","format":"","releaseDate":["01/01/2020"],"artists":[],"tags":[]}"#,
        );
        assert!(matches!(load_search(&path), Err(Error::Validation(_))));
    }

    #[test]
    fn create_request_requires_an_artist() {
        let dir = tempfile::tempdir().unwrap();
        let song = dir.path().join("a.mp3");
        std::fs::write(&song, "x").unwrap();

        let (_dir, path) = request_file(&format!(
            r#"{{"filePath":{:?},"name":"A","format":"mp3","releaseDate":"2020-01-01","artists":[],"tags":[],"auto":false}}"#,
            song.to_str().unwrap()
        ));
        assert!(matches!(load_create(&path), Err(Error::Validation(_))));
    }

    #[test]
    fn create_request_rejects_unsupported_format() {
        let dir = tempfile::tempdir().unwrap();
        let song = dir.path().join("a.xyz");
        std::fs::write(&song, "x").unwrap();

        let (_dir, path) = request_file(&format!(
            r#"{{"filePath":{:?},"name":"A","format":"xyz","releaseDate":"2020-01-01","artists":["X"],"tags":[],"auto":false}}"#,
            song.to_str().unwrap()
        ));
        assert!(matches!(load_create(&path), Err(Error::Validation(_))));
    }

    #[test]
    fn update_request_treats_empty_strings_as_unchanged() {
        let (_dir, path) = request_file(
            r#"{"id":3,"newName":"","newFormat":"","newReleaseDate":"","newArtists":[],"newTags":["live"]}"#,
        );
        let request = load_update(&path).unwrap();
        assert_eq!(request.release_date().unwrap(), None);
        assert_eq!(request.new_tags, vec!["live"]);
    }

    #[test]
    fn update_request_rejects_bad_date() {
        let (_dir, path) = request_file(
            r#"{"id":3,"newName":"","newFormat":"","newReleaseDate":"soon","newArtists":[],"newTags":[]}"#,
        );
        assert!(matches!(load_update(&path), Err(Error::Validation(_))));
    }

    #[test]
    fn delete_request_rejects_negative_id() {
        let (_dir, path) = request_file(r#"{"id":-1}"#);
        assert!(matches!(load_delete(&path), Err(Error::Validation(_))));
    }
}

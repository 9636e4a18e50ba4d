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

//! The file area.
//!
//! Song artifacts and produced archives live flat inside a single storage
//! directory; files are addressed by their base filename. The storage
//! handle is constructed once at startup and passed into the command
//! handlers explicitly.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Whether a file with the same base filename as `path` is already
    /// present in the storage directory.
    pub fn contains(&self, path: &str) -> bool {
        self.root.join(base_name(path)).exists()
    }

    /// The destination path a source file would occupy inside storage.
    pub fn destination(&self, source: &str) -> PathBuf {
        self.root.join(base_name(source))
    }

    /// Copies a source file into the storage directory, returning the
    /// destination path.
    pub fn import(&self, source: &Path) -> io::Result<PathBuf> {
        let dest = self.root.join(
            source
                .file_name()
                .ok_or_else(|| io::Error::other("source path has no file name"))?,
        );
        fs::copy(source, &dest)?;
        Ok(dest)
    }

    /// Path for a new archive container with the given token name.
    pub fn archive_path(&self, token: &str) -> PathBuf {
        self.root.join(format!("{token}.zip"))
    }

    /// Removes every file in the storage directory, keeping the
    /// directory itself.
    pub fn clear(&self) -> io::Result<()> {
        fs::remove_dir_all(&self.root)?;
        fs::create_dir(&self.root)?;
        Ok(())
    }
}

/// The final path component of a (possibly absolute) file path string.
pub fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_strips_directories() {
        assert_eq!(base_name("/music/a/song.mp3"), "song.mp3");
        assert_eq!(base_name("song.mp3"), "song.mp3");
    }

    #[test]
    fn contains_matches_on_base_filename() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf());
        fs::write(dir.path().join("song.mp3"), b"x").unwrap();

        assert!(storage.contains("/somewhere/else/song.mp3"));
        assert!(!storage.contains("/somewhere/else/other.mp3"));
    }

    #[test]
    fn import_copies_into_root() {
        let src_dir = tempfile::tempdir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf());

        let source = src_dir.path().join("song.mp3");
        fs::write(&source, b"audio").unwrap();

        let dest = storage.import(&source).unwrap();
        assert_eq!(dest, dir.path().join("song.mp3"));
        assert_eq!(fs::read(dest).unwrap(), b"audio");
    }

    #[test]
    fn clear_empties_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf());
        fs::write(dir.path().join("song.mp3"), b"x").unwrap();

        storage.clear().unwrap();
        assert!(dir.path().is_dir());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}

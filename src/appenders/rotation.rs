//! Size-based rotation over a numbered file family
//!
//! Files are named `<prefix>_<index>.csv` with the index starting at 0. The
//! file to write next is re-derived from the folder contents on every call,
//! so nothing about the current file is cached between writes:
//!
//! * probe `prefix_0.csv`, `prefix_1.csv`, ... up to the first missing index
//!   (the *boundary index*);
//! * no file at all: write `prefix_0.csv`;
//! * otherwise, if the last existing file is below `max_bytes`, keep
//!   appending to it, else start the file at the boundary index.
//!
//! The scan stops at the first gap. A family with holes (files removed out
//! of band) is not repaired; the file just before the first hole is treated
//! as the last one.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const FILE_EXTENSION: &str = "csv";

/// Folder, name prefix and size threshold of one file family
///
/// # Examples
///
/// ```
/// use csv_log_sink::appenders::LogFileFamily;
///
/// let family = LogFileFamily::new("/var/log/app", "logs", 500 * 1024);
/// assert!(family.file_path(3).ends_with("logs_3.csv"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileFamily {
    folder: PathBuf,
    prefix: String,
    max_bytes: u64,
}

/// Outcome of one rotation decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub index: usize,
    pub path: PathBuf,
    /// The previous file was full and this write starts a new one
    pub rotated: bool,
}

/// Writer-side view of the family after the last resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationState {
    pub folder: PathBuf,
    pub max_bytes: u64,
    pub current_file_index: usize,
}

impl LogFileFamily {
    pub fn new(folder: impl Into<PathBuf>, prefix: impl Into<String>, max_bytes: u64) -> Self {
        Self {
            folder: folder.into(),
            prefix: prefix.into(),
            max_bytes,
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn file_path(&self, index: usize) -> PathBuf {
        self.folder
            .join(format!("{}_{}.{}", self.prefix, index, FILE_EXTENSION))
    }

    /// First index whose file does not exist
    pub fn boundary_index(&self) -> usize {
        let mut index = 0;
        while self.file_path(index).exists() {
            index += 1;
        }
        index
    }

    /// Pick the file the next line goes to
    ///
    /// # Errors
    ///
    /// Returns error if the size of the last existing file cannot be read
    pub fn resolve(&self) -> io::Result<ResolvedFile> {
        let boundary = self.boundary_index();
        if boundary == 0 {
            return Ok(ResolvedFile {
                index: 0,
                path: self.file_path(0),
                rotated: false,
            });
        }

        let last = boundary - 1;
        let last_path = self.file_path(last);
        let size = fs::metadata(&last_path)?.len();

        if size >= self.max_bytes {
            Ok(ResolvedFile {
                index: boundary,
                path: self.file_path(boundary),
                rotated: true,
            })
        } else {
            Ok(ResolvedFile {
                index: last,
                path: last_path,
                rotated: false,
            })
        }
    }

    /// Existing files in index order, stopping at the boundary
    pub fn existing_files(&self) -> Vec<PathBuf> {
        (0..self.boundary_index()).map(|i| self.file_path(i)).collect()
    }

    pub fn state(&self, current_file_index: usize) -> RotationState {
        RotationState {
            folder: self.folder.clone(),
            max_bytes: self.max_bytes,
            current_file_index,
        }
    }
}

#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Virtual file tree over a content package
//!
//! A package is delivered either as a zip archive or as a directory. Both
//! backings present the same read-only view:
//!
//! - paths are `/` separated and relative to the package root
//! - names compare case-insensitively, but nodes report their stored name
//! - listings are ordered by name and stable across runs
//! - a missing entry is `Ok(None)` (or `false`), never an error; only real
//!   I/O faults surface as [`TreeError`]

mod archive;
mod directory;
mod package;

pub use archive::ZipTree;
pub use directory::DirTree;
pub use package::{
    discover_packages, is_package, open_package, package_name, ITEMS_FOLDER, MANIFEST_FILE,
    STIMULI_FOLDER,
};

use std::cmp::Ordering;
use tabulator_errors::{ContentError, Error, TreeError};
use tabulator_types::fold_case;

/// Which physical form backs a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeBacking {
    Zip,
    Directory,
}

impl TreeBacking {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Directory => "directory",
        }
    }
}

/// A file in the tree. Reading goes through [`PackageTree::read`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeFile {
    /// Stored name, original case
    pub name: String,
    /// Root-relative path, original case
    pub path: String,
    pub len: u64,
}

impl TreeFile {
    /// Extension without the dot, as stored
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        (!stem.is_empty()).then_some(ext)
    }

    #[must_use]
    pub fn has_extension(&self, ext: &str) -> bool {
        self.extension()
            .is_some_and(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// A folder in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeFolder {
    pub name: String,
    /// Root-relative path; empty for the root
    pub path: String,
}

impl TreeFolder {
    /// Path of a child entry of this folder
    #[must_use]
    pub fn child_path(&self, name: &str) -> String {
        join_path(&self.path, name)
    }
}

/// Uniform read-only access to a package.
pub trait PackageTree {
    /// Package name (directory name or archive file stem)
    fn name(&self) -> &str;

    fn backing(&self) -> TreeBacking;

    /// Look up a file by path, case-insensitively
    ///
    /// # Errors
    ///
    /// Returns an error only for I/O faults, not for absence.
    fn get_file(&self, path: &str) -> Result<Option<TreeFile>, Error>;

    /// Look up a folder by path, case-insensitively. The empty path is the root.
    ///
    /// # Errors
    ///
    /// Returns an error only for I/O faults, not for absence.
    fn get_folder(&self, path: &str) -> Result<Option<TreeFolder>, Error>;

    /// Files directly inside `folder`, name ordered
    ///
    /// # Errors
    ///
    /// Returns an error only for I/O faults. A missing folder lists as empty.
    fn list_files(&self, folder: &str) -> Result<Vec<TreeFile>, Error>;

    /// Folders directly inside `folder`, name ordered
    ///
    /// # Errors
    ///
    /// Returns an error only for I/O faults. A missing folder lists as empty.
    fn list_folders(&self, folder: &str) -> Result<Vec<TreeFolder>, Error>;

    /// Read a whole file
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be read.
    fn read(&self, file: &TreeFile) -> Result<Vec<u8>, Error>;

    fn file_exists(&self, path: &str) -> bool {
        matches!(self.get_file(path), Ok(Some(_)))
    }

    /// Read a file as UTF-8 text with any byte order mark removed
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be read or is not UTF-8.
    fn read_to_string(&self, file: &TreeFile) -> Result<String, Error> {
        let bytes = self.read(file)?;
        let text = String::from_utf8(bytes).map_err(|_| ContentError::InvalidEncoding {
            filename: file.path.clone(),
        })?;
        Ok(match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        })
    }

    /// Every file below `folder` at any depth, in pre-order by name
    ///
    /// # Errors
    ///
    /// Returns an error only for I/O faults.
    fn list_files_recursive(&self, folder: &str) -> Result<Vec<TreeFile>, Error> {
        let mut files = self.list_files(folder)?;
        for sub in self.list_folders(folder)? {
            files.extend(self.list_files_recursive(&sub.path)?);
        }
        Ok(files)
    }
}

/// Normalize a caller supplied path: `\` becomes `/`, empty segments and
/// `.` are dropped.
///
/// # Errors
///
/// Returns an error for `..` segments, which would escape the package.
pub fn normalize_path(path: &str) -> Result<String, TreeError> {
    let mut segments = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                return Err(TreeError::InvalidPath {
                    path: path.to_string(),
                })
            }
            s => segments.push(s),
        }
    }
    Ok(segments.join("/"))
}

pub(crate) fn join_path(folder: &str, name: &str) -> String {
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{folder}/{name}")
    }
}

pub(crate) fn split_parent(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some((parent, name)) => (parent, name),
        None => ("", path),
    }
}

/// Listing order shared by both backings: case-folded name, then raw name
pub(crate) fn compare_names(a: &str, b: &str) -> Ordering {
    fold_case(a)
        .cmp(&fold_case(b))
        .then_with(|| a.cmp(b))
}

//! Directory-backed tree. Every call goes to the host file system; a
//! case-insensitive scan of the parent is used when the exact name is absent.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tabulator_errors::{Error, TreeError};
use tabulator_types::names_equal;
use walkdir::WalkDir;

use crate::{
    compare_names, join_path, normalize_path, package_name, split_parent, PackageTree,
    TreeBacking, TreeFile, TreeFolder,
};

/// Read-only view of a directory
#[derive(Debug, Clone)]
pub struct DirTree {
    name: String,
    root: PathBuf,
}

enum Resolved {
    File { path: String, len: u64 },
    Folder { path: String },
}

impl DirTree {
    /// Open a directory as a package tree
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a readable directory.
    pub fn open(root: &Path) -> Result<Self, Error> {
        let metadata = fs::metadata(root).map_err(|e| TreeError::OpenFailed {
            path: root.display().to_string(),
            message: e.to_string(),
        })?;
        if !metadata.is_dir() {
            return Err(TreeError::OpenFailed {
                path: root.display().to_string(),
                message: "not a directory".to_string(),
            }
            .into());
        }
        Ok(Self {
            name: package_name(root),
            root: root.to_path_buf(),
        })
    }

    /// Physical location of the tree root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk `path` one segment at a time, matching each segment exactly
    /// first and case-insensitively second.
    fn resolve(&self, path: &str) -> Result<Option<Resolved>, Error> {
        let Ok(normalized) = normalize_path(path) else {
            return Ok(None);
        };
        if normalized.is_empty() {
            return Ok(Some(Resolved::Folder {
                path: String::new(),
            }));
        }

        let mut physical = self.root.clone();
        let mut logical = String::new();
        let segments: Vec<&str> = normalized.split('/').collect();
        let last = segments.len() - 1;

        for (position, segment) in segments.iter().enumerate() {
            let Some(stored) = self.scan_for(&physical, segment, &logical)? else {
                return Ok(None);
            };
            physical.push(&stored);
            logical = join_path(&logical, &stored);

            let metadata = match fs::metadata(&physical) {
                Ok(m) => m,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(TreeError::from_io_with_path(&e, &logical).into()),
            };

            if position == last {
                return Ok(Some(if metadata.is_dir() {
                    Resolved::Folder { path: logical }
                } else {
                    Resolved::File {
                        path: logical,
                        len: metadata.len(),
                    }
                }));
            }
            if !metadata.is_dir() {
                return Ok(None);
            }
        }
        Ok(None)
    }

    /// Stored name of `segment` inside `dir`: an exact match wins over a
    /// case-insensitive one.
    fn scan_for(&self, dir: &Path, segment: &str, logical: &str) -> Result<Option<String>, Error> {
        let mut case_insensitive = None;
        for entry in self.entries(dir, logical)? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name == segment {
                return Ok(Some(name));
            }
            if case_insensitive.is_none() && names_equal(&name, segment) {
                case_insensitive = Some(name);
            }
        }
        Ok(case_insensitive)
    }

    /// Direct children of a physical directory, name ordered
    fn entries(&self, dir: &Path, logical: &str) -> Result<Vec<walkdir::DirEntry>, Error> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
            match entry {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    let Some(io) = e.io_error() else {
                        continue;
                    };
                    if io.kind() == ErrorKind::NotFound {
                        continue;
                    }
                    return Err(TreeError::from_io_with_path(io, logical).into());
                }
            }
        }
        entries.sort_by(|a, b| {
            compare_names(&a.file_name().to_string_lossy(), &b.file_name().to_string_lossy())
        });
        tracing::trace!(dir = %dir.display(), count = entries.len(), "listed directory");
        Ok(entries)
    }

    fn physical(&self, logical: &str) -> PathBuf {
        let mut path = self.root.clone();
        for segment in logical.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path
    }
}

impl PackageTree for DirTree {
    fn name(&self) -> &str {
        &self.name
    }

    fn backing(&self) -> TreeBacking {
        TreeBacking::Directory
    }

    fn get_file(&self, path: &str) -> Result<Option<TreeFile>, Error> {
        Ok(match self.resolve(path)? {
            Some(Resolved::File { path, len }) => Some(TreeFile {
                name: split_parent(&path).1.to_string(),
                path,
                len,
            }),
            _ => None,
        })
    }

    fn get_folder(&self, path: &str) -> Result<Option<TreeFolder>, Error> {
        Ok(match self.resolve(path)? {
            Some(Resolved::Folder { path }) => Some(TreeFolder {
                name: split_parent(&path).1.to_string(),
                path,
            }),
            _ => None,
        })
    }

    fn list_files(&self, folder: &str) -> Result<Vec<TreeFile>, Error> {
        let Some(folder) = self.get_folder(folder)? else {
            return Ok(Vec::new());
        };
        let mut files = Vec::new();
        for entry in self.entries(&self.physical(&folder.path), &folder.path)? {
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let len = entry.metadata().map(|m| m.len()).unwrap_or(0);
            files.push(TreeFile {
                path: folder.child_path(&name),
                name,
                len,
            });
        }
        Ok(files)
    }

    fn list_folders(&self, folder: &str) -> Result<Vec<TreeFolder>, Error> {
        let Some(folder) = self.get_folder(folder)? else {
            return Ok(Vec::new());
        };
        let mut folders = Vec::new();
        for entry in self.entries(&self.physical(&folder.path), &folder.path)? {
            if !entry.file_type().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            folders.push(TreeFolder {
                path: folder.child_path(&name),
                name,
            });
        }
        Ok(folders)
    }

    fn read(&self, file: &TreeFile) -> Result<Vec<u8>, Error> {
        fs::read(self.physical(&file.path))
            .map_err(|e| TreeError::from_io_with_path(&e, &file.path).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let item = dir.path().join("Items").join("Item-100-1");
        fs::create_dir_all(&item).unwrap();
        fs::write(item.join("item-100-1.xml"), "<itemrelease/>").unwrap();
        fs::write(item.join("Whale.OGG"), "ogg!").unwrap();
        fs::create_dir_all(dir.path().join("Stimuli")).unwrap();
        dir
    }

    #[test]
    fn resolves_case_insensitively() {
        let dir = fixture();
        let tree = DirTree::open(dir.path()).unwrap();

        let file = tree.get_file("items/item-100-1/whale.ogg").unwrap().unwrap();
        assert_eq!(file.name, "Whale.OGG");
        assert_eq!(file.path, "Items/Item-100-1/Whale.OGG");
        assert_eq!(file.len, 4);
        assert_eq!(tree.read(&file).unwrap(), b"ogg!");
    }

    #[test]
    fn files_and_folders_are_distinct() {
        let dir = fixture();
        let tree = DirTree::open(dir.path()).unwrap();

        assert!(tree.get_file("Items").unwrap().is_none());
        assert!(tree.get_folder("Items").unwrap().is_some());
        assert!(tree
            .get_folder("Items/Item-100-1/item-100-1.xml")
            .unwrap()
            .is_none());
        assert!(tree.get_file("Items/Item-100-1/item-100-1.xml/x").unwrap().is_none());
    }

    #[test]
    fn listings_are_name_ordered() {
        let dir = fixture();
        let tree = DirTree::open(dir.path()).unwrap();

        let names: Vec<_> = tree
            .list_files("Items/Item-100-1")
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["item-100-1.xml", "Whale.OGG"]);

        let folders: Vec<_> = tree
            .list_folders("")
            .unwrap()
            .into_iter()
            .map(|f| f.path)
            .collect();
        assert_eq!(folders, vec!["Items", "Stimuli"]);
    }

    #[test]
    fn missing_paths_are_absent() {
        let dir = fixture();
        let tree = DirTree::open(dir.path()).unwrap();

        assert!(tree.get_file("nope.xml").unwrap().is_none());
        assert!(tree.list_files("Nope").unwrap().is_empty());
        assert!(!tree.file_exists("../outside.xml"));
    }

    #[test]
    fn opening_a_file_fails() {
        let dir = fixture();
        let err = DirTree::open(&dir.path().join("Items/Item-100-1/item-100-1.xml")).unwrap_err();
        assert!(matches!(err, Error::Tree(TreeError::OpenFailed { .. })));
    }
}

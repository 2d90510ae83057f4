//! Zip-backed tree. The whole central directory is indexed once at open
//! time; lookups never touch the archive again.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tabulator_errors::{Error, TreeError};
use tabulator_types::fold_case;
use zip::ZipArchive;

use crate::{
    compare_names, normalize_path, package_name, split_parent, PackageTree, TreeBacking,
    TreeFile, TreeFolder,
};

#[derive(Debug)]
enum Node {
    File { path: String, len: u64, index: usize },
    Folder { path: String },
}

impl Node {
    fn path(&self) -> &str {
        match self {
            Node::File { path, .. } | Node::Folder { path } => path,
        }
    }

    fn name(&self) -> &str {
        split_parent(self.path()).1
    }
}

/// Path index keyed by lower-cased path
#[derive(Debug, Default)]
struct Index {
    nodes: HashMap<String, Node>,
    /// folder key -> child keys, in listing order once sorted
    children: HashMap<String, Vec<String>>,
}

impl Index {
    fn add_folder(&mut self, path: &str) {
        let key = fold_case(path);
        if self.nodes.contains_key(&key) {
            return;
        }
        let (parent, _) = split_parent(path);
        if !parent.is_empty() {
            self.add_folder(parent);
        }
        self.children
            .entry(fold_case(parent))
            .or_default()
            .push(key.clone());
        self.nodes.insert(
            key,
            Node::Folder {
                path: path.to_string(),
            },
        );
    }

    fn add_file(&mut self, path: String, len: u64, index: usize) {
        let key = fold_case(&path);
        if self.nodes.contains_key(&key) {
            tracing::debug!(entry = %path, "duplicate archive entry ignored");
            return;
        }
        let (parent, _) = split_parent(&path);
        if !parent.is_empty() {
            self.add_folder(parent);
        }
        self.children
            .entry(fold_case(parent))
            .or_default()
            .push(key.clone());
        self.nodes.insert(key, Node::File { path, len, index });
    }

    fn sort_children(&mut self) {
        let nodes = &self.nodes;
        for list in self.children.values_mut() {
            list.sort_by(|a, b| {
                let a = nodes.get(a).map_or("", Node::name);
                let b = nodes.get(b).map_or("", Node::name);
                compare_names(a, b)
            });
        }
    }

    fn children_of(&self, folder: &str) -> impl Iterator<Item = &Node> {
        let key = normalize_path(folder)
            .map(|p| fold_case(&p))
            .unwrap_or_default();
        self.children
            .get(&key)
            .into_iter()
            .flatten()
            .filter_map(|child| self.nodes.get(child))
    }
}

/// Read-only view of a zip archive
pub struct ZipTree {
    name: String,
    archive_path: String,
    archive: RefCell<ZipArchive<File>>,
    index: Index,
}

impl std::fmt::Debug for ZipTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipTree")
            .field("name", &self.name)
            .field("archive_path", &self.archive_path)
            .field("entries", &self.index.nodes.len())
            .finish_non_exhaustive()
    }
}

impl ZipTree {
    /// Open an archive and index every entry
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or is not a readable
    /// zip archive.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let archive_path = path.display().to_string();
        let file = File::open(path).map_err(|e| TreeError::OpenFailed {
            path: archive_path.clone(),
            message: e.to_string(),
        })?;
        let mut archive = ZipArchive::new(file).map_err(|e| TreeError::CorruptArchive {
            path: archive_path.clone(),
            message: e.to_string(),
        })?;

        let index = build_index(&mut archive, &archive_path)?;
        tracing::debug!(
            archive = %archive_path,
            entries = index.nodes.len(),
            "indexed package archive"
        );

        Ok(Self {
            name: package_name(path),
            archive_path,
            archive: RefCell::new(archive),
            index,
        })
    }

    fn lookup(&self, path: &str) -> Option<&Node> {
        let key = fold_case(&normalize_path(path).ok()?);
        self.index.nodes.get(&key)
    }
}

fn build_index(archive: &mut ZipArchive<File>, archive_path: &str) -> Result<Index, TreeError> {
    let mut index = Index::default();
    index.nodes.insert(
        String::new(),
        Node::Folder {
            path: String::new(),
        },
    );

    for i in 0..archive.len() {
        let entry = archive
            .by_index(i)
            .map_err(|e| TreeError::CorruptArchive {
                path: archive_path.to_string(),
                message: e.to_string(),
            })?;

        let Ok(path) = normalize_path(entry.name()) else {
            tracing::warn!(entry = entry.name(), "skipping archive entry outside the package root");
            continue;
        };
        if path.is_empty() {
            continue;
        }

        if entry.is_dir() {
            index.add_folder(&path);
        } else {
            index.add_file(path, entry.size(), i);
        }
    }

    index.sort_children();
    Ok(index)
}

fn to_file(node: &Node) -> Option<TreeFile> {
    match node {
        Node::File { path, len, .. } => Some(TreeFile {
            name: node.name().to_string(),
            path: path.clone(),
            len: *len,
        }),
        Node::Folder { .. } => None,
    }
}

fn to_folder(node: &Node) -> Option<TreeFolder> {
    match node {
        Node::Folder { path } => Some(TreeFolder {
            name: node.name().to_string(),
            path: path.clone(),
        }),
        Node::File { .. } => None,
    }
}

impl PackageTree for ZipTree {
    fn name(&self) -> &str {
        &self.name
    }

    fn backing(&self) -> TreeBacking {
        TreeBacking::Zip
    }

    fn get_file(&self, path: &str) -> Result<Option<TreeFile>, Error> {
        Ok(self.lookup(path).and_then(to_file))
    }

    fn get_folder(&self, path: &str) -> Result<Option<TreeFolder>, Error> {
        Ok(self.lookup(path).and_then(to_folder))
    }

    fn list_files(&self, folder: &str) -> Result<Vec<TreeFile>, Error> {
        Ok(self.index.children_of(folder).filter_map(to_file).collect())
    }

    fn list_folders(&self, folder: &str) -> Result<Vec<TreeFolder>, Error> {
        Ok(self.index.children_of(folder).filter_map(to_folder).collect())
    }

    fn read(&self, file: &TreeFile) -> Result<Vec<u8>, Error> {
        let read_failed = |message: String| TreeError::ReadFailed {
            path: file.path.clone(),
            message,
        };

        let Some(Node::File { index, len, .. }) = self.lookup(&file.path) else {
            return Err(read_failed("no such archive entry".to_string()).into());
        };

        let mut archive = self
            .archive
            .try_borrow_mut()
            .map_err(|_| read_failed("archive is busy".to_string()))?;
        let mut entry = archive
            .by_index(*index)
            .map_err(|e| read_failed(e.to_string()))?;

        let mut buffer = Vec::with_capacity(usize::try_from(*len).unwrap_or(0));
        entry
            .read_to_end(&mut buffer)
            .map_err(|e| TreeError::from_io_with_path(&e, &file.path))?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn write_archive(entries: &[(&str, &str)]) -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new().suffix(".zip").tempfile().unwrap();
        let mut writer = zip::ZipWriter::new(file.reopen().unwrap());
        for (name, contents) in entries {
            if name.ends_with('/') {
                writer
                    .add_directory(*name, SimpleFileOptions::default())
                    .unwrap();
            } else {
                writer
                    .start_file(*name, SimpleFileOptions::default())
                    .unwrap();
                writer.write_all(contents.as_bytes()).unwrap();
            }
        }
        writer.finish().unwrap();
        file
    }

    #[test]
    fn implied_folders_are_indexed() {
        let archive = write_archive(&[
            ("Items/item-100-1/item-100-1.xml", "<itemrelease/>"),
            ("Items/item-100-1/metadata.xml", "<metadata/>"),
        ]);
        let tree = ZipTree::open(archive.path()).unwrap();

        assert!(tree.get_folder("Items").unwrap().is_some());
        assert!(tree.get_folder("items/ITEM-100-1").unwrap().is_some());
        let names: Vec<_> = tree
            .list_files("Items/item-100-1")
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["item-100-1.xml", "metadata.xml"]);
    }

    #[test]
    fn lookups_are_case_insensitive_but_report_stored_case() {
        let archive = write_archive(&[("Items/Item-1-2/Audio.OGG", "abc")]);
        let tree = ZipTree::open(archive.path()).unwrap();

        let file = tree.get_file("items/item-1-2/audio.ogg").unwrap().unwrap();
        assert_eq!(file.name, "Audio.OGG");
        assert_eq!(file.path, "Items/Item-1-2/Audio.OGG");
        assert_eq!(file.len, 3);
        assert_eq!(tree.read(&file).unwrap(), b"abc");
    }

    #[test]
    fn absence_is_not_an_error() {
        let archive = write_archive(&[("imsmanifest.xml", "<manifest/>")]);
        let tree = ZipTree::open(archive.path()).unwrap();

        assert!(tree.get_file("missing.xml").unwrap().is_none());
        assert!(tree.get_folder("Items").unwrap().is_none());
        assert!(tree.list_files("Items").unwrap().is_empty());
        assert!(!tree.file_exists("../imsmanifest.xml"));
        assert!(tree.file_exists("/imsmanifest.xml"));
    }

    #[test]
    fn corrupt_archive_is_an_open_fault() {
        let mut file = tempfile::Builder::new().suffix(".zip").tempfile().unwrap();
        file.write_all(b"definitely not a zip").unwrap();
        let err = ZipTree::open(file.path()).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, Error::Tree(TreeError::CorruptArchive { .. })));
    }

    #[test]
    fn explicit_directory_entries_list_as_folders() {
        let archive = write_archive(&[("Stimuli/", ""), ("Items/", "")]);
        let tree = ZipTree::open(archive.path()).unwrap();
        let folders: Vec<_> = tree
            .list_folders("")
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(folders, vec!["Items", "Stimuli"]);
    }
}

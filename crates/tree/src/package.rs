//! Package recognition and opening

use std::path::{Path, PathBuf};

use tabulator_errors::{Error, PackageError};

use crate::{DirTree, PackageTree, ZipTree};

/// Manifest file at the package root
pub const MANIFEST_FILE: &str = "imsmanifest.xml";
pub const ITEMS_FOLDER: &str = "Items";
pub const STIMULI_FOLDER: &str = "Stimuli";

/// Name used for a package in reports: the directory name, or the archive
/// file name without its `.zip` extension.
#[must_use]
pub fn package_name(path: &Path) -> String {
    let is_zip = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
    let name = if is_zip {
        path.file_stem()
    } else {
        path.file_name()
    };
    name.map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// A tree is a package if it has a manifest at its root or sibling
/// `Items` and `Stimuli` folders.
#[must_use]
pub fn is_package(tree: &dyn PackageTree) -> bool {
    if tree.file_exists(MANIFEST_FILE) {
        return true;
    }
    matches!(tree.get_folder(ITEMS_FOLDER), Ok(Some(_)))
        && matches!(tree.get_folder(STIMULI_FOLDER), Ok(Some(_)))
}

/// Open a `.zip` archive or a directory as a tree, without checking
/// whether it is a package.
fn open_tree(path: &Path) -> Result<Box<dyn PackageTree>, Error> {
    if path.is_dir() {
        return Ok(Box::new(DirTree::open(path)?));
    }
    if path.is_file() {
        return Ok(Box::new(ZipTree::open(path)?));
    }
    Err(PackageError::NotFound {
        path: path.display().to_string(),
    }
    .into())
}

/// Open a package and verify that it looks like one
///
/// # Errors
///
/// Returns an error if the path does not exist, cannot be opened, or is not
/// recognized as a content package.
pub fn open_package(path: &Path) -> Result<Box<dyn PackageTree>, Error> {
    let tree = open_tree(path)?;
    if !is_package(tree.as_ref()) {
        return Err(PackageError::NotAPackage {
            path: path.display().to_string(),
        }
        .into());
    }
    tracing::debug!(
        package = tree.name(),
        backing = tree.backing().as_str(),
        "opened content package"
    );
    Ok(tree)
}

/// Packages directly under `folder`: sub-directories and `.zip` files that
/// are recognized as packages, in name order. Archives that fail to open
/// are included so the caller can report them.
///
/// # Errors
///
/// Returns an error if `folder` cannot be listed.
pub fn discover_packages(folder: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut candidates = Vec::new();
    for entry in walkdir::WalkDir::new(folder).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| match e.io_error() {
            Some(io) => Error::io_with_path(io, folder),
            None => Error::internal(e.to_string()),
        })?;
        let path = entry.path();
        let is_zip = entry.file_type().is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
        if entry.file_type().is_dir() || is_zip {
            candidates.push(path.to_path_buf());
        }
    }
    candidates.sort_by(|a, b| {
        crate::compare_names(&a.to_string_lossy(), &b.to_string_lossy())
    });

    let packages = candidates
        .into_iter()
        .filter(|path| match open_tree(path) {
            Ok(tree) => is_package(tree.as_ref()),
            Err(_) => path.is_file(),
        })
        .collect();
    Ok(packages)
}

//! Both backings must present identical semantics over the same content

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use tabulator_tree::*;
    use zip::write::SimpleFileOptions;

    const ENTRIES: &[(&str, &str)] = &[
        ("imsmanifest.xml", "\u{feff}<manifest/>"),
        ("Items/item-100-1/item-100-1.xml", "<itemrelease/>"),
        ("Items/item-100-1/metadata.xml", "<metadata/>"),
        ("Items/item-100-1/Media/Whale.ogg", "ogg"),
        ("Items/item-100-2/item-100-2.xml", "<itemrelease/>"),
        ("Items/item-100-2/Élan.ogg", "ogg"),
        ("Stimuli/stim-100-9/stim-100-9.xml", "<itemrelease/>"),
    ];

    fn build_dir(root: &Path) {
        for (path, contents) in ENTRIES {
            let full = root.join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, contents).unwrap();
        }
    }

    fn build_zip(path: &Path) {
        let mut writer = zip::ZipWriter::new(fs::File::create(path).unwrap());
        for (name, contents) in ENTRIES {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    fn snapshot(tree: &dyn PackageTree) -> Vec<String> {
        let mut lines = Vec::new();
        for folder in tree.list_folders("").unwrap() {
            lines.push(format!("d {}", folder.path));
            for sub in tree.list_folders(&folder.path).unwrap() {
                lines.push(format!("d {}", sub.path));
            }
        }
        for file in tree.list_files_recursive("").unwrap() {
            lines.push(format!("f {} {}", file.path, file.len));
        }
        lines
    }

    #[test]
    fn zip_and_directory_agree() {
        let dir = tempfile::tempdir().unwrap();
        let package_dir = dir.path().join("package");
        build_dir(&package_dir);
        let archive = dir.path().join("package.zip");
        build_zip(&archive);

        let from_dir = open_package(&package_dir).unwrap();
        let from_zip = open_package(&archive).unwrap();

        assert_eq!(from_dir.name(), "package");
        assert_eq!(from_zip.name(), "package");
        assert_eq!(from_dir.backing(), TreeBacking::Directory);
        assert_eq!(from_zip.backing(), TreeBacking::Zip);
        assert_eq!(snapshot(from_dir.as_ref()), snapshot(from_zip.as_ref()));

        for tree in [from_dir.as_ref(), from_zip.as_ref()] {
            assert!(tree.file_exists("ITEMS/ITEM-100-1/MEDIA/whale.OGG"));
            assert!(!tree.file_exists("Items/item-100-3/item-100-3.xml"));
            let accented = tree.get_file("items/item-100-2/ÉLAN.ogg").unwrap().unwrap();
            assert_eq!(accented.path, "Items/item-100-2/Élan.ogg");
            assert!(tree.file_exists("items/item-100-2/élan.ogg"));
            let manifest = tree.get_file(MANIFEST_FILE).unwrap().unwrap();
            assert_eq!(tree.read_to_string(&manifest).unwrap(), "<manifest/>");
        }
    }

    #[test]
    fn recursive_listing_is_pre_order() {
        let dir = tempfile::tempdir().unwrap();
        build_dir(dir.path());
        let tree = DirTree::open(dir.path()).unwrap();

        let paths: Vec<_> = tree
            .list_files_recursive("Items")
            .unwrap()
            .into_iter()
            .map(|f| f.path)
            .collect();
        assert_eq!(
            paths,
            vec![
                "Items/item-100-1/item-100-1.xml",
                "Items/item-100-1/metadata.xml",
                "Items/item-100-1/Media/Whale.ogg",
                "Items/item-100-2/item-100-2.xml",
                "Items/item-100-2/Élan.ogg",
            ]
        );
    }
}

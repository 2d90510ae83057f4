//! Presence checks that walk the package against the manifest graph

use tabulator_errors::Error;
use tabulator_report::Reporter;
use tabulator_tree::PackageTree;
use tabulator_types::{
    fold_case, option_keys, ErrorCategory, Identity, OptionSource, ReportSubject, Severity,
};

use crate::{normalize_filename, ManifestGraph};

impl ManifestGraph {
    /// Confirm that `identity` and one file it references are both listed,
    /// and that the manifest records the edge between them.
    ///
    /// `dependency_type` names the reference in messages, e.g. `Stimulus`.
    /// Nothing is checked against an empty manifest.
    ///
    /// # Errors
    ///
    /// Returns an error only if the reporter fails.
    pub fn check_dependency(
        &self,
        identity: &Identity,
        dependency_filename: &str,
        dependency_type: &str,
        options: &dyn OptionSource,
        reporter: &mut dyn Reporter,
    ) -> Result<(), Error> {
        if self.is_empty() {
            return Ok(());
        }
        let subject = ReportSubject::from(identity);

        let item_filename = identity.primary_document();
        if !self.contains_file(&item_filename) {
            reporter.report(
                &subject,
                ErrorCategory::Manifest,
                Severity::Benign,
                "Item not found in manifest.",
                "",
            )?;
        }

        if !self.contains_file(dependency_filename) {
            reporter.report(
                &subject,
                ErrorCategory::Manifest,
                Severity::Benign,
                &format!("{dependency_type} not found in manifest."),
                &format!("DependencyFilename='{dependency_filename}'"),
            )?;
        }

        if let (Some(item_id), Some(dependency_id)) = (
            self.resource_id_for(&item_filename),
            self.resource_id_for(dependency_filename),
        ) {
            if !self.has_dependency(item_id, dependency_id)
                && options.is_enabled(option_keys::MANIFEST_DEPENDENCIES)
            {
                reporter.report(
                    &subject,
                    ErrorCategory::Manifest,
                    Severity::Benign,
                    &format!("Manifest does not record dependency between item and {dependency_type}."),
                    &format!(
                        "ItemResourceId='{item_id}' {dependency_type}ResourceId='{dependency_id}'"
                    ),
                )?;
            }
        }
        Ok(())
    }

    /// Walk every top-level folder of the package and report files the
    /// manifest does not list. Inside an `item-*` or `stim-*` folder whose
    /// primary document is listed, every other listed file must also be a
    /// declared dependency of that document's resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be listed or the reporter fails.
    pub fn validate_coverage(
        &self,
        tree: &dyn PackageTree,
        options: &dyn OptionSource,
        reporter: &mut dyn Reporter,
    ) -> Result<(), Error> {
        if self.is_empty() {
            return Ok(());
        }
        for folder in tree.list_folders("")? {
            self.validate_folder(tree, &folder.path, &folder.name, options, reporter)?;
        }
        Ok(())
    }

    fn validate_folder(
        &self,
        tree: &dyn PackageTree,
        path: &str,
        name: &str,
        options: &dyn OptionSource,
        reporter: &mut dyn Reporter,
    ) -> Result<(), Error> {
        let lowered = fold_case(name);
        let mut owner_id: Option<&str> = None;

        if lowered.starts_with("item-") || lowered.starts_with("stim-") {
            if let Some(primary) = tree.get_file(&format!("{path}/{name}.xml"))? {
                let filename = normalize_filename(&primary.path);
                match self.filename_to_id.get(&filename) {
                    Some(id) => owner_id = Some(id.as_str()),
                    None => report(
                        reporter,
                        "Item does not appear in the manifest.",
                        &format!("ItemFilename='{filename}'"),
                    )?,
                }
            }
        }

        for file in tree.list_files(path)? {
            let filename = normalize_filename(&file.path);
            match self.filename_to_id.get(&filename) {
                None => report(
                    reporter,
                    "Resource does not appear in the manifest.",
                    &format!("Filename='{filename}'"),
                )?,
                Some(resource_id) => {
                    let Some(owner) = owner_id else { continue };
                    if owner != resource_id
                        && !self.has_dependency(owner, resource_id)
                        && options.is_enabled(option_keys::MANIFEST_DEPENDENCIES)
                    {
                        report(
                            reporter,
                            "Manifest does not express resource dependency.",
                            &format!("ResourceId='{owner}' DependsOnId='{resource_id}'"),
                        )?;
                    }
                }
            }
        }

        for sub in tree.list_folders(path)? {
            self.validate_folder(tree, &sub.path, &sub.name, options, reporter)?;
        }
        Ok(())
    }
}

fn report(reporter: &mut dyn Reporter, message: &str, detail: &str) -> Result<(), Error> {
    reporter.report(
        &ReportSubject::folder(""),
        ErrorCategory::Manifest,
        Severity::Benign,
        message,
        detail,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tabulator_report::{MemoryWriter, ReportSink};
    use tabulator_tree::DirTree;

    struct Options(HashSet<&'static str>);

    impl OptionSource for Options {
        fn is_enabled(&self, key: &str) -> bool {
            !self.0.contains(key)
        }
    }

    fn all_on() -> Options {
        Options(HashSet::new())
    }

    fn write(root: &std::path::Path, path: &str, text: &str) {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    fn fixture(resources: &str, files: &[&str]) -> (tempfile::TempDir, DirTree, ManifestGraph) {
        let dir = tempfile::tempdir().unwrap();
        for file in files {
            write(dir.path(), file, "<x/>");
        }
        write(
            dir.path(),
            "imsmanifest.xml",
            &format!("<manifest><resources>{resources}</resources></manifest>"),
        );
        let tree = DirTree::open(dir.path()).unwrap();
        let mut sink = ReportSink::new(MemoryWriter::new());
        let graph = ManifestGraph::build(&tree, &mut sink).unwrap();
        (dir, tree, graph)
    }

    fn messages(sink: &ReportSink<MemoryWriter>) -> Vec<String> {
        sink.writer()
            .records()
            .iter()
            .map(|r| r.message.clone())
            .collect()
    }

    #[test]
    fn unlisted_files_and_missing_edges() {
        let (_dir, tree, graph) = fixture(
            r#"<resource identifier="item-1-2"><file href="Items/item-1-2/item-1-2.xml"/></resource>
               <resource identifier="art"><file href="Items/item-1-2/art.png"/></resource>"#,
            &[
                "Items/item-1-2/item-1-2.xml",
                "Items/item-1-2/art.png",
                "Items/item-1-2/extra.txt",
            ],
        );
        let mut sink = ReportSink::new(MemoryWriter::new());
        graph.validate_coverage(&tree, &all_on(), &mut sink).unwrap();
        assert_eq!(
            messages(&sink),
            vec![
                "Manifest does not express resource dependency.",
                "Resource does not appear in the manifest.",
            ]
        );
        assert_eq!(
            sink.writer().records()[0].detail,
            "ResourceId='item-1-2' DependsOnId='art'"
        );
    }

    #[test]
    fn dependency_edge_satisfies_coverage() {
        let (_dir, tree, graph) = fixture(
            r#"<resource identifier="item-1-2"><file href="Items/item-1-2/item-1-2.xml"/><dependency identifierref="art"/></resource>
               <resource identifier="art"><file href="Items/item-1-2/art.png"/></resource>"#,
            &["Items/item-1-2/item-1-2.xml", "Items/item-1-2/art.png"],
        );
        let mut sink = ReportSink::new(MemoryWriter::new());
        graph.validate_coverage(&tree, &all_on(), &mut sink).unwrap();
        assert!(messages(&sink).is_empty());
    }

    #[test]
    fn unlisted_item_document() {
        let (_dir, tree, graph) = fixture(
            r#"<resource identifier="art"><file href="Items/item-1-2/art.png"/></resource>"#,
            &["Items/item-1-2/item-1-2.xml", "Items/item-1-2/art.png"],
        );
        let mut sink = ReportSink::new(MemoryWriter::new());
        graph.validate_coverage(&tree, &all_on(), &mut sink).unwrap();
        assert_eq!(
            messages(&sink),
            vec![
                "Item does not appear in the manifest.",
                "Resource does not appear in the manifest.",
            ]
        );
    }

    #[test]
    fn dependency_check_respects_option() {
        let (_dir, _tree, graph) = fixture(
            r#"<resource identifier="item-1-2"><file href="Items/item-1-2/item-1-2.xml"/></resource>
               <resource identifier="stim-1-9"><file href="Stimuli/stim-1-9/stim-1-9.xml"/></resource>"#,
            &["Items/item-1-2/item-1-2.xml", "Stimuli/stim-1-9/stim-1-9.xml"],
        );
        let identity = Identity::new("2", "mc", "1", false, "Items/item-1-2");

        let mut sink = ReportSink::new(MemoryWriter::new());
        graph
            .check_dependency(&identity, "Stimuli/stim-1-9/stim-1-9.xml", "Stimulus", &all_on(), &mut sink)
            .unwrap();
        assert_eq!(
            messages(&sink),
            vec!["Manifest does not record dependency between item and Stimulus."]
        );

        let mut quiet = ReportSink::new(MemoryWriter::new());
        let pmd_off = Options(HashSet::from([option_keys::MANIFEST_DEPENDENCIES]));
        graph
            .check_dependency(&identity, "Stimuli/stim-1-9/stim-1-9.xml", "Stimulus", &pmd_off, &mut quiet)
            .unwrap();
        assert!(messages(&quiet).is_empty());
    }

    #[test]
    fn dependency_not_listed() {
        let (_dir, _tree, graph) = fixture(
            r#"<resource identifier="item-1-2"><file href="Items/item-1-2/item-1-2.xml"/></resource>"#,
            &["Items/item-1-2/item-1-2.xml"],
        );
        let identity = Identity::new("2", "mc", "1", false, "Items/item-1-2");
        let mut sink = ReportSink::new(MemoryWriter::new());
        graph
            .check_dependency(&identity, "Items/item-1-5/item-1-5.xml", "Tutorial", &all_on(), &mut sink)
            .unwrap();
        assert_eq!(messages(&sink), vec!["Tutorial not found in manifest."]);
        assert_eq!(
            sink.writer().records()[0].detail,
            "DependencyFilename='Items/item-1-5/item-1-5.xml'"
        );
    }
}

//! Integration tests for error types

#[cfg(test)]
mod tests {
    use tabulator_errors::*;

    #[test]
    fn test_error_conversion() {
        let tree_err = TreeError::PermissionDenied {
            path: "Items/item-100-1".into(),
        };
        let err: Error = tree_err.into();
        assert!(matches!(err, Error::Tree(_)));
    }

    #[test]
    fn test_error_display() {
        let err = PackageError::NotAPackage {
            path: "/tmp/nothing".into(),
        };
        assert_eq!(
            err.to_string(),
            "not a valid content package path: /tmp/nothing"
        );
    }

    #[test]
    fn test_error_clone() {
        let err = ContentError::InvalidXml {
            filename: "item-1-2.xml".into(),
            message: "unexpected end of stream".into(),
        };
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
        assert_eq!(cloned.filename(), "item-1-2.xml");
    }

    #[test]
    fn test_load_detail_uses_file_name() {
        let missing = ContentError::NotFound {
            filename: "Items/item-1-2/metadata.xml".into(),
        };
        assert_eq!(
            missing.load_detail(),
            "filename='metadata.xml' detail='File not found'"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "test");
        let tree_err = TreeError::from_io_with_path(&io_err, "Items/a.xml");
        assert!(matches!(tree_err, TreeError::PermissionDenied { .. }));
    }

    #[test]
    fn test_fatal_classification() {
        let sink: Error = ReportError::WriteFailed {
            message: "disk full".into(),
        }
        .into();
        assert!(sink.is_fatal());

        let corrupt: Error = TreeError::CorruptArchive {
            path: "pkg.zip".into(),
            message: "bad central directory".into(),
        }
        .into();
        assert!(corrupt.is_fatal());

        let read: Error = TreeError::ReadFailed {
            path: "Items/x.xml".into(),
            message: "short read".into(),
        }
        .into();
        assert!(!read.is_fatal());

        let content: Error = ContentError::NotFound {
            filename: "x.xml".into(),
        }
        .into();
        assert!(!content.is_fatal());
    }

    #[test]
    fn test_user_facing_codes() {
        let err: Error = ConfigError::InvalidDirective {
            directive: "-all".into(),
        }
        .into();
        assert_eq!(err.user_code(), Some("config.invalid_directive"));
        assert!(err.user_hint().is_some());
        assert!(!err.is_retryable());
    }
}

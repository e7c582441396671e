//! File selection and validation
//!
//! Mirrors what a browser file input gives us: a name, a MIME type and the
//! bytes. Only `application/pdf` is accepted.

use std::path::Path;

use crate::error::ValidationError;

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// MIME type browsers report for files with an unrecognized extension
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// A user-chosen file, held only until it is submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, deriving its MIME type from the extension
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = mime_type_for_name(&name);
        Ok(Self::new(name, mime_type, bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// MIME type for a file name, the way a browser file picker assigns one
pub fn mime_type_for_name(name: &str) -> &'static str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ext.eq_ignore_ascii_case("pdf") => PDF_MIME_TYPE,
        _ => FALLBACK_MIME_TYPE,
    }
}

/// Check a selection before anything is sent to the server
pub fn validate_selection(file: Option<SelectedFile>) -> Result<SelectedFile, ValidationError> {
    let file = file.ok_or(ValidationError::NoFile)?;

    if file.mime_type != PDF_MIME_TYPE {
        return Err(ValidationError::WrongType {
            mime_type: file.mime_type,
        });
    }

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_no_file_rejected() {
        assert_eq!(validate_selection(None), Err(ValidationError::NoFile));
    }

    #[test]
    fn test_pdf_accepted() {
        let file = SelectedFile::new("drawing.pdf", PDF_MIME_TYPE, b"%PDF-1.7".to_vec());
        let accepted = validate_selection(Some(file.clone())).unwrap();
        assert_eq!(accepted, file);
    }

    #[test]
    fn test_wrong_type_rejected() {
        let file = SelectedFile::new("drawing.docx", "application/msword", vec![1, 2, 3]);
        assert_eq!(
            validate_selection(Some(file)),
            Err(ValidationError::WrongType {
                mime_type: "application/msword".to_string()
            })
        );
    }

    #[test]
    fn test_type_is_checked_not_extension() {
        // A .pdf name with a non-PDF type is still rejected
        let file = SelectedFile::new("fake.pdf", "text/plain", vec![]);
        assert!(validate_selection(Some(file)).is_err());
    }

    #[test]
    fn test_mime_type_for_name() {
        assert_eq!(mime_type_for_name("a.pdf"), PDF_MIME_TYPE);
        assert_eq!(mime_type_for_name("A.PDF"), PDF_MIME_TYPE);
        assert_eq!(mime_type_for_name("archive.tar.pdf"), PDF_MIME_TYPE);
        assert_eq!(mime_type_for_name("pdf"), FALLBACK_MIME_TYPE);
        assert_eq!(mime_type_for_name(".pdf"), FALLBACK_MIME_TYPE);
        assert_eq!(mime_type_for_name("notes.txt"), FALLBACK_MIME_TYPE);
    }

    #[test]
    fn test_from_path_reads_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.pdf");
        std::fs::write(&path, b"%PDF-1.4\n%%EOF").unwrap();

        let file = SelectedFile::from_path(&path).unwrap();
        assert_eq!(file.name, "sheet.pdf");
        assert_eq!(file.mime_type, PDF_MIME_TYPE);
        assert_eq!(file.size(), 14);
    }

    proptest! {
        /// Property: any MIME type other than application/pdf is rejected
        #[test]
        fn non_pdf_types_rejected(mime in "[a-z]{1,12}/[a-z0-9.+-]{1,16}") {
            prop_assume!(mime != PDF_MIME_TYPE);
            let file = SelectedFile::new("x.pdf", mime.clone(), vec![0u8; 4]);
            let is_wrong_type = matches!(
                validate_selection(Some(file)),
                Err(ValidationError::WrongType { .. })
            );
            prop_assert!(is_wrong_type);
        }
    }
}

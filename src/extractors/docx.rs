use std::fs;
use std::path::Path;
use zip::ZipArchive;

use super::markup::{read_zip_member, strip_markup};

/// Extract text content from a DOCX file
///
/// DOCX files are ZIP archives containing XML files.
/// The main document content is in word/document.xml
pub fn extract_docx(path: &Path) -> Option<String> {
    let file = fs::File::open(path).ok()?;
    let mut archive = ZipArchive::new(file).ok()?;
    let xml = read_zip_member(&mut archive, "word/document.xml")?;
    Some(strip_markup(&xml))
}

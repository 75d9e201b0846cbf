use std::fs;
use std::path::Path;
use zip::ZipArchive;

use super::markup::{read_zip_member, strip_markup};

/// Extract text content from an XLSX file
///
/// XLSX files are ZIP archives containing XML files.
/// xl/sharedStrings.xml holds the string table, which carries nearly all
/// cell text; numeric cells are not searched.
pub fn extract_xlsx(path: &Path) -> Option<String> {
    let file = fs::File::open(path).ok()?;
    let mut archive = ZipArchive::new(file).ok()?;
    let xml = read_zip_member(&mut archive, "xl/sharedStrings.xml")?;
    Some(strip_markup(&xml))
}

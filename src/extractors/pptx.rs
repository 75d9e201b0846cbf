use std::fs;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

use super::markup::strip_markup;

/// Extract text content from a PPTX file
///
/// PPTX files are ZIP archives containing XML files.
/// Slides are stored in ppt/slides/slide1.xml, slide2.xml, etc. Slides are
/// read in archive entry order, which is also the order PowerPoint writes them.
pub fn extract_pptx(path: &Path) -> Option<String> {
    let file = fs::File::open(path).ok()?;
    let mut archive = ZipArchive::new(file).ok()?;
    let mut slides = Vec::new();

    for i in 0..archive.len() {
        let Ok(mut entry) = archive.by_index(i) else {
            continue;
        };
        if !is_slide_entry(entry.name()) {
            continue;
        }
        let mut xml = String::new();
        if entry.read_to_string(&mut xml).is_ok() {
            slides.push(strip_markup(&xml));
        }
    }

    if slides.is_empty() {
        None
    } else {
        Some(slides.join(" ").trim().to_string())
    }
}

/// `ppt/slides/slide<N>.xml`, excluding the `_rels` folder and layouts
fn is_slide_entry(name: &str) -> bool {
    name.strip_prefix("ppt/slides/slide")
        .and_then(|rest| rest.strip_suffix(".xml"))
        .is_some_and(|num| !num.is_empty() && num.chars().all(|c| c.is_ascii_digit()))
}

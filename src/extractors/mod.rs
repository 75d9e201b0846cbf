//! Document content extractors
//!
//! This module provides text extraction for various document formats:
//! - Plain/structured text and scripts
//! - Source code
//! - DOCX (Microsoft Word)
//! - XLSX (Microsoft Excel)
//! - PPTX (Microsoft PowerPoint)
//! - PDF (through an external `pdftotext`)
//!
//! Extensions map to a [`FileCategory`]; each category maps to one
//! extractor. Extraction never fails loudly: any problem yields empty text.

mod docx;
mod markup;
mod pdf;
mod pptx;
mod text;
mod xlsx;

pub use docx::extract_docx;
pub use pdf::{PdfConverter, PDFTOTEXT, PDFTOTEXT_LOCATIONS};
pub use pptx::extract_pptx;
pub use text::{decode_text, extract_text};
pub use xlsx::extract_xlsx;

use rustc_hash::FxHashMap;
use std::path::Path;

use crate::config::SearchConfig;

/// Extracted text is truncated to this many characters
pub const MAX_CONTENT_CHARS: usize = 2_000_000;

/// Plain and structured text, including shell/batch/PowerShell scripts
pub const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "csv", "log", "ini", "json", "xml", "yaml", "yml", "ps1", "psm1", "psd1", "sh",
    "bash", "bat", "cmd",
];

/// Source code
pub const CODE_EXTENSIONS: &[&str] = &[
    "cpp", "c", "cc", "h", "hpp", "inl", "cs", "java", "py", "js", "ts", "rs", "go", "swift", "kt",
    "m", "mm",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    Text,
    Code,
    Word,
    Excel,
    PowerPoint,
    Pdf,
}

impl FileCategory {
    /// Category of an extension, regardless of whether it is enabled
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_lowercase();
        match ext.as_str() {
            "docx" => Some(Self::Word),
            "xlsx" => Some(Self::Excel),
            "pptx" => Some(Self::PowerPoint),
            "pdf" => Some(Self::Pdf),
            e if TEXT_EXTENSIONS.contains(&e) => Some(Self::Text),
            e if CODE_EXTENSIONS.contains(&e) => Some(Self::Code),
            _ => None,
        }
    }
}

type ExtractFn = Box<dyn Fn(&Path) -> Option<String>>;

/// Maps each enabled category to its extractor
///
/// PDF is registered only when requested and a converter was found, so an
/// unavailable converter behaves exactly like an unsupported extension.
pub struct ExtractorRegistry {
    extractors: FxHashMap<FileCategory, ExtractFn>,
}

impl ExtractorRegistry {
    /// Registry without PDF support
    pub fn new() -> Self {
        let mut registry = Self {
            extractors: FxHashMap::default(),
        };
        registry.register(FileCategory::Text, extract_text);
        registry.register(FileCategory::Code, extract_text);
        registry.register(FileCategory::Word, extract_docx);
        registry.register(FileCategory::Excel, extract_xlsx);
        registry.register(FileCategory::PowerPoint, extract_pptx);
        registry
    }

    /// Registry for a search, locating the PDF converter if PDF is enabled
    pub fn from_config(config: &SearchConfig) -> Self {
        let registry = Self::new();
        if !config.pdf {
            return registry;
        }
        match PdfConverter::locate(config.pdf_timeout) {
            Some(converter) => {
                log::info!("Using PDF converter at {:?}", converter.executable());
                registry.with_pdf_converter(converter)
            }
            None => {
                log::info!("PDF support requested but {} was not found; PDF content is skipped", PDFTOTEXT);
                registry
            }
        }
    }

    pub fn with_pdf_converter(mut self, converter: PdfConverter) -> Self {
        self.register(FileCategory::Pdf, move |path: &Path| converter.extract(path));
        self
    }

    pub fn register<F>(&mut self, category: FileCategory, extractor: F)
    where
        F: Fn(&Path) -> Option<String> + 'static,
    {
        self.extractors.insert(category, Box::new(extractor));
    }

    /// Category for an extension if content search supports it right now
    pub fn supported_category(&self, ext: &str) -> Option<FileCategory> {
        FileCategory::from_extension(ext).filter(|c| self.extractors.contains_key(c))
    }

    /// Extract text; empty on any failure, capped at [`MAX_CONTENT_CHARS`]
    pub fn extract(&self, path: &Path, category: FileCategory) -> String {
        let Some(extractor) = self.extractors.get(&category) else {
            return String::new();
        };
        match extractor(path) {
            Some(mut content) => {
                truncate_chars(&mut content, MAX_CONTENT_CHARS);
                content
            }
            None => {
                log::debug!("No content extracted from {:?} ({:?})", path, category);
                String::new()
            }
        }
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Truncate in place to at most `max` characters
pub fn truncate_chars(text: &mut String, max: usize) {
    if let Some((byte_idx, _)) = text.char_indices().nth(max) {
        text.truncate(byte_idx);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::fs::File;
    use std::io::Write;
    use std::path::Path;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    /// Write a ZIP container with the given (member, contents) pairs in order
    pub fn write_zip(path: &Path, members: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        for (name, contents) in members {
            zip.start_file(*name, FileOptions::default()).unwrap();
            zip.write_all(contents.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }
}

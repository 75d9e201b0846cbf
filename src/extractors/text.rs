use encoding_rs::{Encoding, WINDOWS_1252};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::MAX_CONTENT_CHARS;

/// Upper bound on bytes read; enough for the character cap in any encoding
const MAX_READ_BYTES: u64 = (MAX_CONTENT_CHARS as u64) * 4;

/// Extract content from plain text and source files
///
/// Honors a byte-order mark, otherwise reads UTF-8 and falls back to
/// Windows-1252 for legacy files.
pub fn extract_text(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    let mut bytes = Vec::new();
    file.take(MAX_READ_BYTES).read_to_end(&mut bytes).ok()?;
    Some(decode_text(&bytes))
}

/// Decode raw bytes into text
pub fn decode_text(bytes: &[u8]) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return text.into_owned();
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }

    let tally = Utf8Tally::of(bytes);
    if tally.invalid > tally.multibyte {
        let (text, _, _) = WINDOWS_1252.decode(bytes);
        return text.into_owned();
    }
    // Mostly UTF-8: replace only the bad sequences, and drop a character
    // cut in half by the read limit
    String::from_utf8_lossy(&bytes[..tally.complete_len]).into_owned()
}

/// How much of a byte buffer reads as UTF-8
struct Utf8Tally {
    /// Well-formed non-ASCII characters
    multibyte: usize,
    /// Malformed sequences
    invalid: usize,
    /// Length without a truncated trailing sequence
    complete_len: usize,
}

impl Utf8Tally {
    fn of(bytes: &[u8]) -> Self {
        let mut tally = Self {
            multibyte: 0,
            invalid: 0,
            complete_len: bytes.len(),
        };
        let mut offset = 0;
        loop {
            let rest = &bytes[offset..];
            let (valid_len, error_len) = match std::str::from_utf8(rest) {
                Ok(_) => (rest.len(), None),
                Err(e) => (e.valid_up_to(), Some(e.error_len())),
            };
            tally.multibyte += rest[..valid_len].iter().filter(|b| **b >= 0xC0).count();
            match error_len {
                None => break,
                Some(None) => {
                    tally.complete_len = offset + valid_len;
                    break;
                }
                Some(Some(len)) => {
                    tally.invalid += 1;
                    offset += valid_len + len;
                }
            }
        }
        tally
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A file that survived enumeration filters and is eligible for matching
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CandidateFile {
    pub name: String,
    pub path: PathBuf,
    pub extension: String, // lowercase, no leading dot
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// Where a result was found
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    Name,
    Content,
}

impl HitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HitKind::Name => "Name",
            HitKind::Content => "Content",
        }
    }
}

/// A matching file, ready for ranking and presentation
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub score: u32,
    pub name: String,
    pub extension: String,
    #[serde(rename = "sizeKB")]
    pub size_kb: f64,
    pub last_modified: DateTime<Utc>,
    pub hit_kind: HitKind,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// How search terms are compared against names and content
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Case-insensitive containment
    #[default]
    Substring,
    /// `*` / `?` / `[..]` glob over the whole text
    Wildcard,
    /// Terms are case-insensitive regular expressions
    Regex,
    /// Terms must appear between word boundaries
    WholeWord,
}

/// Outcome of matching one text against the full term set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchResult {
    pub matched: bool,
    pub score: u32,
}

/// Convert a byte count to kilobytes rounded to one decimal place
pub fn size_in_kb(bytes: u64) -> f64 {
    (bytes as f64 / 1024.0 * 10.0).round() / 10.0
}

//! Search configuration
//!
//! A `SearchConfig` is built once at startup: defaults, then an optional
//! JSON config file, then command-line flags. Each layer is a
//! `ConfigOverrides` where every field is optional. After that the config is
//! only ever read.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, SearchError};
use crate::models::MatchMode;

/// Default cap on accepted results
pub const DEFAULT_MAX_RESULTS: usize = 200;

/// Default time allowed for one PDF conversion
pub const DEFAULT_PDF_TIMEOUT_SECS: u64 = 60;

/// Directory names skipped during traversal unless overridden
pub const DEFAULT_EXCLUDED_DIRS: &[&str] =
    &[".git", "node_modules", "$RECYCLE.BIN", "System Volume Information"];

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub terms: Vec<String>,
    pub mode: MatchMode,
    pub fuzzy: bool,
    pub content: bool,
    pub pdf: bool,
    pub pdf_timeout: Duration,
    pub snippets: bool,
    pub max_results: usize,

    pub roots: Vec<PathBuf>,
    pub include_extensions: Vec<String>, // empty = every extension
    pub exclude_extensions: Vec<String>,
    pub exclude_dirs: Vec<String>,
    pub max_depth: Option<usize>,
    pub since: Option<DateTime<Utc>>,
    pub min_size: Option<u64>,
    pub max_size: Option<u64>,
    pub trace_folders: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            terms: Vec::new(),
            mode: MatchMode::Substring,
            fuzzy: true,
            content: false,
            pdf: false,
            pdf_timeout: Duration::from_secs(DEFAULT_PDF_TIMEOUT_SECS),
            snippets: false,
            max_results: DEFAULT_MAX_RESULTS,
            roots: vec![PathBuf::from(".")],
            include_extensions: Vec::new(),
            exclude_extensions: Vec::new(),
            exclude_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect(),
            max_depth: None,
            since: None,
            min_size: None,
            max_size: None,
            trace_folders: false,
        }
    }
}

/// One layer of configuration; `None` leaves the lower layer untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigOverrides {
    pub terms: Option<Vec<String>>,
    pub mode: Option<MatchMode>,
    pub fuzzy: Option<bool>,
    pub content: Option<bool>,
    pub pdf: Option<bool>,
    pub pdf_timeout_secs: Option<u64>,
    pub snippets: Option<bool>,
    pub max_results: Option<usize>,
    pub roots: Option<Vec<PathBuf>>,
    pub include_extensions: Option<Vec<String>>,
    pub exclude_extensions: Option<Vec<String>>,
    pub exclude_dirs: Option<Vec<String>>,
    pub max_depth: Option<usize>,
    pub since: Option<String>,
    pub min_size: Option<String>,
    pub max_size: Option<String>,
    pub trace_folders: Option<bool>,
}

impl ConfigOverrides {
    /// Load a layer from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| SearchError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| SearchError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl SearchConfig {
    /// Overlay one layer on top of this config
    pub fn apply(mut self, layer: ConfigOverrides) -> Result<Self> {
        if let Some(terms) = layer.terms {
            self.terms = terms;
        }
        if let Some(mode) = layer.mode {
            self.mode = mode;
        }
        if let Some(fuzzy) = layer.fuzzy {
            self.fuzzy = fuzzy;
        }
        if let Some(content) = layer.content {
            self.content = content;
        }
        if let Some(pdf) = layer.pdf {
            self.pdf = pdf;
        }
        if let Some(secs) = layer.pdf_timeout_secs {
            self.pdf_timeout = Duration::from_secs(secs);
        }
        if let Some(snippets) = layer.snippets {
            self.snippets = snippets;
        }
        if let Some(max) = layer.max_results {
            self.max_results = max;
        }
        if let Some(roots) = layer.roots {
            if !roots.is_empty() {
                self.roots = roots;
            }
        }
        if let Some(exts) = layer.include_extensions {
            self.include_extensions = normalize_extensions(&exts);
        }
        if let Some(exts) = layer.exclude_extensions {
            self.exclude_extensions = normalize_extensions(&exts);
        }
        if let Some(dirs) = layer.exclude_dirs {
            self.exclude_dirs = dirs;
        }
        if let Some(depth) = layer.max_depth {
            self.max_depth = Some(depth);
        }
        if let Some(since) = layer.since {
            self.since = Some(parse_date(&since)?);
        }
        if let Some(min) = layer.min_size {
            self.min_size = Some(parse_size(&min)?);
        }
        if let Some(max) = layer.max_size {
            self.max_size = Some(parse_size(&max)?);
        }
        if let Some(trace) = layer.trace_folders {
            self.trace_folders = trace;
        }
        Ok(self)
    }

    /// Drop blank terms and reject a config that has nothing to search for
    pub fn validate(mut self) -> Result<Self> {
        self.terms.retain(|t| !t.trim().is_empty());
        if self.terms.is_empty() {
            return Err(SearchError::NoTerms);
        }
        Ok(self)
    }
}

/// Lowercase extensions and strip `.` / `*.` prefixes
pub fn normalize_extensions(exts: &[String]) -> Vec<String> {
    exts.iter()
        .map(|e| e.trim().trim_start_matches('*').trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Parse `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp
pub fn parse_date(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| SearchError::InvalidDate(input.to_string()))
}

/// Parse a byte count with an optional K/M/G (1024-based) suffix
pub fn parse_size(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    let upper = trimmed.to_ascii_uppercase();
    let upper = upper.strip_suffix('B').unwrap_or(&upper);
    let (digits, multiplier) = match upper.chars().last() {
        Some('K') => (&upper[..upper.len() - 1], 1024u64),
        Some('M') => (&upper[..upper.len() - 1], 1024 * 1024),
        Some('G') => (&upper[..upper.len() - 1], 1024 * 1024 * 1024),
        _ => (upper, 1),
    };
    digits
        .trim()
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
        .ok_or_else(|| SearchError::InvalidSize(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert!(config.fuzzy);
        assert!(!config.content);
        assert_eq!(config.mode, MatchMode::Substring);
        assert_eq!(config.max_results, DEFAULT_MAX_RESULTS);
        assert!(config.exclude_dirs.iter().any(|d| d == ".git"));
    }

    #[test]
    fn test_layers_override_in_order() {
        let file_layer = ConfigOverrides {
            max_results: Some(10),
            content: Some(true),
            ..Default::default()
        };
        let cli_layer = ConfigOverrides {
            max_results: Some(5),
            terms: Some(vec!["report".to_string()]),
            ..Default::default()
        };
        let config = SearchConfig::default()
            .apply(file_layer)
            .unwrap()
            .apply(cli_layer)
            .unwrap();
        assert_eq!(config.max_results, 5);
        assert!(config.content);
        assert_eq!(config.terms, vec!["report"]);
    }

    #[test]
    fn test_validate_rejects_missing_terms() {
        let config = SearchConfig {
            terms: vec!["  ".to_string()],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SearchError::NoTerms)));
    }

    #[test]
    fn test_config_file_layer() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"mode": "wholeword", "includeExtensions": [".TXT", "*.md"], "minSize": "2K"}}"#
        )
        .unwrap();
        let layer = ConfigOverrides::from_file(file.path()).unwrap();
        let config = SearchConfig::default().apply(layer).unwrap();
        assert_eq!(config.mode, MatchMode::WholeWord);
        assert_eq!(config.include_extensions, vec!["txt", "md"]);
        assert_eq!(config.min_size, Some(2048));
    }

    #[test]
    fn test_config_file_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            ConfigOverrides::from_file(file.path()),
            Err(SearchError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("512").unwrap(), 512);
        assert_eq!(parse_size("4k").unwrap(), 4096);
        assert_eq!(parse_size("1MB").unwrap(), 1024 * 1024);
        assert_eq!(parse_size("2G").unwrap(), 2 * 1024 * 1024 * 1024);
        assert!(parse_size("lots").is_err());
    }

    #[test]
    fn test_parse_date() {
        let day = parse_date("2024-03-01").unwrap();
        assert_eq!(day.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        let exact = parse_date("2024-03-01T12:30:00+02:00").unwrap();
        assert_eq!(exact.to_rfc3339(), "2024-03-01T10:30:00+00:00");
        assert!(parse_date("yesterday").is_err());
    }
}

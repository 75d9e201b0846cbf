//! Search functionality
//!
//! This module provides the matching and ranking engine:
//! - Name/path matching (substring, wildcard, regex, whole-word, fuzzy)
//! - Content matching with snippet extraction
//! - Candidate filters (extension, date, size)
//! - Orchestration and ranking of results

pub mod distance;
mod content_match;
mod filters;
mod name_match;

pub use content_match::{find_content_match, ContentHit, ContentMatcher};
pub use distance::{edit_distance, fuzzy_tolerance};
pub use filters::passes_filters;
pub use name_match::{match_name, NameMatcher};

use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;

use crate::config::SearchConfig;
use crate::extractors::ExtractorRegistry;
use crate::models::{size_in_kb, CandidateFile, HitKind, ResultRecord};

/// Flat bonus for a content hit
pub const CONTENT_HIT_BONUS: u32 = 80;

/// Characters of context kept on each side of a match
pub const SNIPPET_RADIUS: usize = 60;

/// Outcome counters for one search run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub examined: usize,
    pub content_searched: usize,
    pub accepted: usize,
}

/// Runs one search over a stream of candidates
///
/// Patterns are compiled once here and reused for every file. Files are
/// handled one at a time, in the order the enumerator yields them.
pub struct Searcher<'a> {
    config: &'a SearchConfig,
    names: NameMatcher,
    content: ContentMatcher,
    extractors: ExtractorRegistry,
}

impl<'a> Searcher<'a> {
    pub fn new(config: &'a SearchConfig, extractors: ExtractorRegistry) -> Self {
        let content = ContentMatcher::new(&config.terms, config.mode);
        if config.content && !content.is_usable() {
            log::warn!("Search terms did not compile; content search will find nothing");
        }
        Self {
            config,
            names: NameMatcher::new(&config.terms, config.mode, config.fuzzy),
            content,
            extractors,
        }
    }

    /// Score one file; `None` when neither its name nor its content matches
    pub fn evaluate(&self, file: &CandidateFile) -> Option<ResultRecord> {
        let path = file.path.to_string_lossy();
        let name_result = self.names.evaluate_file(&file.name, &path);

        let content_hit = self.content_hit(file);
        if !name_result.matched && content_hit.is_none() {
            return None;
        }

        let (hit_kind, score, snippet) = match content_hit {
            Some(hit) => (
                HitKind::Content,
                name_result.score + CONTENT_HIT_BONUS,
                Some(hit.snippet),
            ),
            None => (HitKind::Name, name_result.score, None),
        };

        Some(ResultRecord {
            score,
            name: file.name.clone(),
            extension: file.extension.clone(),
            size_kb: size_in_kb(file.size),
            last_modified: file.last_modified,
            hit_kind,
            path: path.into_owned(),
            snippet: snippet.filter(|_| self.config.snippets),
        })
    }

    fn content_hit(&self, file: &CandidateFile) -> Option<ContentHit> {
        if !self.config.content {
            return None;
        }
        let category = self.extractors.supported_category(&file.extension)?;
        let text = self.extractors.extract(&file.path, category);
        if text.is_empty() {
            return None;
        }
        self.content.find(&text)
    }

    /// Accumulate matches until `max_results`, then rank what was accepted
    ///
    /// The cap applies while accumulating: once it is reached no further
    /// candidates are read, so the result is the first N matches in
    /// enumeration order, ranked, not the global top N.
    pub fn search<I>(&self, candidates: I) -> (Vec<ResultRecord>, SearchStats)
    where
        I: IntoIterator<Item = CandidateFile>,
    {
        let mut stats = SearchStats::default();
        let mut results = Vec::new();

        if self.config.max_results > 0 {
            for file in candidates {
                stats.examined += 1;
                if self.config.content && self.extractors.supported_category(&file.extension).is_some() {
                    stats.content_searched += 1;
                }
                if let Some(record) = self.evaluate(&file) {
                    results.push(record);
                    if results.len() >= self.config.max_results {
                        break;
                    }
                }
            }
        }

        stats.accepted = results.len();
        rank_results(&mut results);
        log::info!(
            "Examined {} files ({} content-searched), accepted {}",
            stats.examined,
            stats.content_searched,
            stats.accepted
        );
        (results, stats)
    }
}

/// Sort by score descending, then most recently modified first
pub fn rank_results(results: &mut [ResultRecord]) {
    results.sort_by(|a, b| match b.score.cmp(&a.score) {
        Ordering::Equal => b.last_modified.cmp(&a.last_modified),
        other => other,
    });
}

/// Build a case-insensitive regex, reporting failure to the caller
pub(crate) fn compile_case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Excerpt of `SNIPPET_RADIUS` chars either side of a match, wrapped in ellipses
///
/// `match_byte_idx` is a byte offset into `content`; the window is measured
/// in characters so multi-byte text is never split.
pub fn make_snippet(content: &str, match_byte_idx: usize) -> String {
    let match_char_idx = content
        .char_indices()
        .take_while(|(byte_pos, _)| *byte_pos < match_byte_idx)
        .count();
    let total_chars = content.chars().count();

    let start_char = match_char_idx.saturating_sub(SNIPPET_RADIUS);
    let end_char = (match_char_idx + SNIPPET_RADIUS).min(total_chars);

    let start_byte = content
        .char_indices()
        .nth(start_char)
        .map(|(b, _)| b)
        .unwrap_or(content.len());
    let end_byte = content
        .char_indices()
        .nth(end_char)
        .map(|(b, _)| b)
        .unwrap_or(content.len());

    format!("...{}...", content[start_byte..end_byte].trim())
}

use regex::Regex;

use super::{compile_case_insensitive, make_snippet};
use crate::models::MatchMode;

/// A content hit; `snippet` surrounds the first located match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentHit {
    pub snippet: String,
}

enum ContentPattern {
    /// Regex / whole-word modes: one alternation over all terms
    Alternation(Option<Regex>),
    /// Every other mode: case-insensitive literals, tried in caller order
    Literals(Vec<Regex>),
}

/// Looks for terms inside extracted document text
pub struct ContentMatcher {
    pattern: ContentPattern,
}

impl ContentMatcher {
    pub fn new(terms: &[String], mode: MatchMode) -> Self {
        let terms: Vec<&str> = terms
            .iter()
            .map(|t| t.as_str())
            .filter(|t| !t.trim().is_empty())
            .collect();

        let pattern = match mode {
            MatchMode::Regex | MatchMode::WholeWord if terms.is_empty() => {
                ContentPattern::Alternation(None)
            }
            MatchMode::Regex => {
                let source = format!("({})", terms.join("|"));
                ContentPattern::Alternation(compile_alternation(&source))
            }
            MatchMode::WholeWord => {
                let escaped: Vec<String> = terms.iter().map(|t| regex::escape(t)).collect();
                let source = format!(r"\b({})\b", escaped.join("|"));
                ContentPattern::Alternation(compile_alternation(&source))
            }
            MatchMode::Substring | MatchMode::Wildcard => ContentPattern::Literals(
                terms
                    .iter()
                    .filter_map(|t| compile_case_insensitive(&regex::escape(t)).ok())
                    .collect(),
            ),
        };
        Self { pattern }
    }

    /// Whether the pattern compiled; an invalid regex never matches content
    pub fn is_usable(&self) -> bool {
        match &self.pattern {
            ContentPattern::Alternation(re) => re.is_some(),
            ContentPattern::Literals(literals) => !literals.is_empty(),
        }
    }

    pub fn find(&self, text: &str) -> Option<ContentHit> {
        let start = match &self.pattern {
            ContentPattern::Alternation(re) => re.as_ref()?.find(text)?.start(),
            ContentPattern::Literals(literals) => {
                literals.iter().find_map(|re| re.find(text))?.start()
            }
        };
        Some(ContentHit {
            snippet: make_snippet(text, start),
        })
    }
}

/// One-shot convenience over [`ContentMatcher`]
pub fn find_content_match(text: &str, terms: &[String], mode: MatchMode) -> (bool, Option<String>) {
    match ContentMatcher::new(terms, mode).find(text) {
        Some(hit) => (true, Some(hit.snippet)),
        None => (false, None),
    }
}

fn compile_alternation(source: &str) -> Option<Regex> {
    compile_case_insensitive(source)
        .map_err(|e| log::debug!("Content pattern '{}' did not compile: {}", source, e))
        .ok()
}

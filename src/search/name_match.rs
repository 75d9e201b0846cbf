use glob::{MatchOptions, Pattern};
use regex::Regex;

use super::compile_case_insensitive;
use super::distance::{edit_distance, fuzzy_tolerance};
use crate::models::{MatchMode, MatchResult};

/// Score added for every term that matches
const TERM_HIT_SCORE: u32 = 20;
/// Extra score per matching term, applied once at the end
const HIT_COUNT_BONUS: u32 = 5;
/// Ceiling of the closeness bonus from a fuzzy comparison
const FUZZY_MAX_BONUS: usize = 10;

const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// A term prepared for the active mode; `None` means it failed to compile
enum TermPattern {
    Substring,
    Wildcard(Option<Pattern>),
    Regex(Option<Regex>),
    WholeWord(Option<Regex>),
}

struct CompiledTerm {
    lowered: String,
    pattern: TermPattern,
}

/// Matches file names and paths against every term
///
/// Patterns are compiled once per search. A term whose pattern does not
/// compile is logged once here and then simply never matches.
pub struct NameMatcher {
    terms: Vec<CompiledTerm>,
    fuzzy: bool,
}

impl NameMatcher {
    pub fn new(terms: &[String], mode: MatchMode, fuzzy: bool) -> Self {
        let terms = terms
            .iter()
            .filter(|t| !t.trim().is_empty())
            .map(|term| CompiledTerm {
                lowered: term.to_lowercase(),
                pattern: compile_term(term, mode),
            })
            .collect();
        Self { terms, fuzzy }
    }

    /// Score `text` against all terms; every term counts, no short-circuit
    pub fn evaluate(&self, text: &str) -> MatchResult {
        self.score(text, &[text])
    }

    /// Score a file by its name and full path
    ///
    /// Substring, regex and whole-word terms see `"{name} {path}"`. A glob
    /// must match the whole name or the whole path on its own.
    pub fn evaluate_file(&self, name: &str, path: &str) -> MatchResult {
        self.score(&format!("{} {}", name, path), &[name, path])
    }

    fn score(&self, text: &str, glob_targets: &[&str]) -> MatchResult {
        let lowered = text.to_lowercase();
        let glob_targets: Vec<String> = glob_targets.iter().map(|t| t.to_lowercase()).collect();
        let mut score = 0u32;
        let mut hits = 0u32;

        for term in &self.terms {
            let mut matched = match &term.pattern {
                TermPattern::Substring => lowered.contains(&term.lowered),
                TermPattern::Wildcard(pattern) => pattern.as_ref().is_some_and(|p| {
                    glob_targets
                        .iter()
                        .any(|target| p.matches_with(target, GLOB_OPTIONS))
                }),
                TermPattern::Regex(re) | TermPattern::WholeWord(re) => {
                    re.as_ref().is_some_and(|re| re.is_match(text))
                }
            };

            let fuzzy_applies = matches!(
                term.pattern,
                TermPattern::Substring | TermPattern::WholeWord(_)
            );
            if !matched && self.fuzzy && fuzzy_applies {
                let distance = edit_distance(&lowered, &term.lowered);
                score += FUZZY_MAX_BONUS.saturating_sub(distance) as u32;
                matched = distance <= fuzzy_tolerance(&term.lowered);
            }

            if matched {
                score += TERM_HIT_SCORE;
                hits += 1;
            }
        }

        MatchResult {
            matched: hits > 0,
            score: score + hits * HIT_COUNT_BONUS,
        }
    }
}

/// One-shot convenience over [`NameMatcher`]; `None` text counts as empty
pub fn match_name(text: Option<&str>, terms: &[String], mode: MatchMode, fuzzy: bool) -> MatchResult {
    NameMatcher::new(terms, mode, fuzzy).evaluate(text.unwrap_or_default())
}

fn compile_term(term: &str, mode: MatchMode) -> TermPattern {
    match mode {
        MatchMode::Substring => TermPattern::Substring,
        MatchMode::Wildcard => match Pattern::new(&collapse_stars(term)) {
            Ok(pattern) => TermPattern::Wildcard(Some(pattern)),
            Err(e) => {
                log::warn!("Wildcard pattern '{}' is invalid and will never match: {}", term, e);
                TermPattern::Wildcard(None)
            }
        },
        MatchMode::Regex => match compile_case_insensitive(term) {
            Ok(re) => TermPattern::Regex(Some(re)),
            Err(e) => {
                log::warn!("Regex '{}' is invalid and will never match: {}", term, e);
                TermPattern::Regex(None)
            }
        },
        MatchMode::WholeWord => {
            let pattern = format!(r"\b{}\b", regex::escape(term));
            TermPattern::WholeWord(compile_case_insensitive(&pattern).ok())
        }
    }
}

/// `**` is only legal as a whole path component; any run of `*` means the same here
fn collapse_stars(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if c == '*' && out.ends_with('*') {
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_substring_is_case_insensitive() {
        let result = match_name(Some("FooBar"), &terms(&["foo"]), MatchMode::Substring, false);
        assert!(result.matched);
        assert_eq!(result.score, 25);
    }

    #[test]
    fn test_missing_text_is_empty() {
        let result = match_name(None, &terms(&["foo"]), MatchMode::Substring, false);
        assert!(!result.matched);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_blank_terms_are_ignored() {
        let result = match_name(Some("anything"), &terms(&["", "  "]), MatchMode::Substring, true);
        assert_eq!(result, MatchResult::default());
    }

    #[test]
    fn test_wildcard_anchors_whole_text() {
        let t = terms(&["*.txt"]);
        assert!(match_name(Some("report.txt"), &t, MatchMode::Wildcard, false).matched);
        assert!(match_name(Some("REPORT.TXT"), &t, MatchMode::Wildcard, false).matched);
        assert!(!match_name(Some("report.txt.bak"), &t, MatchMode::Wildcard, false).matched);
        assert!(match_name(Some("rep?rt.txt"), &terms(&["rep?rt.*"]), MatchMode::Wildcard, false).matched);
        assert!(!match_name(Some("report.txt"), &terms(&["rep?.txt"]), MatchMode::Wildcard, false).matched);
    }

    #[test]
    fn test_wildcard_matches_name_or_path_alone() {
        let matcher = NameMatcher::new(&terms(&["q?.docx"]), MatchMode::Wildcard, false);
        assert!(matcher.evaluate_file("q3.docx", "/home/u/q3.docx").matched);
        assert!(!matcher.evaluate("q3.docx /home/u/q3.docx").matched);

        let by_path = NameMatcher::new(&terms(&["/home/*/Q3.DOCX"]), MatchMode::Wildcard, false);
        assert!(by_path.evaluate_file("q3.docx", "/home/u/q3.docx").matched);
    }

    #[test]
    fn test_wildcard_star_runs_collapse() {
        let result = match_name(Some("q3-report.txt"), &terms(&["*report**"]), MatchMode::Wildcard, false);
        assert!(result.matched);
        assert_eq!(collapse_stars("a***b*c**"), "a*b*c*");
    }

    #[test]
    fn test_wildcard_is_not_fuzzy() {
        let result = match_name(Some("a.txt"), &terms(&["*.txt.bak"]), MatchMode::Wildcard, true);
        assert!(!result.matched);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_invalid_wildcard_never_matches() {
        let result = match_name(Some("[abc"), &terms(&["[abc"]), MatchMode::Wildcard, false);
        assert!(!result.matched);
    }

    #[test]
    fn test_regex_mode() {
        let t = terms(&[r"^inv\d+"]);
        assert!(match_name(Some("INV2024.pdf"), &t, MatchMode::Regex, false).matched);
        assert!(!match_name(Some("old-inv2024.pdf"), &t, MatchMode::Regex, false).matched);
    }

    #[test]
    fn test_malformed_regex_is_no_match() {
        let result = match_name(Some("a(b"), &terms(&["a(b", "zzz"]), MatchMode::Regex, false);
        assert!(!result.matched);
    }

    #[test]
    fn test_whole_word() {
        let t = terms(&["cat"]);
        assert!(match_name(Some("catalog cat"), &t, MatchMode::WholeWord, false).matched);
        assert!(match_name(Some("My-CAT.png"), &t, MatchMode::WholeWord, false).matched);
        assert!(!match_name(Some("catalogcat"), &t, MatchMode::WholeWord, false).matched);
    }

    #[test]
    fn test_whole_word_escapes_term() {
        let t = terms(&["c++"]);
        assert!(!match_name(Some("cccc"), &t, MatchMode::WholeWord, false).matched);
    }

    #[test]
    fn test_fuzzy_within_tolerance() {
        let result = match_name(Some("colour"), &terms(&["color"]), MatchMode::Substring, true);
        assert!(result.matched);
        // closeness 9 + hit 20 + bonus 5
        assert_eq!(result.score, 34);
    }

    #[test]
    fn test_fuzzy_out_of_tolerance() {
        let result = match_name(
            Some("completely-different"),
            &terms(&["color"]),
            MatchMode::Substring,
            true,
        );
        assert!(!result.matched);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_fuzzy_near_miss_still_scores() {
        // distance 2 is over tolerance but still earns a closeness bonus
        let result = match_name(Some("clr"), &terms(&["color"]), MatchMode::Substring, true);
        assert!(!result.matched);
        assert_eq!(result.score, 8);
    }

    #[test]
    fn test_fuzzy_disabled() {
        let result = match_name(Some("colour"), &terms(&["color"]), MatchMode::Substring, false);
        assert!(!result.matched);
    }

    #[test]
    fn test_score_grows_with_matching_terms() {
        let text = Some("quarterly budget report");
        let one = match_name(text, &terms(&["budget", "zebra"]), MatchMode::Substring, false);
        let two = match_name(text, &terms(&["budget", "report"]), MatchMode::Substring, false);
        assert!(one.matched && two.matched);
        assert!(two.score >= one.score);
        assert_eq!(two.score, 50);
    }
}

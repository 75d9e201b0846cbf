//! docsift: local file discovery and content search
//!
//! Walks a set of roots, matches file names/paths and (optionally) file
//! contents against search terms, and ranks what it finds.

pub mod config;
pub mod error;
pub mod extractors;
pub mod models;
pub mod output;
pub mod search;
pub mod walker;

use std::path::PathBuf;

use crate::config::SearchConfig;
use crate::extractors::ExtractorRegistry;
use crate::models::ResultRecord;
use crate::search::{SearchStats, Searcher};
use crate::walker::CandidateWalker;

/// Everything one search run produces
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub results: Vec<ResultRecord>,
    pub stats: SearchStats,
    /// Directories visited, when folder tracing is enabled
    pub visited_dirs: Vec<PathBuf>,
}

/// Walk the configured roots and return ranked results
pub fn run_search(config: &SearchConfig) -> SearchOutcome {
    let extractors = ExtractorRegistry::from_config(config);
    let searcher = Searcher::new(config, extractors);
    let mut walker = CandidateWalker::new(config);
    let (results, stats) = searcher.search(&mut walker);
    SearchOutcome {
        results,
        stats,
        visited_dirs: walker.visited_dirs().to_vec(),
    }
}

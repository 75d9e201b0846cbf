//! # docsift CLI
//!
//! Find files by name, path and content.
//!
//! ## Usage
//!
//! - `docsift --term budget` - match file names and paths under the current directory
//! - `docsift --terms budget,forecast --content --root ~/Documents` - also search inside documents
//! - `docsift --term "inv-\d+" --regex --content --json` - regex search with JSON output

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use docsift::config::{ConfigOverrides, SearchConfig};
use docsift::models::MatchMode;
use docsift::output;

/// docsift - local file discovery and content search
#[derive(Parser)]
#[command(name = "docsift")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search file names, paths and document contents")]
#[command(long_about = None)]
#[command(group(ArgGroup::new("mode").args(["regex", "wildcard", "whole_word"])))]
struct Cli {
    /// A search term (repeatable)
    #[arg(short, long = "term")]
    term: Vec<String>,

    /// Several search terms, comma separated
    #[arg(long, value_delimiter = ',')]
    terms: Vec<String>,

    /// Also search inside supported files
    #[arg(short, long)]
    content: bool,

    /// Treat terms as regular expressions
    #[arg(long)]
    regex: bool,

    /// Treat terms as wildcard patterns (*, ?, [..])
    #[arg(long)]
    wildcard: bool,

    /// Match terms only as whole words
    #[arg(long)]
    whole_word: bool,

    /// Disable fuzzy (edit-distance) name matching
    #[arg(long)]
    no_fuzzy: bool,

    /// Directory to search (repeatable, default: current directory)
    #[arg(short, long = "root")]
    root: Vec<PathBuf>,

    /// Only consider these extensions, comma separated
    #[arg(long, value_delimiter = ',')]
    include_ext: Option<Vec<String>>,

    /// Skip these extensions, comma separated
    #[arg(long, value_delimiter = ',')]
    exclude_ext: Option<Vec<String>>,

    /// Only files modified on or after this date (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    since: Option<String>,

    /// Minimum file size (bytes, or with K/M/G suffix)
    #[arg(long)]
    min_size: Option<String>,

    /// Maximum file size (bytes, or with K/M/G suffix)
    #[arg(long)]
    max_size: Option<String>,

    /// Directory names to skip, comma separated (replaces the defaults)
    #[arg(long, value_delimiter = ',')]
    exclude_dir: Option<Vec<String>>,

    /// Directory levels to descend below each root
    #[arg(long)]
    max_depth: Option<usize>,

    /// Print every directory visited to stderr
    #[arg(long)]
    trace_folders: bool,

    /// Show a preview of the first content match
    #[arg(short, long)]
    snippets: bool,

    /// Stop after this many matching files
    #[arg(short = 'n', long)]
    max_results: Option<usize>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Also write results to this CSV file
    #[arg(long)]
    export_csv: Option<PathBuf>,

    /// Search PDF contents (needs pdftotext)
    #[arg(long)]
    pdf: bool,

    /// Seconds allowed for one PDF conversion
    #[arg(long)]
    pdf_timeout: Option<u64>,

    /// JSON configuration file
    #[arg(long, env = "DOCSIFT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn mode(&self) -> Option<MatchMode> {
        if self.regex {
            Some(MatchMode::Regex)
        } else if self.wildcard {
            Some(MatchMode::Wildcard)
        } else if self.whole_word {
            Some(MatchMode::WholeWord)
        } else {
            None
        }
    }

    /// Flags given on the command line, as the top configuration layer
    fn overrides(&self) -> ConfigOverrides {
        let terms: Vec<String> = self.term.iter().chain(&self.terms).cloned().collect();
        ConfigOverrides {
            terms: (!terms.is_empty()).then_some(terms),
            mode: self.mode(),
            fuzzy: self.no_fuzzy.then_some(false),
            content: self.content.then_some(true),
            pdf: self.pdf.then_some(true),
            pdf_timeout_secs: self.pdf_timeout,
            snippets: self.snippets.then_some(true),
            max_results: self.max_results,
            roots: (!self.root.is_empty()).then(|| self.root.clone()),
            include_extensions: self.include_ext.clone(),
            exclude_extensions: self.exclude_ext.clone(),
            exclude_dirs: self.exclude_dir.clone(),
            max_depth: self.max_depth,
            since: self.since.clone(),
            min_size: self.min_size.clone(),
            max_size: self.max_size.clone(),
            trace_folders: self.trace_folders.then_some(true),
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_config(cli: &Cli) -> Result<SearchConfig> {
    let mut config = SearchConfig::default();
    if let Some(path) = &cli.config {
        config = config.apply(ConfigOverrides::from_file(path)?)?;
    }
    Ok(config.apply(cli.overrides())?.validate()?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = build_config(&cli)?;
    let outcome = docsift::run_search(&config);

    if config.trace_folders {
        for dir in &outcome.visited_dirs {
            eprintln!("[dir] {}", dir.display());
        }
    }

    if cli.json {
        println!("{}", output::to_json(&outcome.results)?);
    } else {
        print!("{}", output::render_table(&outcome.results, config.snippets));
    }

    if let Some(path) = &cli.export_csv {
        output::write_csv(path, &outcome.results)
            .with_context(|| format!("exporting {} results", outcome.results.len()))?;
        eprintln!("Exported {} results to {}", outcome.results.len(), path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_terms_merge_and_mode() {
        let cli = Cli::parse_from([
            "docsift", "--term", "alpha", "--terms", "beta,gamma", "--whole-word", "--no-fuzzy",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.terms, vec!["alpha", "beta", "gamma"]);
        assert_eq!(config.mode, MatchMode::WholeWord);
        assert!(!config.fuzzy);
    }

    #[test]
    fn test_missing_terms_is_error() {
        let cli = Cli::parse_from(["docsift", "--content"]);
        let err = build_config(&cli).unwrap_err();
        assert!(err.to_string().contains("no search terms"));
    }

    #[test]
    fn test_conflicting_modes_rejected() {
        assert!(Cli::try_parse_from(["docsift", "--term", "a", "--regex", "--wildcard"]).is_err());
    }

    #[test]
    fn test_filters_parsed() {
        let cli = Cli::parse_from([
            "docsift", "--term", "a", "--min-size", "1K", "--since", "2024-01-31",
            "--include-ext", ".TXT,md", "--max-depth", "2",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.min_size, Some(1024));
        assert_eq!(config.include_extensions, vec!["txt", "md"]);
        assert_eq!(config.max_depth, Some(2));
        assert!(config.since.is_some());
    }
}

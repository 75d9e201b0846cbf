//! Candidate file enumeration
//!
//! Walks each root in turn and yields `CandidateFile`s lazily, so a search
//! that hits its result cap stops the traversal too.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use walkdir::{DirEntry, WalkDir};

use crate::config::SearchConfig;
use crate::models::CandidateFile;
use crate::search::passes_filters;

type EntryIter = Box<dyn Iterator<Item = walkdir::Result<DirEntry>>>;

pub struct CandidateWalker<'a> {
    config: &'a SearchConfig,
    roots: std::vec::IntoIter<PathBuf>,
    current: Option<EntryIter>,
    visited_dirs: Vec<PathBuf>,
}

impl<'a> CandidateWalker<'a> {
    pub fn new(config: &'a SearchConfig) -> Self {
        Self {
            config,
            roots: config.roots.clone().into_iter(),
            current: None,
            visited_dirs: Vec::new(),
        }
    }

    /// Directories entered so far (recorded only with `trace_folders`)
    pub fn visited_dirs(&self) -> &[PathBuf] {
        &self.visited_dirs
    }

    fn walk(&self, root: PathBuf) -> EntryIter {
        let excluded: Vec<String> = self
            .config
            .exclude_dirs
            .iter()
            .map(|d| d.to_lowercase())
            .collect();

        let mut walker = WalkDir::new(root).sort_by_file_name();
        // max_depth counts directory levels below the root; files directly
        // in the root sit at walkdir depth 1
        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth + 1);
        }

        Box::new(walker.into_iter().filter_entry(move |entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !excluded.contains(&entry.file_name().to_string_lossy().to_lowercase())
        }))
    }
}

impl Iterator for CandidateWalker<'_> {
    type Item = CandidateFile;

    fn next(&mut self) -> Option<CandidateFile> {
        loop {
            if self.current.is_none() {
                let root = self.roots.next()?;
                log::debug!("Walking {:?}", root);
                self.current = Some(self.walk(root));
            }

            let Some(entry) = self.current.as_mut().and_then(|it| it.next()) else {
                self.current = None;
                continue;
            };

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                if self.config.trace_folders {
                    self.visited_dirs.push(entry.path().to_path_buf());
                }
                continue;
            }
            if !entry.file_type().is_file() {
                continue;
            }

            if let Some(file) = to_candidate(&entry) {
                if passes_filters(&file, self.config) {
                    return Some(file);
                }
            }
        }
    }
}

fn to_candidate(entry: &DirEntry) -> Option<CandidateFile> {
    let name = entry.file_name().to_string_lossy().to_string();

    // Office lock files
    if name.starts_with("~$") {
        return None;
    }

    let metadata = match entry.metadata() {
        Ok(metadata) => metadata,
        Err(e) => {
            log::debug!("Skipping {:?}: {}", entry.path(), e);
            return None;
        }
    };
    let last_modified: DateTime<Utc> = metadata.modified().ok()?.into();
    let extension = entry
        .path()
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    Some(CandidateFile {
        name,
        path: entry.path().to_path_buf(),
        extension,
        size: metadata.len(),
        last_modified,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn build_tree(root: &Path) {
        fs::create_dir_all(root.join("sub/deeper")).unwrap();
        fs::create_dir_all(root.join("Node_Modules/pkg")).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("~$locked.docx"), "lock").unwrap();
        fs::write(root.join("sub/b.MD"), "bb").unwrap();
        fs::write(root.join("sub/deeper/d.txt"), "dddd").unwrap();
        fs::write(root.join("Node_Modules/pkg/c.txt"), "c").unwrap();
    }

    fn names(config: &SearchConfig) -> Vec<String> {
        CandidateWalker::new(config).map(|f| f.name).collect()
    }

    #[test]
    fn test_walks_and_excludes_dirs() {
        let dir = tempfile::tempdir().unwrap();
        build_tree(dir.path());
        let config = SearchConfig {
            roots: vec![dir.path().to_path_buf()],
            ..Default::default()
        };
        assert_eq!(names(&config), vec!["a.txt", "b.MD", "d.txt"]);
    }

    #[test]
    fn test_candidate_fields() {
        let dir = tempfile::tempdir().unwrap();
        build_tree(dir.path());
        let config = SearchConfig {
            roots: vec![dir.path().join("sub")],
            max_depth: Some(0),
            ..Default::default()
        };
        let files: Vec<_> = CandidateWalker::new(&config).collect();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].extension, "md");
        assert_eq!(files[0].size, 2);
        assert_eq!(files[0].path, dir.path().join("sub/b.MD"));
    }

    #[test]
    fn test_max_depth() {
        let dir = tempfile::tempdir().unwrap();
        build_tree(dir.path());
        let config = SearchConfig {
            roots: vec![dir.path().to_path_buf()],
            max_depth: Some(1),
            ..Default::default()
        };
        assert_eq!(names(&config), vec!["a.txt", "b.MD"]);
    }

    #[test]
    fn test_filters_applied() {
        let dir = tempfile::tempdir().unwrap();
        build_tree(dir.path());
        let config = SearchConfig {
            roots: vec![dir.path().to_path_buf()],
            include_extensions: vec!["txt".to_string()],
            min_size: Some(2),
            exclude_dirs: Vec::new(),
            ..Default::default()
        };
        assert_eq!(names(&config), vec!["d.txt"]);
    }

    #[test]
    fn test_multiple_roots_and_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        build_tree(dir.path());
        let config = SearchConfig {
            roots: vec![
                dir.path().join("does-not-exist"),
                dir.path().join("sub/deeper"),
                dir.path().join("sub"),
            ],
            max_depth: Some(0),
            ..Default::default()
        };
        assert_eq!(names(&config), vec!["d.txt", "b.MD"]);
    }

    #[test]
    fn test_folder_trace() {
        let dir = tempfile::tempdir().unwrap();
        build_tree(dir.path());
        let config = SearchConfig {
            roots: vec![dir.path().to_path_buf()],
            trace_folders: true,
            ..Default::default()
        };
        let mut walker = CandidateWalker::new(&config);
        let _: Vec<_> = walker.by_ref().collect();
        let visited = walker.visited_dirs();
        assert!(visited.contains(&dir.path().to_path_buf()));
        assert!(visited.contains(&dir.path().join("sub/deeper")));
        assert!(!visited.iter().any(|p| p.ends_with("Node_Modules")));
    }
}

use crate::config::SearchConfig;
use crate::models::CandidateFile;

/// Check a candidate against extension, date and size filters
pub fn passes_filters(file: &CandidateFile, config: &SearchConfig) -> bool {
    // Filter by extension allow list (empty = everything)
    if !config.include_extensions.is_empty()
        && !config.include_extensions.contains(&file.extension)
    {
        return false;
    }

    // Filter by extension deny list
    if config.exclude_extensions.contains(&file.extension) {
        return false;
    }

    // Filter by modification date floor
    if let Some(since) = config.since {
        if file.last_modified < since {
            return false;
        }
    }

    // Filter by size
    if let Some(min) = config.min_size {
        if file.size < min {
            return false;
        }
    }
    if let Some(max) = config.max_size {
        if file.size > max {
            return false;
        }
    }

    true
}

/// Levenshtein distance between two strings, counted in chars
///
/// Keeps two rolling rows of `b.len() + 1` cells instead of a full matrix.
/// Callers are expected to lowercase both sides first and to keep inputs
/// short (names and terms, never document bodies).
pub fn edit_distance(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (curr[j] + 1).min(prev[j + 1] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Largest distance still accepted as a fuzzy match for a term
pub fn fuzzy_tolerance(term: &str) -> usize {
    let len = term.chars().count();
    (len * 15 / 100).max(1)
}

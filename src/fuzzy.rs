// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Fuzzy scoring of file names against a user query

use similar::{DiffTag, TextDiff};
use std::path::Path;

/// Extra weight for a close match on the name without its extension
const STEM_BONUS: f64 = 1.05;

/// Score how well `query` matches the file name `target`, in `0.0..=1.0`
///
/// Exact (case-insensitive) matches score 1.0, substrings 0.95 at the start
/// of the name and 0.85 elsewhere. Everything else falls back to a character
/// similarity ratio against the full name and against the stem, so typos and
/// missing extensions still rank.
pub fn match_score(query: &str, target: &str) -> f64 {
    let query = query.to_lowercase();
    let target = target.to_lowercase();

    if query == target {
        return 1.0;
    }

    if target.contains(&query) {
        return if target.starts_with(&query) { 0.95 } else { 0.85 };
    }

    let stem = Path::new(&target)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(target.as_str());

    let full_ratio = similarity(&query, &target);
    let stem_ratio = similarity(&query, stem) * STEM_BONUS;

    full_ratio.max(stem_ratio).min(1.0)
}

/// `2 * matches / (len(a) + len(b))` over characters
pub fn similarity(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 1.0;
    }

    // Counted here rather than through `ratio()`, which is f32
    let matches: usize = TextDiff::from_chars(a, b)
        .ops()
        .iter()
        .filter_map(|op| match op.as_tag_tuple() {
            (DiffTag::Equal, old, _) => Some(old.len()),
            _ => None,
        })
        .sum();

    2.0 * matches as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_ignores_case() {
        assert_eq!(match_score("README.md", "readme.md"), 1.0);
    }

    #[test]
    fn test_substring_scores() {
        assert_eq!(match_score("report", "report_2024.pdf"), 0.95);
        assert_eq!(match_score("2024", "report_2024.pdf"), 0.85);
        // missing extension is just a prefix
        assert_eq!(match_score("notes", "notes.txt"), 0.95);
    }

    #[test]
    fn test_typo_prefers_stem() {
        // "reedme" shares 5 chars with "readme": 10/12 on the stem, boosted
        let score = match_score("reedme", "readme.md");
        assert!((score - 0.875).abs() < 1e-3, "score was {}", score);
    }

    #[test]
    fn test_unrelated_names_score_low() {
        assert!(match_score("zebra", "main.rs") < 0.6);
        assert!(match_score("invoice", "Cargo.lock") < 0.6);
    }

    #[test]
    fn test_score_never_exceeds_one() {
        for (q, t) in [("abcdefghijklmnopqrstuvwxy", "abcdefghijklmnopqrstuvwxz.txt"), ("a", "b")] {
            let score = match_score(q, t);
            assert!((0.0..=1.0).contains(&score), "{} vs {} gave {}", q, t, score);
        }
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("abc", "abc"), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert!((similarity("abcd", "abxd") - 0.75).abs() < 1e-6);
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn test_similarity_is_exact_at_thresholds() {
        assert_eq!(similarity("abcdefghij", "abcdefgxyz"), 0.7);
        assert_eq!(similarity("abcdefghij", "abcdefghiz"), 0.9);
        assert!(similarity("abcdefghij", "abcdefgxyz") >= 0.7);
    }
}

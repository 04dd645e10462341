//! Lexical relevance ranking over profile chunks.
//!
//! Scoring per keyword:
//! - `2` for every occurrence in `lowercase(title + " " + content)` that
//!   starts on a word boundary
//! - a flat `5` when the lowercased title contains the keyword anywhere
//!
//! Chunks that score nothing get a floor of `0.1` so a non-empty profile
//! always yields context.

use crate::profile::ContentChunk;
use serde::{Deserialize, Serialize};

/// Number of chunks returned when no explicit limit is configured.
pub const DEFAULT_TOP_K: usize = 3;

/// Points per boundary-anchored keyword occurrence.
const OCCURRENCE_WEIGHT: f64 = 2.0;

/// Flat bonus when the title contains the keyword.
const TITLE_BONUS: f64 = 5.0;

/// Score assigned to chunks without any lexical overlap.
const FLOOR_SCORE: f64 = 0.1;

/// A chunk paired with its relevance score for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub title: String,
    pub content: String,
    pub score: f64,
}

/// Split a query into lowercase keywords.
///
/// Duplicates are kept, so a repeated word counts twice.
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Count non-overlapping occurrences of `keyword` in `text` that begin on a
/// word boundary.
///
/// A boundary sits between two characters of different "wordness"; the start
/// of the text counts as a non-word character. A keyword that starts with a
/// punctuation character therefore only matches right after a word
/// character.
pub fn count_boundary_matches(text: &str, keyword: &str) -> usize {
    let Some(first) = keyword.chars().next() else {
        return 0;
    };
    let first_is_word = is_word_char(first);
    let last_is_word = keyword.chars().last().is_some_and(is_word_char);

    let mut count = 0;
    let mut prev_is_word = false;
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];

        if prev_is_word != first_is_word && rest.starts_with(keyword) {
            count += 1;
            pos += keyword.len();
            prev_is_word = last_is_word;
            continue;
        }

        let Some(c) = rest.chars().next() else {
            break;
        };
        prev_is_word = is_word_char(c);
        pos += c.len_utf8();
    }

    count
}

/// Score one chunk against pre-tokenized keywords.
pub fn score_chunk(chunk: &ContentChunk, keywords: &[String]) -> f64 {
    let chunk_text = format!("{} {}", chunk.title, chunk.content).to_lowercase();
    let title_text = chunk.title.to_lowercase();

    let mut score = 0.0;
    for keyword in keywords {
        score += OCCURRENCE_WEIGHT * count_boundary_matches(&chunk_text, keyword) as f64;
    }
    for keyword in keywords {
        if title_text.contains(keyword.as_str()) {
            score += TITLE_BONUS;
        }
    }

    if score == 0.0 {
        FLOOR_SCORE
    } else {
        score
    }
}

/// Rank `chunks` against `query` and return at most `k` of them, best first.
///
/// Equal scores keep their input order.
pub fn rank(query: &str, chunks: &[ContentChunk], k: usize) -> Vec<ScoredChunk> {
    let keywords = tokenize(query);

    let mut scored: Vec<ScoredChunk> = chunks
        .iter()
        .map(|chunk| ScoredChunk {
            title: chunk.title.clone(),
            content: chunk.content.clone(),
            score: score_chunk(chunk, &keywords),
        })
        .collect();

    // Vec::sort_by is stable
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(k);

    tracing::debug!(
        "Ranked {} chunks for {} keywords, returning {}",
        chunks.len(),
        keywords.len(),
        scored.len()
    );

    scored
}

/// Scale scores so the best returned chunk has relative score `1.0`.
///
/// A zero maximum is treated as `1`.
pub fn normalize_scores(results: &[ScoredChunk]) -> Vec<f64> {
    let max = results.iter().map(|r| r.score).fold(0.0_f64, f64::max);
    let divisor = if max == 0.0 { 1.0 } else { max };
    results.iter().map(|r| r.score / divisor).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(title: &str, content: &str) -> ContentChunk {
        ContentChunk {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    fn titles(results: &[ScoredChunk]) -> Vec<&str> {
        results.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("  Rust   rust\tGo\n"), vec!["rust", "rust", "go"]);
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_boundary_matches_prefix_only() {
        // "gopher" starts on a boundary, "ergo" does not
        assert_eq!(count_boundary_matches("go gopher ergo", "go"), 2);
        assert_eq!(count_boundary_matches("a_go b9go", "go"), 0);
        assert_eq!(count_boundary_matches("(go) -go", "go"), 2);
    }

    #[test]
    fn test_boundary_matches_non_overlapping() {
        assert_eq!(count_boundary_matches("aaaa", "aa"), 1);
        assert_eq!(count_boundary_matches("aa aa", "aa"), 2);
    }

    #[test]
    fn test_boundary_matches_punctuation_keyword() {
        // Non-word keyword start needs a word character before it
        assert_eq!(count_boundary_matches("c++ and c++", "++"), 2);
        assert_eq!(count_boundary_matches("++ first", "++"), 0);
        assert_eq!(count_boundary_matches("node.js", ".js"), 1);
    }

    #[test]
    fn test_boundary_matches_metacharacters_are_literal() {
        assert_eq!(count_boundary_matches("c++ developer", "c++"), 1);
        assert_eq!(count_boundary_matches("abc", "a.c"), 0);
        assert_eq!(count_boundary_matches("a.c", "a.c"), 1);
    }

    #[test]
    fn test_boundary_matches_non_ascii() {
        assert_eq!(count_boundary_matches("café go", "go"), 1);
        // Non-ASCII letters are not word characters
        assert_eq!(count_boundary_matches("ügo", "go"), 1);
    }

    #[test]
    fn test_title_bonus_is_flat() {
        let keywords = tokenize("rust");
        let once = score_chunk(&chunk("Rust", ""), &keywords);
        let twice = score_chunk(&chunk("Rust Rust", ""), &keywords);

        // title text participates in occurrences; bonus itself stays 5
        assert_eq!(once, 2.0 + 5.0);
        assert_eq!(twice, 4.0 + 5.0);
    }

    #[test]
    fn test_title_bonus_is_substring() {
        let keywords = tokenize("script");
        let score = score_chunk(&chunk("TypeScript", ""), &keywords);
        assert_eq!(score, 5.0);
    }

    #[test]
    fn test_duplicate_keywords_count_twice() {
        let score = score_chunk(&chunk("Notes", "go"), &tokenize("go go"));
        assert_eq!(score, 4.0);
    }

    #[test]
    fn test_zero_score_floor() {
        let score = score_chunk(&chunk("Education", "BSc"), &tokenize("kubernetes"));
        assert_eq!(score, 0.1);
    }

    #[test]
    fn test_rank_go_example() {
        let chunks = vec![
            chunk("Skills", "Go Rust Python"),
            chunk("Projects", "Built a Go service"),
        ];

        let results = rank("go", &chunks, DEFAULT_TOP_K);
        assert_eq!(titles(&results), vec!["Skills", "Projects"]);
        assert_eq!(results[0].score, 2.0);
        assert_eq!(results[1].score, 2.0);
    }

    #[test]
    fn test_rank_title_match_wins() {
        let chunks = vec![
            chunk("Projects", "Built a Go service"),
            chunk("Go Skills", "Go Rust Python"),
        ];

        let results = rank("go", &chunks, DEFAULT_TOP_K);
        assert_eq!(titles(&results), vec!["Go Skills", "Projects"]);
        // "go skills go rust python": 2 occurrences + title bonus
        assert_eq!(results[0].score, 4.0 + 5.0);
        assert_eq!(results[1].score, 2.0);
    }

    #[test]
    fn test_rank_empty_query_keeps_input_order() {
        let chunks = vec![chunk("B", "second"), chunk("A", "first")];

        let results = rank("", &chunks, DEFAULT_TOP_K);
        assert_eq!(titles(&results), vec!["B", "A"]);
        assert!(results.iter().all(|r| r.score == 0.1));
    }

    #[test]
    fn test_rank_empty_chunks() {
        assert!(rank("anything", &[], DEFAULT_TOP_K).is_empty());
    }

    #[test]
    fn test_rank_respects_k() {
        let chunks: Vec<_> = (0..10).map(|i| chunk(&format!("c{}", i), "x")).collect();

        assert_eq!(rank("x", &chunks, 3).len(), 3);
        assert_eq!(rank("x", &chunks[..2], 3).len(), 2);
        assert!(rank("x", &chunks, 0).is_empty());
    }

    #[test]
    fn test_rank_is_stable_for_ties() {
        let chunks = vec![
            chunk("first", "rust"),
            chunk("low", "nothing"),
            chunk("second", "rust"),
            chunk("third", "rust"),
        ];

        let results = rank("rust", &chunks, 4);
        assert_eq!(titles(&results), vec!["first", "second", "third", "low"]);
        assert!(results.iter().all(|r| r.score > 0.0));
    }

    #[test]
    fn test_normalize_scores() {
        let results = rank(
            "go",
            &[chunk("Go", "go"), chunk("Other", "go"), chunk("None", "")],
            3,
        );
        let relative = normalize_scores(&results);

        assert_eq!(relative[0], 1.0);
        assert!(relative.iter().all(|r| *r > 0.0 && *r <= 1.0));
        assert_eq!(relative[1], 2.0 / 9.0);
    }

    #[test]
    fn test_normalize_empty_and_zero() {
        assert!(normalize_scores(&[]).is_empty());

        let zero = vec![ScoredChunk {
            title: "t".to_string(),
            content: String::new(),
            score: 0.0,
        }];
        assert_eq!(normalize_scores(&zero), vec![0.0]);
    }
}

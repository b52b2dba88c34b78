//! Keyword relevance scorer, the deterministic fallback for related-entry
//! ranking. Pure and infallible.
//!
//! Algorithm:
//! 1. Source terms: lower-cased title, content, category and tags, split on
//!    whitespace, tokens longer than 3 characters, deduplicated.
//! 2. Candidate tokens: same text, no length filter, no dedup.
//! 3. score = candidate tokens found in the source terms (with repeats)
//!    + 10 when the categories are identical.
//! 4. Keep score > 2, stable sort descending, take 5.

use std::collections::HashSet;

use crate::models::entry::Entry;
use crate::related::MAX_RELATED;

const MIN_TERM_CHARS: usize = 4;
const CATEGORY_BONUS: u32 = 10;
/// Candidates must score strictly above this.
const SCORE_THRESHOLD: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredCandidate {
    /// Position in the candidate slice.
    pub index: usize,
    pub score: u32,
}

fn entry_text(entry: &Entry) -> String {
    format!(
        "{} {} {} {}",
        entry.title,
        entry.content,
        entry.category,
        entry.tags.join(" ")
    )
    .to_lowercase()
}

fn source_terms(source: &Entry) -> HashSet<String> {
    entry_text(source)
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_TERM_CHARS)
        .map(str::to_string)
        .collect()
}

pub fn score_candidate(source: &Entry, terms: &HashSet<String>, candidate: &Entry) -> u32 {
    let shared = entry_text(candidate)
        .split_whitespace()
        .filter(|token| terms.contains(*token))
        .count() as u32;
    let category_bonus = if candidate.category == source.category {
        CATEGORY_BONUS
    } else {
        0
    };
    shared + category_bonus
}

/// Ranks `candidates` against `source`. Ties keep candidate order.
pub fn rank_by_keywords(source: &Entry, candidates: &[Entry]) -> Vec<ScoredCandidate> {
    let terms = source_terms(source);

    let mut scored: Vec<ScoredCandidate> = candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| ScoredCandidate {
            index,
            score: score_candidate(source, &terms, candidate),
        })
        .filter(|c| c.score > SCORE_THRESHOLD)
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(MAX_RELATED);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{idea_kind, make_entry};

    fn entry(title: &str, content: &str, category: &str, tags: &[&str]) -> Entry {
        make_entry(title, content, category, tags, idea_kind())
    }

    #[test]
    fn test_category_match_and_shared_terms_outrank_unrelated() {
        let source = entry(
            "Streaming ingestion",
            "kafka consumers feeding postgres",
            "software",
            &["backend"],
        );
        let related = entry(
            "Kafka tuning",
            "streaming consumers postgres backend",
            "software",
            &[],
        );
        let unrelated = entry("Glaze recipes", "celadon firing notes", "pottery", &[]);
        let candidates = vec![unrelated, related];

        let ranked = rank_by_keywords(&source, &candidates);

        assert_eq!(ranked.len(), 1, "unrelated candidate must be filtered");
        assert_eq!(ranked[0].index, 1);
        // kafka, streaming, consumers, postgres, backend, software + category bonus
        assert_eq!(ranked[0].score, 16);
    }

    #[test]
    fn test_scenario_overlap_four_same_category_vs_pottery() {
        let source = entry("alpha bravo", "charlie delta", "software", &[]);
        let first = entry("alpha bravo charlie delta", "", "software", &[]);
        let second = entry("wheel throwing", "", "pottery", &[]);

        let ranked = rank_by_keywords(&source, &[first, second]);

        assert_eq!(
            ranked,
            vec![ScoredCandidate {
                index: 0,
                score: 4 + 10 + 1 // four shared tokens, bonus, and "software" itself
            }]
        );
    }

    #[test]
    fn test_short_source_tokens_are_ignored() {
        let source = entry("go is fun", "", "misc", &[]);
        let candidate = entry("go go go fun is", "", "other", &[]);
        let terms = source_terms(&source);
        assert!(terms.contains("misc"));
        assert!(!terms.contains("go"));
        assert_eq!(score_candidate(&source, &terms, &candidate), 0);
    }

    #[test]
    fn test_candidate_tokens_count_with_repeats() {
        let source = entry("rust", "", "lang", &[]);
        let candidate = entry("rust rust rust", "", "other", &[]);
        let terms = source_terms(&source);
        assert_eq!(score_candidate(&source, &terms, &candidate), 3);
    }

    #[test]
    fn test_matching_is_case_insensitive_but_category_bonus_is_exact() {
        let source = entry("Rust", "", "Software", &[]);
        let candidate = entry("RUST", "", "software", &[]);
        let terms = source_terms(&source);
        // "rust" and "software" match as terms; categories differ in case, no bonus
        assert_eq!(score_candidate(&source, &terms, &candidate), 2);
    }

    #[test]
    fn test_score_of_exactly_two_is_excluded() {
        let source = entry("tokio runtime", "", "a", &[]);
        let candidate = entry("tokio runtime", "", "b", &[]);
        assert!(rank_by_keywords(&source, &[candidate]).is_empty());
    }

    #[test]
    fn test_returns_at_most_five() {
        let source = entry("compiler", "", "software", &[]);
        let candidates: Vec<Entry> = (0..8)
            .map(|i| entry(&format!("note {i}"), "", "software", &[]))
            .collect();
        let ranked = rank_by_keywords(&source, &candidates);
        assert_eq!(ranked.len(), 5);
    }

    #[test]
    fn test_ties_keep_candidate_order() {
        let source = entry("parser", "", "software", &[]);
        let candidates: Vec<Entry> = (0..4)
            .map(|i| entry(&format!("note {i}"), "", "software", &[]))
            .collect();

        let first = rank_by_keywords(&source, &candidates);
        let second = rank_by_keywords(&source, &candidates);

        let order: Vec<usize> = first.iter().map(|c| c.index).collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_ties_follow_each_input_order() {
        let source = entry("parser", "", "software", &[]);
        let notes: Vec<Entry> = (0..3)
            .map(|i| entry(&format!("note {i}"), "", "software", &[]))
            .collect();

        for order in [[0, 1, 2], [2, 0, 1], [1, 2, 0], [2, 1, 0]] {
            let candidates: Vec<Entry> = order.iter().map(|&i| notes[i].clone()).collect();
            let ranked = rank_by_keywords(&source, &candidates);

            let ranked_ids: Vec<_> = ranked.iter().map(|c| candidates[c.index].id).collect();
            let input_ids: Vec<_> = candidates.iter().map(|e| e.id).collect();
            assert_eq!(ranked_ids, input_ids, "order {order:?}");
        }
    }

    #[test]
    fn test_empty_candidates_yield_empty_ranking() {
        let source = entry("anything", "", "x", &[]);
        assert!(rank_by_keywords(&source, &[]).is_empty());
    }
}

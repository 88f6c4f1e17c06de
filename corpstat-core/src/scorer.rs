//! Ranked statistics over global count tables
//!
//! All orderings are total: ties on a floating-point score fall back to
//! lexicographic key order, so repeated runs rank identically.

use crate::{
    counter::CollocateCounts,
    table::{CountTable, WordFrequencies},
    types::{CollocateKey, Phrase, TagPair},
};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A collocate with its strength relative to its subject
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ScoredCollocate {
    /// The subject word
    pub subject: String,
    /// The collocate phrase
    pub phrase: Phrase,
    /// Occurrences of the phrase next to the subject
    pub joint_count: u64,
    /// Occurrences of the subject alone
    pub base_count: u64,
    /// `joint_count / base_count`
    pub relative_frequency: f64,
}

/// Ranked collocates of a single subject
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SubjectScores {
    /// The subject word
    pub subject: String,
    /// Occurrences of the subject alone
    pub base_count: u64,
    /// Collocates, strongest first
    pub collocates: Vec<ScoredCollocate>,
}

/// A key with its count and share of the table total
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RankedCount<K> {
    /// The counted key
    pub key: K,
    /// Its occurrences
    pub count: u64,
    /// `count / total`
    pub relative_frequency: f64,
}

/// Probability of one tag following another
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TransitionProbability {
    /// The earlier tag
    pub first: String,
    /// The later tag
    pub second: String,
    /// Occurrences of the pair
    pub count: u64,
    /// `count / occurrences of (first, *)`
    pub probability: f64,
}

/// `joint / base`, or 0 when the base was never observed
pub fn relative_frequency(joint: u64, base: u64) -> f64 {
    if base == 0 {
        0.0
    } else {
        joint as f64 / base as f64
    }
}

/// Rank entries by count descending, then key ascending
pub fn rank_counts<K>(table: &CountTable<K>, limit: Option<usize>) -> Vec<RankedCount<K>>
where
    K: Eq + Hash + Ord + Clone,
{
    let total = table.total();
    let mut ranked = table.most_common();
    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
        .into_iter()
        .map(|(key, count)| RankedCount {
            key,
            count,
            relative_frequency: relative_frequency(count, total),
        })
        .collect()
}

/// Row-normalized transition probabilities.
///
/// Ordered by first tag, then probability descending, then second tag.
pub fn transition_probabilities(table: &CountTable<TagPair>) -> Vec<TransitionProbability> {
    let mut row_totals: HashMap<&str, u64> = HashMap::new();
    for (pair, count) in table {
        *row_totals.entry(pair.first.as_str()).or_insert(0) += count;
    }

    let mut rows: Vec<TransitionProbability> = table
        .iter()
        .map(|(pair, &count)| TransitionProbability {
            first: pair.first.clone(),
            second: pair.second.clone(),
            count,
            probability: relative_frequency(count, row_totals[pair.first.as_str()]),
        })
        .collect();

    rows.sort_unstable_by(|a, b| {
        a.first
            .cmp(&b.first)
            .then_with(|| b.probability.total_cmp(&a.probability))
            .then_with(|| a.second.cmp(&b.second))
    });
    rows
}

/// The `k` most frequent words; ties go to the lexicographically smaller word
pub fn top_k_words(frequencies: &WordFrequencies, k: usize) -> Vec<(String, u64)> {
    let mut ranked = frequencies.most_common();
    ranked.truncate(k);
    ranked
}

/// Sum joint counts across sides and group them by subject
pub fn joint_counts_by_subject(
    collocates: &CountTable<CollocateKey>,
) -> BTreeMap<String, CountTable<Phrase>> {
    let mut grouped: BTreeMap<String, CountTable<Phrase>> = BTreeMap::new();
    for (key, &count) in collocates {
        grouped
            .entry(key.subject.clone())
            .or_default()
            .add(key.phrase.clone(), count);
    }
    grouped
}

fn by_strength_then_phrase(a: &ScoredCollocate, b: &ScoredCollocate) -> Ordering {
    b.relative_frequency
        .total_cmp(&a.relative_frequency)
        .then_with(|| a.phrase.cmp(&b.phrase))
}

fn by_strength_then_subject(a: &ScoredCollocate, b: &ScoredCollocate) -> Ordering {
    b.relative_frequency
        .total_cmp(&a.relative_frequency)
        .then_with(|| a.subject.cmp(&b.subject))
        .then_with(|| a.phrase.cmp(&b.phrase))
}

/// Score every phrase seen with `subject`, strongest first
pub fn score_subject(subject: &str, joint: &CountTable<Phrase>, base_count: u64) -> SubjectScores {
    let mut collocates: Vec<ScoredCollocate> = joint
        .iter()
        .map(|(phrase, &joint_count)| ScoredCollocate {
            subject: subject.to_owned(),
            phrase: phrase.clone(),
            joint_count,
            base_count,
            relative_frequency: relative_frequency(joint_count, base_count),
        })
        .collect();
    collocates.sort_unstable_by(by_strength_then_phrase);

    SubjectScores {
        subject: subject.to_owned(),
        base_count,
        collocates,
    }
}

/// Score each requested subject against the global counts.
///
/// Subjects are returned in ascending order; a subject that never occurs
/// gets a zero base count and no collocates.
pub fn score_specific<'a, I>(counts: &CollocateCounts, subjects: I) -> Vec<SubjectScores>
where
    I: IntoIterator<Item = &'a str>,
{
    let grouped = joint_counts_by_subject(&counts.collocates);
    let empty = CountTable::new();

    let mut requested: Vec<&str> = subjects.into_iter().collect();
    requested.sort_unstable();
    requested.dedup();

    requested
        .into_iter()
        .map(|subject| {
            let joint = grouped.get(subject).unwrap_or(&empty);
            score_subject(subject, joint, counts.subjects.get(subject))
        })
        .collect()
}

/// Merge the scored collocates of every counted subject into one ranking.
///
/// Each subject keeps at most `per_subject_limit` collocates before the
/// merge; `limit` truncates the merged ranking.
pub fn rank_general(
    counts: &CollocateCounts,
    per_subject_limit: Option<usize>,
    limit: Option<usize>,
) -> Vec<ScoredCollocate> {
    let mut ranked = Vec::new();

    for (subject, joint) in joint_counts_by_subject(&counts.collocates) {
        let base_count = counts.subjects.get(subject.as_str());
        let mut scores = score_subject(&subject, &joint, base_count).collocates;
        if let Some(per_subject) = per_subject_limit {
            scores.truncate(per_subject);
        }
        ranked.extend(scores);
    }

    ranked.sort_unstable_by(by_strength_then_subject);
    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;

    fn counts(entries: &[(&str, Side, &str, u64)], subjects: &[(&str, u64)]) -> CollocateCounts {
        CollocateCounts {
            collocates: entries
                .iter()
                .map(|(s, side, p, c)| (CollocateKey::new(*s, *side, Phrase::from(*p)), *c))
                .collect(),
            subjects: subjects.iter().map(|(s, c)| (s.to_string(), *c)).collect(),
        }
    }

    #[test]
    fn test_relative_frequency_zero_base() {
        assert_eq!(relative_frequency(3, 0), 0.0);
        assert_eq!(relative_frequency(1, 4), 0.25);
    }

    #[test]
    fn test_sides_are_summed() {
        let c = counts(
            &[
                ("the", Side::Preceding, "over", 1),
                ("the", Side::Following, "over", 2),
            ],
            &[("the", 4)],
        );
        let scores = score_specific(&c, ["the"]);
        assert_eq!(scores[0].collocates.len(), 1);
        assert_eq!(scores[0].collocates[0].joint_count, 3);
        assert_eq!(scores[0].collocates[0].relative_frequency, 0.75);
    }

    #[test]
    fn test_specific_ties_break_by_phrase() {
        let c = counts(
            &[
                ("fox", Side::Following, "runs", 1),
                ("fox", Side::Following, "jumps", 1),
                ("fox", Side::Preceding, "brown", 2),
            ],
            &[("fox", 2)],
        );
        let scores = &score_specific(&c, ["fox"])[0];
        let phrases: Vec<String> = scores.collocates.iter().map(|s| s.phrase.to_string()).collect();
        assert_eq!(phrases, vec!["brown", "jumps", "runs"]);
        assert_eq!(scores.collocates[0].relative_frequency, 1.0);
    }

    #[test]
    fn test_ties_follow_displayed_phrase_order() {
        let phrases = [
            Phrase::from_iter(["a"]),
            Phrase::from_iter(["a", "c"]),
            Phrase::from_iter(["a\u{1}"]),
        ];
        let c = CollocateCounts {
            collocates: phrases
                .into_iter()
                .map(|p| (CollocateKey::new("fox", Side::Following, p), 1))
                .collect(),
            subjects: [("fox".to_string(), 2)].into_iter().collect(),
        };

        let shown: Vec<String> = score_specific(&c, ["fox"])[0]
            .collocates
            .iter()
            .map(|s| s.phrase.to_string())
            .collect();
        assert_eq!(shown, vec!["a", "a\u{1}", "a c"]);
    }

    #[test]
    fn test_unseen_subject_has_empty_scores() {
        let c = counts(&[], &[]);
        let scores = score_specific(&c, ["zebra", "aardvark", "zebra"]);
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].subject, "aardvark");
        assert_eq!(scores[0].base_count, 0);
        assert!(scores[1].collocates.is_empty());
    }

    #[test]
    fn test_general_ranking_and_limits() {
        let c = counts(
            &[
                ("the", Side::Following, "quick", 1),
                ("the", Side::Following, "lazy", 1),
                ("fox", Side::Following, "jumps", 1),
                ("fox", Side::Preceding, "brown", 1),
            ],
            &[("the", 2), ("fox", 1)],
        );

        let ranked = rank_general(&c, None, None);
        let shown: Vec<(String, String)> = ranked
            .iter()
            .map(|s| (s.subject.clone(), s.phrase.to_string()))
            .collect();
        assert_eq!(
            shown,
            vec![
                ("fox".to_string(), "brown".to_string()),
                ("fox".to_string(), "jumps".to_string()),
                ("the".to_string(), "lazy".to_string()),
                ("the".to_string(), "quick".to_string()),
            ]
        );

        let limited = rank_general(&c, Some(1), None);
        assert_eq!(limited.len(), 2);
        assert_eq!(rank_general(&c, None, Some(3)).len(), 3);
    }

    #[test]
    fn test_top_k_words() {
        let freq: WordFrequencies = [("the", 5), ("fox", 3), ("dog", 3), ("cat", 1)]
            .iter()
            .map(|(w, c)| (w.to_string(), *c))
            .collect();
        let top = top_k_words(&freq, 3);
        assert_eq!(
            top,
            vec![
                ("the".to_string(), 5),
                ("dog".to_string(), 3),
                ("fox".to_string(), 3)
            ]
        );
        assert!(top_k_words(&freq, 0).is_empty());
    }

    #[test]
    fn test_rank_counts_relative_frequency() {
        let table: CountTable<String> = [("a", 3), ("b", 1)]
            .iter()
            .map(|(k, c)| (k.to_string(), *c))
            .collect();
        let ranked = rank_counts(&table, Some(1));
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].key, "a");
        assert_eq!(ranked[0].relative_frequency, 0.75);
    }

    #[test]
    fn test_transition_probabilities_are_row_normalized() {
        let table: CountTable<TagPair> = [
            (TagPair::new("ADJ", "NOUN"), 3),
            (TagPair::new("ADJ", "ADJ"), 1),
            (TagPair::new("DET", "ADJ"), 2),
        ]
        .into_iter()
        .collect();

        let rows = transition_probabilities(&table);
        assert_eq!(rows.len(), 3);
        assert_eq!((rows[0].first.as_str(), rows[0].second.as_str()), ("ADJ", "NOUN"));
        assert_eq!(rows[0].probability, 0.75);
        assert_eq!(rows[1].probability, 0.25);
        assert_eq!(rows[2].probability, 1.0);
    }
}

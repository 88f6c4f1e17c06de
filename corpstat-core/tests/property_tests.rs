//! Property-based tests using proptest

use corpstat_core::{
    scorer, Chunk, CollocateCounter, CollocateCounts, CountTable, Counter, FrequencyCounter, Monoid,
    MonoidReduce, Phrase, Sentence, Token, TransitionCounter, WindowSides,
};
use proptest::prelude::*;

const VOCAB: &[&str] = &["the", "quick", "brown", "fox", "lazy", "dog", "a"];
const TAGS: &[&str] = &["DET", "ADJ", "NOUN", "VERB"];

fn sentence_strategy() -> impl Strategy<Value = Sentence> {
    prop::collection::vec(
        (prop::sample::select(VOCAB), prop::option::of(prop::sample::select(TAGS))),
        0..9,
    )
    .prop_map(|tokens| {
        tokens
            .into_iter()
            .map(|(word, tag)| match tag {
                Some(tag) => Token::tagged(word, tag),
                None => Token::new(word),
            })
            .collect::<Sentence>()
    })
}

fn corpus_strategy() -> impl Strategy<Value = Vec<Sentence>> {
    prop::collection::vec(sentence_strategy(), 0..40)
}

fn split(corpus: &[Sentence], size: usize) -> Vec<Chunk> {
    corpus
        .chunks(size)
        .enumerate()
        .map(|(i, part)| Chunk::new(i, i * size, part.to_vec()))
        .collect()
}

fn whole(corpus: &[Sentence]) -> Chunk {
    Chunk::from_sentences(corpus.to_vec())
}

fn contains_window(corpus: &[Sentence], phrase: &Phrase) -> bool {
    corpus.iter().any(|sentence| {
        sentence
            .tokens()
            .windows(phrase.len())
            .any(|w| w.iter().map(Token::word).eq(phrase.words().iter().map(String::as_str)))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_chunked_counts_equal_single_pass(
        corpus in corpus_strategy(),
        size in 1usize..8,
        n in 1usize..4
    ) {
        let counter = FrequencyCounter::new(n).unwrap();
        let partials = split(&corpus, size)
            .iter()
            .map(|chunk| counter.count(chunk).unwrap())
            .collect::<Vec<_>>();

        let chunked_total: u64 = partials.iter().map(CountTable::total).sum();
        let single = counter.count(&whole(&corpus)).unwrap();

        prop_assert_eq!(chunked_total, single.total());
        prop_assert_eq!(CountTable::reduce(partials), single);
    }

    #[test]
    fn test_merge_order_and_grouping_independent(
        corpus in corpus_strategy(),
        size in 1usize..6,
        rotation in 0usize..16
    ) {
        let counter = TransitionCounter::new();
        let partials = split(&corpus, size)
            .iter()
            .map(|chunk| counter.count(chunk).unwrap())
            .collect::<Vec<_>>();

        // Left fold in chunk order
        let folded = partials
            .iter()
            .cloned()
            .fold(CountTable::identity(), Monoid::combine);

        // Tree reduction over a rotated, reversed order
        let mut reordered = partials.clone();
        if !reordered.is_empty() {
            let shift = rotation % reordered.len();
            reordered.rotate_left(shift);
        }
        reordered.reverse();
        let tree = CountTable::reduce(reordered);

        prop_assert_eq!(folded, tree);
    }

    #[test]
    fn test_ngrams_never_span_sentences(corpus in corpus_strategy(), n in 1usize..4) {
        let counts = FrequencyCounter::new(n).unwrap().count(&whole(&corpus)).unwrap();
        for (ngram, _) in &counts {
            prop_assert_eq!(ngram.len(), n);
            prop_assert!(contains_window(&corpus, ngram), "{} spans a boundary", ngram);
        }
    }

    #[test]
    fn test_collocates_never_span_sentences(
        corpus in corpus_strategy(),
        window in 1usize..4,
        size in 1usize..6
    ) {
        let counter = CollocateCounter::new(["the", "fox"], window, WindowSides::Both).unwrap();
        let counts = CollocateCounts::reduce(
            split(&corpus, size).iter().map(|c| counter.count(c).unwrap()),
        );
        for (key, _) in &counts.collocates {
            prop_assert!(key.phrase.len() <= window);
            prop_assert!(contains_window(&corpus, &key.phrase));
        }
        prop_assert_eq!(counts, counter.count(&whole(&corpus)).unwrap());
    }

    #[test]
    fn test_relative_frequency_bounds(corpus in corpus_strategy(), window in 1usize..3) {
        let counter = CollocateCounter::new(VOCAB.iter().copied(), window, WindowSides::Following)
            .unwrap();
        let counts = counter.count(&whole(&corpus)).unwrap();

        for scored in scorer::rank_general(&counts, None, None) {
            prop_assert!(scored.relative_frequency >= 0.0);
            if scored.joint_count <= scored.base_count {
                prop_assert!(scored.relative_frequency <= 1.0);
            }
        }
    }

    #[test]
    fn test_ranking_is_deterministic(corpus in corpus_strategy()) {
        let counter = CollocateCounter::new(["the", "a"], 2, WindowSides::Both).unwrap();
        let first = scorer::rank_general(&counter.count(&whole(&corpus)).unwrap(), None, None);
        let second = scorer::rank_general(
            &CollocateCounts::reduce(split(&corpus, 3).iter().map(|c| counter.count(c).unwrap())),
            None,
            None,
        );
        prop_assert_eq!(first, second);
    }
}

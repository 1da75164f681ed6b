use std::fs;

use talkscore_core::types::Category;
use talkscore_core::Error;
use talkscore_lexical::{LexicalMatcher, ScoreNormalizer, Taxonomy};

#[test]
fn scientist_sentence_counts_science_terms() {
    let matcher = LexicalMatcher::builtin();
    let text = "The scientist observed the experiment and made a prediction.";
    let counts = matcher.count(text);
    assert!(counts[Category::Science] >= 3, "science count {}", counts[Category::Science]);
    assert_eq!(counts[Category::Social], 0);
    assert_eq!(counts[Category::Literature], 0);
    assert_eq!(counts[Category::Language], 0);

    let found = matcher.locate(text);
    let words: Vec<&str> = found.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(words, ["scientist", "observed", "experiment", "prediction"]);
    for m in &found {
        let slice: String = text.chars().skip(m.start).take(m.end - m.start).collect();
        assert_eq!(slice, m.text);
    }
}

#[test]
fn count_and_locate_are_repeatable() {
    let matcher = LexicalMatcher::builtin();
    let text = "Once upon a time my friend read a story about a magnet. Thank you for sharing!";
    let first = (matcher.count(text), matcher.locate(text));
    for _ in 0..3 {
        assert_eq!(matcher.count(text), first.0);
        assert_eq!(matcher.locate(text), first.1);
    }
    let located: u32 = first.1.len() as u32;
    let counted: u32 = first.0.iter().map(|(_, n)| n).sum();
    assert_eq!(located, counted, "locate yields one entry per counted match");
}

#[test]
fn normalized_scores_stay_in_range() {
    let matcher = LexicalMatcher::builtin();
    let normalizer = ScoreNormalizer::default();
    let heavy = "experiment ".repeat(100);
    for text in ["", "hello", "The scientist observed the experiment.", heavy.as_str()] {
        let scores = normalizer.normalize(&matcher.count(text));
        for (_, s) in scores.iter() { assert!(s <= 100); }
    }
    assert!(normalizer.normalize(&matcher.count("")).is_all_default());
    assert_eq!(normalizer.normalize(&matcher.count(&heavy))[Category::Science], 100);
}

#[test]
fn more_occurrences_never_lower_the_score() {
    let matcher = LexicalMatcher::builtin();
    let normalizer = ScoreNormalizer::new(5).unwrap();
    let mut text = String::from("We talked.");
    let mut last = 0;
    for _ in 0..10 {
        text.push_str(" What a story.");
        let s = normalizer.normalize(&matcher.count(&text))[Category::Literature];
        assert!(s >= last);
        last = s;
    }
    assert_eq!(last, 100);
}

#[test]
fn taxonomy_file_replaces_builtin_lists() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("taxonomy.toml");
    fs::write(&path, "science = [\"volcano\", \"lava flow\"]\nliterature = [\"comic\"]\n").unwrap();

    let taxonomy = Taxonomy::from_file(&path).expect("taxonomy");
    assert_eq!(taxonomy.len(), 3);
    let matcher = LexicalMatcher::new(&taxonomy).expect("matcher");
    let counts = matcher.count("The volcano had a lava   flow, like in my comic. An experiment!");
    assert_eq!(counts[Category::Science], 2);
    assert_eq!(counts[Category::Literature], 1);
    assert_eq!(counts[Category::Social], 0);
}

#[test]
fn taxonomy_file_errors_are_configuration_errors() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(matches!(Taxonomy::from_file(&tmp.path().join("missing.toml")), Err(Error::Configuration(_))));

    let bad = tmp.path().join("bad.toml");
    fs::write(&bad, "maths = [\"sum\"]\n").unwrap();
    assert!(matches!(Taxonomy::from_file(&bad), Err(Error::Configuration(_))));
}

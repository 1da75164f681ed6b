//! Whole-word keyword matching.
//!
//! Each category compiles to a single case-insensitive alternation wrapped in
//! word boundaries. Alternatives are ordered longest-first, so within one
//! category a phrase wins over its own constituent words and matches never
//! overlap. Categories are matched independently: a word listed under two
//! categories counts once in each.

use once_cell::sync::Lazy;
use regex::Regex;

use talkscore_core::error::{Error, Result};
use talkscore_core::text::{is_blank, CharOffsets};
use talkscore_core::types::{Category, CategoryCounts, KeywordMatch};

use crate::taxonomy::Taxonomy;

static BUILTIN_MATCHER: Lazy<LexicalMatcher> =
    Lazy::new(|| LexicalMatcher::new(Taxonomy::builtin()).expect("built-in taxonomy compiles"));

pub struct LexicalMatcher {
    patterns: Vec<(Category, Regex)>,
}

impl LexicalMatcher {
    /// Compiles one pattern per non-empty category. A list too large for the
    /// regex engine is a `Configuration` error.
    pub fn new(taxonomy: &Taxonomy) -> Result<Self> {
        let mut patterns = Vec::new();
        for category in Category::ALL {
            if let Some(re) = category_pattern(category, taxonomy.keywords(category))? {
                patterns.push((category, re));
            }
        }
        Ok(Self { patterns })
    }

    /// Matcher over the built-in taxonomy, compiled on first use.
    pub fn builtin() -> &'static LexicalMatcher { &BUILTIN_MATCHER }

    pub fn count(&self, transcript: &str) -> CategoryCounts {
        let mut counts = CategoryCounts::default();
        if is_blank(transcript) { return counts; }
        for (category, re) in &self.patterns {
            counts[*category] = u32::try_from(re.find_iter(transcript).count()).unwrap_or(u32::MAX);
        }
        tracing::debug!(?counts, "lexical counts");
        counts
    }

    /// Every match with character offsets into `transcript`, ordered by
    /// category then position.
    pub fn locate(&self, transcript: &str) -> Vec<KeywordMatch> {
        if is_blank(transcript) { return Vec::new(); }
        let offsets = CharOffsets::new(transcript);
        let mut matches = Vec::new();
        for (category, re) in &self.patterns {
            for m in re.find_iter(transcript) {
                matches.push(KeywordMatch {
                    text: m.as_str().to_string(),
                    category: *category,
                    start: offsets.char_at(m.start()),
                    end: offsets.char_at(m.end()),
                });
            }
        }
        matches
    }
}

fn category_pattern(category: Category, keywords: &[String]) -> Result<Option<Regex>> {
    let mut alternatives: Vec<String> = keywords
        .iter()
        .map(|k| k.split_whitespace().map(regex::escape).collect::<Vec<_>>().join(r"\s+"))
        .filter(|alt| !alt.is_empty())
        .collect();
    if alternatives.is_empty() { return Ok(None); }
    // Longest first; ties broken lexically so the pattern is stable.
    alternatives.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let pattern = format!(r"(?i)\b(?:{})\b", alternatives.join("|"));
    // Every piece is escaped, so the only failure mode is the size limit.
    Regex::new(&pattern).map(Some).map_err(|e| {
        Error::Configuration(format!("{category} keywords ({} entries) do not compile: {e}", keywords.len()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(lists: &[(Category, &[&str])]) -> LexicalMatcher {
        LexicalMatcher::new(&Taxonomy::from_lists(
            lists.iter().map(|(c, ws)| (*c, ws.iter().map(|w| (*w).to_string()).collect())),
        ))
        .expect("matcher")
    }

    #[test]
    fn keyword_does_not_match_inside_word() {
        let m = matcher(&[(Category::Language, &["at"])]);
        assert_eq!(m.count("the cat sat")[Category::Language], 0);
        assert!(m.locate("the cat sat").is_empty());
        assert_eq!(m.count("look at that")[Category::Language], 1);
    }

    #[test]
    fn phrase_wins_over_its_words() {
        let m = matcher(&[(Category::Literature, &["once", "upon", "time", "once upon a time"])]);
        let found = m.locate("Once upon a time there was a fox");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "Once upon a time");
        assert_eq!((found[0].start, found[0].end), (0, 16));
        assert_eq!(m.count("once upon a time, once more")[Category::Literature], 2);
    }

    #[test]
    fn phrase_spans_any_whitespace() {
        let m = matcher(&[(Category::Social, &["take turns"])]);
        let text = "we TAKE \t\n  turns here";
        let found = m.locate(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "TAKE \t\n  turns");
        assert_eq!(found[0].start, 3);
        assert_eq!(found[0].end, 3 + "TAKE \t\n  turns".chars().count());
    }

    #[test]
    fn shared_keyword_counts_in_each_category() {
        let m = matcher(&[(Category::Science, &["sound"]), (Category::Language, &["sound"])]);
        let counts = m.count("that sound, that sound");
        assert_eq!(counts[Category::Science], 2);
        assert_eq!(counts[Category::Language], 2);
        let cats: Vec<Category> = m.locate("that sound").iter().map(|k| k.category).collect();
        assert_eq!(cats, [Category::Science, Category::Language]);
    }

    #[test]
    fn offsets_are_in_characters() {
        let m = matcher(&[(Category::Literature, &["story"])]);
        let found = m.locate("¡Qué story!");
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].start, found[0].end), (5, 10));
    }

    #[test]
    fn oversized_category_is_a_configuration_error() {
        let mut science = vec!["experiment".to_string()];
        science.extend((0..50_000).map(|i| format!("alpha{i} beta{i}")));
        let taxonomy = Taxonomy::from_lists([(Category::Science, science)]);
        match LexicalMatcher::new(&taxonomy) {
            Err(Error::Configuration(msg)) => assert!(msg.contains("science"), "{msg}"),
            Err(other) => panic!("expected configuration error, got {other:?}"),
            Ok(m) => panic!("oversized list compiled; science count {}", m.count("we did an experiment")[Category::Science]),
        }
    }

    #[test]
    fn blank_input_is_all_zero() {
        let m = LexicalMatcher::builtin();
        assert!(m.count("").is_all_default());
        assert!(m.count(" \n\t ").is_all_default());
        assert!(m.locate("   ").is_empty());
    }
}

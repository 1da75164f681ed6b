//! Category → keyword table.
//!
//! The built-in table is compiled in and shared process-wide. A replacement
//! table can be read once at startup from a TOML file holding one array per
//! category:
//!
//! ```toml
//! science = ["experiment", "hypothesis"]
//! literature = ["once upon a time"]
//! ```

use figment::providers::{Format, Toml};
use figment::Figment;
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use talkscore_core::error::{Error, Result};
use talkscore_core::types::Category;

const BUILTIN: &[(Category, &[&str])] = &[
    (
        Category::Science,
        &[
            "science", "scientist", "scientists", "experiment", "experiments", "hypothesis", "predict", "predicted",
            "prediction", "observe", "observed", "observing", "observation", "measure", "measured", "measurement",
            "investigate", "investigation", "discover", "discovered", "evidence", "compare", "float", "floats",
            "sink", "sinks", "magnet", "magnets", "plant", "plants", "seed", "seeds", "grow", "growing", "weather",
            "temperature", "energy", "gravity", "insect", "insects", "habitat", "planet", "planets", "moon",
            "water cycle", "life cycle", "melt", "melting", "freeze", "frozen", "microscope", "magnifying glass",
            "cause and effect", "what happens if", "why does", "data", "pattern",
        ],
    ),
    (
        Category::Social,
        &[
            "friend", "friends", "friendship", "share", "sharing", "take turns", "my turn", "your turn", "help",
            "helping", "please", "thank you", "thanks", "sorry", "excuse me", "you're welcome", "feel", "feeling",
            "feelings", "happy", "sad", "angry", "upset", "scared", "kind", "kindness", "together", "team",
            "teamwork", "play together", "include", "listen", "respect", "family", "care", "caring", "hug", "fair",
            "cooperate", "work it out",
        ],
    ),
    (
        Category::Literature,
        &[
            "story", "stories", "storybook", "book", "books", "read", "reading", "author", "illustrator",
            "illustration", "character", "characters", "chapter", "page", "title", "plot", "setting", "beginning",
            "ending", "the end", "once upon a time", "happily ever after", "fairy tale", "poem", "poetry", "fable",
            "moral", "hero", "villain", "princess", "dragon", "library", "retell", "narrator",
        ],
    ),
    (
        Category::Language,
        &[
            "word", "words", "letter", "letters", "alphabet", "spell", "spelling", "sound", "sounds", "syllable",
            "syllables", "rhyme", "rhymes", "rhyming", "vocabulary", "sentence", "sentences", "noun", "verb",
            "adjective", "describe", "meaning", "means", "opposite", "synonym", "plural", "phonics", "vowel",
            "consonant", "pronounce", "what does that mean", "tell me about", "explain",
        ],
    ),
];

static BUILTIN_TAXONOMY: Lazy<Taxonomy> = Lazy::new(|| {
    Taxonomy::from_lists(BUILTIN.iter().map(|(c, words)| (*c, words.iter().map(|w| (*w).to_string()).collect())))
});

/// One keyword or phrase and the category it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordEntry<'a> {
    pub category: Category,
    pub phrase: &'a str,
}

/// Immutable keyword lists keyed by category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    lists: BTreeMap<Category, Vec<String>>,
}

impl Taxonomy {
    pub fn builtin() -> &'static Taxonomy { &BUILTIN_TAXONOMY }

    /// Build from arbitrary lists. Phrases are trimmed, inner whitespace is
    /// collapsed, empties are dropped and duplicates (case-insensitively)
    /// removed. Categories without lists get an empty one.
    pub fn from_lists(lists: impl IntoIterator<Item = (Category, Vec<String>)>) -> Self {
        let mut out: BTreeMap<Category, Vec<String>> = Category::ALL.into_iter().map(|c| (c, Vec::new())).collect();
        let mut seen: BTreeMap<Category, HashSet<String>> = BTreeMap::new();
        for (category, phrases) in lists {
            let list = out.entry(category).or_default();
            let seen = seen.entry(category).or_default();
            for phrase in phrases {
                let phrase = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
                if phrase.is_empty() || !seen.insert(phrase.to_lowercase()) { continue; }
                list.push(phrase);
            }
        }
        Self { lists: out }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::Configuration(format!("taxonomy file not found: {}", path.display())));
        }
        let raw: BTreeMap<String, Vec<String>> = Figment::from(Toml::file(path))
            .extract()
            .map_err(|e| Error::Configuration(format!("invalid taxonomy {}: {}", path.display(), e)))?;
        let lists = raw
            .into_iter()
            .map(|(name, phrases)| {
                let category = name
                    .parse::<Category>()
                    .map_err(|_| Error::Configuration(format!("unknown category '{name}' in {}", path.display())))?;
                Ok((category, phrases))
            })
            .collect::<Result<Vec<_>>>()?;
        let taxonomy = Self::from_lists(lists);
        if taxonomy.is_empty() {
            return Err(Error::Configuration(format!("taxonomy {} has no keywords", path.display())));
        }
        tracing::info!(path = %path.display(), keywords = taxonomy.len(), "loaded taxonomy");
        Ok(taxonomy)
    }

    pub fn keywords(&self, category: Category) -> &[String] {
        self.lists.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All entries, in category order then list order.
    pub fn entries(&self) -> impl Iterator<Item = KeywordEntry<'_>> + '_ {
        Category::ALL
            .into_iter()
            .flat_map(move |c| self.keywords(c).iter().map(move |p| KeywordEntry { category: c, phrase: p.as_str() }))
    }

    pub fn len(&self) -> usize { self.lists.values().map(Vec::len).sum() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_category() {
        let t = Taxonomy::builtin();
        for c in Category::ALL { assert!(!t.keywords(c).is_empty(), "{c} has keywords"); }
        assert!(t.keywords(Category::Literature).iter().any(|k| k == "once upon a time"));
    }

    #[test]
    fn from_lists_normalizes_phrases() {
        let t = Taxonomy::from_lists([(Category::Social, vec!["  take   turns ".into(), "Take turns".into(), "".into()])]);
        assert_eq!(t.keywords(Category::Social), ["take turns"]);
        assert!(t.keywords(Category::Science).is_empty());
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn entries_follow_category_order() {
        let t = Taxonomy::from_lists([
            (Category::Language, vec!["rhyme".into()]),
            (Category::Science, vec!["magnet".into(), "seed".into()]),
        ]);
        let got: Vec<(Category, &str)> = t.entries().map(|e| (e.category, e.phrase)).collect();
        assert_eq!(got, [(Category::Science, "magnet"), (Category::Science, "seed"), (Category::Language, "rhyme")]);
    }
}

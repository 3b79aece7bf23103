use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use stop_words::{get, LANGUAGE};

/// Splits on runs of non-word characters.
static WORD_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w]+").expect("invalid regex"));

/// Text normalizer: raw text in, stemmed content terms out.
///
/// Pipeline, in order:
/// 1. split on non-word characters
/// 2. lowercase
/// 3. drop stop words (base English list plus configured extras)
/// 4. drop tokens that are not purely alphabetic
/// 5. Snowball-stem the survivors
///
/// Pure function of its inputs; an empty result is valid and signals that
/// the document carries no analyzable content.
pub struct TermNormalizer {
    stopwords: HashSet<String>,
    stemmer: Stemmer,
}

impl TermNormalizer {
    /// Build a normalizer over the base English stop-word list extended
    /// with `custom_stopwords`.
    pub fn new(custom_stopwords: &HashSet<String>) -> Self {
        let mut stopwords: HashSet<String> = get(LANGUAGE::English).into_iter().collect();
        stopwords.extend(custom_stopwords.iter().map(|w| w.to_lowercase()));
        TermNormalizer {
            stopwords,
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    /// Normalize one document's text into an ordered term sequence.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let lowercased = text.to_lowercase();
        WORD_SPLIT
            .split(&lowercased)
            .filter(|tok| !tok.is_empty())
            .filter(|tok| !self.stopwords.contains(*tok))
            .filter(|tok| tok.chars().all(|c| c.is_alphabetic()))
            .map(|tok| self.stemmer.stem(tok).into_owned())
            // a stem can collapse onto a stop word ("wants" -> "want");
            // the output must stay stop-word free
            .filter(|stem| !self.stopwords.contains(stem))
            .collect()
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }
}

impl std::fmt::Debug for TermNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TermNormalizer")
            .field("stopwords", &self.stopwords.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> TermNormalizer {
        TermNormalizer::new(&HashSet::new())
    }

    #[test]
    fn splits_and_lowercases() {
        let terms = normalizer().normalize("Family, dog!");
        assert_eq!(terms, vec!["famili", "dog"]);
    }

    #[test]
    fn drops_stop_words() {
        let terms = normalizer().normalize("the and is dog");
        assert_eq!(terms, vec!["dog"]);
    }

    #[test]
    fn drops_non_alphabetic_tokens() {
        let terms = normalizer().normalize("dog 42 cat_3 1990s fox");
        assert!(terms.contains(&"dog".to_string()));
        assert!(terms.contains(&"fox".to_string()));
        assert_eq!(terms.len(), 2);
    }

    #[test]
    fn stems_survivors() {
        let terms = normalizer().normalize("running foxes parties");
        assert_eq!(terms, vec!["run", "fox", "parti"]);
    }

    #[test]
    fn custom_stopwords_are_case_insensitive() {
        let mut extra = HashSet::new();
        extra.insert("Dog".to_string());
        let n = TermNormalizer::new(&extra);
        assert!(n.normalize("Dog dog DOG").is_empty());
    }

    #[test]
    fn empty_output_is_valid() {
        assert!(normalizer().normalize("").is_empty());
        assert!(normalizer().normalize("the a an 123 !!!").is_empty());
    }

    #[test]
    fn never_emits_stop_words_or_non_alpha() {
        let n = normalizer();
        let terms = n.normalize("The quick brown foxes are running over 99 fences, aren't they?");
        for term in &terms {
            assert!(!n.is_stopword(term), "stop word leaked: {term}");
            assert!(term.chars().all(|c| c.is_alphabetic()), "non-alpha: {term}");
        }
    }
}

//! Word lists: the base dictionary and optional themed dictionaries
//!
//! A [`Dictionary`] pairs a [`DictionaryTrie`] (for prefix search during move
//! generation and word checks) with [`WordSets`] (for constrained random
//! lookup when laying out start words). Both are built once and shared
//! read-only behind an `Arc`.

pub mod special;
pub mod trie;
pub mod word_sets;

use std::path::Path;

use anyhow::Context;
use rand::Rng;

pub use special::SpecialDictionary;
pub use trie::{DictionaryTrie, NodeId, ROOT};
pub use word_sets::{RandomWords, WordConstraint, WordSets};

/// Uppercase a word-list entry, rejecting anything that is not plain A-Z
pub(crate) fn normalize_word(raw: &str) -> Option<String> {
    let word = raw.trim();
    if word.is_empty() || !word.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    Some(word.to_ascii_uppercase())
}

/// Lines of a word-list file that carry a word: blanks and `#` comments are
/// skipped
pub(crate) fn word_lines(contents: &str) -> impl Iterator<Item = &str> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

/// The base word list every game checks words against
#[derive(Clone, Debug, Default)]
pub struct Dictionary {
    trie: DictionaryTrie,
    word_sets: WordSets,
}

impl Dictionary {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words: Vec<String> = words
            .into_iter()
            .filter_map(|w| normalize_word(w.as_ref()))
            .collect();
        words.sort();
        words.dedup();

        Self {
            trie: DictionaryTrie::from_words(&words),
            word_sets: WordSets::from_words(&words),
        }
    }

    /// Build from the contents of a word-list file
    pub fn parse(contents: &str) -> Self {
        Self::from_words(word_lines(contents))
    }

    /// Load a word-list file, one word per line
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading dictionary {}", path.display()))?;
        let dictionary = Self::parse(&contents);
        tracing::info!(path = %path.display(), words = dictionary.len(), "loaded dictionary");
        Ok(dictionary)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.trie.contains(word)
    }

    pub fn is_prefix(&self, prefix: &str) -> bool {
        self.trie.is_prefix(prefix)
    }

    pub fn trie(&self) -> &DictionaryTrie {
        &self.trie
    }

    pub fn word_sets(&self) -> &WordSets {
        &self.word_sets
    }

    pub fn len(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    /// See [`WordSets::words_with_constraints_in_random_order`]
    pub fn words_with_constraints_in_random_order<'a, R: Rng + ?Sized>(
        &'a self,
        constraints: &[WordConstraint],
        length: usize,
        rng: &'a mut R,
    ) -> RandomWords<'a, R> {
        self.word_sets
            .words_with_constraints_in_random_order(constraints, length, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word(" cat \n"), Some("CAT".to_string()));
        assert_eq!(normalize_word("don't"), None);
        assert_eq!(normalize_word("   "), None);
        assert_eq!(normalize_word("café"), None);
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let dict = Dictionary::parse("# words\ncat\n\n  dog  \nCAT\n#zebra\n");
        assert_eq!(dict.len(), 2);
        assert!(dict.contains("cat"));
        assert!(dict.contains("DOG"));
        assert!(!dict.contains("ZEBRA"));
        assert!(dict.is_prefix("DO"));
        assert_eq!(dict.word_sets().word_count(3), 2);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = Dictionary::load(Path::new("/nonexistent/words.txt")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/words.txt"));
    }
}

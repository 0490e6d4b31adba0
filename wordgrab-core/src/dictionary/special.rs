//! Themed word lists that pay a flat bonus

use std::path::Path;

use anyhow::Context;

use super::trie::DictionaryTrie;

/// A named themed word list.
///
/// Words in it are legal in games that enable it, and a main word found in it
/// scores `bonus_points` on top of its letter score. `token_cost` is what a
/// player pays to enable the list for a game; the engine only carries it.
#[derive(Clone, Debug)]
pub struct SpecialDictionary {
    name: String,
    trie: DictionaryTrie,
    bonus_points: u32,
    token_cost: u32,
}

impl SpecialDictionary {
    pub fn new<I, S>(name: &str, words: I, bonus_points: u32, token_cost: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.to_string(),
            trie: DictionaryTrie::from_words(words),
            bonus_points,
            token_cost,
        }
    }

    pub fn load(name: &str, path: &Path, bonus_points: u32, token_cost: u32) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading special dictionary '{}' from {}", name, path.display()))?;
        let special = Self::new(name, super::word_lines(&contents), bonus_points, token_cost);
        tracing::info!(name, words = special.trie.len(), "loaded special dictionary");
        Ok(special)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contains(&self, word: &str) -> bool {
        self.trie.contains(word)
    }

    pub fn trie(&self) -> &DictionaryTrie {
        &self.trie
    }

    pub fn bonus_points(&self) -> u32 {
        self.bonus_points
    }

    pub fn token_cost(&self) -> u32 {
        self.token_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_words() {
        let special = SpecialDictionary::new("space", ["quasar", "Nebula", "red giant"], 25, 3);
        assert_eq!(special.name(), "space");
        assert!(special.contains("QUASAR"));
        assert!(special.contains("nebula"));
        assert!(!special.contains("REDGIANT"));
        assert_eq!(special.trie().len(), 2);
        assert_eq!(special.bonus_points(), 25);
        assert_eq!(special.token_cost(), 3);
    }
}

//! Arena-backed prefix tree with per-depth level maps

use crate::tiles::letter_index;

/// Index of a node in the trie arena
pub type NodeId = u32;

/// The root node (the empty prefix)
pub const ROOT: NodeId = 0;

#[derive(Clone, Debug)]
struct TrieNode {
    children: Vec<(u8, NodeId)>,
    parent: NodeId,
    letter: u8,
    depth: u16,
    terminal: bool,
}

impl TrieNode {
    fn new(parent: NodeId, letter: u8, depth: u16) -> Self {
        Self {
            children: Vec::new(),
            parent,
            letter,
            depth,
            terminal: false,
        }
    }
}

/// Prefix tree over uppercase A-Z words.
///
/// Built once from a word list and read-only afterwards. Besides ordinary
/// descent it keeps a level map: for every absolute depth `d` and letter `c`,
/// the nodes whose word has `c` at offset `d`. This lets a search jump straight
/// to every prefix with a given letter at a given position.
#[derive(Clone, Debug)]
pub struct DictionaryTrie {
    nodes: Vec<TrieNode>,
    levels: Vec<[Vec<NodeId>; 26]>,
    word_count: usize,
}

impl Default for DictionaryTrie {
    fn default() -> Self {
        Self {
            nodes: vec![TrieNode::new(ROOT, 0, 0)],
            levels: Vec::new(),
            word_count: 0,
        }
    }
}

impl DictionaryTrie {
    /// Bulk-load a word list. Entries that are not purely alphabetic are
    /// skipped; case is ignored.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = Self::default();
        for word in words {
            if let Some(word) = super::normalize_word(word.as_ref()) {
                trie.insert(word.as_bytes());
            }
        }
        trie.build_levels();
        trie
    }

    fn insert(&mut self, word: &[u8]) {
        let mut node = ROOT;
        for (i, &letter) in word.iter().enumerate() {
            node = match self.child_of(node, letter) {
                Some(child) => child,
                None => {
                    let child = self.nodes.len() as NodeId;
                    self.nodes.push(TrieNode::new(node, letter, (i + 1) as u16));
                    self.nodes[node as usize].children.push((letter, child));
                    child
                }
            };
        }
        let end = &mut self.nodes[node as usize];
        if !end.terminal {
            end.terminal = true;
            self.word_count += 1;
        }
    }

    fn build_levels(&mut self) {
        let max_depth = self.nodes.iter().map(|n| n.depth as usize).max().unwrap_or(0);
        self.levels = (0..max_depth)
            .map(|_| std::array::from_fn(|_| Vec::new()))
            .collect();

        for (id, node) in self.nodes.iter().enumerate().skip(1) {
            let offset = node.depth as usize - 1;
            let letter = (node.letter - b'A') as usize;
            self.levels[offset][letter].push(id as NodeId);
        }
    }

    fn child_of(&self, node: NodeId, letter: u8) -> Option<NodeId> {
        self.nodes[node as usize]
            .children
            .iter()
            .find(|&&(l, _)| l == letter)
            .map(|&(_, child)| child)
    }

    /// Number of distinct words
    pub fn len(&self) -> usize {
        self.word_count
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    /// Length of the longest word
    pub fn max_word_len(&self) -> usize {
        self.levels.len()
    }

    /// Follow the edge for `letter` (either case)
    pub fn child(&self, node: NodeId, letter: char) -> Option<NodeId> {
        letter_index(letter).and_then(|i| self.child_of(node, b'A' + i as u8))
    }

    /// Follow every letter of `letters` from `node`
    pub fn descend(&self, node: NodeId, letters: &str) -> Option<NodeId> {
        letters.chars().try_fold(node, |n, c| self.child(n, c))
    }

    /// Whether a word ends at `node`
    pub fn is_word(&self, node: NodeId) -> bool {
        self.nodes[node as usize].terminal
    }

    pub fn depth(&self, node: NodeId) -> usize {
        self.nodes[node as usize].depth as usize
    }

    pub fn contains(&self, word: &str) -> bool {
        !word.is_empty() && self.descend(ROOT, word).is_some_and(|n| self.is_word(n))
    }

    /// True for every prefix of a word, including the empty string
    pub fn is_prefix(&self, prefix: &str) -> bool {
        self.descend(ROOT, prefix).is_some()
    }

    /// Nodes whose letter at offset `depth` is `letter`
    pub fn level(&self, depth: usize, letter: char) -> &[NodeId] {
        match (self.levels.get(depth), letter_index(letter)) {
            (Some(level), Some(i)) => level[i].as_slice(),
            _ => &[],
        }
    }

    /// The prefix spelled by the path from the root to `node`
    pub fn word_at(&self, node: NodeId) -> String {
        let mut letters = Vec::with_capacity(self.depth(node));
        let mut cursor = node;
        while cursor != ROOT {
            let n = &self.nodes[cursor as usize];
            letters.push(n.letter);
            cursor = n.parent;
        }
        letters.reverse();
        String::from_utf8(letters).unwrap_or_default()
    }

    /// Words of exactly `length` letters with `letter` at `offset`, found by
    /// jumping through the level map instead of walking from the root
    pub fn words_with_letter_at(&self, offset: usize, letter: char, length: usize) -> Vec<String> {
        if offset >= length {
            return Vec::new();
        }

        let mut words = Vec::new();
        let mut stack: Vec<NodeId> = self.level(offset, letter).to_vec();
        while let Some(node) = stack.pop() {
            let depth = self.depth(node);
            if depth == length {
                if self.is_word(node) {
                    words.push(self.word_at(node));
                }
                continue;
            }
            stack.extend(self.nodes[node as usize].children.iter().map(|&(_, c)| c));
        }
        words.sort();
        words
    }

    /// Every word in the trie
    pub fn words(&self) -> impl Iterator<Item = String> + '_ {
        (1..self.nodes.len() as NodeId)
            .filter(move |&n| self.is_word(n))
            .map(move |n| self.word_at(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DictionaryTrie {
        DictionaryTrie::from_words(["cat", "cats", "car", "dog", "at", "Cat", "x-ray", ""])
    }

    #[test]
    fn test_contains_and_prefix() {
        let trie = sample();
        assert_eq!(trie.len(), 5);
        assert!(trie.contains("CAT"));
        assert!(trie.contains("cats"));
        assert!(!trie.contains("CA"));
        assert!(!trie.contains(""));
        assert!(!trie.contains("XRAY"));
        assert!(trie.is_prefix(""));
        assert!(trie.is_prefix("CA"));
        assert!(!trie.is_prefix("CB"));
        assert_eq!(trie.max_word_len(), 4);
    }

    #[test]
    fn test_incremental_descent() {
        let trie = sample();
        let ca = trie.descend(ROOT, "CA").unwrap();
        assert!(!trie.is_word(ca));
        let cat = trie.child(ca, 't').unwrap();
        assert!(trie.is_word(cat));
        assert_eq!(trie.depth(cat), 3);
        assert_eq!(trie.word_at(cat), "CAT");
        assert!(trie.child(cat, 'Z').is_none());
    }

    #[test]
    fn test_level_map() {
        let trie = sample();
        assert_eq!(trie.level(1, 'A').len(), 1);
        assert_eq!(trie.level(0, 'A').len(), 1);
        assert!(trie.level(9, 'A').is_empty());
        assert_eq!(trie.words_with_letter_at(2, 'T', 3), vec!["CAT".to_string()]);
        assert_eq!(trie.words_with_letter_at(1, 'A', 3), vec!["CAR".to_string(), "CAT".to_string()]);
        assert!(trie.words_with_letter_at(3, 'S', 3).is_empty());
        assert_eq!(trie.words_with_letter_at(3, 'S', 4), vec!["CATS".to_string()]);
    }

    #[test]
    fn test_words_round_trip() {
        let trie = sample();
        let mut words: Vec<String> = trie.words().collect();
        words.sort();
        assert_eq!(words, vec!["AT", "CAR", "CAT", "CATS", "DOG"]);
    }
}

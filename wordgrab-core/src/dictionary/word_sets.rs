//! Length-bucketed inverted index for constrained word lookup

use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// "Letter `letter` at offset `position`"
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordConstraint {
    pub position: usize,
    pub letter: char,
}

impl WordConstraint {
    pub fn new(position: usize, letter: char) -> Self {
        Self {
            position,
            letter: letter.to_ascii_uppercase(),
        }
    }
}

#[derive(Clone, Debug, Default)]
struct LengthBucket {
    words: Vec<String>,
    /// (position, letter) -> ascending word ids
    index: FxHashMap<(usize, u8), Vec<u32>>,
}

/// Words grouped by length, each group indexed by `(position, letter)`
#[derive(Clone, Debug, Default)]
pub struct WordSets {
    buckets: FxHashMap<usize, LengthBucket>,
}

impl WordSets {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut buckets: FxHashMap<usize, LengthBucket> = FxHashMap::default();
        for word in words {
            if let Some(word) = super::normalize_word(word.as_ref()) {
                buckets.entry(word.len()).or_default().words.push(word);
            }
        }

        for bucket in buckets.values_mut() {
            bucket.words.sort();
            bucket.words.dedup();
            for (id, word) in bucket.words.iter().enumerate() {
                for (position, letter) in word.bytes().enumerate() {
                    bucket
                        .index
                        .entry((position, letter))
                        .or_default()
                        .push(id as u32);
                }
            }
        }

        Self { buckets }
    }

    /// Number of words of `length` letters
    pub fn word_count(&self, length: usize) -> usize {
        self.buckets.get(&length).map_or(0, |b| b.words.len())
    }

    fn words_of_length(&self, length: usize) -> &[String] {
        self.buckets
            .get(&length)
            .map(|b| b.words.as_slice())
            .unwrap_or(&[])
    }

    /// Ids of `length`-letter words meeting every constraint, ascending.
    ///
    /// Intersects the id lists of each constraint, smallest first. Repeating
    /// a constraint changes nothing; two different letters at one position
    /// match nothing.
    fn matching_ids(&self, constraints: &[WordConstraint], length: usize) -> Vec<u32> {
        let Some(bucket) = self.buckets.get(&length) else {
            return Vec::new();
        };
        if constraints.is_empty() {
            return (0..bucket.words.len() as u32).collect();
        }

        let mut lists = Vec::with_capacity(constraints.len());
        for c in constraints {
            if c.position >= length || !c.letter.is_ascii_alphabetic() {
                return Vec::new();
            }
            let key = (c.position, c.letter.to_ascii_uppercase() as u8);
            match bucket.index.get(&key) {
                Some(ids) => lists.push(ids.as_slice()),
                None => return Vec::new(),
            }
        }
        lists.sort_by_key(|ids| ids.len());

        let Some((smallest, rest)) = lists.split_first() else {
            return Vec::new();
        };
        smallest
            .iter()
            .copied()
            .filter(|id| rest.iter().all(|ids| ids.binary_search(id).is_ok()))
            .collect()
    }

    /// Every `length`-letter word meeting the constraints, alphabetically
    pub fn matching(&self, constraints: &[WordConstraint], length: usize) -> Vec<&str> {
        let words = self.words_of_length(length);
        self.matching_ids(constraints, length)
            .into_iter()
            .map(|id| words[id as usize].as_str())
            .collect()
    }

    /// Lazily draw matching words in random order.
    ///
    /// The sequence is finite and yields each match exactly once; it cannot
    /// be restarted.
    pub fn words_with_constraints_in_random_order<'a, R: Rng + ?Sized>(
        &'a self,
        constraints: &[WordConstraint],
        length: usize,
        rng: &'a mut R,
    ) -> RandomWords<'a, R> {
        RandomWords {
            words: self.words_of_length(length),
            remaining: self.matching_ids(constraints, length),
            rng,
        }
    }
}

/// Iterator returned by [`WordSets::words_with_constraints_in_random_order`].
///
/// Each call to `next` does one step of a Fisher-Yates shuffle, so taking
/// only the first few words never shuffles the rest.
pub struct RandomWords<'a, R: ?Sized> {
    words: &'a [String],
    remaining: Vec<u32>,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> Iterator for RandomWords<'a, R> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }
        let pick = self.rng.gen_range(0..self.remaining.len());
        let id = self.remaining.swap_remove(pick);
        Some(self.words[id as usize].as_str())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining.len(), Some(self.remaining.len()))
    }
}

impl<'a, R: Rng + ?Sized> ExactSizeIterator for RandomWords<'a, R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sample() -> WordSets {
        WordSets::from_words(["cat", "car", "cot", "dog", "cart", "bat", "cat"])
    }

    #[test]
    fn test_buckets() {
        let sets = sample();
        assert_eq!(sets.word_count(3), 5);
        assert_eq!(sets.word_count(4), 1);
        assert_eq!(sets.word_count(7), 0);
    }

    #[test]
    fn test_intersection() {
        let sets = sample();
        let c_at_0 = WordConstraint::new(0, 'c');
        let t_at_2 = WordConstraint::new(2, 'T');
        assert_eq!(sets.matching(&[c_at_0, t_at_2], 3), vec!["CAT", "COT"]);
        assert_eq!(sets.matching(&[t_at_2], 3), vec!["BAT", "CAT", "COT"]);
        assert_eq!(sets.matching(&[], 4), vec!["CART"]);
    }

    #[test]
    fn test_duplicate_and_conflicting_constraints() {
        let sets = sample();
        let a = WordConstraint::new(1, 'A');
        assert_eq!(sets.matching(&[a, a], 3), sets.matching(&[a], 3));
        let o = WordConstraint::new(1, 'O');
        assert!(sets.matching(&[a, o], 3).is_empty());
        assert!(sets.matching(&[WordConstraint::new(5, 'A')], 3).is_empty());
    }

    #[test]
    fn test_random_order_yields_each_match_once() {
        let sets = sample();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let constraint = [WordConstraint::new(2, 'T')];
        let iter = sets.words_with_constraints_in_random_order(&constraint, 3, &mut rng);
        assert_eq!(iter.len(), 3);
        let mut drawn: Vec<&str> = iter.collect();
        drawn.sort();
        assert_eq!(drawn, vec!["BAT", "CAT", "COT"]);
    }

    #[test]
    fn test_random_order_is_lazy() {
        let sets = sample();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut iter = sets.words_with_constraints_in_random_order(&[], 3, &mut rng);
        let first = iter.next().unwrap();
        assert_eq!(iter.len(), 4);
        assert!(iter.all(|w| w != first));
    }
}

//! New-game creation: premium layout, scattered start words and dealt racks

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::board::{Dir, Pos};
use crate::dictionary::{Dictionary, SpecialDictionary, WordConstraint};
use crate::error::BoardError;
use crate::game::{Game, GameResult};
use crate::grid::{SquareSet, TileSet};
use crate::rack::Rack;
use crate::tiles::{RackTile, Tile, LETTERS, WILDS_IN_BAG};

/// Placement attempts per start word before giving up on it
const MAX_PLACEMENT_ATTEMPTS: usize = 64;

const MIN_START_WORD_LEN: usize = 3;
const MAX_START_WORD_LEN: usize = 7;

/// Premium square arrangement
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Classic,
    Uniform,
}

fn default_rack_size() -> usize {
    7
}

/// Parameters for creating a game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSetup {
    pub name: String,
    pub board_size: usize,
    #[serde(default)]
    pub layout: Layout,
    /// Words scattered on the board as grab-able start tiles
    pub start_words: usize,
    #[serde(default = "default_rack_size")]
    pub rack_size: usize,
    #[serde(default)]
    pub special_dictionary: Option<String>,
}

impl Default for GameSetup {
    fn default() -> Self {
        Self {
            name: "standard".to_string(),
            board_size: 11,
            layout: Layout::Classic,
            start_words: 6,
            rack_size: default_rack_size(),
            special_dictionary: None,
        }
    }
}

impl GameSetup {
    pub fn with_board_size(mut self, size: usize) -> Self {
        self.board_size = size;
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_start_words(mut self, count: usize) -> Self {
        self.start_words = count;
        self
    }

    pub fn with_rack_size(mut self, size: usize) -> Self {
        self.rack_size = size;
        self
    }

    /// Name the special dictionary games from this setup use
    pub fn with_special_dictionary(mut self, name: &str) -> Self {
        self.special_dictionary = Some(name.to_string());
        self
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading game setup {}", path.display()))?;
        let setup = serde_json::from_str(&content)
            .with_context(|| format!("parsing game setup {}", path.display()))?;
        Ok(setup)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Create an offered game: the opponent still has to accept it.
    ///
    /// `special` is attached only when the setup names a special dictionary.
    pub fn build<R: Rng + ?Sized>(
        &self,
        id: u64,
        dictionary: Arc<Dictionary>,
        special: Option<Arc<SpecialDictionary>>,
        rng: &mut R,
    ) -> Result<Game, BoardError> {
        let squares = match self.layout {
            Layout::Classic => SquareSet::classic(self.board_size)?,
            Layout::Uniform => SquareSet::uniform(self.board_size)?,
        };

        let mut tiles = TileSet::new(self.board_size)?;
        let mut placed = 0;
        for _ in 0..self.start_words {
            if place_start_word(&mut tiles, &dictionary, rng) {
                placed += 1;
            }
        }
        if placed < self.start_words {
            tracing::warn!(wanted = self.start_words, placed, "board too crowded for every start word");
        }

        let mut bag = letter_bag();
        bag.shuffle(rng);
        let deal = |bag: &mut Vec<RackTile>| {
            let keep = bag.len().saturating_sub(self.rack_size);
            Rack::from_tiles(bag.split_off(keep))
        };
        let racks = [deal(&mut bag)?, deal(&mut bag)?];

        let mut game = Game::new(id, squares, tiles, racks, dictionary)?.with_result(GameResult::Offered);
        if let Some(special) = self.select_special(special) {
            game = game.with_special(special);
        }
        tracing::debug!(id, setup = %self.name, start_words = placed, "created game");
        Ok(game)
    }

    fn select_special(&self, special: Option<Arc<SpecialDictionary>>) -> Option<Arc<SpecialDictionary>> {
        let wanted = self.special_dictionary.as_deref()?;
        match special {
            Some(special) => {
                if special.name() != wanted {
                    tracing::warn!(wanted, loaded = special.name(), "special dictionary name differs");
                }
                Some(special)
            }
            None => {
                tracing::warn!(wanted, "setup names a special dictionary but none was supplied");
                None
            }
        }
    }
}

/// A full bag: every letter at its standard count plus the wildcards
pub fn letter_bag() -> Vec<RackTile> {
    let mut bag: Vec<RackTile> = LETTERS
        .iter()
        .flat_map(|info| std::iter::repeat(RackTile::Letter(info.letter)).take(info.count as usize))
        .collect();
    bag.extend(std::iter::repeat(RackTile::Wild).take(WILDS_IN_BAG as usize));
    bag
}

/// Try to lay one dictionary word as start tiles.
///
/// The word may cross existing start words (their letters become lookup
/// constraints) but may not touch them anywhere else, so no accidental
/// words appear.
fn place_start_word<R: Rng + ?Sized>(tiles: &mut TileSet, dictionary: &Dictionary, rng: &mut R) -> bool {
    let size = tiles.size();
    let max_len = MAX_START_WORD_LEN.min(size);

    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let dir = Dir::PLAYABLE[rng.gen_range(0..Dir::PLAYABLE.len())];
        let len = rng.gen_range(MIN_START_WORD_LEN..=max_len);
        let (rows, cols) = match dir {
            Dir::E => (size, size - len + 1),
            _ => (size - len + 1, size),
        };
        let Some(start) = Pos::new(rng.gen_range(0..rows), rng.gen_range(0..cols), size) else {
            continue;
        };

        let Some(constraints) = crossing_constraints(tiles, start, dir, len) else {
            continue;
        };
        let word = dictionary
            .words_with_constraints_in_random_order(&constraints, len, rng)
            .next()
            .map(str::to_string);
        let Some(word) = word else { continue };

        for (i, letter) in word.chars().enumerate() {
            if let Some(pos) = start.step_by(dir, i) {
                if !tiles.is_occupied(pos) {
                    tiles.set(pos, Tile::start(letter, false));
                }
            }
        }
        return true;
    }
    false
}

/// Letters a word from `start` must contain, or `None` if the spot is unusable
fn crossing_constraints(tiles: &TileSet, start: Pos, dir: Dir, len: usize) -> Option<Vec<WordConstraint>> {
    let free = |pos: Option<Pos>| pos.map_or(true, |p| !tiles.is_occupied(p));
    if !free(start.step(dir.negate())) || !free(start.step_by(dir, len)) {
        return None;
    }

    let mut constraints = Vec::new();
    for i in 0..len {
        let pos = start.step_by(dir, i)?;
        match tiles.get(pos).letter() {
            Some(letter) => constraints.push(WordConstraint::new(i, letter)),
            None => {
                let perp = dir.perp();
                if !free(pos.step(perp)) || !free(pos.step(perp.negate())) {
                    return None;
                }
            }
        }
    }
    if constraints.len() == len {
        return None;
    }
    Some(constraints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha8Rng;

    fn dictionary() -> Arc<Dictionary> {
        Arc::new(Dictionary::from_words([
            "cat", "act", "tan", "ant", "oat", "tao", "net", "ten", "note", "tone", "stone", "notes", "onset",
        ]))
    }

    #[test]
    fn test_letter_bag() {
        let bag = letter_bag();
        assert_eq!(bag.len(), 100);
        assert_eq!(bag.iter().filter(|t| t.is_wild()).count(), 2);
    }

    #[test]
    fn test_build_offered_game() {
        let setup = GameSetup::default().with_board_size(9).with_start_words(3);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let game = setup.build(5, dictionary(), None, &mut rng).unwrap();

        assert_eq!(game.result(), GameResult::Offered);
        assert_eq!(game.size(), 9);
        assert_eq!(game.rack(crate::Player::One).len(), 7);
        assert_eq!(game.rack(crate::Player::Two).len(), 7);
        assert!(game.tiles().start_tile_count() >= MIN_START_WORD_LEN);
        assert_eq!(game.tiles().start_tile_count(), game.tiles().occupied_count());
    }

    #[test]
    fn test_start_words_are_dictionary_words() {
        let dict = dictionary();
        let setup = GameSetup::default().with_board_size(7).with_start_words(4).with_layout(Layout::Uniform);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let game = setup.build(1, dict.clone(), None, &mut rng).unwrap();
        let tiles = game.tiles();

        for dir in Dir::PLAYABLE {
            for pos in tiles.positions() {
                let before = pos.step(dir.negate());
                if !tiles.is_occupied(pos) || before.is_some_and(|b| tiles.is_occupied(b)) {
                    continue;
                }
                let word: String = tiles
                    .line_through(pos, dir)
                    .iter()
                    .filter_map(|&p| tiles.get(p).letter())
                    .collect();
                if word.len() > 1 {
                    assert!(dict.contains(&word), "{word} is not a word");
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_game() {
        let setup = GameSetup::default();
        let a = setup.build(1, dictionary(), None, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        let b = setup.build(1, dictionary(), None, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_special_dictionary_follows_setup() {
        let special = Arc::new(SpecialDictionary::new("animals", ["cat"], 5, 0));
        let plain = GameSetup::default().with_board_size(7).with_start_words(1);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let game = plain.build(1, dictionary(), Some(special.clone()), &mut rng).unwrap();
        assert!(game.special().is_none());

        let themed = plain.with_special_dictionary("animals");
        let game = themed.build(1, dictionary(), Some(special), &mut rng).unwrap();
        assert_eq!(game.special().map(|s| s.name()), Some("animals"));
        assert_eq!(game.snapshot().special_dictionary.as_deref(), Some("animals"));

        let game = themed.build(1, dictionary(), None, &mut rng).unwrap();
        assert!(game.special().is_none());
    }

    #[test]
    fn test_setup_json() {
        let setup: GameSetup = serde_json::from_str(
            r#"{"name": "quick", "board_size": 7, "layout": "uniform", "start_words": 2}"#,
        )
        .unwrap();
        assert_eq!(setup.layout, Layout::Uniform);
        assert_eq!(setup.rack_size, 7);
        assert_eq!(setup.special_dictionary, None);
    }
}

//! Computer opponent: randomized play-word and grab search

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Dir, Pos};
use crate::dictionary::{DictionaryTrie, NodeId, ROOT};
use crate::error::EngineError;
use crate::game::Game;
use crate::moves::{Move, MoveType};
use crate::tiles::{letter_value, RackTile};

// ============================================================================
// PERSONALITIES
// ============================================================================

/// Tuning knobs that give each computer opponent its style
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    pub name: String,
    /// Share of candidate positions examined (0, 1]
    pub search_fraction: f64,
    /// Chance of trying a grab before a word
    pub grab_probability: f64,
    /// Chance of searching the special dictionary instead of the base one
    pub special_dict_probability: f64,
}

impl Default for Personality {
    fn default() -> Self {
        Self::balanced()
    }
}

impl Personality {
    /// Looks at most of the board and prefers to play words
    pub fn wide_scanner() -> Self {
        Self {
            name: "wide_scanner".to_string(),
            search_fraction: 0.8,
            grab_probability: 0.2,
            special_dict_probability: 0.0,
        }
    }

    /// Looks at a small part of the board and prefers to grab
    pub fn narrow_grabber() -> Self {
        Self {
            name: "narrow_grabber".to_string(),
            search_fraction: 0.2,
            grab_probability: 0.8,
            special_dict_probability: 0.0,
        }
    }

    /// Always plays, always from the special dictionary when there is one
    pub fn revealer() -> Self {
        Self {
            name: "revealer".to_string(),
            search_fraction: 1.0,
            grab_probability: 0.0,
            special_dict_probability: 1.0,
        }
    }

    pub fn balanced() -> Self {
        Self {
            name: "balanced".to_string(),
            search_fraction: 0.5,
            grab_probability: 0.5,
            special_dict_probability: 0.25,
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "wide_scanner" => Some(Self::wide_scanner()),
            "narrow_grabber" => Some(Self::narrow_grabber()),
            "revealer" => Some(Self::revealer()),
            "balanced" => Some(Self::balanced()),
            _ => None,
        }
    }

    pub const PRESETS: [&'static str; 4] = ["wide_scanner", "narrow_grabber", "revealer", "balanced"];

    pub fn with_search_fraction(mut self, fraction: f64) -> Self {
        self.search_fraction = fraction;
        self
    }

    pub fn with_grab_probability(mut self, probability: f64) -> Self {
        self.grab_probability = probability;
        self
    }

    pub fn with_special_dict_probability(mut self, probability: f64) -> Self {
        self.special_dict_probability = probability;
        self
    }

    fn fraction(&self) -> f64 {
        if self.search_fraction.is_finite() {
            self.search_fraction.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

fn probability(p: f64) -> f64 {
    if p.is_finite() {
        p.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// At least one (when there is anything), at most `len`
fn share(len: usize, fraction: f64) -> usize {
    if len == 0 {
        return 0;
    }
    ((len as f64 * fraction).ceil() as usize).clamp(1, len)
}

// ============================================================================
// GAME AI
// ============================================================================

/// A computer player
#[derive(Clone, Debug, Default)]
pub struct GameAI {
    pub personality: Personality,
}

/// A scored candidate move
struct Candidate {
    mv: Move,
    value: u32,
}

fn keep_best(best: &mut Option<Candidate>, mv: Move, value: u32) {
    if best.as_ref().map_or(true, |b| value > b.value) {
        *best = Some(Candidate { mv, value });
    }
}

impl GameAI {
    pub fn new(personality: Personality) -> Self {
        Self { personality }
    }

    /// Choose a move for the player to move, with fresh randomness
    pub fn next_move(&self, game: &Game) -> Move {
        let mut rng = ChaCha8Rng::from_entropy();
        self.next_move_with_rng(game, &mut rng)
    }

    /// Choose a move for the player to move. Falls back to the other move
    /// kind, then to PASS, when the preferred kind finds nothing.
    pub fn next_move_with_rng<R: Rng + ?Sized>(&self, game: &Game, rng: &mut R) -> Move {
        if game.is_over() {
            return Move::pass(game.id());
        }

        let rack = game.active_rack();
        let can_grab = rack.capacity_left() > 0 && game.tiles().start_tile_count() > 0;
        let can_play = rack.has_placeable();
        let grab_first = match (can_grab, can_play) {
            (true, false) => true,
            (false, _) => false,
            (true, true) => rng.gen_bool(probability(self.personality.grab_probability)),
        };

        let order = if grab_first {
            [MoveType::GrabTiles, MoveType::PlayWord]
        } else {
            [MoveType::PlayWord, MoveType::GrabTiles]
        };
        for kind in order {
            let found = match kind {
                MoveType::GrabTiles if can_grab => self.find_grab(game, rng),
                MoveType::PlayWord if can_play => self.find_play(game, rng),
                _ => None,
            };
            if let Some(mv) = found {
                tracing::debug!(
                    personality = %self.personality.name,
                    move_type = ?mv.move_type,
                    letters = %mv.letters,
                    points = mv.points,
                    "ai move"
                );
                return mv;
            }
        }

        tracing::debug!(personality = %self.personality.name, "ai passes");
        Move::pass(game.id())
    }

    // ------------------------------------------------------------------------
    // Word search
    // ------------------------------------------------------------------------

    /// Best-scoring word over a random share of the empty cells, widening to
    /// the rest of the board only if that share holds no legal word.
    ///
    /// The special dictionary, when chosen, is searched first and the base
    /// dictionary after it. Wildcards are only tried once a letters-only
    /// search has come up empty.
    pub fn find_play<R: Rng + ?Sized>(&self, game: &Game, rng: &mut R) -> Option<Move> {
        let base = game.dictionary().trie();
        let tries = match game.special() {
            Some(special) if rng.gen_bool(probability(self.personality.special_dict_probability)) => {
                vec![special.trie(), base]
            }
            _ => vec![base],
        };

        let mut anchors = game.tiles().all_unoccupied_positions();
        anchors.shuffle(rng);
        let visit = share(anchors.len(), self.personality.fraction());
        let (near, far) = anchors.split_at(visit);

        let has_wild = game.active_rack().tiles().iter().any(|t| t.is_wild());
        let passes: &[bool] = if has_wild { &[false, true] } else { &[false] };
        for &use_wilds in passes {
            for &trie in &tries {
                let mut best = None;
                for group in [near, far] {
                    for &anchor in group {
                        for dir in Dir::PLAYABLE {
                            self.search_anchor(game, trie, anchor, dir, use_wilds, &mut best);
                        }
                    }
                    if best.is_some() {
                        return best.map(|c| c.mv);
                    }
                }
            }
        }
        None
    }

    /// Every word whose first newly placed tile lands on `anchor`
    fn search_anchor(
        &self,
        game: &Game,
        trie: &DictionaryTrie,
        anchor: Pos,
        dir: Dir,
        use_wilds: bool,
        best: &mut Option<Candidate>,
    ) {
        let tiles = game.tiles();
        let rack = game.active_rack().tiles();

        // Occupied cells right before the anchor are a mandatory prefix.
        let mut start = anchor;
        while let Some(prev) = start.step(dir.negate()) {
            if !tiles.is_occupied(prev) {
                break;
            }
            start = prev;
        }
        let mut root = ROOT;
        let mut cursor = Some(start);
        while let Some(pos) = cursor.filter(|&p| p != anchor) {
            let Some(letter) = tiles.get(pos).letter() else { return };
            let Some(next) = trie.child(root, letter) else { return };
            root = next;
            cursor = pos.step(dir);
        }

        let mut used = vec![false; rack.len()];
        let mut placed: Vec<usize> = Vec::new();
        let mut stack = vec![Frame::new(anchor, root, trie, rack, &used, use_wilds)];

        while let Some(frame) = stack.last_mut() {
            if let Some(idx) = frame.taken.take() {
                used[idx] = false;
                placed.pop();
            }
            let Some(&(letter, idx)) = frame.choices.get(frame.next) else {
                stack.pop();
                continue;
            };
            frame.next += 1;
            let pos = frame.pos;
            let Some(mut node) = trie.child(frame.node, letter) else { continue };
            frame.taken = Some(idx);
            used[idx] = true;
            placed.push(idx);

            // Letters already on the board after this cell are forced.
            let mut cursor = pos.step(dir);
            let mut dead = false;
            while let Some(next) = cursor {
                let Some(existing) = tiles.get(next).letter() else { break };
                match trie.child(node, existing) {
                    Some(child) => {
                        node = child;
                        cursor = next.step(dir);
                    }
                    None => {
                        dead = true;
                        break;
                    }
                }
            }
            if dead {
                continue;
            }

            if trie.is_word(node) && trie.depth(node) >= 2 {
                let tiles_used: Vec<RackTile> = placed.iter().map(|&i| rack[i]).collect();
                let mv = Move::play_word(game.id(), &trie.word_at(node), start.coord(), dir, tiles_used);
                if game.validate(&mv).is_ok() {
                    if let Ok(points) = game.compute_points(&mv) {
                        keep_best(best, mv.with_points(points), points);
                    }
                }
            }

            if let Some(next) = cursor {
                let frame = Frame::new(next, node, trie, rack, &used, use_wilds);
                if !frame.choices.is_empty() {
                    stack.push(frame);
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Grab search
    // ------------------------------------------------------------------------

    /// Highest letter-value run of start tiles over several random tries
    pub fn find_grab<R: Rng + ?Sized>(&self, game: &Game, rng: &mut R) -> Option<Move> {
        let tiles = game.tiles();
        let starts = tiles.all_start_tile_positions();
        let capacity = game.active_rack().capacity_left();
        if starts.is_empty() || capacity == 0 {
            return None;
        }

        let attempts = share(starts.len(), self.personality.fraction());
        let mut best = None;
        for _ in 0..attempts {
            let Some(&pos) = starts.choose(rng) else { break };
            let (run, dir) = grab_run(game, pos, capacity, rng);

            let mut letters = String::with_capacity(run.len());
            let mut rack_tiles = Vec::with_capacity(run.len());
            for &p in &run {
                let tile = tiles.get(p);
                letters.extend(tile.letter());
                rack_tiles.extend(tile.to_rack_tile());
            }
            let value = letters.chars().map(letter_value).sum();
            let mv = Move::grab_tiles(game.id(), &letters, run[0].coord(), dir, rack_tiles);
            if game.validate(&mv).is_ok() {
                keep_best(&mut best, mv, value);
            }
        }
        best.map(|c| c.mv)
    }
}

/// A run of start tiles through `pos`, listed in the returned direction,
/// which is always south or east
fn grab_run<R: Rng + ?Sized>(game: &Game, pos: Pos, capacity: usize, rng: &mut R) -> (Vec<Pos>, Dir) {
    let tiles = game.tiles();
    let is_start = |p: Option<Pos>| p.filter(|&p| tiles.get(p).is_start());

    let dirs: Vec<Dir> = Dir::ALL
        .into_iter()
        .filter(|&d| is_start(pos.step(d)).is_some())
        .collect();
    let Some(&dir) = dirs.choose(rng).filter(|_| capacity > 1) else {
        return (vec![pos], Dir::E);
    };

    let mut run = vec![pos];
    let mut cursor = pos.step(dir);
    while run.len() < capacity {
        let Some(next) = is_start(cursor) else { break };
        run.push(next);
        cursor = next.step(dir);
    }
    let mut cursor = pos.step(dir.negate());
    while run.len() < capacity {
        let Some(prev) = is_start(cursor) else { break };
        run.insert(0, prev);
        cursor = prev.step(dir.negate());
    }

    if dir.canonical() != dir {
        run.reverse();
    }
    (run, dir.canonical())
}

/// One empty cell of the word being built, with the rack letters still to try
struct Frame {
    pos: Pos,
    node: NodeId,
    choices: Vec<(char, usize)>,
    next: usize,
    taken: Option<usize>,
}

impl Frame {
    /// Distinct unused rack letters that continue a word from `node`; with
    /// `use_wilds`, an unused wildcard adds every other letter that does
    fn new(pos: Pos, node: NodeId, trie: &DictionaryTrie, rack: &[RackTile], used: &[bool], use_wilds: bool) -> Self {
        let mut choices: Vec<(char, usize)> = Vec::new();
        for (idx, tile) in rack.iter().enumerate() {
            let Some(letter) = tile.letter() else { continue };
            if used[idx] || choices.iter().any(|&(l, _)| l == letter) {
                continue;
            }
            if trie.child(node, letter).is_some() {
                choices.push((letter, idx));
            }
        }
        let wild = (0..rack.len()).find(|&idx| rack[idx].is_wild() && !used[idx]);
        if let Some(idx) = wild.filter(|_| use_wilds) {
            for letter in 'A'..='Z' {
                if !choices.iter().any(|&(l, _)| l == letter) && trie.child(node, letter).is_some() {
                    choices.push((letter, idx));
                }
            }
        }
        Self {
            pos,
            node,
            choices,
            next: 0,
            taken: None,
        }
    }
}

/// Let two computer players finish a game, returning the moves made
pub fn play_game<R: Rng + ?Sized>(
    game: &mut Game,
    players: [&GameAI; 2],
    max_moves: usize,
    rng: &mut R,
) -> Result<Vec<Move>, EngineError> {
    let mut history = Vec::new();
    while !game.is_over() && history.len() < max_moves {
        let ai = players[game.turn().index()];
        let mv = ai.next_move_with_rng(game, rng);
        game.apply_move(&mv)?;
        history.push(mv);
    }
    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{Dictionary, SpecialDictionary};
    use crate::game::Player;
    use crate::grid::{SquareSet, TileSet};
    use crate::rack::MAX_TILES_IN_RACK;
    use std::sync::Arc;

    fn game(tiles: &str, rack1: &str) -> Game {
        let dictionary = Arc::new(Dictionary::from_words(["cat", "act", "at", "ta", "of", "to", "tac"]));
        let tiles: TileSet = tiles.parse().unwrap();
        let squares = SquareSet::uniform(tiles.size()).unwrap();
        let racks = [rack1.parse().unwrap(), "DOG".parse().unwrap()];
        Game::new(3, squares, tiles, racks, dictionary).unwrap()
    }

    const EMPTY: &str = "_____/_____/_____/_____/_____";

    #[test]
    fn test_finds_best_word() {
        let game = game(EMPTY, "CAT");
        let ai = GameAI::new(Personality::revealer());
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mv = ai.next_move_with_rng(&game, &mut rng);
        assert_eq!(mv.move_type, MoveType::PlayWord);
        assert_eq!(mv.letters.len(), 3);
        assert_eq!(mv.points, 5);
        assert_eq!(game.validate(&mv), Ok(()));
    }

    #[test]
    fn test_extends_through_board_letters() {
        // Only T in the rack: the best move builds on the board's C and A
        let game = game("_____/_ca__/_____/_____/_____", "T");
        let ai = GameAI::new(Personality::revealer());
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mv = ai.find_play(&game, &mut rng).unwrap();
        assert_eq!(game.validate(&mv), Ok(()));
        assert!(mv.letters == "CAT" || mv.letters == "AT" || mv.letters == "TA");
        assert_eq!(mv.tiles, vec![RackTile::Letter('T')]);
    }

    #[test]
    fn test_narrow_search_widens_when_needed() {
        let game = game(EMPTY, "AT");
        let ai = GameAI::new(Personality::revealer().with_search_fraction(0.01));
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert!(ai.find_play(&game, &mut rng).is_some());
    }

    #[test]
    fn test_grab_forced_with_no_letters() {
        let game = game("_____/_of__/_____/_____/_____", "");
        let ai = GameAI::new(Personality::wide_scanner());
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mv = ai.next_move_with_rng(&game, &mut rng);
        assert_eq!(mv.move_type, MoveType::GrabTiles);
        assert_eq!(game.validate(&mv), Ok(()));
        assert!(mv.dir == Dir::E || mv.dir == Dir::S);
    }

    #[test]
    fn test_grab_takes_whole_run() {
        let game = game("__c__/__a__/__t__/_____/_____", "");
        let ai = GameAI::new(Personality::narrow_grabber().with_search_fraction(1.0));
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mv = ai.find_grab(&game, &mut rng).unwrap();
        assert_eq!(mv.letters, "CAT");
        assert_eq!(mv.dir, Dir::S);
        assert_eq!(mv.start, crate::board::Coord::new(0, 2));
    }

    #[test]
    fn test_passes_when_nothing_is_legal() {
        let game = game(EMPTY, "QZ");
        let ai = GameAI::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(ai.next_move_with_rng(&game, &mut rng), Move::pass(3));
    }

    #[test]
    fn test_special_dictionary_search() {
        let special = Arc::new(SpecialDictionary::new("code", ["zap"], 10, 1));
        let game = game(EMPTY, "ZAP").with_special(special);
        let ai = GameAI::new(Personality::revealer());
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mv = ai.next_move_with_rng(&game, &mut rng);
        assert_eq!(mv.letters, "ZAP");
        assert_eq!(mv.points, 10 + 1 + 3 + 10);
    }

    #[test]
    fn test_special_search_falls_back_to_base_words() {
        let special = Arc::new(SpecialDictionary::new("code", ["zap"], 10, 1));
        let game = game(EMPTY, "AT").with_special(special);
        for seed in 0..10 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mv = GameAI::new(Personality::revealer()).next_move_with_rng(&game, &mut rng);
            assert_eq!(mv.move_type, MoveType::PlayWord);
            assert_eq!(game.validate(&mv), Ok(()));
        }
    }

    #[test]
    fn test_wild_only_rack_plays() {
        let game = game(EMPTY, "**");
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mv = GameAI::default().next_move_with_rng(&game, &mut rng);
        assert_eq!(mv.move_type, MoveType::PlayWord);
        assert_eq!(mv.tiles, vec![RackTile::Wild, RackTile::Wild]);
        assert_eq!(game.validate(&mv), Ok(()));
    }

    #[test]
    fn test_letters_tried_before_wilds() {
        let game = game(EMPTY, "CAT*");
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let mv = GameAI::new(Personality::revealer()).find_play(&game, &mut rng).unwrap();
        assert!(!mv.tiles.contains(&RackTile::Wild));
    }

    #[test]
    fn test_play_game_terminates() {
        let mut game = game("_____/_of__/_____/_____/_____", "CAT");
        let ai = GameAI::new(Personality::balanced());
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let history = play_game(&mut game, [&ai, &ai], 200, &mut rng).unwrap();
        assert!(game.is_over());
        assert!(!history.is_empty());
        assert!(game.rack(Player::One).len() <= MAX_TILES_IN_RACK);
    }
}

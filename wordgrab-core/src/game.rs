//! Game state, move validation and the turn/end-of-game state machine

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::board::Pos;
use crate::dictionary::{Dictionary, SpecialDictionary};
use crate::error::{BoardError, EngineError, MoveError};
use crate::grid::{SquareSet, TileSet};
use crate::moves::{Move, MoveType, Placement};
use crate::rack::{Rack, MAX_TILES_IN_RACK};
use crate::tiles::{letter_value, RackTile};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Seat at the table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    One = 0,
    Two = 1,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::One, Player::Two];

    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "player 1"),
            Player::Two => write!(f, "player 2"),
        }
    }
}

/// Lifecycle of a game. `Offered` and `InProgress` accept moves; every other
/// state is final.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameResult {
    Offered,
    InProgress,
    Player1Win,
    Player2Win,
    Tie,
    Player1Timeout,
    Player2Timeout,
    Player1Resign,
    Player2Resign,
    Declined,
}

impl GameResult {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameResult::Offered | GameResult::InProgress)
    }

    /// Outcome decided on points
    pub fn from_scores(score1: u32, score2: u32) -> Self {
        match score1.cmp(&score2) {
            std::cmp::Ordering::Greater => GameResult::Player1Win,
            std::cmp::Ordering::Less => GameResult::Player2Win,
            std::cmp::Ordering::Equal => GameResult::Tie,
        }
    }

    pub fn resigned(player: Player) -> Self {
        match player {
            Player::One => GameResult::Player1Resign,
            Player::Two => GameResult::Player2Resign,
        }
    }

    pub fn timed_out(player: Player) -> Self {
        match player {
            Player::One => GameResult::Player1Timeout,
            Player::Two => GameResult::Player2Timeout,
        }
    }

    /// The player credited with the win, if any
    pub fn winner(self) -> Option<Player> {
        match self {
            GameResult::Player1Win | GameResult::Player2Timeout | GameResult::Player2Resign => Some(Player::One),
            GameResult::Player2Win | GameResult::Player1Timeout | GameResult::Player1Resign => Some(Player::Two),
            _ => None,
        }
    }
}

/// Persisted form of a game, made of the plain grid and rack strings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub id: u64,
    pub squares: String,
    pub tiles: String,
    pub rack1: String,
    pub rack2: String,
    pub score1: u32,
    pub score2: u32,
    pub player1_turn: bool,
    pub result: GameResult,
    #[serde(default)]
    pub previous_move: Option<MoveType>,
    #[serde(default)]
    pub special_dictionary: Option<String>,
}

/// A word formed across the main word at a newly placed letter
#[derive(Clone, Debug)]
struct CrossWord {
    junction: Pos,
    letter: char,
    line: Vec<Pos>,
}

/// A PLAY_WORD move that passed every check
#[derive(Clone, Debug)]
struct CheckedPlay {
    placement: Placement,
    /// Every cell of the word, flagged when it receives a rack tile
    cells: Vec<(Pos, char, bool)>,
    cross_words: Vec<CrossWord>,
}

/// A GRAB_TILES move that passed every check
#[derive(Clone, Copy, Debug)]
struct CheckedGrab {
    start: Pos,
}

// ============================================================================
// GAME
// ============================================================================

/// A game in progress: board, racks, scores and whose turn it is.
///
/// The game is rebuilt from a [`GameSnapshot`] for each request, mutated in
/// place by [`Game::apply_move`], and written back with [`Game::snapshot`].
#[derive(Clone, Debug)]
pub struct Game {
    id: u64,
    squares: SquareSet,
    tiles: TileSet,
    racks: [Rack; 2],
    scores: [u32; 2],
    turn: Player,
    result: GameResult,
    previous_move: Option<MoveType>,
    dictionary: Arc<Dictionary>,
    special: Option<Arc<SpecialDictionary>>,
}

impl Game {
    /// A game in progress with player one to move and no score yet
    pub fn new(
        id: u64,
        squares: SquareSet,
        tiles: TileSet,
        racks: [Rack; 2],
        dictionary: Arc<Dictionary>,
    ) -> Result<Self, BoardError> {
        if squares.size() != tiles.size() {
            return Err(BoardError::WrongLength {
                expected: squares.size() * squares.size(),
                found: tiles.size() * tiles.size(),
            });
        }
        Ok(Self {
            id,
            squares,
            tiles,
            racks,
            scores: [0, 0],
            turn: Player::One,
            result: GameResult::InProgress,
            previous_move: None,
            dictionary,
            special: None,
        })
    }

    pub fn with_special(mut self, special: Arc<SpecialDictionary>) -> Self {
        self.special = Some(special);
        self
    }

    pub fn with_result(mut self, result: GameResult) -> Self {
        self.result = result;
        self
    }

    pub fn from_snapshot(
        snapshot: &GameSnapshot,
        dictionary: Arc<Dictionary>,
        special: Option<Arc<SpecialDictionary>>,
    ) -> Result<Self, BoardError> {
        let squares: SquareSet = snapshot.squares.parse()?;
        let tiles = TileSet::load(squares.size(), &snapshot.tiles)?;
        let racks = [snapshot.rack1.parse()?, snapshot.rack2.parse()?];

        let mut game = Self::new(snapshot.id, squares, tiles, racks, dictionary)?;
        game.scores = [snapshot.score1, snapshot.score2];
        game.turn = if snapshot.player1_turn { Player::One } else { Player::Two };
        game.result = snapshot.result;
        game.previous_move = snapshot.previous_move;
        game.special = special;
        Ok(game)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            id: self.id,
            squares: self.squares.to_compact_string(),
            tiles: self.tiles.to_compact_string(),
            rack1: self.racks[0].to_compact_string(),
            rack2: self.racks[1].to_compact_string(),
            score1: self.scores[0],
            score2: self.scores[1],
            player1_turn: self.turn == Player::One,
            result: self.result,
            previous_move: self.previous_move,
            special_dictionary: self.special.as_ref().map(|s| s.name().to_string()),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn size(&self) -> usize {
        self.tiles.size()
    }

    pub fn squares(&self) -> &SquareSet {
        &self.squares
    }

    pub fn tiles(&self) -> &TileSet {
        &self.tiles
    }

    pub fn rack(&self, player: Player) -> &Rack {
        &self.racks[player.index()]
    }

    /// Rack of the player to move
    pub fn active_rack(&self) -> &Rack {
        self.rack(self.turn)
    }

    pub fn score(&self, player: Player) -> u32 {
        self.scores[player.index()]
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn is_over(&self) -> bool {
        self.result.is_terminal()
    }

    /// The player to move (meaningless once the game is over)
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// Whether `player` may move now; false for both once the game is over
    pub fn is_turn(&self, player: Player) -> bool {
        !self.is_over() && self.turn == player
    }

    pub fn previous_move(&self) -> Option<MoveType> {
        self.previous_move
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn special(&self) -> Option<&SpecialDictionary> {
        self.special.as_deref()
    }

    /// In the base dictionary or the game's special dictionary
    pub fn is_valid_word(&self, word: &str) -> bool {
        self.dictionary.contains(word) || self.special.as_ref().is_some_and(|s| s.contains(word))
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Opponent accepts an offered game. Passes made while the offer was
    /// open do not count toward ending it.
    pub fn accept(&mut self) -> bool {
        if !self.transition(GameResult::Offered, GameResult::InProgress) {
            return false;
        }
        self.previous_move = None;
        true
    }

    /// Opponent declines an offered game
    pub fn decline(&mut self) -> bool {
        self.transition(GameResult::Offered, GameResult::Declined)
    }

    /// The player to move ran out of time
    pub fn time_out(&mut self) -> bool {
        if self.is_over() {
            return false;
        }
        self.result = GameResult::timed_out(self.turn);
        true
    }

    fn transition(&mut self, from: GameResult, to: GameResult) -> bool {
        if self.result != from {
            return false;
        }
        self.result = to;
        true
    }

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    /// Check a move against the current position without changing anything
    pub fn validate(&self, mv: &Move) -> Result<(), MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        if mv.game_id != self.id {
            return Err(MoveError::WrongGame {
                expected: self.id,
                found: mv.game_id,
            });
        }
        match mv.move_type {
            MoveType::PlayWord => self.check_play_word(mv).map(|_| ()),
            MoveType::GrabTiles => self.check_grab_tiles(mv).map(|_| ()),
            MoveType::Pass | MoveType::Resign => Ok(()),
        }
    }

    /// The reason `mv` is illegal, if it is
    pub fn move_error(&self, mv: &Move) -> Option<MoveError> {
        self.validate(mv).err()
    }

    fn start_pos(&self, mv: &Move) -> Result<Pos, MoveError> {
        mv.start.to_pos(self.size()).ok_or(MoveError::InvalidStart {
            row: mv.start.row,
            col: mv.start.col,
        })
    }

    fn check_play_word(&self, mv: &Move) -> Result<CheckedPlay, MoveError> {
        if !mv.dir.is_playable() {
            return Err(MoveError::UnplayableDirection(mv.dir));
        }
        let start = self.start_pos(mv)?;
        if mv.letters.is_empty() {
            return Err(MoveError::EmptyWord);
        }
        if !mv.letters.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(MoveError::InvalidLetters(mv.letters.clone()));
        }
        if !self.active_rack().contains_all(&mv.tiles) {
            return Err(MoveError::TilesNotInRack);
        }

        let placement = Placement::new(&mv.letters, start, mv.dir);
        if start
            .step(mv.dir.negate())
            .is_some_and(|before| self.tiles.is_occupied(before))
        {
            return Err(MoveError::StartsMidWord);
        }

        let path = placement.cells().ok_or(MoveError::WordOffBoard)?;
        let mut cells = Vec::with_capacity(path.len());
        for (pos, letter) in path {
            match self.tiles.get(pos).letter() {
                Some(found) if found != letter => {
                    return Err(MoveError::LetterMismatch {
                        row: pos.row(),
                        col: pos.col(),
                        expected: letter,
                        found,
                    })
                }
                Some(_) => cells.push((pos, letter, false)),
                None => cells.push((pos, letter, true)),
            }
        }
        if placement.end().is_some_and(|after| self.tiles.is_occupied(after)) {
            return Err(MoveError::WordNotTerminated);
        }

        let placed: Vec<(Pos, char)> = cells
            .iter()
            .filter(|&&(_, _, new)| new)
            .map(|&(pos, letter, _)| (pos, letter))
            .collect();
        if placed.is_empty() {
            return Err(MoveError::NoTilesPlaced);
        }
        if placed.len() != mv.tiles.len() {
            return Err(MoveError::TileCountMismatch {
                expected: placed.len(),
                found: mv.tiles.len(),
            });
        }
        for (tile, &(_, letter)) in mv.tiles.iter().zip(&placed) {
            match *tile {
                RackTile::Bonus => return Err(MoveError::BonusTileNotPlaceable),
                RackTile::Letter(c) if c != letter => {
                    return Err(MoveError::TileLetterMismatch { tile: c, letter })
                }
                _ => {}
            }
        }

        if !self.is_valid_word(&placement.word) {
            return Err(MoveError::InvalidWord(placement.word.clone()));
        }

        let mut cross_words = Vec::new();
        for (junction, letter) in placed {
            let line = self.tiles.line_through(junction, mv.dir.perp());
            if line.len() < 2 {
                continue;
            }
            let cross = CrossWord { junction, letter, line };
            let word = self.spell(&cross);
            if !self.is_valid_word(&word) {
                return Err(MoveError::InvalidPerpendicularWord(word));
            }
            cross_words.push(cross);
        }

        Ok(CheckedPlay {
            placement,
            cells,
            cross_words,
        })
    }

    fn spell(&self, cross: &CrossWord) -> String {
        cross
            .line
            .iter()
            .map(|&pos| {
                if pos == cross.junction {
                    cross.letter
                } else {
                    self.tiles.get(pos).letter().unwrap_or('?')
                }
            })
            .collect()
    }

    fn check_grab_tiles(&self, mv: &Move) -> Result<CheckedGrab, MoveError> {
        let start = self.start_pos(mv)?;
        if !self.tiles.is_occupied(start) {
            return Err(MoveError::NothingToGrab);
        }
        if mv.tiles.is_empty() {
            return Err(MoveError::EmptyGrab);
        }

        let mut letters = String::with_capacity(mv.tiles.len());
        let mut cursor = Some(start);
        for declared in &mv.tiles {
            let pos = cursor.ok_or(MoveError::WordOffBoard)?;
            let tile = self.tiles.get(pos);
            if !tile.is_start() {
                return Err(MoveError::NotAStartTile {
                    row: pos.row(),
                    col: pos.col(),
                });
            }
            if !declared.matches_board(&tile) {
                return Err(MoveError::GrabTileMismatch {
                    row: pos.row(),
                    col: pos.col(),
                });
            }
            letters.extend(tile.letter());
            cursor = pos.step(mv.dir);
        }

        if !mv.letters.is_empty() && !mv.letters.eq_ignore_ascii_case(&letters) {
            return Err(MoveError::GrabLettersMismatch {
                declared: mv.letters.clone(),
            });
        }

        let new_len = self.active_rack().len() + mv.tiles.len();
        if new_len > MAX_TILES_IN_RACK {
            return Err(MoveError::RackOverflow(new_len));
        }
        Ok(CheckedGrab { start })
    }

    // ------------------------------------------------------------------------
    // Scoring
    // ------------------------------------------------------------------------

    /// Points a PLAY_WORD move would score; zero for every other move type
    pub fn compute_points(&self, mv: &Move) -> Result<u32, EngineError> {
        if mv.move_type != MoveType::PlayWord {
            return Ok(0);
        }
        let play = self.check_play_word(mv)?;
        let points = self.score_play(&play);
        if points == 0 {
            return Err(EngineError::Inconsistent(format!(
                "{} scored no points",
                play.placement.word
            )));
        }
        Ok(points)
    }

    fn score_play(&self, play: &CheckedPlay) -> u32 {
        let mut main = 0;
        let mut word_multiplier = 1;
        for &(pos, letter, new) in &play.cells {
            if new {
                let square = self.squares.get(pos);
                main += letter_value(letter) * square.letter_multiplier();
                word_multiplier *= square.word_multiplier();
            }
        }
        let mut points = main * word_multiplier;

        for cross in &play.cross_words {
            let square = self.squares.get(cross.junction);
            let mut value = 0;
            for &pos in &cross.line {
                if pos == cross.junction {
                    value += letter_value(cross.letter) * square.letter_multiplier();
                } else if let Some(letter) = self.tiles.get(pos).letter() {
                    value += letter_value(letter);
                }
            }
            points += value * square.word_multiplier();
        }

        if let Some(special) = &self.special {
            if special.contains(&play.placement.word) {
                points += special.bonus_points();
            }
        }
        points
    }

    // ------------------------------------------------------------------------
    // Application
    // ------------------------------------------------------------------------

    /// Validate and play a move for the player to move, returning the points
    /// scored. A rejected move leaves the game untouched.
    pub fn apply_move(&mut self, mv: &Move) -> Result<u32, EngineError> {
        self.validate(mv)?;
        let player = self.turn;
        let idx = player.index();

        let points = match mv.move_type {
            MoveType::PlayWord => {
                let play = self.check_play_word(mv)?;
                let points = self.score_play(&play);
                if points == 0 {
                    return Err(EngineError::Inconsistent(format!(
                        "{} scored no points",
                        play.placement.word
                    )));
                }

                let mut rack = self.racks[idx].clone();
                let taken = rack.take(&mv.tiles).ok_or_else(|| {
                    EngineError::Inconsistent("validated tiles missing from rack".to_string())
                })?;
                let mut tiles = self.tiles.clone();
                tiles.play_word_move(&play.placement, &taken)?;

                self.tiles = tiles;
                self.racks[idx] = rack;
                self.scores[idx] += points;
                points
            }
            MoveType::GrabTiles => {
                let grab = self.check_grab_tiles(mv)?;
                let mut tiles = self.tiles.clone();
                let grabbed = tiles.play_grab_tiles_move(grab.start, mv.dir, &mv.tiles)?;
                let mut rack = self.racks[idx].clone();
                rack.add_all(&grabbed)?;

                self.tiles = tiles;
                self.racks[idx] = rack;
                0
            }
            MoveType::Pass => 0,
            MoveType::Resign => {
                self.result = GameResult::resigned(player);
                0
            }
        };

        self.check_for_game_end(mv.move_type, player);
        self.previous_move = Some(mv.move_type);
        self.advance_turn(player);

        tracing::debug!(
            game = self.id,
            %player,
            move_type = ?mv.move_type,
            letters = %mv.letters,
            points,
            result = ?self.result,
            "applied move"
        );
        Ok(points)
    }

    fn check_for_game_end(&mut self, move_type: MoveType, player: Player) {
        if self.result != GameResult::InProgress {
            return;
        }
        let no_start_tiles = self.tiles.start_tile_count() == 0;
        let opponent_empty = self.rack(player.opponent()).is_empty();

        let ended = match move_type {
            MoveType::GrabTiles | MoveType::Resign => false,
            MoveType::PlayWord => no_start_tiles && opponent_empty && self.rack(player).is_empty(),
            MoveType::Pass => {
                self.previous_move == Some(MoveType::Pass) || (no_start_tiles && opponent_empty)
            }
        };
        if ended {
            self.result = GameResult::from_scores(self.scores[0], self.scores[1]);
        }
    }

    /// The mover keeps the turn only while the opponent, holding nothing, is
    /// waiting for start tiles to be grabbed
    fn advance_turn(&mut self, player: Player) {
        let keep = self.tiles.start_tile_count() > 0
            && self.rack(player.opponent()).is_empty()
            && self.result == GameResult::InProgress;
        if !keep {
            self.turn = player.opponent();
        }
    }
}

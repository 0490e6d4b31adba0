//! Move and placement value types

use serde::{Deserialize, Serialize};

use crate::board::{Coord, Dir, Pos};
use crate::tiles::RackTile;

/// Kind of move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MoveType {
    PlayWord,
    GrabTiles,
    Pass,
    Resign,
}

/// A move as submitted by a player or produced by the AI.
///
/// For `PlayWord`, `letters` is the whole word (including letters already on
/// the board) and `tiles` are the rack tiles covering its empty cells, in
/// order. For `GrabTiles`, `tiles` are the start tiles taken from `start`
/// along `dir`, and `letters` optionally spells them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub game_id: u64,
    pub move_type: MoveType,
    #[serde(default)]
    pub letters: String,
    #[serde(default)]
    pub start: Coord,
    #[serde(default = "default_dir")]
    pub dir: Dir,
    #[serde(default)]
    pub tiles: Vec<RackTile>,
    #[serde(default)]
    pub points: u32,
}

fn default_dir() -> Dir {
    Dir::E
}

impl Move {
    pub fn play_word(game_id: u64, word: &str, start: Coord, dir: Dir, tiles: Vec<RackTile>) -> Self {
        Self {
            game_id,
            move_type: MoveType::PlayWord,
            letters: word.to_ascii_uppercase(),
            start,
            dir,
            tiles,
            points: 0,
        }
    }

    pub fn grab_tiles(game_id: u64, letters: &str, start: Coord, dir: Dir, tiles: Vec<RackTile>) -> Self {
        Self {
            game_id,
            move_type: MoveType::GrabTiles,
            letters: letters.to_ascii_uppercase(),
            start,
            dir,
            tiles,
            points: 0,
        }
    }

    pub fn pass(game_id: u64) -> Self {
        Self::bare(game_id, MoveType::Pass)
    }

    pub fn resign(game_id: u64) -> Self {
        Self::bare(game_id, MoveType::Resign)
    }

    fn bare(game_id: u64, move_type: MoveType) -> Self {
        Self {
            game_id,
            move_type,
            letters: String::new(),
            start: Coord::default(),
            dir: Dir::E,
            tiles: Vec::new(),
            points: 0,
        }
    }

    pub fn with_points(mut self, points: u32) -> Self {
        self.points = points;
        self
    }
}

/// A word laid out on the board, independent of whose rack supplies it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub word: String,
    pub start: Pos,
    pub dir: Dir,
}

impl Placement {
    pub fn new(word: &str, start: Pos, dir: Dir) -> Self {
        Self {
            word: word.to_ascii_uppercase(),
            start,
            dir,
        }
    }

    pub fn len(&self) -> usize {
        self.word.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }

    /// Each cell with the letter it receives, or `None` if the word leaves
    /// the board
    pub fn cells(&self) -> Option<Vec<(Pos, char)>> {
        self.word
            .chars()
            .enumerate()
            .map(|(i, letter)| self.start.step_by(self.dir, i).map(|pos| (pos, letter)))
            .collect()
    }

    /// Cell just past the end of the word
    pub fn end(&self) -> Option<Pos> {
        self.start.step_by(self.dir, self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_cells() {
        let start = Pos::new(1, 2, 5).unwrap();
        let placement = Placement::new("cat", start, Dir::S);
        let cells = placement.cells().unwrap();
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[2], (Pos::new(3, 2, 5).unwrap(), 'T'));
        assert_eq!(placement.end(), Pos::new(4, 2, 5));

        let long = Placement::new("CATS", Pos::new(2, 2, 5).unwrap(), Dir::E);
        assert!(long.cells().is_none());
    }

    #[test]
    fn test_move_json_shape() {
        let mv = Move::play_word(7, "cat", Coord::new(4, 4), Dir::E, vec![RackTile::Letter('C')]);
        let json = serde_json::to_value(&mv).unwrap();
        assert_eq!(json["move_type"], "PLAY_WORD");
        assert_eq!(json["letters"], "CAT");
        assert_eq!(json["start"]["row"], 4);
        assert_eq!(json["dir"], "E");
        assert_eq!(json["tiles"][0], "C");

        let pass: Move = serde_json::from_str(r#"{"game_id": 7, "move_type": "PASS"}"#).unwrap();
        assert_eq!(pass, Move::pass(7));
    }
}

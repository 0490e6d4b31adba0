//! Board grids: premium squares and tiles
//!
//! Both grids load from and serialize to the compact row-major strings the
//! persistence layer stores. Whitespace and `/` row separators are ignored on
//! load.

use std::fmt;
use std::str::FromStr;

use crate::board::{Dir, Pos, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::error::BoardError;
use crate::moves::Placement;
use crate::tiles::{RackTile, Square, Tile};

fn significant_chars(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().filter(|c| !c.is_whitespace() && *c != '/')
}

fn check_size(size: usize) -> Result<(), BoardError> {
    if size < MIN_BOARD_SIZE {
        return Err(BoardError::TooSmall(size));
    }
    if size > MAX_BOARD_SIZE {
        return Err(BoardError::NotSquare(size * size));
    }
    Ok(())
}

fn infer_size(cells: usize) -> Result<usize, BoardError> {
    let size = (cells as f64).sqrt().round() as usize;
    if size * size != cells {
        return Err(BoardError::NotSquare(cells));
    }
    check_size(size)?;
    Ok(size)
}

// ============================================================================
// SQUARE SET
// ============================================================================

/// N×N grid of premium squares; never changes once loaded
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SquareSet {
    size: usize,
    squares: Vec<Square>,
}

impl SquareSet {
    /// All-normal board
    pub fn uniform(size: usize) -> Result<Self, BoardError> {
        check_size(size)?;
        Ok(Self {
            size,
            squares: vec![Square::Normal; size * size],
        })
    }

    /// Symmetric premium layout: triple words in the corners and edge
    /// midpoints, double words along the diagonals, letter premiums scattered.
    pub fn classic(size: usize) -> Result<Self, BoardError> {
        check_size(size)?;
        let mid = size / 2;
        let mut squares = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                let dr = row.min(size - 1 - row);
                let dc = col.min(size - 1 - col);
                let square = if dr == dc {
                    if dr == 0 {
                        Square::TripleWord
                    } else {
                        Square::DoubleWord
                    }
                } else if dr.min(dc) == 0 && dr.max(dc) == mid {
                    Square::TripleWord
                } else if (dr * dc) % 5 == 4 {
                    Square::TripleLetter
                } else if (dr + dc) % 4 == 3 {
                    Square::DoubleLetter
                } else {
                    Square::Normal
                };
                squares.push(square);
            }
        }
        Ok(Self { size, squares })
    }

    /// Load exactly `size`² digit codes
    pub fn load(size: usize, text: &str) -> Result<Self, BoardError> {
        check_size(size)?;
        let squares = Self::parse_codes(text)?;
        if squares.len() != size * size {
            return Err(BoardError::WrongLength {
                expected: size * size,
                found: squares.len(),
            });
        }
        Ok(Self { size, squares })
    }

    fn parse_codes(text: &str) -> Result<Vec<Square>, BoardError> {
        significant_chars(text)
            .enumerate()
            .map(|(index, ch)| Square::from_code(ch).ok_or(BoardError::IllegalCharacter { ch, index }))
            .collect()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, pos: Pos) -> Square {
        self.squares[pos.index()]
    }

    pub fn to_compact_string(&self) -> String {
        self.squares.iter().map(|s| s.code()).collect()
    }
}

impl FromStr for SquareSet {
    type Err = BoardError;

    /// Load a grid whose size is implied by its cell count
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let squares = Self::parse_codes(text)?;
        let size = infer_size(squares.len())?;
        Ok(Self { size, squares })
    }
}

// ============================================================================
// TILE SET
// ============================================================================

/// N×N grid of tiles
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileSet {
    size: usize,
    tiles: Vec<Tile>,
}

impl TileSet {
    /// Empty board
    pub fn new(size: usize) -> Result<Self, BoardError> {
        check_size(size)?;
        Ok(Self {
            size,
            tiles: vec![Tile::ABSENT; size * size],
        })
    }

    /// Load exactly `size`² slots
    pub fn load(size: usize, text: &str) -> Result<Self, BoardError> {
        check_size(size)?;
        let tiles = Self::parse_slots(text)?;
        if tiles.len() != size * size {
            return Err(BoardError::WrongLength {
                expected: size * size,
                found: tiles.len(),
            });
        }
        Ok(Self { size, tiles })
    }

    fn parse_slots(text: &str) -> Result<Vec<Tile>, BoardError> {
        let mut tiles = Vec::new();
        let mut wild_pending = false;

        for ch in significant_chars(text) {
            let index = tiles.len();
            if ch == '*' {
                if wild_pending {
                    return Err(BoardError::DanglingWildMarker(index));
                }
                wild_pending = true;
                continue;
            }

            let wild = std::mem::take(&mut wild_pending);
            let tile = match ch {
                '_' if wild => return Err(BoardError::DanglingWildMarker(index)),
                '_' => Tile::ABSENT,
                c if c.is_ascii_lowercase() => Tile::start(c, wild),
                c if c.is_ascii_uppercase() => Tile::played(c, wild),
                _ => return Err(BoardError::IllegalCharacter { ch, index }),
            };
            tiles.push(tile);
        }

        if wild_pending {
            return Err(BoardError::DanglingWildMarker(tiles.len()));
        }
        Ok(tiles)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Position on this board, if in range
    pub fn pos(&self, row: usize, col: usize) -> Option<Pos> {
        Pos::new(row, col, self.size)
    }

    pub fn get(&self, pos: Pos) -> Tile {
        self.tiles[pos.index()]
    }

    pub fn set(&mut self, pos: Pos, tile: Tile) {
        self.tiles[pos.index()] = tile;
    }

    pub fn is_occupied(&self, pos: Pos) -> bool {
        self.get(pos).is_occupied()
    }

    /// Every position, row-major
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.tiles.len()).filter_map(move |i| Pos::from_index(i, self.size))
    }

    pub fn all_start_tile_positions(&self) -> Vec<Pos> {
        self.positions().filter(|&p| self.get(p).is_start()).collect()
    }

    pub fn all_unoccupied_positions(&self) -> Vec<Pos> {
        self.positions().filter(|&p| self.get(p).is_absent()).collect()
    }

    pub fn start_tile_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_start()).count()
    }

    pub fn occupied_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_occupied()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.iter().all(Tile::is_absent)
    }

    pub fn has_occupied_neighbor(&self, pos: Pos) -> bool {
        pos.neighbors().any(|n| self.is_occupied(n))
    }

    /// First of up to `max_len` cells from `start` along `dir` that is
    /// occupied or touches an occupied cell
    pub fn first_occupied_or_adjacent(&self, start: Pos, dir: Dir, max_len: usize) -> Option<Pos> {
        let mut cursor = Some(start);
        for _ in 0..max_len {
            let pos = cursor?;
            if self.is_occupied(pos) || self.has_occupied_neighbor(pos) {
                return Some(pos);
            }
            cursor = pos.step(dir);
        }
        None
    }

    /// One past the last contiguous occupied cell from `start` along `dir`.
    ///
    /// Returns `start` itself when it is empty, and `None` when the run
    /// reaches the edge of the board.
    pub fn end_of_occupied(&self, start: Pos, dir: Dir) -> Option<Pos> {
        let mut pos = start;
        while self.is_occupied(pos) {
            pos = pos.step(dir)?;
        }
        Some(pos)
    }

    /// Cells of the line through `pos` along `dir`: the occupied cells
    /// before it, `pos` itself, and the occupied cells after it
    pub fn line_through(&self, pos: Pos, dir: Dir) -> Vec<Pos> {
        let mut first = pos;
        while let Some(prev) = first.step(dir.negate()) {
            if !self.is_occupied(prev) {
                break;
            }
            first = prev;
        }

        let mut line = vec![first];
        let mut cursor = first;
        while let Some(next) = cursor.step(dir) {
            if next != pos && !self.is_occupied(next) {
                break;
            }
            line.push(next);
            cursor = next;
        }
        line
    }

    /// Lay a word on the board.
    ///
    /// Empty cells take the next rack tile in order and become played tiles;
    /// occupied cells must already hold the letter and become locked. The
    /// whole path is checked before anything changes.
    pub fn play_word_move(&mut self, placement: &Placement, tiles: &[RackTile]) -> Result<(), BoardError> {
        let cells = placement
            .cells()
            .ok_or(BoardError::OffBoard(placement.len()))?;

        let mut needed = 0;
        for &(pos, letter) in &cells {
            match self.get(pos).letter() {
                Some(existing) if existing != letter => {
                    return Err(BoardError::PlayMismatch {
                        row: pos.row(),
                        col: pos.col(),
                    })
                }
                Some(_) => {}
                None => needed += 1,
            }
        }
        if needed > tiles.len() {
            return Err(BoardError::TilesExhausted);
        }
        if let Some(bonus) = tiles.iter().take(needed).find(|t| !t.is_placeable()) {
            return Err(BoardError::IllegalRackTile(bonus.to_char()));
        }

        let mut supply = tiles.iter();
        for (pos, letter) in cells {
            let tile = self.get(pos);
            if tile.is_occupied() {
                self.set(pos, tile.locked());
            } else if let Some(rack_tile) = supply.next() {
                self.set(pos, Tile::played(letter, rack_tile.is_wild()));
            }
        }
        Ok(())
    }

    /// Remove a run of start tiles matching `tiles` exactly, returning the
    /// rack tiles taken. The run is checked in full before anything changes.
    pub fn play_grab_tiles_move(&mut self, start: Pos, dir: Dir, tiles: &[RackTile]) -> Result<Vec<RackTile>, BoardError> {
        let mut run = Vec::with_capacity(tiles.len());
        let mut cursor = Some(start);
        for rack_tile in tiles {
            let pos = cursor.ok_or(BoardError::OffBoard(tiles.len()))?;
            let tile = self.get(pos);
            if !tile.is_start() || !rack_tile.matches_board(&tile) {
                return Err(BoardError::GrabMismatch {
                    row: pos.row(),
                    col: pos.col(),
                });
            }
            run.push(pos);
            cursor = pos.step(dir);
        }

        for pos in run {
            self.set(pos, Tile::ABSENT);
        }
        Ok(tiles.to_vec())
    }

    /// Inverse of [`TileSet::load`]
    pub fn to_compact_string(&self) -> String {
        let mut out = String::with_capacity(self.tiles.len());
        for tile in &self.tiles {
            tile.encode(&mut out);
        }
        out
    }
}

impl FromStr for TileSet {
    type Err = BoardError;

    /// Load a grid whose size is implied by its slot count
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let tiles = Self::parse_slots(text)?;
        let size = infer_size(tiles.len())?;
        Ok(Self { size, tiles })
    }
}

impl fmt::Display for TileSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(self.size) {
            let mut line = String::new();
            for tile in row {
                match tile.letter() {
                    None => line.push('.'),
                    Some(_) => tile.encode(&mut line),
                }
            }
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "of___/_____/__*Cat/_____/_____";

    #[test]
    fn test_tile_round_trip() {
        let tiles: TileSet = SMALL.parse().unwrap();
        assert_eq!(tiles.size(), 5);
        let again = TileSet::load(5, &tiles.to_compact_string()).unwrap();
        assert_eq!(again, tiles);

        let c = tiles.get(tiles.pos(2, 2).unwrap());
        assert!(c.is_wild());
        assert!(!c.is_start());
        let a = tiles.get(tiles.pos(2, 3).unwrap());
        assert!(a.is_start());
        assert!(!a.is_wild());
    }

    #[test]
    fn test_load_errors() {
        assert_eq!(
            TileSet::load(5, "_____"),
            Err(BoardError::WrongLength { expected: 25, found: 5 })
        );
        assert!(matches!(
            TileSet::load(5, "of__1/_____/_____/_____/_____"),
            Err(BoardError::IllegalCharacter { ch: '1', index: 4 })
        ));
        assert!(matches!(
            TileSet::load(5, "*____/_____/_____/_____/_____"),
            Err(BoardError::DanglingWildMarker(0))
        ));
        assert_eq!(TileSet::new(4), Err(BoardError::TooSmall(4)));
        assert!(matches!("______".parse::<TileSet>(), Err(BoardError::NotSquare(6))));
    }

    #[test]
    fn test_square_set_load() {
        let squares = SquareSet::load(5, "40001 00000 00300 00000 10004").unwrap();
        assert_eq!(squares.get(Pos::new(0, 0, 5).unwrap()), Square::TripleWord);
        assert_eq!(squares.get(Pos::new(2, 2, 5).unwrap()), Square::DoubleWord);
        assert_eq!(squares.to_compact_string(), "4000100000003000000010004");
        assert!(matches!(
            SquareSet::load(5, "9"),
            Err(BoardError::IllegalCharacter { ch: '9', index: 0 })
        ));
    }

    #[test]
    fn test_classic_layout_is_symmetric() {
        let squares = SquareSet::classic(11).unwrap();
        for row in 0..11 {
            for col in 0..11 {
                let a = squares.get(Pos::new(row, col, 11).unwrap());
                let b = squares.get(Pos::new(col, row, 11).unwrap());
                let c = squares.get(Pos::new(10 - row, col, 11).unwrap());
                assert_eq!(a, b);
                assert_eq!(a, c);
            }
        }
        assert_eq!(squares.get(Pos::new(0, 0, 11).unwrap()), Square::TripleWord);
    }

    #[test]
    fn test_scans() {
        let tiles: TileSet = SMALL.parse().unwrap();
        assert_eq!(tiles.start_tile_count(), 4);
        assert_eq!(tiles.occupied_count(), 5);
        assert_eq!(tiles.all_unoccupied_positions().len(), 20);

        let row2 = tiles.pos(2, 0).unwrap();
        assert_eq!(tiles.first_occupied_or_adjacent(row2, Dir::E, 5), tiles.pos(2, 1));
        let row4 = tiles.pos(4, 0).unwrap();
        assert_eq!(tiles.first_occupied_or_adjacent(row4, Dir::E, 5), None);

        assert_eq!(tiles.end_of_occupied(tiles.pos(0, 0).unwrap(), Dir::E), tiles.pos(0, 2));
        assert_eq!(tiles.end_of_occupied(tiles.pos(2, 2).unwrap(), Dir::E), None);
        assert_eq!(tiles.end_of_occupied(row4, Dir::E), Some(row4));

        let line = tiles.line_through(tiles.pos(2, 3).unwrap(), Dir::E);
        assert_eq!(line.len(), 3);
        assert_eq!(line[0], tiles.pos(2, 2).unwrap());
    }

    #[test]
    fn test_play_word_locks_existing_letters() {
        let mut tiles: TileSet = "_____/_____/__a__/_____/_____".parse().unwrap();
        let placement = Placement::new("CAT", tiles.pos(2, 1).unwrap(), Dir::E);
        tiles
            .play_word_move(&placement, &[RackTile::Letter('C'), RackTile::Wild])
            .unwrap();
        let expected = format!("{}CA*T{}", "_".repeat(11), "_".repeat(11));
        assert_eq!(tiles.to_compact_string(), expected);
        assert_eq!(tiles.start_tile_count(), 0);
    }

    #[test]
    fn test_play_word_mismatch_leaves_board() {
        let mut tiles: TileSet = "_____/_____/__o__/_____/_____".parse().unwrap();
        let before = tiles.clone();
        let placement = Placement::new("CAT", tiles.pos(2, 1).unwrap(), Dir::E);
        let err = tiles.play_word_move(&placement, &[RackTile::Letter('C'), RackTile::Letter('T')]);
        assert_eq!(err, Err(BoardError::PlayMismatch { row: 2, col: 2 }));
        assert_eq!(tiles, before);
    }

    #[test]
    fn test_grab_removes_run() {
        let mut tiles: TileSet = SMALL.parse().unwrap();
        let start = tiles.pos(0, 0).unwrap();
        let taken = tiles
            .play_grab_tiles_move(start, Dir::E, &[RackTile::Letter('O'), RackTile::Letter('F')])
            .unwrap();
        assert_eq!(taken.len(), 2);
        assert!(tiles.get(start).is_absent());
    }

    #[test]
    fn test_grab_rejects_played_and_wild_mismatch() {
        let mut tiles: TileSet = SMALL.parse().unwrap();
        let played = tiles.pos(2, 2).unwrap();
        assert!(tiles
            .play_grab_tiles_move(played, Dir::E, &[RackTile::Wild])
            .is_err());
        let a = tiles.pos(2, 3).unwrap();
        assert_eq!(
            tiles.play_grab_tiles_move(a, Dir::E, &[RackTile::Letter('A'), RackTile::Wild]),
            Err(BoardError::GrabMismatch { row: 2, col: 4 })
        );
        assert!(tiles.get(a).is_occupied());
    }
}

//! Square board geometry with row/column coordinates

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Smallest board the engine accepts
pub const MIN_BOARD_SIZE: usize = 5;

/// Largest board the engine accepts (fits the `u8` coordinate storage)
pub const MAX_BOARD_SIZE: usize = 64;

/// A cell on an N×N board.
///
/// A `Pos` always lies inside the board it was created for: the only way to
/// get one is through [`Pos::new`] or by stepping from another `Pos`, both of
/// which refuse to leave `[0, size)`. Equality and hashing only look at the
/// row and column.
#[derive(Clone, Copy, Debug)]
pub struct Pos {
    row: u8,
    col: u8,
    size: u8,
}

impl Pos {
    /// Create a position, or `None` if it falls outside the board
    pub fn new(row: usize, col: usize, size: usize) -> Option<Self> {
        if size > MAX_BOARD_SIZE || row >= size || col >= size {
            return None;
        }
        Some(Self {
            row: row as u8,
            col: col as u8,
            size: size as u8,
        })
    }

    /// Position from a flat row-major index
    pub fn from_index(index: usize, size: usize) -> Option<Self> {
        if size == 0 {
            return None;
        }
        Self::new(index / size, index % size, size)
    }

    pub fn row(&self) -> usize {
        self.row as usize
    }

    pub fn col(&self) -> usize {
        self.col as usize
    }

    /// Size of the board this position belongs to
    pub fn board_size(&self) -> usize {
        self.size as usize
    }

    /// Flat row-major index
    pub fn index(&self) -> usize {
        self.row() * self.board_size() + self.col()
    }

    /// Neighbor one step in `dir`
    pub fn step(&self, dir: Dir) -> Option<Pos> {
        self.step_by(dir, 1)
    }

    /// Neighbor `n` steps in `dir`
    pub fn step_by(&self, dir: Dir, n: usize) -> Option<Pos> {
        let (dr, dc) = dir.delta();
        let n = n as isize;
        let row = self.row as isize + dr * n;
        let col = self.col as isize + dc * n;
        if row < 0 || col < 0 {
            return None;
        }
        Pos::new(row as usize, col as usize, self.board_size())
    }

    /// All on-board 4-neighbors
    pub fn neighbors(&self) -> impl Iterator<Item = Pos> + '_ {
        Dir::ALL.iter().filter_map(move |&dir| self.step(dir))
    }

    /// Wire coordinate for this position
    pub fn coord(&self) -> Coord {
        Coord::new(self.row as i32, self.col as i32)
    }
}

impl PartialEq for Pos {
    fn eq(&self, other: &Self) -> bool {
        self.row == other.row && self.col == other.col
    }
}

impl Eq for Pos {}

impl Hash for Pos {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.row.hash(state);
        self.col.hash(state);
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Unchecked coordinate as it arrives in a move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Resolve against a board of the given size
    pub fn to_pos(self, size: usize) -> Option<Pos> {
        if self.row < 0 || self.col < 0 {
            return None;
        }
        Pos::new(self.row as usize, self.col as usize, size)
    }
}

/// Compass direction on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dir {
    N,
    S,
    E,
    W,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::N, Dir::S, Dir::E, Dir::W];

    /// Words are only ever read left-to-right or top-to-bottom
    pub const PLAYABLE: [Dir; 2] = [Dir::E, Dir::S];

    /// Row/column offset of one step
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Dir::N => (-1, 0),
            Dir::S => (1, 0),
            Dir::E => (0, 1),
            Dir::W => (0, -1),
        }
    }

    pub const fn negate(self) -> Dir {
        match self {
            Dir::N => Dir::S,
            Dir::S => Dir::N,
            Dir::E => Dir::W,
            Dir::W => Dir::E,
        }
    }

    /// The playable direction orthogonal to this one
    pub const fn perp(self) -> Dir {
        match self {
            Dir::N | Dir::S => Dir::E,
            Dir::E | Dir::W => Dir::S,
        }
    }

    pub const fn is_playable(self) -> bool {
        matches!(self, Dir::E | Dir::S)
    }

    /// Playable direction on the same axis
    pub const fn canonical(self) -> Dir {
        match self {
            Dir::N | Dir::S => Dir::S,
            Dir::E | Dir::W => Dir::E,
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Dir::N => "N",
            Dir::S => "S",
            Dir::E => "E",
            Dir::W => "W",
        };
        f.write_str(s)
    }
}

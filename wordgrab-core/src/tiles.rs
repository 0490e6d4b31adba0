//! Square, tile and rack-tile value types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Letter scoring and bag distribution
#[derive(Clone, Copy, Debug)]
pub struct LetterInfo {
    pub letter: char,
    pub value: u32,
    pub count: u8,
}

impl LetterInfo {
    const fn new(letter: char, value: u32, count: u8) -> Self {
        Self { letter, value, count }
    }
}

/// All 26 letters, in order
pub static LETTERS: [LetterInfo; 26] = [
    LetterInfo::new('A', 1, 9),
    LetterInfo::new('B', 3, 2),
    LetterInfo::new('C', 3, 2),
    LetterInfo::new('D', 2, 4),
    LetterInfo::new('E', 1, 12),
    LetterInfo::new('F', 4, 2),
    LetterInfo::new('G', 2, 3),
    LetterInfo::new('H', 4, 2),
    LetterInfo::new('I', 1, 9),
    LetterInfo::new('J', 8, 1),
    LetterInfo::new('K', 5, 1),
    LetterInfo::new('L', 1, 4),
    LetterInfo::new('M', 3, 2),
    LetterInfo::new('N', 1, 6),
    LetterInfo::new('O', 1, 8),
    LetterInfo::new('P', 3, 2),
    LetterInfo::new('Q', 10, 1),
    LetterInfo::new('R', 1, 6),
    LetterInfo::new('S', 1, 4),
    LetterInfo::new('T', 1, 6),
    LetterInfo::new('U', 1, 4),
    LetterInfo::new('V', 4, 2),
    LetterInfo::new('W', 4, 2),
    LetterInfo::new('X', 8, 1),
    LetterInfo::new('Y', 4, 2),
    LetterInfo::new('Z', 10, 1),
];

/// Wildcards in a full letter bag
pub const WILDS_IN_BAG: u8 = 2;

/// Index 0-25 of an ASCII letter (either case)
pub fn letter_index(c: char) -> Option<usize> {
    if c.is_ascii_alphabetic() {
        Some((c.to_ascii_uppercase() as u8 - b'A') as usize)
    } else {
        None
    }
}

/// Point value of a letter; non-letters are worth nothing
pub fn letter_value(c: char) -> u32 {
    letter_index(c).map_or(0, |i| LETTERS[i].value)
}

/// Total value of a run of letters
pub fn word_value(word: &str) -> u32 {
    word.chars().map(letter_value).sum()
}

// ============================================================================
// SQUARES
// ============================================================================

/// Premium type of a board cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    #[default]
    Normal,
    DoubleLetter,
    TripleLetter,
    DoubleWord,
    TripleWord,
}

impl Square {
    /// Parse the single-digit grid code
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            '0' => Some(Square::Normal),
            '1' => Some(Square::DoubleLetter),
            '2' => Some(Square::TripleLetter),
            '3' => Some(Square::DoubleWord),
            '4' => Some(Square::TripleWord),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Square::Normal => '0',
            Square::DoubleLetter => '1',
            Square::TripleLetter => '2',
            Square::DoubleWord => '3',
            Square::TripleWord => '4',
        }
    }

    pub fn letter_multiplier(self) -> u32 {
        match self {
            Square::DoubleLetter => 2,
            Square::TripleLetter => 3,
            _ => 1,
        }
    }

    pub fn word_multiplier(self) -> u32 {
        match self {
            Square::DoubleWord => 2,
            Square::TripleWord => 3,
            _ => 1,
        }
    }
}

// ============================================================================
// BOARD TILES
// ============================================================================

/// State of one board cell.
///
/// Either absent, or an uppercase letter with a `wild` flag and a `start`
/// flag. Start tiles were on the board when the game was created and are the
/// only tiles that can be grabbed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Tile {
    letter: Option<char>,
    wild: bool,
    start: bool,
}

impl Tile {
    pub const ABSENT: Tile = Tile {
        letter: None,
        wild: false,
        start: false,
    };

    /// A tile dealt onto the board at game creation
    pub fn start(letter: char, wild: bool) -> Self {
        Self {
            letter: Some(letter.to_ascii_uppercase()),
            wild,
            start: true,
        }
    }

    /// A tile placed by a player
    pub fn played(letter: char, wild: bool) -> Self {
        Self {
            letter: Some(letter.to_ascii_uppercase()),
            wild,
            start: false,
        }
    }

    pub fn letter(&self) -> Option<char> {
        self.letter
    }

    pub fn is_absent(&self) -> bool {
        self.letter.is_none()
    }

    pub fn is_occupied(&self) -> bool {
        self.letter.is_some()
    }

    pub fn is_wild(&self) -> bool {
        self.wild
    }

    pub fn is_start(&self) -> bool {
        self.start
    }

    /// Same letter, no longer grab-able
    pub fn locked(self) -> Self {
        Self { start: false, ..self }
    }

    /// What this tile becomes when grabbed into a rack
    pub fn to_rack_tile(&self) -> Option<RackTile> {
        let letter = self.letter?;
        Some(if self.wild {
            RackTile::Wild
        } else {
            RackTile::Letter(letter)
        })
    }

    /// Compact grid encoding: optional `*`, then `_`, lowercase or uppercase
    pub fn encode(&self, out: &mut String) {
        match self.letter {
            None => out.push('_'),
            Some(letter) => {
                if self.wild {
                    out.push('*');
                }
                if self.start {
                    out.push(letter.to_ascii_lowercase());
                } else {
                    out.push(letter);
                }
            }
        }
    }
}

// ============================================================================
// RACK TILES
// ============================================================================

/// An unplaced tile held in a rack
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "char", try_from = "char")]
pub enum RackTile {
    Letter(char),
    Wild,
    Bonus,
}

impl RackTile {
    pub const WILD_CHAR: char = '*';
    pub const BONUS_CHAR: char = '^';

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            Self::WILD_CHAR => Some(RackTile::Wild),
            Self::BONUS_CHAR => Some(RackTile::Bonus),
            c if c.is_ascii_uppercase() => Some(RackTile::Letter(c)),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            RackTile::Letter(c) => c,
            RackTile::Wild => Self::WILD_CHAR,
            RackTile::Bonus => Self::BONUS_CHAR,
        }
    }

    pub fn letter(self) -> Option<char> {
        match self {
            RackTile::Letter(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_wild(self) -> bool {
        self == RackTile::Wild
    }

    /// Whether this tile can cover a board letter
    pub fn is_placeable(self) -> bool {
        self != RackTile::Bonus
    }

    /// Whether `tile` on the board is exactly this rack tile
    pub fn matches_board(self, tile: &Tile) -> bool {
        match (self, tile.letter()) {
            (RackTile::Wild, Some(_)) => tile.is_wild(),
            (RackTile::Letter(c), Some(letter)) => !tile.is_wild() && c == letter,
            _ => false,
        }
    }
}

impl From<RackTile> for char {
    fn from(tile: RackTile) -> char {
        tile.to_char()
    }
}

impl TryFrom<char> for RackTile {
    type Error = String;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        RackTile::from_char(c).ok_or_else(|| format!("illegal rack tile '{c}'"))
    }
}

impl fmt::Display for RackTile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

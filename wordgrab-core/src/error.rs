//! Error types for board loading, move validation and move application

use crate::board::Dir;

/// Structural problems with serialized boards and racks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board must be at least 5x5, got {0}x{0}")]
    TooSmall(usize),

    #[error("board of {0} cells is not a supported square")]
    NotSquare(usize),

    #[error("expected {expected} cells, found {found}")]
    WrongLength { expected: usize, found: usize },

    #[error("illegal character '{ch}' at cell {index}")]
    IllegalCharacter { ch: char, index: usize },

    #[error("wild marker at cell {0} is not followed by a letter")]
    DanglingWildMarker(usize),

    #[error("illegal rack tile '{0}'")]
    IllegalRackTile(char),

    #[error("rack would hold {0} tiles, more than the maximum")]
    RackOverflow(usize),

    #[error("run of {0} cells leaves the board")]
    OffBoard(usize),

    #[error("cell {row},{col} does not hold the expected letter")]
    PlayMismatch { row: usize, col: usize },

    #[error("cell {row},{col} does not hold the declared start tile")]
    GrabMismatch { row: usize, col: usize },

    #[error("placement needs more rack tiles than were supplied")]
    TilesExhausted,
}

/// Reasons a move is illegal in the current position.
///
/// These are ordinary values: a rejected move leaves the game untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("game is already over")]
    GameOver,

    #[error("move is for game {found}, not {expected}")]
    WrongGame { expected: u64, found: u64 },

    #[error("start ({row}, {col}) is not on the board")]
    InvalidStart { row: i32, col: i32 },

    #[error("words cannot be played {0}")]
    UnplayableDirection(Dir),

    #[error("no letters given")]
    EmptyWord,

    #[error("'{0}' contains characters that are not letters")]
    InvalidLetters(String),

    #[error("rack does not contain the declared tiles")]
    TilesNotInRack,

    #[error("word starts in the middle of another word")]
    StartsMidWord,

    #[error("word runs off the board")]
    WordOffBoard,

    #[error("cell ({row}, {col}) holds {found}, not {expected}")]
    LetterMismatch {
        row: usize,
        col: usize,
        expected: char,
        found: char,
    },

    #[error("word is followed by letters already on the board")]
    WordNotTerminated,

    #[error("word places no tiles")]
    NoTilesPlaced,

    #[error("word needs {expected} tiles, {found} declared")]
    TileCountMismatch { expected: usize, found: usize },

    #[error("declared tile {tile} cannot cover letter {letter}")]
    TileLetterMismatch { tile: char, letter: char },

    #[error("bonus tiles cannot be placed on the board")]
    BonusTileNotPlaceable,

    #[error("{0} is not a valid word")]
    InvalidWord(String),

    #[error("{0} is not a valid word (formed across the play)")]
    InvalidPerpendicularWord(String),

    #[error("no tile to grab at the start cell")]
    NothingToGrab,

    #[error("no tiles declared for the grab")]
    EmptyGrab,

    #[error("cell ({row}, {col}) is not a start tile")]
    NotAStartTile { row: usize, col: usize },

    #[error("declared tile does not match the board at ({row}, {col})")]
    GrabTileMismatch { row: usize, col: usize },

    #[error("grab letters {declared} do not match the tiles taken")]
    GrabLettersMismatch { declared: String },

    #[error("grab would put {0} tiles in the rack")]
    RackOverflow(usize),
}

/// Failures of [`Game::apply_move`](crate::Game::apply_move)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The move did not pass validation; nothing was changed
    #[error("move was not valid: {0}")]
    Unvalidated(#[from] MoveError),

    /// Board state disagreed with a validated move
    #[error("board error while applying move: {0}")]
    Board(#[from] BoardError),

    /// Validation and application disagree; the game must not be persisted
    #[error("internal inconsistency: {0}")]
    Inconsistent(String),
}

//! WordGrab Core - Game engine and AI
//!
//! This crate provides the core game logic for WordGrab:
//! - Board geometry (square grid with row/column coordinates)
//! - Tiles, premium squares and racks
//! - Dictionary trie and constrained word lookup
//! - Move validation, scoring and the turn/end-of-game state machine
//! - Randomized computer opponents

pub mod board;
pub mod tiles;
pub mod grid;
pub mod rack;
pub mod dictionary;
pub mod moves;
pub mod game;
pub mod ai;
pub mod setup;
pub mod error;

// Re-exports for convenient access
pub use board::{Coord, Dir, Pos, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
pub use tiles::{letter_value, word_value, RackTile, Square, Tile, LETTERS};
pub use grid::{SquareSet, TileSet};
pub use rack::{Rack, MAX_TILES_IN_RACK};
pub use dictionary::{Dictionary, DictionaryTrie, SpecialDictionary, WordConstraint, WordSets};
pub use moves::{Move, MoveType, Placement};
pub use game::{Game, GameResult, GameSnapshot, Player};
pub use ai::{play_game, GameAI, Personality};
pub use setup::{GameSetup, Layout};
pub use error::{BoardError, EngineError, MoveError};

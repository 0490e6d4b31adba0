//! Check command - validate a move against a saved game, optionally applying it

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use wordgrab_core::{Game, GameSnapshot, Move};

use crate::config::{load_game, DictionaryArgs};

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub dictionaries: DictionaryArgs,

    /// Game snapshot JSON file
    #[arg(long, value_name = "FILE")]
    pub game: PathBuf,

    /// Move JSON file
    #[arg(long = "move", value_name = "FILE")]
    pub mv: PathBuf,

    /// Apply a valid move and print the resulting snapshot
    #[arg(long)]
    pub apply: bool,
}

/// Outcome of checking one move
#[derive(Debug, Serialize)]
struct CheckReport {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    points: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot: Option<GameSnapshot>,
}

pub fn run(args: CheckArgs) -> Result<()> {
    let mut game = load_game(&args.game, &args.dictionaries)?;
    let mv = load_move(&args.mv)?;

    let report = check(&mut game, &mv, args.apply)?;
    if let Some(error) = &report.error {
        tracing::warn!("move rejected: {}", error);
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn load_move(path: &Path) -> Result<Move> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read move: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse move: {}", path.display()))
}

/// Validate `mv`; when `apply` is set and the move is legal, play it.
///
/// Illegal moves are reported, not raised. Engine failures while applying
/// a validated move are errors.
fn check(game: &mut Game, mv: &Move, apply: bool) -> Result<CheckReport> {
    if let Some(error) = game.move_error(mv) {
        return Ok(CheckReport {
            valid: false,
            error: Some(error.to_string()),
            points: 0,
            snapshot: None,
        });
    }

    let (points, snapshot) = if apply {
        let points = game.apply_move(mv)?;
        (points, Some(game.snapshot()))
    } else {
        (game.compute_points(mv)?, None)
    };

    Ok(CheckReport {
        valid: true,
        error: None,
        points,
        snapshot,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use wordgrab_core::{Coord, Dictionary, Dir, GameResult, RackTile, SquareSet, TileSet};

    fn game() -> Game {
        let dictionary = Arc::new(Dictionary::from_words(["cat", "act", "at"]));
        let tiles: TileSet = "_____/_____/_____/_____/_____".parse().unwrap();
        let squares = SquareSet::uniform(5).unwrap();
        let racks = ["CAT".parse().unwrap(), "DOG".parse().unwrap()];
        Game::new(1, squares, tiles, racks, dictionary).unwrap()
    }

    fn cat() -> Move {
        let tiles = "CAT".chars().map(RackTile::Letter).collect();
        Move::play_word(1, "CAT", Coord::new(2, 1), Dir::E, tiles)
    }

    #[test]
    fn test_check_valid_move_without_applying() {
        let mut game = game();
        let before = game.snapshot();
        let report = check(&mut game, &cat(), false).unwrap();

        assert!(report.valid);
        assert_eq!(report.points, 5);
        assert!(report.snapshot.is_none());
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_check_apply_returns_snapshot() {
        let mut game = game();
        let report = check(&mut game, &cat(), true).unwrap();

        let snapshot = report.snapshot.unwrap();
        assert_eq!(snapshot.score1, 5);
        assert!(!snapshot.player1_turn);
        assert_eq!(snapshot.result, GameResult::InProgress);
    }

    #[test]
    fn test_check_reports_illegal_move() {
        let mut game = game();
        let tiles = "TCA".chars().map(RackTile::Letter).collect();
        let mv = Move::play_word(1, "TCA", Coord::new(2, 1), Dir::E, tiles);
        let report = check(&mut game, &mv, true).unwrap();

        assert!(!report.valid);
        assert!(report.error.unwrap().contains("TCA"));
        assert!(report.snapshot.is_none());
    }
}

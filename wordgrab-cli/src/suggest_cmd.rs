//! Suggest command - print the AI's move for a saved game

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use wordgrab_core::{Game, GameAI, Move};

use crate::config::{load_game, personality, DictionaryArgs};

#[derive(Args)]
pub struct SuggestArgs {
    #[command(flatten)]
    pub dictionaries: DictionaryArgs,

    /// Game snapshot JSON file
    #[arg(long, value_name = "FILE")]
    pub game: PathBuf,

    /// AI personality preset
    #[arg(long, default_value = "balanced")]
    pub personality: String,
}

/// Suggested move, as printed
#[derive(Serialize)]
struct Suggestion<'a> {
    personality: &'a str,
    #[serde(rename = "move")]
    mv: &'a Move,
}

pub fn run(args: SuggestArgs, seed: Option<u64>) -> Result<()> {
    let game = load_game(&args.game, &args.dictionaries)?;
    if game.is_over() {
        anyhow::bail!("game {} is already over ({:?})", game.id(), game.result());
    }

    let ai = GameAI::new(personality(&args.personality)?);
    let mv = suggest(&game, &ai, seed);
    tracing::info!(move_type = ?mv.move_type, points = mv.points, "suggested move");

    let output = Suggestion {
        personality: &args.personality,
        mv: &mv,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn suggest(game: &Game, ai: &GameAI, seed: Option<u64>) -> Move {
    match seed {
        Some(s) => ai.next_move_with_rng(game, &mut ChaCha8Rng::seed_from_u64(s)),
        None => ai.next_move(game),
    }
}

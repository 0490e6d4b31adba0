//! Match command - play AI personalities against each other
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use wordgrab_core::{play_game, Dictionary, GameAI, GameResult, Player, SpecialDictionary};

use crate::config::{personality, DictionaryArgs, MatchConfig};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    #[command(flatten)]
    pub dictionaries: DictionaryArgs,

    /// Match config JSON file (flags below override it)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Game setup JSON file
    #[arg(long, value_name = "FILE")]
    pub setup: Option<PathBuf>,

    /// Personality in the first seat of odd-numbered games
    #[arg(long)]
    pub player1: Option<String>,

    /// Personality in the second seat of odd-numbered games
    #[arg(long)]
    pub player2: Option<String>,

    /// Number of games to play (will alternate seats)
    #[arg(long)]
    pub games: Option<usize>,

    /// Maximum moves per game
    #[arg(long)]
    pub max_moves: Option<usize>,

    /// Play games in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game, seen from the configured players
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    seed: u64,
    result: GameResult,
    moves: usize,
    /// Seat of `MatchConfig::player1` in this game
    player1_seat: Player,
    player1_score: u32,
    player2_score: u32,
}

impl GameRecord {
    /// Winner as configured player number (1 or 2), if any
    fn winner(&self) -> Option<u8> {
        let seat = self.result.winner()?;
        Some(if seat == self.player1_seat { 1 } else { 2 })
    }
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    player1: String,
    player2: String,
    games: Vec<GameRecord>,
    player1_wins: usize,
    player2_wins: usize,
    ties: usize,
    unfinished: usize,
    avg_moves: f32,
    avg_player1_score: f32,
    avg_player2_score: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Build the match config from file and flags
/// 2. Load the dictionaries
/// 3. Play the match (multiple games)
/// 4. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let mut config = build_config(&args, seed)?;
    let (dictionary, special) = args.dictionaries.load()?;
    name_special_dictionary(&mut config, special.as_deref());

    tracing::info!(
        "Starting match: {} vs {} ({} games, {} board)",
        config.player1.name,
        config.player2.name,
        config.games,
        config.setup.board_size
    );

    let results = play_match(&config, dictionary, special, !args.json)?;

    report_results(&results, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Start from the config file (or defaults) and apply command-line overrides
fn build_config(args: &MatchArgs, seed: Option<u64>) -> Result<MatchConfig> {
    let mut config = match &args.config {
        Some(path) => MatchConfig::load(path)?,
        None => MatchConfig::default(),
    };

    if let Some(path) = &args.setup {
        let setup = wordgrab_core::GameSetup::load(path)
            .with_context(|| format!("Failed to load game setup: {}", path.display()))?;
        config = config.with_setup(setup);
    }
    if args.player1.is_some() || args.player2.is_some() {
        let player1 = match &args.player1 {
            Some(name) => personality(name)?,
            None => config.player1.clone(),
        };
        let player2 = match &args.player2 {
            Some(name) => personality(name)?,
            None => config.player2.clone(),
        };
        config = config.with_players(player1, player2);
    }
    if let Some(games) = args.games {
        config = config.with_games(games);
    }
    if let Some(max_moves) = args.max_moves {
        config = config.with_max_moves(max_moves);
    }
    if args.parallel {
        config = config.with_parallel(true);
    }
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    Ok(config)
}

/// A loaded special dictionary applies to setups that do not name their own
fn name_special_dictionary(config: &mut MatchConfig, special: Option<&SpecialDictionary>) {
    if let Some(special) = special {
        if config.setup.special_dictionary.is_none() {
            config.setup.special_dictionary = Some(special.name().to_string());
        }
    }
}

/// Play all games in the match
fn play_match(
    config: &MatchConfig,
    dictionary: Arc<Dictionary>,
    special: Option<Arc<SpecialDictionary>>,
    show_progress: bool,
) -> Result<MatchResults> {
    let base_seed = config.seed.unwrap_or_else(|| create_rng(None).gen());
    let ai1 = GameAI::new(config.player1.clone());
    let ai2 = GameAI::new(config.player2.clone());
    let progress = create_progress(config.games, show_progress)?;

    let play = |index: usize| -> Result<GameRecord> {
        let record = play_single_game(config, index, base_seed, &dictionary, special.as_ref(), [&ai1, &ai2])?;
        tracing::debug!(
            "Game {}: {:?} in {} moves ({}-{})",
            record.game_number,
            record.result,
            record.moves,
            record.player1_score,
            record.player2_score
        );
        progress.inc(1);
        Ok(record)
    };

    let games = if config.parallel {
        (0..config.games).into_par_iter().map(play).collect::<Result<Vec<_>>>()?
    } else {
        (0..config.games).map(play).collect::<Result<Vec<_>>>()?
    };
    progress.finish_and_clear();

    Ok(compute_match_statistics(&config.player1.name, &config.player2.name, games))
}

/// Report match results
fn report_results(results: &MatchResults, json: bool) -> Result<()> {
    if json {
        print_json_results(results)
    } else {
        print_text_results(results);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game with its own seed; the configured players swap seats on
/// every other game
fn play_single_game(
    config: &MatchConfig,
    index: usize,
    base_seed: u64,
    dictionary: &Arc<Dictionary>,
    special: Option<&Arc<SpecialDictionary>>,
    players: [&GameAI; 2],
) -> Result<GameRecord> {
    let seed = base_seed.wrapping_add(index as u64);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let swap_seats = index % 2 == 1;
    let seats = if swap_seats { [players[1], players[0]] } else { players };
    let player1_seat = if swap_seats { Player::Two } else { Player::One };

    let mut game = config
        .setup
        .build(index as u64 + 1, dictionary.clone(), special.cloned(), &mut rng)
        .with_context(|| format!("Failed to set up game {}", index + 1))?;
    game.accept();

    let moves = play_game(&mut game, seats, config.max_moves, &mut rng)
        .with_context(|| format!("Game {} (seed {}) hit an engine error", index + 1, seed))?;

    Ok(GameRecord {
        game_number: index + 1,
        seed,
        result: game.result(),
        moves: moves.len(),
        player1_seat,
        player1_score: game.score(player1_seat),
        player2_score: game.score(player1_seat.opponent()),
    })
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(player1: &str, player2: &str, games: Vec<GameRecord>) -> MatchResults {
    let player1_wins = games.iter().filter(|g| g.winner() == Some(1)).count();
    let player2_wins = games.iter().filter(|g| g.winner() == Some(2)).count();
    let ties = games.iter().filter(|g| g.result == GameResult::Tie).count();
    let unfinished = games.iter().filter(|g| !g.result.is_terminal()).count();

    let average = |total: usize| {
        if games.is_empty() {
            0.0
        } else {
            total as f32 / games.len() as f32
        }
    };
    let avg_moves = average(games.iter().map(|g| g.moves).sum());
    let avg_player1_score = average(games.iter().map(|g| g.player1_score as usize).sum());
    let avg_player2_score = average(games.iter().map(|g| g.player2_score as usize).sum());

    MatchResults {
        player1: player1.to_string(),
        player2: player2.to_string(),
        games,
        player1_wins,
        player2_wins,
        ties,
        unfinished,
        avg_moves,
        avg_player1_score,
        avg_player2_score,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Progress bar over games, hidden when output is machine-readable
fn create_progress(games: usize, visible: bool) -> Result<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(games as u64);
    pb.set_style(ProgressStyle::with_template(
        "{spinner} {elapsed_precise} [{bar:30}] {pos}/{len} games",
    )?);
    Ok(pb)
}

fn percent(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &MatchResults) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        seed: u64,
        result: GameResult,
        moves: usize,
        player1_seat: usize,
        player1_score: u32,
        player2_score: u32,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        player1: &'a str,
        player2: &'a str,
        total_games: usize,
        player1_wins: usize,
        player2_wins: usize,
        ties: usize,
        unfinished: usize,
        avg_moves: f32,
        avg_player1_score: f32,
        avg_player2_score: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        player1: &results.player1,
        player2: &results.player2,
        total_games: results.games.len(),
        player1_wins: results.player1_wins,
        player2_wins: results.player2_wins,
        ties: results.ties,
        unfinished: results.unfinished,
        avg_moves: results.avg_moves,
        avg_player1_score: results.avg_player1_score,
        avg_player2_score: results.avg_player2_score,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                seed: g.seed,
                result: g.result,
                moves: g.moves,
                player1_seat: g.player1_seat.index() + 1,
                player1_score: g.player1_score,
                player2_score: g.player2_score,
            })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.games.len();

    println!("\n=== Match Results: {} vs {} ===", results.player1, results.player2);
    println!("Total games: {}", total);
    println!(
        "{} wins: {} ({:.1}%)",
        results.player1,
        results.player1_wins,
        percent(results.player1_wins, total)
    );
    println!(
        "{} wins: {} ({:.1}%)",
        results.player2,
        results.player2_wins,
        percent(results.player2_wins, total)
    );
    println!("Ties:        {} ({:.1}%)", results.ties, percent(results.ties, total));
    if results.unfinished > 0 {
        println!("Unfinished:  {}", results.unfinished);
    }
    println!("Avg moves:   {:.1}", results.avg_moves);
    println!(
        "Avg scores:  {:.1} - {:.1}",
        results.avg_player1_score, results.avg_player2_score
    );

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {} (seed {}): {:?} in {} moves, {}-{}",
            game.game_number, game.seed, game.result, game.moves, game.player1_score, game.player2_score
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use wordgrab_core::Personality;

    const WORDS: &str = "
        at an as on no of to so do go it is in be me we
        cat act car arc art rat tar tan ant ten net one toe tea eat ate sea set sit
        ore roe red rod dot not ton note tone east seat teas eats stone notes onset
    ";

    fn record(game_number: usize, result: GameResult, player1_seat: Player, moves: usize) -> GameRecord {
        GameRecord {
            game_number,
            seed: game_number as u64,
            result,
            moves,
            player1_seat,
            player1_score: 10,
            player2_score: 20,
        }
    }

    #[test]
    fn test_compute_match_statistics_empty() {
        let results = compute_match_statistics("a", "b", vec![]);
        assert_eq!(results.player1_wins, 0);
        assert_eq!(results.player2_wins, 0);
        assert_eq!(results.ties, 0);
        assert_eq!(results.avg_moves, 0.0);
    }

    #[test]
    fn test_compute_match_statistics_follows_seats() {
        let games = vec![
            record(1, GameResult::Player1Win, Player::One, 10),
            // configured player one sat second and won
            record(2, GameResult::Player2Win, Player::Two, 20),
            record(3, GameResult::Player1Resign, Player::One, 30),
            record(4, GameResult::Tie, Player::Two, 40),
        ];

        let results = compute_match_statistics("a", "b", games);
        assert_eq!(results.player1_wins, 2);
        assert_eq!(results.player2_wins, 1);
        assert_eq!(results.ties, 1);
        assert_eq!(results.unfinished, 0);
        assert_eq!(results.avg_moves, 25.0);
        assert_eq!(results.avg_player1_score, 10.0);
    }

    #[test]
    fn test_unfinished_games_counted() {
        let results = compute_match_statistics("a", "b", vec![record(1, GameResult::InProgress, Player::One, 5)]);
        assert_eq!(results.unfinished, 1);
        assert_eq!(results.player1_wins + results.player2_wins + results.ties, 0);
    }

    #[test]
    fn test_create_rng_deterministic() {
        let mut rng1 = create_rng(Some(42));
        let mut rng2 = create_rng(Some(42));

        assert_eq!(rng1.gen::<u64>(), rng2.gen::<u64>());
    }

    #[test]
    fn test_loaded_special_dictionary_named_in_setup() {
        let special = SpecialDictionary::new("zoo", ["zap"], 10, 0);
        let mut config = MatchConfig::default();
        name_special_dictionary(&mut config, Some(&special));
        assert_eq!(config.setup.special_dictionary.as_deref(), Some("zoo"));

        let mut config = MatchConfig::default()
            .with_setup(wordgrab_core::GameSetup::default().with_special_dictionary("birds"));
        name_special_dictionary(&mut config, Some(&special));
        assert_eq!(config.setup.special_dictionary.as_deref(), Some("birds"));

        let mut config = MatchConfig::default();
        name_special_dictionary(&mut config, None);
        assert_eq!(config.setup.special_dictionary, None);
    }

    #[test]
    fn test_play_match_reproducible() {
        let dictionary = Arc::new(Dictionary::from_words(WORDS.split_whitespace()));
        let config = MatchConfig::default()
            .with_games(3)
            .with_max_moves(200)
            .with_seed(11)
            .with_setup(wordgrab_core::GameSetup::default().with_board_size(9).with_start_words(3))
            .with_players(Personality::balanced(), Personality::narrow_grabber());

        let serial = play_match(&config, dictionary.clone(), None, false).unwrap();
        let parallel = play_match(&config.clone().with_parallel(true), dictionary, None, false).unwrap();

        assert_eq!(serial.games.len(), 3);
        for (a, b) in serial.games.iter().zip(&parallel.games) {
            assert_eq!(a.seed, b.seed);
            assert_eq!(a.result, b.result);
            assert_eq!(a.moves, b.moves);
        }
        assert_eq!(serial.games[1].player1_seat, Player::Two);
    }
}

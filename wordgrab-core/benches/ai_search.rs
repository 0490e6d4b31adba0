//! AI move-search timing
//!
//! Measures:
//! 1. Time for each personality to pick a move on a fresh board
//! 2. Throughput of full self-play games

use std::sync::Arc;
use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wordgrab_core::{play_game, Dictionary, Game, GameAI, GameSetup, Personality};

const WORDS: &str = "
a at an as ad am ax on no of to so do go it is in be me we he re ta
cat act car arc art rat tar tan ant ten net den end dog god nod one toe tea eat ate sea set sit
ore roe red rod dot add bad bed bet bit tab axe ram arm mat tam man men ton not tot
cart cats acts rats star arts note tone rote tore east seat teas eats date read dear dare
stone notes onset tones crate trace react cater stare tears rates aster dates trade tread
";

// ============================================================================
// BENCHMARK STRUCTURES
// ============================================================================

#[derive(Clone, Debug)]
struct BenchmarkResult {
    personality: String,
    avg_move_time_ms: f64,
    moves_per_second: f64,
    move_count: usize,
}

impl BenchmarkResult {
    fn to_table_row(&self) -> String {
        format!(
            "| {} | {:.3}ms | {:.0} | {} |",
            self.personality, self.avg_move_time_ms, self.moves_per_second, self.move_count
        )
    }
}

fn fresh_game(dictionary: &Arc<Dictionary>, seed: u64) -> Game {
    let setup = GameSetup::default().with_board_size(15).with_start_words(10);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut game = setup
        .build(seed, dictionary.clone(), None, &mut rng)
        .expect("standard setup builds");
    game.accept();
    game
}

// ============================================================================
// BENCHMARK: Time to Find Move
// ============================================================================

fn benchmark_move_time(dictionary: &Arc<Dictionary>) -> Vec<BenchmarkResult> {
    println!("\n=== MOVE TIME BENCHMARK ===");
    let mut results = Vec::new();
    let iterations = 20;

    for name in Personality::PRESETS {
        print!("  {} ... ", name);
        let ai = GameAI::new(Personality::by_name(name).expect("preset exists"));
        let mut total_time = 0.0;
        for i in 0..iterations {
            let game = fresh_game(dictionary, i);
            let mut rng = ChaCha8Rng::seed_from_u64(i);
            let start = Instant::now();
            let _ = ai.next_move_with_rng(&game, &mut rng);
            total_time += start.elapsed().as_secs_f64() * 1000.0;
        }
        let avg_time = total_time / iterations as f64;
        results.push(BenchmarkResult {
            personality: name.to_string(),
            avg_move_time_ms: avg_time,
            moves_per_second: 1000.0 / avg_time,
            move_count: iterations as usize,
        });
        println!("{:.3}ms", avg_time);
    }
    results
}

// ============================================================================
// BENCHMARK: Self-Play Throughput
// ============================================================================

fn benchmark_throughput(dictionary: &Arc<Dictionary>) -> Vec<BenchmarkResult> {
    println!("\n=== THROUGHPUT BENCHMARK ===");
    let mut results = Vec::new();

    for name in Personality::PRESETS {
        print!("  {} (games) ... ", name);
        let ai = GameAI::new(Personality::by_name(name).expect("preset exists"));
        let start = Instant::now();
        let mut moves = 0;
        for seed in 0..5 {
            let mut game = fresh_game(dictionary, seed);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            moves += play_game(&mut game, [&ai, &ai], 400, &mut rng)
                .expect("self-play moves are valid")
                .len();
        }
        let elapsed = start.elapsed().as_secs_f64() * 1000.0;
        let moves_per_sec = moves as f64 / elapsed * 1000.0;
        results.push(BenchmarkResult {
            personality: name.to_string(),
            avg_move_time_ms: elapsed / moves.max(1) as f64,
            moves_per_second: moves_per_sec,
            move_count: moves,
        });
        println!("{} moves in {:.0}ms ({:.0}/sec)", moves, elapsed, moves_per_sec);
    }
    results
}

fn main() {
    println!("WordGrab AI Search Benchmark");
    let dictionary = Arc::new(Dictionary::from_words(WORDS.split_whitespace()));
    println!("Dictionary: {} words", dictionary.len());

    let mut all = benchmark_move_time(&dictionary);
    all.extend(benchmark_throughput(&dictionary));

    println!("\n| Personality | Avg Move Time | Moves/sec | Moves |");
    println!("|-------------|---------------|-----------|-------|");
    for result in &all {
        println!("{}", result.to_table_row());
    }
}

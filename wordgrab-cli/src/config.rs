//! Shared command configuration
//!
//! Level 4 - Utilities and configuration

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};

use wordgrab_core::{Dictionary, Game, GameSetup, GameSnapshot, Personality, SpecialDictionary};

// ============================================================================
// DICTIONARIES
// ============================================================================

/// Word list options shared by every command
#[derive(Args, Clone, Debug)]
pub struct DictionaryArgs {
    /// Word list, one word per line
    #[arg(long, value_name = "FILE")]
    pub dictionary: PathBuf,

    /// Themed word list granting bonus points
    #[arg(long, value_name = "FILE")]
    pub special: Option<PathBuf>,

    /// Name recorded in snapshots for the themed word list
    #[arg(long, default_value = "special")]
    pub special_name: String,

    /// Bonus for a word found only in the themed list
    #[arg(long, default_value = "10")]
    pub special_bonus: u32,

    /// Token cost of the themed list
    #[arg(long, default_value = "0")]
    pub special_cost: u32,
}

impl DictionaryArgs {
    pub fn load(&self) -> Result<(Arc<Dictionary>, Option<Arc<SpecialDictionary>>)> {
        let dictionary = Dictionary::load(&self.dictionary)?;
        if dictionary.is_empty() {
            anyhow::bail!("dictionary {} contains no words", self.dictionary.display());
        }

        let special = match &self.special {
            Some(path) => Some(Arc::new(SpecialDictionary::load(
                &self.special_name,
                path,
                self.special_bonus,
                self.special_cost,
            )?)),
            None => None,
        };
        Ok((Arc::new(dictionary), special))
    }
}

/// Read a saved game and rebuild it against the loaded dictionaries
pub fn load_game(path: &Path, dictionaries: &DictionaryArgs) -> Result<Game> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read game snapshot: {}", path.display()))?;
    let snapshot: GameSnapshot = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse game snapshot: {}", path.display()))?;

    let (dictionary, special) = dictionaries.load()?;
    let special = match (&snapshot.special_dictionary, special) {
        (Some(wanted), Some(special)) => {
            if special.name() != wanted {
                tracing::warn!(wanted = %wanted, loaded = special.name(), "special dictionary name differs");
            }
            Some(special)
        }
        (Some(wanted), None) => {
            tracing::warn!(wanted = %wanted, "game uses a special dictionary that was not loaded");
            None
        }
        (None, _) => None,
    };

    Game::from_snapshot(&snapshot, dictionary, special)
        .with_context(|| format!("Invalid game snapshot: {}", path.display()))
}

// ============================================================================
// MATCH CONFIGURATION
// ============================================================================

/// Settings for a run of AI self-play games
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Number of games (seats alternate each game)
    pub games: usize,
    /// Moves after which an unfinished game is abandoned
    pub max_moves: usize,
    /// Play games across threads
    pub parallel: bool,
    /// Base seed; game `i` uses `seed + i` (None = random)
    pub seed: Option<u64>,
    pub setup: GameSetup,
    pub player1: Personality,
    pub player2: Personality,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            games: 10,
            max_moves: 400,
            parallel: false,
            seed: None,
            setup: GameSetup::default(),
            player1: Personality::wide_scanner(),
            player2: Personality::narrow_grabber(),
        }
    }
}

impl MatchConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read match config: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse match config: {}", path.display()))
    }

    pub fn with_games(mut self, games: usize) -> Self {
        self.games = games;
        self
    }

    pub fn with_max_moves(mut self, max_moves: usize) -> Self {
        self.max_moves = max_moves;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_setup(mut self, setup: GameSetup) -> Self {
        self.setup = setup;
        self
    }

    pub fn with_players(mut self, player1: Personality, player2: Personality) -> Self {
        self.player1 = player1;
        self.player2 = player2;
        self
    }
}

/// Resolve a personality preset by name
pub fn personality(name: &str) -> Result<Personality> {
    Personality::by_name(name).with_context(|| {
        format!(
            "Unknown personality '{}' (expected one of: {})",
            name,
            Personality::PRESETS.join(", ")
        )
    })
}

// Configuration module for reading Grid.toml
// Holds the tunable parameters for game setup, evaluation weights and logging

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub game: GameConfig,
    pub weights: WeightsConfig,
    pub parallel: ParallelConfig,
    pub debug: DebugConfig,
}

/// Game setup and self-play limits
#[derive(Debug, Deserialize, Clone)]
pub struct GameConfig {
    pub start_tiles: usize,
    /// Hard cap on player moves per game; 0 plays until no move is left
    pub max_moves: u32,
    pub games: u32,
    /// Seed for the first game; later games use consecutive seeds
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Whether `moves` has reached the configured cap
    pub fn move_limit_reached(&self, moves: u32) -> bool {
        self.max_moves != 0 && moves >= self.max_moves
    }
}

/// Weights applied to each heuristic feature by `heuristics::evaluate`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct WeightsConfig {
    pub smoothness: f64,
    pub monotonicity2: f64,
    pub empty: f64,
    pub max_value: f64,
    pub islands: f64,
    pub monotonicity: f64,
}

/// Parallel candidate evaluation
#[derive(Debug, Deserialize, Clone)]
pub struct ParallelConfig {
    pub enabled: bool,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Grid.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Grid.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Grid.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Grid.toml
    pub fn default_hardcoded() -> Self {
        Config {
            game: GameConfig {
                start_tiles: 2,
                max_moves: 0,
                games: 1,
                seed: None,
            },
            weights: WeightsConfig {
                smoothness: 0.1,
                monotonicity2: 1.0,
                empty: 2.7,
                max_value: 1.0,
                islands: 0.0,
                monotonicity: 0.0,
            },
            parallel: ParallelConfig { enabled: true },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "grid_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Grid.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_can_be_created() {
        let config = Config::default_hardcoded();
        assert_eq!(config.game.start_tiles, 2);
        assert_eq!(config.weights.empty, 2.7);
    }

    #[test]
    fn test_move_limit() {
        let mut game = Config::default_hardcoded().game;
        assert!(!game.move_limit_reached(1_000_000));

        game.max_moves = 10;
        assert!(!game.move_limit_reached(9));
        assert!(game.move_limit_reached(10));
    }

    #[test]
    fn test_grid_toml_can_be_parsed() {
        // This test ensures Grid.toml is valid and can be parsed
        let result = Config::from_file("Grid.toml");
        assert!(
            result.is_ok(),
            "Failed to parse Grid.toml: {:?}",
            result.err()
        );
    }

    #[test]
    fn test_all_config_values_match_hardcoded_defaults() {
        let file_config = Config::from_file("Grid.toml").expect("Grid.toml should be parseable");
        let hardcoded_config = Config::default_hardcoded();

        // Game
        assert_eq!(
            file_config.game.start_tiles,
            hardcoded_config.game.start_tiles
        );
        assert_eq!(file_config.game.max_moves, hardcoded_config.game.max_moves);
        assert_eq!(file_config.game.games, hardcoded_config.game.games);
        assert_eq!(file_config.game.seed, hardcoded_config.game.seed);

        // Weights
        assert_eq!(file_config.weights, hardcoded_config.weights);

        // Parallel
        assert_eq!(
            file_config.parallel.enabled,
            hardcoded_config.parallel.enabled
        );

        // Debug
        assert_eq!(file_config.debug.enabled, hardcoded_config.debug.enabled);
        assert_eq!(
            file_config.debug.log_file_path,
            hardcoded_config.debug.log_file_path
        );
    }

    #[test]
    fn test_load_or_default_works() {
        let config = Config::load_or_default();
        assert_eq!(config.weights.monotonicity2, 1.0);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        // Test with a non-existent file
        let result = Config::from_file("nonexistent.toml");
        assert!(result.is_err());
    }
}

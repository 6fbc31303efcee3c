use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::action::Direction;
use super::vector::Vector2;

/// Largest grid accepted, in cells
pub const MAX_CELLS: usize = 1_000_000;
/// Longest snake a round may start with
pub const MAX_SNAKE_LENGTH: usize = 10_000;
/// Most segments a single food may add
pub const MAX_FOOD_INCREASE: i32 = 1_000;

/// Colour tag a renderer uses to tell the snakes apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnakeColor {
    Green,
    Yellow,
    Cyan,
    Magenta,
    Blue,
    White,
}

impl SnakeColor {
    pub fn name(&self) -> &'static str {
        match self {
            SnakeColor::Green => "green",
            SnakeColor::Yellow => "yellow",
            SnakeColor::Cyan => "cyan",
            SnakeColor::Magenta => "magenta",
            SnakeColor::Blue => "blue",
            SnakeColor::White => "white",
        }
    }
}

/// Where and how a snake enters a new round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnakeSpawn {
    pub position: Vector2,
    pub direction: Direction,
    pub color: SnakeColor,
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Length every snake unfolds to at the start of a round
    pub initial_snake_length: usize,
    /// Number of foods placed on the field at the start of a round
    pub food_count: usize,
    /// Segments a snake grows by for each food eaten
    pub food_increase: i32,
    /// Time between game ticks
    pub tick_period_ms: u64,
    /// Fixed seed for food placement, entropy when absent
    pub seed: Option<u64>,
    /// One entry per player, empty for the two default players
    pub snakes: Vec<SnakeSpawn>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("grid {width}x{height} is too large, at most {max} cells")]
    GridTooLarge {
        width: usize,
        height: usize,
        max: usize,
    },
    #[error("initial_snake_length must be at least 1")]
    ZeroSnakeLength,
    #[error("initial_snake_length must be at most {max}, got {value}")]
    SnakeLengthTooLarge { value: usize, max: usize },
    #[error("tick_period_ms must be at least 1")]
    ZeroTickPeriod,
    #[error("food_increase must be non-negative, got {0}")]
    NegativeFoodIncrease(i32),
    #[error("food_increase must be at most {max}, got {value}")]
    FoodIncreaseTooLarge { value: i32, max: i32 },
    #[error("snake {index} spawns at {position}, outside the {width}x{height} grid")]
    SpawnOutOfBounds {
        index: usize,
        position: Vector2,
        width: usize,
        height: usize,
    },
    #[error("snakes {first} and {second} spawn on the same cell {position}")]
    SpawnOverlap {
        first: usize,
        second: usize,
        position: Vector2,
    },
    #[error("failed to read config {path}: {message}")]
    Read { path: PathBuf, message: String },
    #[error("failed to parse config {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(25, 20)
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size.
    ///
    /// The two players start next to each other in the middle of the grid,
    /// heading in opposite directions.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            initial_snake_length: 3,
            food_count: 10,
            food_increase: 3,
            tick_period_ms: 200,
            seed: None,
            snakes: Vec::new(),
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// The spawns a round starts from
    pub fn spawns(&self) -> Vec<SnakeSpawn> {
        if self.snakes.is_empty() {
            Self::default_spawns(self.grid_width, self.grid_height)
        } else {
            self.snakes.clone()
        }
    }

    pub fn default_spawns(width: usize, height: usize) -> Vec<SnakeSpawn> {
        let center = Vector2::new(width as i32, height as i32) / 2;
        vec![
            SnakeSpawn {
                position: center,
                direction: Direction::Right,
                color: SnakeColor::Green,
            },
            SnakeSpawn {
                position: center + Direction::Down.delta(),
                direction: Direction::Left,
                color: SnakeColor::Yellow,
            },
        ]
    }

    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&json).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn bounds(&self) -> Vector2 {
        Vector2::new(self.grid_width as i32, self.grid_height as i32)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    /// Validate the configuration
    ///
    /// Every check the tick loop relies on happens here, so a running game
    /// never has to deal with a malformed setup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }

        // Every round lists the free cells to place food, so the grid is capped
        let cells = self.grid_width.checked_mul(self.grid_height);
        if cells.filter(|&cells| cells <= MAX_CELLS).is_none() {
            return Err(ConfigError::GridTooLarge {
                width: self.grid_width,
                height: self.grid_height,
                max: MAX_CELLS,
            });
        }

        if self.initial_snake_length == 0 {
            return Err(ConfigError::ZeroSnakeLength);
        }
        if self.initial_snake_length > MAX_SNAKE_LENGTH {
            return Err(ConfigError::SnakeLengthTooLarge {
                value: self.initial_snake_length,
                max: MAX_SNAKE_LENGTH,
            });
        }

        if self.tick_period_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }

        if self.food_increase < 0 {
            return Err(ConfigError::NegativeFoodIncrease(self.food_increase));
        }
        if self.food_increase > MAX_FOOD_INCREASE {
            return Err(ConfigError::FoodIncreaseTooLarge {
                value: self.food_increase,
                max: MAX_FOOD_INCREASE,
            });
        }

        let bounds = self.bounds();
        let spawns = self.spawns();
        let mut seen = HashSet::new();
        for (index, spawn) in spawns.iter().enumerate() {
            let p = spawn.position;
            if p.x < 0 || p.y < 0 || p.x >= bounds.x || p.y >= bounds.y {
                return Err(ConfigError::SpawnOutOfBounds {
                    index,
                    position: p,
                    width: self.grid_width,
                    height: self.grid_height,
                });
            }
            if !seen.insert(p) {
                let first = spawns
                    .iter()
                    .position(|other| other.position == p)
                    .unwrap_or(index);
                return Err(ConfigError::SpawnOverlap {
                    first,
                    second: index,
                    position: p,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 25);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.initial_snake_length, 3);
        assert_eq!(config.food_count, 10);
        assert_eq!(config.food_increase, 3);
        assert_eq!(config.tick_period(), Duration::from_millis(200));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_spawns() {
        let spawns = GameConfig::default().spawns();
        assert_eq!(spawns.len(), 2);
        assert_eq!(spawns[0].position, Vector2::new(12, 10));
        assert_eq!(spawns[0].direction, Direction::Right);
        assert_eq!(spawns[0].color, SnakeColor::Green);
        assert_eq!(spawns[1].position, Vector2::new(12, 11));
        assert_eq!(spawns[1].direction, Direction::Left);
        assert_eq!(spawns[1].color, SnakeColor::Yellow);
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 15);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 15);
        assert_eq!(config.spawns()[0].position, Vector2::new(7, 7));
    }

    #[test]
    fn test_rejects_empty_grid() {
        let config = GameConfig::new(0, 10);
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyGrid {
                width: 0,
                height: 10
            })
        );
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let mut config = GameConfig::small();
        config.initial_snake_length = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroSnakeLength));

        let mut config = GameConfig::small();
        config.tick_period_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTickPeriod));

        let mut config = GameConfig::small();
        config.food_increase = -1;
        assert_eq!(config.validate(), Err(ConfigError::NegativeFoodIncrease(-1)));
    }

    #[test]
    fn test_rejects_oversized_growth() {
        let mut config = GameConfig::small();
        config.food_increase = i32::MAX;
        assert_eq!(
            config.validate(),
            Err(ConfigError::FoodIncreaseTooLarge {
                value: i32::MAX,
                max: MAX_FOOD_INCREASE
            })
        );

        config.food_increase = MAX_FOOD_INCREASE;
        assert!(config.validate().is_ok());

        let mut config = GameConfig::small();
        config.initial_snake_length = usize::MAX;
        assert_eq!(
            config.validate(),
            Err(ConfigError::SnakeLengthTooLarge {
                value: usize::MAX,
                max: MAX_SNAKE_LENGTH
            })
        );
    }

    #[test]
    fn test_rejects_huge_grid() {
        let config = GameConfig::new(50_000, 50_000);
        assert_eq!(
            config.validate(),
            Err(ConfigError::GridTooLarge {
                width: 50_000,
                height: 50_000,
                max: MAX_CELLS
            })
        );

        let config = GameConfig::new(usize::MAX, 2);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridTooLarge { .. })
        ));

        assert!(GameConfig::new(1_000, 1_000).validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_spawns() {
        let mut config = GameConfig::small();
        config.snakes = config.spawns();
        config.snakes[1].position = Vector2::new(10, 3);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SpawnOutOfBounds { index: 1, .. })
        ));

        let mut config = GameConfig::small();
        config.snakes = config.spawns();
        config.snakes[1].position = config.snakes[0].position;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SpawnOverlap {
                first: 0,
                second: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{"food_count": 2, "tick_period_ms": 90}"#).unwrap();
        assert_eq!(config.food_count, 2);
        assert_eq!(config.tick_period_ms, 90);
        assert_eq!(config.grid_width, 25);
        assert!(config.snakes.is_empty());
        assert_eq!(config.spawns().len(), 2);
    }

    #[test]
    fn test_json_spawns() {
        let json = r#"{
            "grid_width": 8,
            "grid_height": 6,
            "snakes": [
                {"position": {"x": 1, "y": 1}, "direction": "down", "color": "cyan"}
            ]
        }"#;
        let config: GameConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.snakes.len(), 1);
        assert_eq!(config.snakes[0].direction, Direction::Down);
        assert_eq!(config.snakes[0].color, SnakeColor::Cyan);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_spawns_follow_grid_size() {
        let config: GameConfig =
            serde_json::from_str(r#"{"grid_width": 8, "grid_height": 6}"#).unwrap();
        assert_eq!(config.spawns()[0].position, Vector2::new(4, 3));
        assert_eq!(config.spawns()[1].position, Vector2::new(4, 4));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_single_row_grid_rejects_default_spawns() {
        let config = GameConfig::new(10, 1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SpawnOutOfBounds { index: 1, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = GameConfig::from_json_file(Path::new("/nonexistent/duel_snake.json"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}

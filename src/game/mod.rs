//! Core game logic for two-player snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! A front end feeds turns in, calls `GameEngine::advance` once per tick and
//! draws whatever the field looks like afterwards.

pub mod action;
pub mod config;
pub mod engine;
pub mod field;
pub mod snake;
pub mod vector;

// Re-export commonly used types
pub use action::Direction;
pub use config::{ConfigError, GameConfig, SnakeColor, SnakeSpawn};
pub use engine::{GameEngine, Phase};
pub use field::{Collision, CollisionKind, Field, TickReport};
pub use snake::{MoveOutcome, Snake};
pub use vector::Vector2;

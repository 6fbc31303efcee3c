//! Duel Snake - two players, one keyboard, one wraparound grid
//!
//! This library provides:
//! - Core game logic: snakes, the shared field and the round state machine (game module)
//! - A cancelable tick clock (clock module)
//! - Keyboard mapping, TUI rendering and session metrics (input, render, metrics modules)
//! - The terminal front end tying them together (modes module)

pub mod clock;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
